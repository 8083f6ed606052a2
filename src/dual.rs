//! Faces of plane graphs
use log::warn;

use crate::plane_graph::{face_bound, ArcCycle, PlaneGraph, NO_ARC};

const MARK_LIMIT: u32 = 30000;

/// Arc marks with an epoch counter
///
/// Resetting only bumps the epoch; the marks themselves are cleared
/// when the counter runs past its limit.
#[derive(Clone, Debug)]
pub(crate) struct ArcMarks {
    marks: Vec<u32>,
    epoch: u32,
}

impl Default for ArcMarks {
    fn default() -> Self {
        Self {
            marks: Vec::new(),
            epoch: MARK_LIMIT,
        }
    }
}

impl ArcMarks {
    pub(crate) fn reset(&mut self, arc_count: usize) {
        if self.marks.len() < arc_count {
            self.marks.resize(arc_count, 0);
        }
        self.epoch += 2;
        if self.epoch > MARK_LIMIT {
            self.marks.iter_mut().for_each(|m| *m = 0);
            self.epoch = 2;
        }
    }

    pub(crate) fn mark(&mut self, arc: usize) {
        self.marks[arc] = self.epoch;
    }

    pub(crate) fn is_marked(&self, arc: usize) -> bool {
        self.marks[arc] == self.epoch
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FaceStore {
    start: Vec<usize>,
    size: Vec<usize>,
    computed: bool,
    marks: ArcMarks,
}

impl FaceStore {
    pub(crate) fn invalidate(&mut self) {
        self.start.clear();
        self.size.clear();
        self.computed = false;
    }
}

impl PlaneGraph {
    /// Compute the faces of the graph
    ///
    /// Every face is traced clockwise by repeatedly going from an arc
    /// `e` to `e.inverse.prev`. Afterwards each arc knows the face on
    /// its right. The result is kept until the graph is reloaded, so
    /// calling this again is cheap.
    pub fn make_dual(&mut self) {
        if self.faces.computed {
            return;
        }
        let Self {
            arcs,
            first_arc,
            faces,
            max_vertices,
            ..
        } = self;
        faces.marks.reset(arcs.len());
        faces.start.clear();
        faces.size.clear();
        // no-op unless the bound grew since the last graph
        faces.start.reserve(face_bound(*max_vertices));
        faces.size.reserve(face_bound(*max_vertices));

        for &first in first_arc.iter() {
            if first == NO_ARC {
                continue;
            }
            let mut e = first;
            loop {
                if !faces.marks.is_marked(e) {
                    let face = faces.start.len();
                    let mut size = 0;
                    let mut boundary = e;
                    loop {
                        arcs[boundary].right_face = face;
                        faces.marks.mark(boundary);
                        size += 1;
                        boundary = arcs[arcs[boundary].inverse].prev;
                        if boundary == e {
                            break;
                        }
                    }
                    faces.start.push(e);
                    faces.size.push(size);
                }
                e = arcs[e].next;
                if e == first {
                    break;
                }
            }
        }
        if arcs.is_empty() {
            // lone vertex
            faces.start.push(NO_ARC);
            faces.size.push(0);
        }
        faces.computed = true;

        let euler = self.vertex_count() as isize - self.edge_count() as isize
            + self.face_count() as isize;
        if euler != 2 {
            warn!(
                "Rotation system with {} vertices, {} edges, and {} faces is not plane",
                self.vertex_count(),
                self.edge_count(),
                self.face_count()
            );
        }
    }

    /// Whether the faces are up to date
    pub fn has_dual(&self) -> bool {
        self.faces.computed
    }

    /// Number of faces, 0 before [make_dual](Self::make_dual)
    pub fn face_count(&self) -> usize {
        self.faces.size.len()
    }

    pub fn face_size(&self, f: usize) -> usize {
        self.faces.size[f]
    }

    pub fn face_sizes(&self) -> &[usize] {
        &self.faces.size
    }

    /// Some arc with face `f` on its right
    pub fn face_start(&self, f: usize) -> usize {
        self.faces.start[f]
    }

    /// Arcs with face `f` on their right, in clockwise order
    pub fn face_boundary(&self, f: usize) -> ArcCycle<'_> {
        ArcCycle::new(&self.arcs, self.faces.start[f], |arcs, e| {
            arcs[arcs[e].inverse].prev
        })
    }
}
