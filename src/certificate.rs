//! Breadth-first certificates of rotation systems
use std::cmp::Ordering;

#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

use crate::plane_graph::{Arc, PlaneGraph, NO_ARC};

/// Marks the end of a vertex's neighbour list in a certificate
pub const SENTINEL: usize = usize::MAX;

const UNLABELLED: usize = usize::MAX;

/// Direction in which rotations are traversed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Clockwise, following [Arc::next]
    #[default]
    Preserving,
    /// Counterclockwise, following [Arc::prev]
    Reversing,
}

impl Orientation {
    pub fn step(self, arc: &Arc) -> usize {
        match self {
            Self::Preserving => arc.next,
            Self::Reversing => arc.prev,
        }
    }

    pub fn is_reversing(self) -> bool {
        self == Self::Reversing
    }
}

/// Vertex labels assigned in breadth-first order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labelling {
    labels: Vec<usize>,
    first_arc: Vec<usize>,
    queue: Vec<usize>,
}

impl Labelling {
    fn start(&mut self, graph: &PlaneGraph, start: usize) {
        let nv = graph.vertex_count();
        self.labels.clear();
        self.labels.resize(nv, UNLABELLED);
        self.first_arc.clear();
        self.first_arc.resize(nv, NO_ARC);
        self.queue.clear();
        let v = graph.arc(start).start;
        self.labels[v] = 0;
        self.first_arc[v] = start;
        self.queue.push(v);
    }

    fn label_end(&mut self, arc: &Arc) -> usize {
        if self.labels[arc.end] == UNLABELLED {
            self.labels[arc.end] = self.queue.len();
            self.first_arc[arc.end] = arc.inverse;
            self.queue.push(arc.end);
        }
        self.labels[arc.end]
    }

    /// Label of each vertex
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// The vertex with label `k` is `vertices()[k]`
    pub fn vertices(&self) -> &[usize] {
        &self.queue
    }

    /// Arc through which the vertex was reached
    pub fn first_arc(&self, v: usize) -> usize {
        self.first_arc[v]
    }
}

#[derive(Copy, Clone, Debug)]
enum Cursor {
    NextVertex,
    Arc { arc: usize, first: usize },
    Sentinel,
}

/// Lazily generated certificate
///
/// Vertices are labelled in breadth-first order starting from the
/// start of the initial arc. For each vertex in label order, the walk
/// yields the labels of its neighbours, starting with the arc through
/// which the vertex was reached and following the given orientation,
/// and then [SENTINEL].
///
/// The walk only labels as much of the graph as has been consumed, so
/// comparisons can stop at the first difference.
#[derive(Debug)]
pub struct CertificateWalk<'a> {
    graph: &'a PlaneGraph,
    labelling: &'a mut Labelling,
    orientation: Orientation,
    head: usize,
    cursor: Cursor,
}

impl<'a> CertificateWalk<'a> {
    pub fn new(
        graph: &'a PlaneGraph,
        start: usize,
        orientation: Orientation,
        labelling: &'a mut Labelling,
    ) -> Self {
        labelling.start(graph, start);
        Self {
            graph,
            labelling,
            orientation,
            head: 0,
            cursor: Cursor::NextVertex,
        }
    }

    /// Compare the remaining walk to the tail of `best`
    pub fn compare(self, best: &[usize]) -> Ordering {
        let mut best = best.iter();
        for label in self {
            let Some(&expected) = best.next() else {
                return Ordering::Greater;
            };
            match label.cmp(&expected) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        if best.next().is_some() {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

impl Iterator for CertificateWalk<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.cursor {
                Cursor::NextVertex => {
                    let &v = self.labelling.queue.get(self.head)?;
                    self.head += 1;
                    let first = self.labelling.first_arc[v];
                    self.cursor = if first == NO_ARC {
                        Cursor::Sentinel
                    } else {
                        Cursor::Arc { arc: first, first }
                    };
                }
                Cursor::Arc { arc, first } => {
                    let arc = self.graph.arc(arc);
                    let label = self.labelling.label_end(arc);
                    let next = self.orientation.step(arc);
                    self.cursor = if next == first {
                        Cursor::Sentinel
                    } else {
                        Cursor::Arc { arc: next, first }
                    };
                    return Some(label);
                }
                Cursor::Sentinel => {
                    self.cursor = Cursor::NextVertex;
                    return Some(SENTINEL);
                }
            }
        }
    }
}

/// Encoding of a rotation system as seen from one arc and orientation
///
/// Certificates are ordered lexicographically. Two starting arcs give
/// the same certificate iff there is an automorphism mapping one to the
/// other, reversing the embedding if the orientations differ.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct Certificate(Vec<usize>);

impl Certificate {
    /// Build the certificate starting from arc `start`
    pub fn construct(graph: &PlaneGraph, start: usize, orientation: Orientation) -> Self {
        let mut labelling = Labelling::default();
        Self::construct_with(graph, start, orientation, &mut labelling)
    }

    /// Build the certificate, keeping the vertex labels in `labelling`
    pub fn construct_with(
        graph: &PlaneGraph,
        start: usize,
        orientation: Orientation,
        labelling: &mut Labelling,
    ) -> Self {
        let mut cert = Vec::with_capacity(graph.vertex_count() + graph.arc_count());
        cert.extend(CertificateWalk::new(graph, start, orientation, labelling));
        Self(cert)
    }

    pub(crate) fn from_labels(labels: Vec<usize>) -> Self {
        Self(labels)
    }

    /// Certificate of a graph consisting of a single vertex
    pub(crate) fn lone_vertex() -> Self {
        Self(vec![SENTINEL])
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl AsRef<[usize]> for Certificate {
    fn as_ref(&self) -> &[usize] {
        self.as_slice()
    }
}
