use std::collections::VecDeque;

use ahash::AHashMap;
use petgraph::{
    algo::connected_components,
    graph::{NodeIndex, UnGraph},
};

use crate::dual::FaceStore;
use crate::error::PlanarError;

/// Placeholder for a missing arc, e.g. the first arc of an isolated vertex
pub const NO_ARC: usize = usize::MAX;
/// Face of an arc before the dual has been computed
pub const NO_FACE: usize = usize::MAX;

/// A directed edge
///
/// All fields are indices into the arc, vertex, or face arrays of the
/// [PlaneGraph] the arc belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Arc {
    pub start: usize,
    pub end: usize,
    /// Following arc in the clockwise rotation at `start`
    pub next: usize,
    /// Preceding arc in the clockwise rotation at `start`
    pub prev: usize,
    /// The same edge traversed from `end` to `start`
    pub inverse: usize,
    /// Face to the right of the arc, [NO_FACE] until the dual is computed
    pub right_face: usize,
}

/// Options for turning decoded rotation systems into plane graphs
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeOptions {
    /// Largest accepted number of vertices
    pub max_vertices: usize,
    /// Largest accepted number of arcs, 0 means `6 * max_vertices - 12`
    pub max_arcs: usize,
    /// Compute faces right after decoding
    pub compute_dual: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_vertices: 1000,
            max_arcs: 0,
            compute_dual: true,
        }
    }
}

/// Maximum number of arcs of a simple plane graph with `n` vertices
pub(crate) fn arc_bound(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        2 => 2,
        n => n.saturating_mul(6) - 12,
    }
}

/// Maximum number of faces of a simple plane graph with `n` vertices
pub(crate) fn face_bound(n: usize) -> usize {
    if n >= 3 {
        n.saturating_mul(2) - 4
    } else {
        1
    }
}

pub(crate) fn try_reserve<T>(
    v: &mut Vec<T>,
    additional: usize,
) -> Result<(), PlanarError> {
    v.try_reserve(additional)
        .map_err(|_| PlanarError::ResourceExhausted {
            bytes: additional.saturating_mul(std::mem::size_of::<T>()),
        })
}

fn malformed(msg: String) -> PlanarError {
    PlanarError::MalformedGraph(msg)
}

/// A connected plane graph stored as a rotation system
///
/// For each vertex the outgoing arcs form a cycle under [Arc::next] in
/// clockwise order. Each arc knows its inverse, and after
/// [make_dual](Self::make_dual) also the face on its right.
///
/// A graph can be reused for many inputs: [load](Self::load) clears
/// the previous content but keeps the allocated storage.
#[derive(Clone, Debug)]
pub struct PlaneGraph {
    pub(crate) max_vertices: usize,
    pub(crate) max_arcs: usize,
    pub(crate) arcs: Vec<Arc>,
    pub(crate) first_arc: Vec<usize>,
    pub(crate) degree: Vec<usize>,
    pub(crate) faces: FaceStore,
}

impl PlaneGraph {
    /// Create an empty graph with room for the given numbers of vertices
    /// and arcs
    ///
    /// If `max_arcs` is 0 or exceeds the number of arcs a simple plane
    /// graph with `max_vertices` vertices can have, that bound is used
    /// instead.
    pub fn new(max_vertices: usize, max_arcs: usize) -> Result<Self, PlanarError> {
        if max_vertices == 0 {
            return Err(PlanarError::ZeroCapacity);
        }
        let bound = arc_bound(max_vertices);
        let max_arcs = if max_arcs == 0 || max_arcs > bound {
            bound
        } else {
            max_arcs
        };
        let mut graph = Self {
            max_vertices,
            max_arcs,
            arcs: Vec::new(),
            first_arc: Vec::new(),
            degree: Vec::new(),
            faces: FaceStore::default(),
        };
        try_reserve(&mut graph.arcs, max_arcs)?;
        try_reserve(&mut graph.first_arc, max_vertices)?;
        try_reserve(&mut graph.degree, max_vertices)?;
        Ok(graph)
    }

    pub fn with_options(options: &DecodeOptions) -> Result<Self, PlanarError> {
        Self::new(options.max_vertices, options.max_arcs)
    }

    /// Build a graph from the clockwise neighbour lists of all vertices
    ///
    /// The faces are computed right away.
    ///
    /// # Example
    ///
    /// ```rust
    /// use planar_autom::plane_graph::PlaneGraph;
    ///
    /// // a triangle
    /// let g = PlaneGraph::from_rotation_system(&[[1, 2], [2, 0], [0, 1]]).unwrap();
    /// assert_eq!(g.edge_count(), 3);
    /// assert_eq!(g.face_count(), 2);
    /// ```
    pub fn from_rotation_system<R: AsRef<[usize]>>(
        rotations: &[R],
    ) -> Result<Self, PlanarError> {
        let arc_count = rotations.iter().map(|r| r.as_ref().len()).sum();
        let mut graph = Self::new(rotations.len().max(1), 0)?;
        // multigraphs can exceed the simple planar bound
        if arc_count > graph.max_arcs {
            try_reserve(&mut graph.arcs, arc_count)?;
            graph.max_arcs = arc_count;
        }
        graph.load(
            rotations.len(),
            rotations.iter().map(|r| r.as_ref().iter().copied()),
        )?;
        graph.make_dual();
        Ok(graph)
    }

    /// Replace the content of the graph
    ///
    /// `rotations` has to yield the neighbours of each vertex in
    /// clockwise order. Arcs `u -> v` are paired with the first
    /// unpaired arc `v -> u`, so multiple edges are supported as long
    /// as they appear in matching order.
    ///
    /// On error the graph is left empty.
    pub fn load<I, J>(
        &mut self,
        vertex_count: usize,
        rotations: I,
    ) -> Result<(), PlanarError>
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = usize>,
    {
        self.clear();
        if vertex_count == 0 {
            return Err(malformed("graph has no vertices".to_owned()));
        }
        if vertex_count > self.max_vertices {
            return Err(PlanarError::CapacityExceeded {
                what: "vertices",
                found: vertex_count,
                max: self.max_vertices,
            });
        }
        let res = self.link(vertex_count, rotations);
        if res.is_err() {
            self.clear();
        }
        res
    }

    fn link<I, J>(
        &mut self,
        vertex_count: usize,
        rotations: I,
    ) -> Result<(), PlanarError>
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = usize>,
    {
        let mut unpaired: AHashMap<(usize, usize), VecDeque<usize>> =
            AHashMap::new();
        for (v, neighbours) in rotations.into_iter().enumerate() {
            if v >= vertex_count {
                return Err(malformed(format!(
                    "more than {vertex_count} rotations"
                )));
            }
            let first = self.arcs.len();
            for w in neighbours {
                if w >= vertex_count {
                    return Err(malformed(format!(
                        "vertex {v} has neighbour {w}, but there are only {vertex_count} vertices"
                    )));
                }
                if w == v {
                    return Err(malformed(format!("loop at vertex {v}")));
                }
                if self.arcs.len() == self.max_arcs {
                    return Err(PlanarError::CapacityExceeded {
                        what: "arcs",
                        found: self.max_arcs + 1,
                        max: self.max_arcs,
                    });
                }
                let e = self.arcs.len();
                // `prev` of the first arc is fixed once the cycle is closed
                self.arcs.push(Arc {
                    start: v,
                    end: w,
                    next: e + 1,
                    prev: e.wrapping_sub(1),
                    inverse: NO_ARC,
                    right_face: NO_FACE,
                });
                match unpaired.get_mut(&(w, v)).and_then(VecDeque::pop_front) {
                    Some(inverse) => {
                        self.arcs[e].inverse = inverse;
                        self.arcs[inverse].inverse = e;
                    }
                    None => unpaired.entry((v, w)).or_default().push_back(e),
                }
            }
            let degree = self.arcs.len() - first;
            if degree == 0 {
                if vertex_count > 1 {
                    return Err(malformed(format!("vertex {v} is isolated")));
                }
                self.first_arc.push(NO_ARC);
            } else {
                let last = self.arcs.len() - 1;
                self.arcs[first].prev = last;
                self.arcs[last].next = first;
                self.first_arc.push(first);
            }
            self.degree.push(degree);
        }
        if self.first_arc.len() != vertex_count {
            return Err(malformed(format!(
                "expected {vertex_count} rotations, found {}",
                self.first_arc.len()
            )));
        }
        let lonely = unpaired
            .iter()
            .filter(|(_, arcs)| !arcs.is_empty())
            .map(|(&arc, _)| arc)
            .min();
        if let Some((v, w)) = lonely {
            return Err(malformed(format!(
                "arc {v} -> {w} has no inverse {w} -> {v}"
            )));
        }
        if !self.is_connected() {
            return Err(malformed("graph is not connected".to_owned()));
        }
        Ok(())
    }

    /// Remove all vertices and arcs
    pub fn clear(&mut self) {
        self.arcs.clear();
        self.first_arc.clear();
        self.degree.clear();
        self.faces.invalidate();
    }

    pub fn is_connected(&self) -> bool {
        match self.vertex_count() {
            0 => false,
            1 => true,
            _ => connected_components(&UnGraph::from(self)) == 1,
        }
    }

    /// Find the arc from `from` to `to`
    ///
    /// If there are multiple edges, the first one in the rotation at
    /// `from` is returned.
    pub fn find_edge(&self, from: usize, to: usize) -> Result<usize, PlanarError> {
        if from >= self.vertex_count() {
            return Err(malformed(format!(
                "vertex {from} does not exist in graph with {} vertices",
                self.vertex_count()
            )));
        }
        self.rotation(from)
            .find(|&e| self.arcs[e].end == to)
            .ok_or_else(|| malformed(format!("no edge from {from} to {to}")))
    }

    pub fn vertex_count(&self) -> usize {
        self.first_arc.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn edge_count(&self) -> usize {
        self.arcs.len() / 2
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub fn max_arcs(&self) -> usize {
        self.max_arcs
    }

    pub fn arc(&self, e: usize) -> &Arc {
        &self.arcs[e]
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    /// First arc in the rotation at `v`, [NO_ARC] for an isolated vertex
    pub fn first_arc(&self, v: usize) -> usize {
        self.first_arc[v]
    }

    pub fn degree(&self, v: usize) -> usize {
        self.degree[v]
    }

    pub fn degrees(&self) -> &[usize] {
        &self.degree
    }

    pub fn max_degree(&self) -> usize {
        self.degree.iter().copied().max().unwrap_or(0)
    }

    /// Arcs leaving `v` in clockwise order
    pub fn rotation(&self, v: usize) -> ArcCycle<'_> {
        ArcCycle::new(&self.arcs, self.first_arc[v], |arcs, e| arcs[e].next)
    }

    /// Neighbours of `v` in clockwise order
    pub fn neighbours(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.rotation(v).map(|e| self.arcs[e].end)
    }

    /// One arc for each edge, the one with the smaller index
    pub fn edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.arcs
            .iter()
            .enumerate()
            .filter(|(e, arc)| *e < arc.inverse)
            .map(|(e, _)| e)
    }

    /// Clockwise neighbour lists of all vertices
    pub fn rotations(&self) -> Vec<Vec<usize>> {
        (0..self.vertex_count())
            .map(|v| self.neighbours(v).collect())
            .collect()
    }
}

/// Cyclic sequence of arcs, e.g. a rotation or a face boundary
#[derive(Clone, Debug)]
pub struct ArcCycle<'a> {
    arcs: &'a [Arc],
    first: usize,
    current: Option<usize>,
    step: fn(&[Arc], usize) -> usize,
}

impl<'a> ArcCycle<'a> {
    pub(crate) fn new(
        arcs: &'a [Arc],
        first: usize,
        step: fn(&[Arc], usize) -> usize,
    ) -> Self {
        let current = (first != NO_ARC).then_some(first);
        Self {
            arcs,
            first,
            current,
            step,
        }
    }
}

impl Iterator for ArcCycle<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.current?;
        let next = (self.step)(self.arcs, e);
        self.current = (next != self.first).then_some(next);
        Some(e)
    }
}

impl From<&PlaneGraph> for UnGraph<(), ()> {
    fn from(g: &PlaneGraph) -> Self {
        let mut res = UnGraph::with_capacity(g.vertex_count(), g.edge_count());
        for _ in 0..g.vertex_count() {
            res.add_node(());
        }
        for (e, arc) in g.arcs.iter().enumerate() {
            if e < arc.inverse {
                res.add_edge(NodeIndex::new(arc.start), NodeIndex::new(arc.end), ());
            }
        }
        res
    }
}
