use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::canon::{IntoCanon, TryIntoCanon};
use crate::certificate::Certificate;
use crate::cmp::IsIdentical;
use crate::error::PlanarError;
use crate::plane_graph::PlaneGraph;

/// Canonically labelled plane graph
///
/// Mirror images share the same canonical form, so two graphs compare
/// equal iff they are isomorphic as maps on the sphere.
///
/// # Example
///
/// ```rust
/// use std::collections::HashSet;
/// use planar_autom::prelude::*;
///
/// // the same square pyramid with two labellings
/// let g1 = PlaneGraph::from_rotation_system(&[
///     vec![3, 1, 4], vec![0, 2, 4], vec![1, 3, 4], vec![2, 0, 4], vec![0, 1, 2, 3]
/// ]).unwrap();
/// let g2 = PlaneGraph::from_rotation_system(&[
///     vec![1, 2, 3, 4], vec![0, 4, 2], vec![0, 1, 3], vec![0, 2, 4], vec![0, 3, 1]
/// ]).unwrap();
///
/// let g1 = CanonPlaneGraph::from(g1);
/// let g2 = CanonPlaneGraph::from(g2);
/// assert_eq!(g1, g2);
///
/// let mut graphs = HashSet::new();
/// graphs.insert(g1);
/// assert!(!graphs.insert(g2));
/// ```
#[cfg_attr(
    feature = "serde-1",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<usize>>", into = "Vec<Vec<usize>>")
)]
#[derive(Clone, Debug)]
pub struct CanonPlaneGraph(PlaneGraph);

impl CanonPlaneGraph {
    /// Canonically relabel a graph
    pub fn new(graph: PlaneGraph) -> Result<Self, PlanarError> {
        graph.try_into_canon().map(Self)
    }

    /// Canonical graph from the smallest certificate of a graph
    ///
    /// `certificate` has to be the one returned by
    /// [AutomorphismGroup::certificate](crate::autom::AutomorphismGroup::certificate).
    pub fn from_certificate(certificate: &Certificate) -> Result<Self, PlanarError> {
        PlaneGraph::from_certificate(certificate).map(Self)
    }

    /// Gets a reference to the underlying plane graph
    pub fn get(&self) -> &PlaneGraph {
        &self.0
    }

    pub fn vertex_count(&self) -> usize {
        self.0.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.0.edge_count()
    }

    pub fn face_count(&self) -> usize {
        self.0.face_count()
    }

    pub fn rotations(&self) -> Vec<Vec<usize>> {
        self.0.rotations()
    }

    fn arc_ends(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.0.vertex_count())
            .flat_map(move |v| self.0.neighbours(v).map(move |w| (v, w)))
    }
}

impl AsRef<PlaneGraph> for CanonPlaneGraph {
    fn as_ref(&self) -> &PlaneGraph {
        &self.0
    }
}

impl From<PlaneGraph> for CanonPlaneGraph {
    fn from(g: PlaneGraph) -> Self {
        Self(g.into_canon())
    }
}

impl From<CanonPlaneGraph> for PlaneGraph {
    fn from(g: CanonPlaneGraph) -> Self {
        g.0
    }
}

impl TryFrom<Vec<Vec<usize>>> for CanonPlaneGraph {
    type Error = PlanarError;

    fn try_from(rotations: Vec<Vec<usize>>) -> Result<Self, Self::Error> {
        Self::new(PlaneGraph::from_rotation_system(&rotations)?)
    }
}

impl From<CanonPlaneGraph> for Vec<Vec<usize>> {
    fn from(g: CanonPlaneGraph) -> Self {
        g.rotations()
    }
}

impl PartialEq for CanonPlaneGraph {
    fn eq(&self, other: &Self) -> bool {
        self.0.is_identical(&other.0)
    }
}
impl Eq for CanonPlaneGraph {}

impl Hash for CanonPlaneGraph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.vertex_count().hash(state);
        for arc in self.arc_ends() {
            arc.hash(state);
        }
    }
}

// Doesn't have to make much sense, just give a reproducible ordering
impl Ord for CanonPlaneGraph {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .vertex_count()
            .cmp(&other.0.vertex_count())
            .then_with(|| self.arc_ends().cmp(other.arc_ends()))
    }
}

impl PartialOrd for CanonPlaneGraph {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
