//! Orbits of vertices, edges, and faces under the automorphism group
#[cfg(feature = "serde-1")]
use serde::{Deserialize, Serialize};

use crate::autom::AutomorphismGroup;
use crate::certificate::Orientation;
use crate::error::PlanarError;
use crate::plane_graph::{PlaneGraph, NO_ARC};

/// Disjoint sets with path compression and union by size
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl UnionFind {
    /// `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            components: n,
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut x = x;
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    /// Merge the sets containing `x` and `y`
    ///
    /// Returns whether they were different before.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let (mut x, mut y) = (self.find(x), self.find(y));
        if x == y {
            return false;
        }
        if self.size[x] < self.size[y] {
            std::mem::swap(&mut x, &mut y);
        }
        self.parent[y] = x;
        self.size[x] += self.size[y];
        self.components -= 1;
        true
    }

    pub fn component_count(&self) -> usize {
        self.components
    }
}

/// A partition into orbits
///
/// Orbits are numbered by their smallest element and list their
/// elements in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct Orbits {
    orbit_of: Vec<usize>,
    orbits: Vec<Vec<usize>>,
}

impl From<UnionFind> for Orbits {
    fn from(mut sets: UnionFind) -> Self {
        let mut index_of_root = vec![None; sets.len()];
        let mut orbit_of = Vec::with_capacity(sets.len());
        let mut orbits: Vec<Vec<usize>> = Vec::with_capacity(sets.component_count());
        for x in 0..sets.len() {
            let root = sets.find(x);
            let idx = *index_of_root[root].get_or_insert_with(|| {
                orbits.push(Vec::new());
                orbits.len() - 1
            });
            orbits[idx].push(x);
            orbit_of.push(idx);
        }
        debug_assert_eq!(orbits.len(), sets.component_count());
        Self { orbit_of, orbits }
    }
}

impl Orbits {
    /// Number of orbits
    pub fn count(&self) -> usize {
        self.orbits.len()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.orbit_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbit_of.is_empty()
    }

    /// Index of the orbit containing `x`
    pub fn orbit_index(&self, x: usize) -> usize {
        self.orbit_of[x]
    }

    /// Smallest element in the orbit of `x`
    pub fn representative(&self, x: usize) -> usize {
        self.orbits[self.orbit_of[x]][0]
    }

    pub fn orbit_size(&self, x: usize) -> usize {
        self.orbits[self.orbit_of[x]].len()
    }

    pub fn orbit(&self, x: usize) -> &[usize] {
        &self.orbits[self.orbit_of[x]]
    }

    pub fn orbits(&self) -> &[Vec<usize>] {
        &self.orbits
    }

    /// Orbit sizes in the order of [orbits](Self::orbits)
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.orbits.iter().map(|o| o.len())
    }
}

/// Vertex orbits
pub fn vertex_orbits(group: &AutomorphismGroup) -> Orbits {
    let nv = group.automorphisms()[0].len();
    let mut sets = UnionFind::new(nv);
    for perm in &group.automorphisms()[1..] {
        for (v, &image) in perm.iter().enumerate() {
            sets.union(v, image);
        }
    }
    sets.into()
}

/// End vertices of each edge, smaller end first
///
/// Edges are numbered in the order of [PlaneGraph::edges].
pub fn edge_ends(graph: &PlaneGraph) -> Vec<(usize, usize)> {
    graph
        .edges()
        .map(|e| {
            let arc = graph.arc(e);
            (arc.start.min(arc.end), arc.start.max(arc.end))
        })
        .collect()
}

/// Edge orbits
///
/// Edges are numbered in the order of [PlaneGraph::edges]. Arcs are
/// mapped by their position in the rotations, so parallel edges are
/// told apart. If the rotation around a vertex is periodic, the
/// smallest matching shift is used.
pub fn edge_orbits(graph: &PlaneGraph, group: &AutomorphismGroup) -> Orbits {
    let mut edge_of_arc = vec![0; graph.arc_count()];
    for (idx, e) in graph.edges().enumerate() {
        edge_of_arc[e] = idx;
        edge_of_arc[graph.arc(e).inverse] = idx;
    }
    let mut sets = UnionFind::new(graph.edge_count());
    for (perm, orientation) in group.iter().skip(1) {
        for v in 0..graph.vertex_count() {
            let arcs: Vec<_> = graph.rotation(v).collect();
            let mut images: Vec<_> = graph.rotation(perm[v]).collect();
            if orientation == Orientation::Reversing {
                images.reverse();
            }
            let Some(shift) = rotation_shift(graph, perm, &arcs, &images) else {
                continue;
            };
            for (i, &e) in arcs.iter().enumerate() {
                let image = images[(i + shift) % images.len()];
                sets.union(edge_of_arc[e], edge_of_arc[image]);
            }
        }
    }
    sets.into()
}

// smallest shift mapping the neighbours in `arcs` onto those in `images`
fn rotation_shift(
    graph: &PlaneGraph,
    perm: &[usize],
    arcs: &[usize],
    images: &[usize],
) -> Option<usize> {
    if arcs.len() != images.len() {
        return None;
    }
    let n = arcs.len();
    (0..n).find(|&shift| {
        arcs.iter().enumerate().all(|(i, &e)| {
            perm[graph.arc(e).end] == graph.arc(images[(i + shift) % n]).end
        })
    })
}

/// Face orbits
///
/// The faces of the graph have to be computed first.
pub fn face_orbits(
    graph: &PlaneGraph,
    group: &AutomorphismGroup,
) -> Result<Orbits, PlanarError> {
    if !graph.has_dual() {
        return Err(PlanarError::MalformedGraph(
            "faces have not been computed".to_owned(),
        ));
    }
    let mut sets = UnionFind::new(graph.face_count());
    for (perm, orientation) in group.iter().skip(1) {
        for f in 0..graph.face_count() {
            let start = graph.face_start(f);
            if start == NO_ARC {
                continue;
            }
            let arc = graph.arc(start);
            let image = graph.arc(graph.find_edge(perm[arc.start], perm[arc.end])?);
            // mirroring moves the face to the other side of the arc
            let image_face = match orientation {
                Orientation::Preserving => image.right_face,
                Orientation::Reversing => graph.arc(image.inverse).right_face,
            };
            sets.union(f, image_face);
        }
    }
    Ok(sets.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::autom::TryIntoAutom;
    use log::debug;
    use testing::TriangulationIter;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn all_orbits(rotations: &[Vec<usize>]) -> (Orbits, Orbits, Orbits) {
        let mut g = PlaneGraph::from_rotation_system(rotations).unwrap();
        let group = (&mut g).try_into_autom().unwrap();
        let vertices = vertex_orbits(&group);
        let edges = edge_orbits(&g, &group);
        let faces = face_orbits(&g, &group).unwrap();
        debug!("vertex orbits: {:?}", vertices.orbits());
        debug!("edge orbits: {:?}", edges.orbits());
        debug!("face orbits: {:?}", faces.orbits());
        for (orbits, n) in [
            (&vertices, g.vertex_count()),
            (&edges, g.edge_count()),
            (&faces, g.face_count()),
        ] {
            check_partition(orbits, n);
            assert!(orbits.sizes().all(|s| group.order() % s == 0));
        }
        (vertices, edges, faces)
    }

    fn check_partition(orbits: &Orbits, n: usize) {
        assert_eq!(orbits.len(), n);
        let mut seen = vec![false; n];
        for orbit in orbits.orbits() {
            assert!(!orbit.is_empty());
            assert!(orbit.windows(2).all(|w| w[0] < w[1]));
            for &x in orbit {
                assert!(!seen[x]);
                seen[x] = true;
                assert_eq!(orbits.representative(x), orbit[0]);
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn union_find() {
        log_init();

        let mut sets = UnionFind::new(6);
        assert_eq!(sets.component_count(), 6);
        assert!(sets.union(0, 3));
        assert!(sets.union(4, 3));
        assert!(!sets.union(0, 4));
        assert!(sets.union(1, 5));
        assert_eq!(sets.component_count(), 3);
        assert_eq!(sets.find(4), sets.find(0));
        assert_ne!(sets.find(1), sets.find(0));
        let orbits = Orbits::from(sets);
        assert_eq!(orbits.orbits(), &[vec![0, 3, 4], vec![1, 5], vec![2]]);
        assert_eq!(orbits.representative(5), 1);
        assert_eq!(orbits.orbit_size(3), 3);
    }

    #[test]
    fn transitive() {
        log_init();

        for rot in [testing::cube(), testing::octahedron(), testing::icosahedron()] {
            let (vertices, edges, faces) = all_orbits(&rot);
            assert_eq!(vertices.count(), 1);
            assert_eq!(edges.count(), 1);
            assert_eq!(faces.count(), 1);
        }
    }

    #[test]
    fn pyramid() {
        log_init();

        let (vertices, edges, faces) = all_orbits(&testing::pyramid(5));
        assert_eq!(vertices.orbits(), &[vec![0, 1, 2, 3, 4], vec![5]]);
        assert_eq!(edges.count(), 2);
        assert_eq!(faces.count(), 2);
        assert_eq!(faces.sizes().min(), Some(1));
    }

    #[test]
    fn prism() {
        log_init();

        let (vertices, edges, faces) = all_orbits(&testing::prism(6));
        assert_eq!(vertices.count(), 1);
        assert_eq!(edges.count(), 2);
        let mut sizes: Vec<_> = faces.sizes().collect();
        sizes.sort();
        assert_eq!(sizes, [2, 6]);
    }

    #[test]
    fn asymmetric() {
        log_init();

        let (vertices, edges, faces) = all_orbits(&testing::spider(&[1, 2, 3]));
        assert_eq!(vertices.count(), 7);
        assert_eq!(edges.count(), 6);
        assert_eq!(faces.count(), 1);
    }

    #[test]
    fn parallel_edges() {
        log_init();

        // two parallel edges between 0 and 1, a leaf at each end between
        // them and a path of length 2 at each end outside
        let rotations = [
            vec![1, 2, 1, 4],
            vec![0, 5, 0, 3],
            vec![0],
            vec![1],
            vec![0, 6],
            vec![1, 7],
            vec![4],
            vec![5],
        ];
        let g = PlaneGraph::from_rotation_system(&rotations).unwrap();
        assert_eq!(
            edge_ends(&g),
            [(0, 1), (0, 2), (0, 1), (0, 4), (1, 5), (1, 3), (4, 6), (5, 7)]
        );
        // the only symmetry swaps 0 and 1 and maps each parallel edge to itself
        let (vertices, edges, _) = all_orbits(&rotations);
        assert_eq!(vertices.count(), 4);
        assert_eq!(
            edges.orbits(),
            &[vec![0], vec![1, 5], vec![2], vec![3, 4], vec![6, 7]]
        );
    }

    #[test]
    fn random_triangulations() {
        log_init();

        for rot in TriangulationIter::default().take(100) {
            all_orbits(&rot);
        }
    }
}
