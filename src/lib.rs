//! Canonical forms and symmetry groups of plane graphs.
//!
//! Plane graphs are given as rotation systems, i.e. the clockwise
//! order of the neighbours around each vertex. Comparing breadth-first
//! certificates from all promising starting arcs in both orientations
//! yields
//!
//! * the [automorphism group](autom::AutomorphismGroup), split into
//!   orientation-preserving and orientation-reversing elements,
//! * a canonical labelling shared by isomorphic graphs and their
//!   mirror images,
//! * the [point group](point_group::PointGroup) of the corresponding
//!   polyhedron,
//! * [orbits](orbits) of vertices, edges, and faces, and
//! * [names](naming::name_graph) for well-known polyhedra.
//!
//! Graphs can be read and written in [planar code](planar_code).
//!
//! # Example
//!
//! ```rust
//! use planar_autom::prelude::*;
//! use planar_autom::point_group::{classify, PointGroup};
//!
//! // The tetrahedron with two different labellings
//! let mut g1 = PlaneGraph::from_rotation_system(&[
//!     [1, 3, 2], [0, 2, 3], [0, 3, 1], [0, 1, 2]
//! ]).unwrap();
//! let g2 = PlaneGraph::from_rotation_system(&[
//!     [3, 1, 2], [3, 2, 0], [3, 0, 1], [1, 0, 2]
//! ]).unwrap();
//!
//! // 12 rotations and 12 reflections
//! let group = (&mut g1).try_into_autom().unwrap();
//! assert_eq!(group.order(), 24);
//! assert_eq!(group.orientation_reversing_count(), 12);
//! assert_eq!(classify(&g1, &group).unwrap(), PointGroup::Td);
//!
//! // The canonical forms are identical
//! let c1 = g1.clone().into_canon();
//! let c2 = g2.clone().into_canon();
//! assert!(c1.is_identical(&c2));
//!
//! // Alternatively, we can use a dedicated `struct` for canonically
//! // labelled graphs
//! let c1 = CanonPlaneGraph::from(g1);
//! let c2 = CanonPlaneGraph::from(g2);
//! assert_eq!(c1, c2);
//! ```
//!
//! # Features
//!
//! * `serde-1`: Enables serialisation of certificates, automorphism
//!              groups, point groups, orbits, and
//!              [CanonPlaneGraph](graph::CanonPlaneGraph) objects using
//!              [serde](https://crates.io/crates/serde).
//!
//! To enable features `feature1`, `feature2` add the following to
//! your Cargo.toml:
//! ```toml
//! [dependencies]
//! planar-autom = { version = "0.1", features = ["feature1", "feature2"] }
//! ```
pub mod autom;
pub mod canon;
pub mod certificate;
mod cmp;
pub mod dual;
pub mod error;
pub mod graph;
pub mod naming;
pub mod orbits;
pub mod planar_code;
pub mod plane_graph;
pub mod point_group;
pub mod prelude;

pub use canon::{IntoCanon, TryIntoCanon};
pub use cmp::IsIdentical;
pub use error::PlanarError;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::point_group::{classify, PointGroup};

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // prism with the two n-gons numbered in opposite directions
    fn flipped_prism(n: usize) -> Vec<Vec<usize>> {
        let top = |i: usize| n + (n - i) % n;
        let mut rotations = vec![Vec::new(); 2 * n];
        for i in 0..n {
            let (prev, next) = ((i + n - 1) % n, (i + 1) % n);
            rotations[i] = vec![prev, next, top(i)];
            rotations[top(i)] = vec![top(next), top(prev), i];
        }
        rotations
    }

    #[test]
    fn prisms() {
        log_init();

        for n in 3..20 {
            let mut g1 = PlaneGraph::from_rotation_system(&testing::prism(n)).unwrap();
            let g2 = PlaneGraph::from_rotation_system(&flipped_prism(n)).unwrap();
            let group = (&mut g1).try_into_autom().unwrap();
            assert_eq!(group.order(), if n == 4 { 48 } else { 4 * n });
            let expected = if n == 4 { PointGroup::Oh } else { PointGroup::Dnh(n) };
            assert_eq!(classify(&g1, &group).unwrap(), expected);

            let cg1 = g1.into_canon();
            let cg2 = g2.into_canon();
            assert!(cg1.is_identical(&cg2));
        }
    }
}
