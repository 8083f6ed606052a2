pub use crate::autom::{AutomorphismGroup, IntoAutom, TryIntoAutom};
pub use crate::canon::{IntoCanon, TryIntoCanon};
pub use crate::cmp::IsIdentical;
pub use crate::graph::CanonPlaneGraph;
pub use crate::plane_graph::PlaneGraph;
