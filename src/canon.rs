use crate::autom::TryIntoAutom;
use crate::certificate::{Certificate, SENTINEL};
use crate::error::PlanarError;
use crate::plane_graph::PlaneGraph;

/// Find the canonical labelling for a plane graph
pub trait IntoCanon {
    fn into_canon(self) -> Self;
}

/// Try to find the canonical labelling for a plane graph
pub trait TryIntoCanon {
    type Error;

    fn try_into_canon(self) -> Result<Self, Self::Error>
    where
        Self: Sized;
}

impl IntoCanon for PlaneGraph {
    fn into_canon(self) -> Self {
        self.try_into_canon().unwrap()
    }
}

impl TryIntoCanon for PlaneGraph {
    type Error = PlanarError;

    /// Relabel the graph according to its smallest certificate
    ///
    /// Vertex `k` of the result is the `k`th vertex reached by the
    /// certificate walk, and its rotation starts with the arc through
    /// which it was reached. If the smallest certificate traverses the
    /// rotations counterclockwise, the result is the mirror image.
    fn try_into_canon(mut self) -> Result<Self, Self::Error> {
        let group = (&mut self).try_into_autom()?;
        PlaneGraph::from_certificate(group.certificate())
    }
}

impl PlaneGraph {
    /// Rebuild the plane graph encoded by a certificate
    ///
    /// The neighbour list of vertex `k` is the `k`th block of the
    /// certificate, read clockwise.
    pub fn from_certificate(certificate: &Certificate) -> Result<Self, PlanarError> {
        let cert = certificate.as_slice();
        if cert.last() != Some(&SENTINEL) {
            return Err(PlanarError::MalformedGraph(
                "certificate does not end with a sentinel".to_owned(),
            ));
        }
        let rotations: Vec<_> = cert[..cert.len() - 1]
            .split(|&label| label == SENTINEL)
            .collect();
        Self::from_rotation_system(&rotations)
    }
}
