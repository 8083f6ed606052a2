use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlanarError {
    #[error("The maximum number of vertices must be positive")]
    ZeroCapacity,
    #[error("Graph has {found} {what}, but at most {max} are supported")]
    CapacityExceeded {
        what: &'static str,
        found: usize,
        max: usize,
    },
    #[error("Malformed graph: {0}")]
    MalformedGraph(String),
    #[error("Malformed planar code: {0}")]
    MalformedCode(String),
    #[error("Insufficient memory to reserve {bytes} bytes")]
    ResourceExhausted { bytes: usize },
    #[error("Invalid group name: {0}")]
    InvalidGroupName(String),
    #[error("Cannot classify symmetry group: {0}")]
    UnclassifiableGroup(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlanarError {
    /// Whether the error only concerns the current graph, so that a
    /// stream of graphs can continue with the next one
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. }
                | Self::MalformedGraph(_)
                | Self::UnclassifiableGroup(_)
        )
    }
}
