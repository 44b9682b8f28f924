/// Error type shared by every orbview-core operation
use crate::registry::{BodyId, ProxyHandle};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Position too close to the origin for a direction to exist.
    #[error("degenerate coordinate: altitude {altitude} is below the conversion threshold")]
    DegenerateCoordinate { altitude: f64 },

    #[error("body id {0} is already registered")]
    DuplicateBodyId(BodyId),

    #[error("proxy {0} is already bound to another body")]
    DuplicateProxy(ProxyHandle),

    /// The raycaster reported a proxy the registry does not know about.
    #[error("proxy {0} has no registered body")]
    OrphanedProxy(ProxyHandle),

    /// Externally reported hits came with unequal proxy and distance lists.
    #[error("{proxies} hit proxies but {distances} hit distances")]
    MismatchedHits { proxies: usize, distances: usize },

    #[error("ray direction has zero length")]
    ZeroDirection,

    #[error("camera projection is not invertible")]
    SingularProjection,

    #[error("scene manifest error: {0}")]
    Manifest(String),
}

pub type Result<T> = std::result::Result<T, Error>;
