/// orbview core - bodies on a sphere, their motion, and pointer hover queries
///
/// This library is the part of a scene that is not rendering: it keeps the
/// tracked bodies, advances them each frame, derives latitude/longitude,
/// and turns a pointer ray into tooltip content. Drawing, picking geometry
/// and the tooltip itself belong to the embedding renderer.

pub mod coords;
pub mod error;
pub mod hover;
pub mod motion;
pub mod placement;
pub mod projection;
pub mod ray;
pub mod registry;
pub mod resolver;
pub mod scene;
pub mod scheduler;

// Re-export commonly used types
pub use coords::{GeoCoordinates, SphericalConverter};
pub use error::{Error, Result};
pub use hover::{HoverPresenter, Presentation, PresentationPayload, ScreenPoint};
pub use motion::{MotionRule, MotionState};
pub use placement::{Placement, Placer};
pub use projection::{Camera, ProjectionMode};
pub use ray::{BodySphereCaster, Ray};
pub use registry::{Body, BodyId, BodyRegistry, ProxyHandle};
pub use resolver::{HoverHit, HoverResult, Intersection, PointerIntersectionResolver, Raycaster};
pub use scene::{parse_manifest, SceneManifest};
pub use scheduler::{FrameScheduler, TickReport};
