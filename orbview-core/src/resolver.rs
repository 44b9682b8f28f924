/// Pointer ray to body resolution
use crate::coords::GeoCoordinates;
use crate::error::{Error, Result};
use crate::ray::Ray;
use crate::registry::{BodyId, BodyRegistry, ProxyHandle};

/// One proxy hit reported by the render collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub proxy: ProxyHandle,
    pub distance: f64,
}

/// Geometry testing is the render collaborator's job: it alone knows the
/// shape behind each proxy.
pub trait Raycaster {
    fn cast(&self, ray: &Ray, targets: &[ProxyHandle]) -> Vec<Intersection>;
}

/// Snapshot of the hovered body, taken at resolve time
#[derive(Debug, Clone, PartialEq)]
pub struct HoverHit {
    pub body_id: BodyId,
    pub display_name: String,
    pub coordinates: Option<GeoCoordinates>,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoverResult {
    None,
    Hit(HoverHit),
}

impl HoverResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, HoverResult::Hit(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PointerIntersectionResolver;

impl PointerIntersectionResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        ray: &Ray,
        registry: &BodyRegistry,
        caster: &dyn Raycaster,
    ) -> Result<HoverResult> {
        if registry.is_empty() {
            return Ok(HoverResult::None);
        }
        let intersections = caster.cast(ray, &registry.proxies());
        self.resolve_intersections(&intersections, registry)
    }

    /// Resolve hits computed elsewhere, e.g. by a JavaScript raycaster.
    pub fn resolve_intersections(
        &self,
        intersections: &[Intersection],
        registry: &BodyRegistry,
    ) -> Result<HoverResult> {
        let nearest = intersections
            .iter()
            .filter(|hit| !hit.distance.is_nan())
            .min_by(|a, b| a.distance.total_cmp(&b.distance));

        let Some(nearest) = nearest else {
            return Ok(HoverResult::None);
        };

        let body = registry.find_by_proxy(nearest.proxy).ok_or_else(|| {
            log::error!(
                "raycaster reported proxy {} which is not in the registry",
                nearest.proxy
            );
            Error::OrphanedProxy(nearest.proxy)
        })?;

        log::debug!("pointer over body {} at {:.3}", body.id, nearest.distance);
        Ok(HoverResult::Hit(HoverHit {
            body_id: body.id,
            display_name: body.display_name.clone(),
            coordinates: body.coordinates(),
            distance: nearest.distance,
        }))
    }
}
