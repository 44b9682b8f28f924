/// Rays and bounding-sphere picking
use nalgebra::{Point3, Unit, Vector3};

use crate::error::{Error, Result};
use crate::registry::{BodyRegistry, ProxyHandle};
use crate::resolver::{Intersection, Raycaster};

/// A half-line with a unit direction, in scene space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Result<Self> {
        let direction = Unit::try_new(direction, 1e-12).ok_or(Error::ZeroDirection)?;
        Ok(Self { origin, direction })
    }

    pub fn at(&self, distance: f64) -> Point3<f64> {
        self.origin + self.direction.into_inner() * distance
    }

    /// Distance to the first point where the ray enters (or, from inside,
    /// leaves) the sphere. `None` if the sphere is missed or behind the origin.
    pub fn sphere_distance(&self, center: &Point3<f64>, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = self.direction.dot(&oc);
        let c = oc.norm_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + root;
        if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

/// Picks bodies by a bounding sphere around each body's position.
///
/// Stands in for mesh picking when the collaborator has none, e.g. the
/// terminal renderer, which draws bodies as single glyphs.
pub struct BodySphereCaster<'a> {
    registry: &'a BodyRegistry,
    radius: f64,
}

impl<'a> BodySphereCaster<'a> {
    pub fn new(registry: &'a BodyRegistry, radius: f64) -> Self {
        Self { registry, radius }
    }
}

impl Raycaster for BodySphereCaster<'_> {
    fn cast(&self, ray: &Ray, targets: &[ProxyHandle]) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = targets
            .iter()
            .filter_map(|proxy| {
                let body = self.registry.find_by_proxy(*proxy)?;
                let center = Point3::from(body.position);
                let distance = ray.sphere_distance(&center, self.radius)?;
                Some(Intersection {
                    proxy: *proxy,
                    distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
