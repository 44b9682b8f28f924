/// Initial placement of bodies
use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Given coordinates, optionally pushed onto a sphere of `radius`.
    Explicit {
        position: Vector3<f64>,
        radius: Option<f64>,
    },
    /// Uniform in the `[-1, 1)` cube, then pushed onto a sphere of `radius`.
    Random { radius: f64 },
}

impl Placement {
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Placement::Explicit {
            position: Vector3::new(x, y, z),
            radius: None,
        }
    }

    pub fn on_sphere(x: f64, y: f64, z: f64, radius: f64) -> Self {
        Placement::Explicit {
            position: Vector3::new(x, y, z),
            radius: Some(radius),
        }
    }

    /// Distance from the origin the body ends up at.
    pub fn radius(&self) -> f64 {
        match *self {
            Placement::Explicit { position, radius } => radius.unwrap_or(position.norm()),
            Placement::Random { radius } => radius,
        }
    }
}

/// Scale `v` onto a sphere, multiplying by the reciprocal length first so
/// results match a scene graph's normalize-then-scale bit for bit.
pub fn scale_to_radius(v: &Vector3<f64>, radius: f64) -> Result<Vector3<f64>> {
    let length = v.norm();
    if length.is_nan() || length == 0.0 {
        return Err(Error::DegenerateCoordinate { altitude: length });
    }
    let inv = 1.0 / length;
    Ok(v.map(|c| c * inv * radius))
}

/// Seeded source of initial positions and angles
pub struct Placer {
    rng: ChaCha8Rng,
}

impl Placer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn place(&mut self, placement: &Placement) -> Result<Vector3<f64>> {
        match *placement {
            Placement::Explicit {
                position,
                radius: None,
            } => Ok(position),
            Placement::Explicit {
                position,
                radius: Some(radius),
            } => scale_to_radius(&position, radius),
            Placement::Random { radius } => loop {
                let v: Vector3<f64> = Vector3::new(
                    self.rng.gen_range(-1.0..1.0),
                    self.rng.gen_range(-1.0..1.0),
                    self.rng.gen_range(-1.0..1.0),
                );
                // Too short to normalize reliably, draw again
                if v.norm() > 1e-6 {
                    return scale_to_radius(&v, radius);
                }
            },
        }
    }

    pub fn random_angle(&mut self) -> f64 {
        self.rng.gen_range(0.0..TAU)
    }
}
