/// Cartesian to latitude/longitude/altitude conversion
use nalgebra::Vector3;
use serde::Serialize;

use crate::error::{Error, Result};

/// Altitudes at or below this are treated as having no direction.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Spherical coordinates derived from a scene-space position.
///
/// Latitude is measured from the XZ plane towards +Y, longitude around the
/// Y axis starting at +Z and increasing towards +X. Both are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SphericalConverter {
    epsilon: f64,
}

impl SphericalConverter {
    pub fn new() -> Self {
        Self::with_epsilon(DEFAULT_EPSILON)
    }

    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn convert(&self, position: &Vector3<f64>) -> Result<GeoCoordinates> {
        let altitude = position.norm();
        if altitude.is_nan() || altitude <= self.epsilon {
            return Err(Error::DegenerateCoordinate { altitude });
        }

        // asin is undefined past ±1, which rounding can reach at the poles
        let sin_lat = (position.y / altitude).clamp(-1.0, 1.0);
        let latitude = sin_lat.asin().to_degrees();

        let mut longitude = position.x.atan2(position.z).to_degrees();
        if longitude <= -180.0 {
            longitude += 360.0;
        }

        Ok(GeoCoordinates {
            latitude,
            longitude,
            altitude,
        })
    }
}

impl Default for SphericalConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cardinal_directions() {
        let converter = SphericalConverter::new();

        let front = converter.convert(&Vector3::new(0.0, 0.0, 2.5)).unwrap();
        assert!(close(front.latitude, 0.0));
        assert!(close(front.longitude, 0.0));
        assert!(close(front.altitude, 2.5));

        let east = converter.convert(&Vector3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(close(east.longitude, 90.0));

        let pole = converter.convert(&Vector3::new(0.0, 3.0, 0.0)).unwrap();
        assert!(close(pole.latitude, 90.0));

        let south = converter.convert(&Vector3::new(0.0, -3.0, 0.0)).unwrap();
        assert!(close(south.latitude, -90.0));
    }

    #[test]
    fn test_back_meridian_is_positive_180() {
        let converter = SphericalConverter::new();
        let back = converter.convert(&Vector3::new(-0.0, 0.0, -1.0)).unwrap();
        assert!(close(back.longitude, 180.0));

        let back = converter.convert(&Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(close(back.longitude, 180.0));
    }

    #[test]
    fn test_ranges_hold_over_sampled_sphere() {
        let converter = SphericalConverter::new();
        let steps = 24;
        for i in 0..=steps {
            for j in 0..=steps {
                for k in 0..=steps {
                    let v = Vector3::new(
                        i as f64 - 12.0,
                        j as f64 - 12.0,
                        k as f64 - 12.0,
                    ) * 0.37;
                    if v.norm() == 0.0 {
                        continue;
                    }
                    let c = converter.convert(&v).unwrap();
                    assert!((-90.0..=90.0).contains(&c.latitude), "{:?}", c);
                    assert!(c.longitude > -180.0 && c.longitude <= 180.0, "{:?}", c);
                    assert!(!c.latitude.is_nan() && !c.longitude.is_nan());
                }
            }
        }
    }

    #[test]
    fn test_origin_is_degenerate() {
        let converter = SphericalConverter::new();
        let err = converter.convert(&Vector3::zeros()).unwrap_err();
        assert_eq!(err, Error::DegenerateCoordinate { altitude: 0.0 });
    }

    #[test]
    fn test_epsilon_threshold() {
        let converter = SphericalConverter::with_epsilon(1e-3);
        assert!(converter.convert(&Vector3::new(1e-4, 0.0, 0.0)).is_err());
        assert!(converter.convert(&Vector3::new(1e-2, 0.0, 0.0)).is_ok());

        // NaN input must not slip through the threshold
        assert!(converter.convert(&Vector3::new(f64::NAN, 0.0, 0.0)).is_err());
    }
}
