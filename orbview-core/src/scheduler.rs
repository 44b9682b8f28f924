/// Frame tick: motion, then coordinate refresh
use crate::coords::SphericalConverter;
use crate::error::Error;
use crate::registry::{Body, BodyId, BodyRegistry};

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub advanced: usize,
    /// Bodies whose coordinates could not be derived this tick; they keep
    /// their previous values.
    pub degenerate: Vec<BodyId>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameScheduler {
    converter: SphericalConverter,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_converter(converter: SphericalConverter) -> Self {
        Self { converter }
    }

    pub fn tick(&self, dt: f64, registry: &mut BodyRegistry) -> TickReport {
        let mut report = TickReport::default();
        for body in registry.iter_mut() {
            body.motion.advance(&mut body.position, &mut body.state, dt);
            report.advanced += 1;
            self.update_coordinates(body, &mut report);
        }
        report
    }

    /// Recompute coordinates without moving anything, e.g. right after setup.
    pub fn refresh(&self, registry: &mut BodyRegistry) -> TickReport {
        let mut report = TickReport::default();
        for body in registry.iter_mut() {
            self.update_coordinates(body, &mut report);
        }
        report
    }

    fn update_coordinates(&self, body: &mut Body, report: &mut TickReport) {
        match self.converter.convert(&body.position) {
            Ok(coordinates) => body.set_coordinates(coordinates),
            Err(Error::DegenerateCoordinate { altitude }) => {
                log::warn!(
                    "body {} ({}) at altitude {:e} has no direction; keeping last coordinates",
                    body.id,
                    body.display_name,
                    altitude
                );
                report.degenerate.push(body.id);
            }
            Err(e) => {
                log::warn!("body {}: {}", body.id, e);
                report.degenerate.push(body.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::MotionRule;
    use crate::registry::ProxyHandle;
    use nalgebra::Vector3;

    fn add(registry: &mut BodyRegistry, id: u32, position: Vector3<f64>, motion: MotionRule) {
        registry
            .add(Body::new(
                BodyId(id),
                format!("Asteroid {}", id),
                position,
                motion,
                ProxyHandle(id as u64),
            ))
            .unwrap();
    }

    #[test]
    fn test_tick_moves_then_converts() {
        let mut registry = BodyRegistry::new();
        add(
            &mut registry,
            1,
            Vector3::new(0.0, 0.0, 0.0),
            MotionRule::AngularRevolution {
                speed: std::f64::consts::FRAC_PI_2,
                radius: 2.0,
            },
        );

        let report = FrameScheduler::new().tick(1.0, &mut registry);
        assert_eq!(report.advanced, 1);
        assert!(report.degenerate.is_empty());

        let body = registry.get(BodyId(1)).unwrap();
        assert!((body.position - Vector3::new(0.0, 2.0, 0.0)).norm() < 1e-12);
        let c = body.coordinates().unwrap();
        assert!((c.latitude - 90.0).abs() < 1e-9);
        assert!((c.altitude - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_body_keeps_last_coordinates() {
        let mut registry = BodyRegistry::new();
        // Moves from x=-0.5 onto the origin on the second tick
        add(
            &mut registry,
            1,
            Vector3::new(-1.0, 0.0, 0.0),
            MotionRule::LinearOscillation {
                step: 0.5,
                target: 0.0,
            },
        );
        add(
            &mut registry,
            2,
            Vector3::new(0.0, 0.0, 1.0),
            MotionRule::Stationary,
        );

        let scheduler = FrameScheduler::new();
        let first = scheduler.tick(1.0, &mut registry);
        assert!(first.degenerate.is_empty());
        let before = registry.get(BodyId(1)).unwrap().coordinates().unwrap();
        assert!((before.longitude - -90.0).abs() < 1e-9);

        let second = scheduler.tick(1.0, &mut registry);
        assert_eq!(second.degenerate, vec![BodyId(1)]);
        assert_eq!(second.advanced, 2);

        let body = registry.get(BodyId(1)).unwrap();
        assert_eq!(body.position.x, 0.0);
        assert_eq!(body.coordinates(), Some(before));

        // The other body still updated
        assert!(registry.get(BodyId(2)).unwrap().coordinates().is_some());
    }

    #[test]
    fn test_refresh_does_not_move() {
        let mut registry = BodyRegistry::new();
        add(
            &mut registry,
            1,
            Vector3::new(1.0, 0.0, 0.0),
            MotionRule::LinearOscillation {
                step: 0.25,
                target: 0.0,
            },
        );
        FrameScheduler::new().refresh(&mut registry);
        let body = registry.get(BodyId(1)).unwrap();
        assert_eq!(body.position.x, 1.0);
        assert!((body.coordinates().unwrap().longitude - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_ticks_are_deterministic() {
        let build = || {
            let mut registry = BodyRegistry::new();
            add(
                &mut registry,
                1,
                Vector3::new(2.5, 0.0, 0.3),
                MotionRule::AngularRevolution {
                    speed: 0.0025,
                    radius: 2.5,
                },
            );
            registry
        };
        let mut a = build();
        let mut b = build();
        let scheduler = FrameScheduler::new();
        for _ in 0..500 {
            scheduler.tick(1.0, &mut a);
            scheduler.tick(1.0, &mut b);
        }
        assert_eq!(
            a.get(BodyId(1)).unwrap().position,
            b.get(BodyId(1)).unwrap().position
        );
    }
}
