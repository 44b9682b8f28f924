/// Scene manifests: a small text format listing bodies, placements and motion
///
/// ```text
/// scene "Collision demo"
/// # id  name              placement                     motion
/// body 1 "Space Debris 1" at -1200 250 0 radius 2.5   linear 0.025 target 0.7974510493440173
/// body 2 "Asteroid 1"     random radius 2.5           revolve 0.0025 angle random
/// body 3 "Marker"         at 0 0 3                    still
/// endscene
/// ```
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while},
    character::complete::{char, multispace1, u32 as decimal_u32},
    combinator::{eof, map, opt, value},
    multi::many0,
    number::complete::double,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::motion::{MotionRule, MotionState};
use crate::placement::{Placement, Placer};
use crate::registry::{Body, BodyId, BodyRegistry, ProxyHandle};
use crate::scheduler::FrameScheduler;

/// Value the source debris animation was observed to halt on
pub const COLLISION_DEMO_TARGET: f64 = 0.7974510493440173;
pub const DEFAULT_ORBIT_RADIUS: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartAngle {
    Fixed(f64),
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionSpec {
    Linear { step: f64, target: f64 },
    Revolve { speed: f64, angle: StartAngle },
    Still,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub id: BodyId,
    pub name: String,
    pub placement: Placement,
    pub motion: MotionSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneManifest {
    pub name: String,
    pub bodies: Vec<BodySpec>,
}

impl SceneManifest {
    /// Two debris bodies closing in along x from either side of the sphere.
    pub fn collision_demo() -> Self {
        let bodies = [(1, -1200.0), (2, 1200.0)]
            .into_iter()
            .map(|(id, x)| BodySpec {
                id: BodyId(id),
                name: format!("Space Debris {}", id),
                placement: Placement::on_sphere(x, 250.0, 0.0, DEFAULT_ORBIT_RADIUS),
                motion: MotionSpec::Linear {
                    step: 0.025,
                    target: COLLISION_DEMO_TARGET,
                },
            })
            .collect();

        Self {
            name: "Collision demo".to_string(),
            bodies,
        }
    }

    /// `count` asteroids scattered on a sphere, each revolving about Z.
    pub fn earth_orbit(count: u32) -> Self {
        let bodies = (1..=count)
            .map(|id| BodySpec {
                id: BodyId(id),
                name: format!("Asteroid {}", id),
                placement: Placement::Random {
                    radius: DEFAULT_ORBIT_RADIUS,
                },
                motion: MotionSpec::Revolve {
                    speed: 0.0025,
                    angle: StartAngle::Random,
                },
            })
            .collect();

        Self {
            name: "Earth orbit".to_string(),
            bodies,
        }
    }

    /// Place every body and register it under `ProxyHandle(id)`. Same seed,
    /// same scene. Coordinates are refreshed before returning.
    pub fn build(&self, seed: u64) -> Result<BodyRegistry> {
        let mut placer = Placer::new(seed);
        let mut registry = BodyRegistry::new();

        for spec in &self.bodies {
            let position = placer.place(&spec.placement)?;
            let (motion, state) = match spec.motion {
                MotionSpec::Linear { step, target } => (
                    MotionRule::LinearOscillation { step, target },
                    MotionState::default(),
                ),
                MotionSpec::Revolve { speed, angle } => {
                    let angle = match angle {
                        StartAngle::Fixed(a) => a,
                        StartAngle::Random => placer.random_angle(),
                    };
                    (
                        MotionRule::AngularRevolution {
                            speed,
                            radius: spec.placement.radius(),
                        },
                        MotionState::with_angle(angle),
                    )
                }
                MotionSpec::Still => (MotionRule::Stationary, MotionState::default()),
            };

            let body = Body::new(
                spec.id,
                spec.name.clone(),
                position,
                motion,
                ProxyHandle(spec.id.0 as u64),
            )
            .with_state(state);
            registry.add(body)?;
        }

        FrameScheduler::new().refresh(&mut registry);
        log::debug!(
            "built scene '{}' with {} bodies",
            self.name,
            registry.len()
        );
        Ok(registry)
    }
}

/// Parse a scene manifest
pub fn parse_manifest(input: &str) -> Result<SceneManifest> {
    let manifest = match parse_manifest_impl(input) {
        Ok((_, manifest)) => manifest,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let consumed = input.len() - e.input.len();
            let line = input[..consumed].matches('\n').count() + 1;
            return Err(Error::Manifest(format!(
                "unexpected input on line {}: {:?}",
                line,
                e.input.lines().next().unwrap_or("")
            )));
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(Error::Manifest("truncated manifest".to_string()))
        }
    };
    validate(&manifest)?;
    Ok(manifest)
}

fn validate(manifest: &SceneManifest) -> Result<()> {
    for spec in &manifest.bodies {
        if spec.name.trim().is_empty() {
            return Err(Error::Manifest(format!("body {} has an empty name", spec.id)));
        }
        let radius = match spec.placement {
            Placement::Explicit { radius, .. } => radius,
            Placement::Random { radius } => Some(radius),
        };
        if let Some(r) = radius {
            if !(r.is_finite() && r > 0.0) {
                return Err(Error::Manifest(format!(
                    "body {} has invalid radius {}",
                    spec.id, r
                )));
            }
        }
        let rate = match spec.motion {
            MotionSpec::Linear { step, .. } => step,
            MotionSpec::Revolve { speed, .. } => speed,
            MotionSpec::Still => 0.0,
        };
        if !rate.is_finite() {
            return Err(Error::Manifest(format!("body {} has a non-finite rate", spec.id)));
        }
    }
    Ok(())
}

fn parse_manifest_impl(input: &str) -> IResult<&str, SceneManifest> {
    let (input, _) = preceded(ws, tag("scene"))(input)?;
    let (input, name) = preceded(ws1, quoted)(input)?;
    let (input, bodies) = many0(parse_body)(input)?;
    let (input, _) = preceded(ws, tag("endscene"))(input)?;
    let (input, _) = preceded(ws, eof)(input)?;

    Ok((
        input,
        SceneManifest {
            name: name.to_string(),
            bodies,
        },
    ))
}

fn parse_body(input: &str) -> IResult<&str, BodySpec> {
    let (input, _) = preceded(ws, tag("body"))(input)?;
    let (input, id) = preceded(ws1, decimal_u32)(input)?;
    let (input, name) = preceded(ws1, quoted)(input)?;
    let (input, placement) = preceded(ws1, parse_placement)(input)?;
    let (input, motion) = preceded(ws1, parse_motion)(input)?;

    Ok((
        input,
        BodySpec {
            id: BodyId(id),
            name: name.to_string(),
            placement,
            motion,
        },
    ))
}

fn parse_placement(input: &str) -> IResult<&str, Placement> {
    alt((
        map(
            tuple((
                tag("at"),
                preceded(ws1, double),
                preceded(ws1, double),
                preceded(ws1, double),
                opt(preceded(tuple((ws1, tag("radius"), ws1)), double)),
            )),
            |(_, x, y, z, radius)| match radius {
                Some(r) => Placement::on_sphere(x, y, z, r),
                None => Placement::at(x, y, z),
            },
        ),
        map(
            preceded(tuple((tag("random"), ws1, tag("radius"), ws1)), double),
            |radius| Placement::Random { radius },
        ),
    ))(input)
}

fn parse_motion(input: &str) -> IResult<&str, MotionSpec> {
    alt((
        map(
            tuple((
                preceded(tuple((tag("linear"), ws1)), double),
                preceded(tuple((ws1, tag("target"), ws1)), double),
            )),
            |(step, target)| MotionSpec::Linear { step, target },
        ),
        map(
            tuple((
                preceded(tuple((tag("revolve"), ws1)), double),
                opt(preceded(tuple((ws1, tag("angle"), ws1)), parse_angle)),
            )),
            |(speed, angle)| MotionSpec::Revolve {
                speed,
                angle: angle.unwrap_or(StartAngle::Fixed(0.0)),
            },
        ),
        value(MotionSpec::Still, tag("still")),
    ))(input)
}

fn parse_angle(input: &str) -> IResult<&str, StartAngle> {
    alt((
        value(StartAngle::Random, tag("random")),
        map(double, StartAngle::Fixed),
    ))(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"' || c == '\n'), char('"'))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), take_while(|c| c != '\n'))(input)
}

/// Whitespace and comments, possibly none
fn ws(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((multispace1, comment))))(input)
}

/// At least one separator
fn ws1(input: &str) -> IResult<&str, ()> {
    value((), preceded(multispace1, ws))(input)
}
