/// orbview web - the body scene exported to JavaScript
///
/// The JS side owns the WebGL scene. Each frame it calls `tick`, reads
/// `positions` back and copies them onto its meshes. Pointer moves go to
/// `pointer_move` (Rust-side picking) or `pointer_hits` (hits from a JS
/// raycaster); both drive the DOM tooltip when one is attached.
use nalgebra::{Point2, Point3};
use orbview_core::{
    parse_manifest, BodyRegistry, BodySphereCaster, Camera, FrameScheduler, HoverPresenter,
    Intersection, PointerIntersectionResolver, Presentation, PresentationPayload, ProxyHandle,
    SceneManifest, ScreenPoint,
};
use wasm_bindgen::prelude::*;

mod tooltip;

use tooltip::Tooltip;

fn to_js(e: orbview_core::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Client pixel position to normalized device coordinates, +y up
pub fn client_to_ndc(client_x: f64, client_y: f64, width: f64, height: f64) -> Point2<f64> {
    Point2::new(
        client_x / width.max(1.0) * 2.0 - 1.0,
        -(client_y / height.max(1.0)) * 2.0 + 1.0,
    )
}

#[wasm_bindgen]
pub struct OrbitScene {
    name: String,
    registry: BodyRegistry,
    scheduler: FrameScheduler,
    resolver: PointerIntersectionResolver,
    presenter: HoverPresenter,
    camera: Camera,
    pick_radius: f64,
    tooltip: Option<Tooltip>,
}

impl OrbitScene {
    fn from_manifest_inner(manifest: &SceneManifest, seed: u64) -> orbview_core::Result<Self> {
        let registry = manifest.build(seed)?;
        Ok(Self {
            name: manifest.name.clone(),
            registry,
            scheduler: FrameScheduler::new(),
            resolver: PointerIntersectionResolver::new(),
            presenter: HoverPresenter::new(),
            camera: Camera::default(),
            pick_radius: 0.085,
            tooltip: None,
        })
    }

    fn preset(preset: &str, count: u32) -> orbview_core::Result<SceneManifest> {
        match preset {
            "collision" => Ok(SceneManifest::collision_demo()),
            "earth" => Ok(SceneManifest::earth_orbit(count)),
            other => Err(orbview_core::Error::Manifest(format!(
                "unknown preset '{}'",
                other
            ))),
        }
    }

    fn hover_ray(
        &self,
        client_x: f64,
        client_y: f64,
        width: f64,
        height: f64,
    ) -> orbview_core::Result<Presentation> {
        let ndc = client_to_ndc(client_x, client_y, width, height);
        let ray = self.camera.ray_from_ndc(ndc)?;
        let caster = BodySphereCaster::new(&self.registry, self.pick_radius);
        let result = self.resolver.resolve(&ray, &self.registry, &caster)?;
        Ok(self
            .presenter
            .present(&result, ScreenPoint::new(client_x, client_y)))
    }

    fn hover_hits(
        &self,
        proxies: &[u32],
        distances: &[f64],
        client_x: f64,
        client_y: f64,
    ) -> orbview_core::Result<Presentation> {
        if proxies.len() != distances.len() {
            return Err(orbview_core::Error::MismatchedHits {
                proxies: proxies.len(),
                distances: distances.len(),
            });
        }
        let hits: Vec<Intersection> = proxies
            .iter()
            .zip(distances)
            .map(|(proxy, distance)| Intersection {
                proxy: ProxyHandle(*proxy as u64),
                distance: *distance,
            })
            .collect();
        let result = self.resolver.resolve_intersections(&hits, &self.registry)?;
        Ok(self
            .presenter
            .present(&result, ScreenPoint::new(client_x, client_y)))
    }

    /// Push the presentation to the DOM and hand the payload back as JSON
    fn apply(&self, presentation: Presentation) -> Option<PresentationPayload> {
        match presentation {
            Presentation::Show(payload) => {
                if let Some(tooltip) = &self.tooltip {
                    tooltip.show(&payload);
                }
                Some(payload)
            }
            Presentation::Hidden => {
                if let Some(tooltip) = &self.tooltip {
                    tooltip.hide();
                }
                None
            }
        }
    }

    fn payload_json(payload: Option<PresentationPayload>) -> Result<String, JsValue> {
        serde_json::to_string(&payload).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[wasm_bindgen]
impl OrbitScene {
    /// Build a preset scene: "collision" or "earth"
    #[wasm_bindgen(constructor)]
    pub fn new(preset: &str, count: u32, seed: u64) -> Result<OrbitScene, JsValue> {
        let manifest = Self::preset(preset, count).map_err(to_js)?;
        Self::from_manifest_inner(&manifest, seed).map_err(to_js)
    }

    /// Build a scene from manifest text
    pub fn from_manifest(text: &str, seed: u64) -> Result<OrbitScene, JsValue> {
        let manifest = parse_manifest(text).map_err(to_js)?;
        Self::from_manifest_inner(&manifest, seed).map_err(to_js)
    }

    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// Create the tooltip element and append it to the document body
    pub fn attach_tooltip(&mut self) -> Result<(), JsValue> {
        if self.tooltip.is_none() {
            self.tooltip = Some(Tooltip::attach()?);
        }
        Ok(())
    }

    pub fn set_camera(&mut self, x: f64, y: f64, z: f64, fov_degrees: f64, aspect: f64) {
        self.camera.position = Point3::new(x, y, z);
        self.camera.fov = fov_degrees.to_radians();
        self.camera.aspect = aspect;
    }

    pub fn set_pick_radius(&mut self, radius: f64) {
        self.pick_radius = radius;
    }

    /// Advance all bodies; `dt` in frames. Returns how many bodies kept
    /// stale coordinates this tick.
    pub fn tick(&mut self, dt: f64) -> u32 {
        let report = self.scheduler.tick(dt, &mut self.registry);
        if !report.degenerate.is_empty() {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "{} bodies have no direction this frame",
                report.degenerate.len()
            )));
        }
        report.degenerate.len() as u32
    }

    /// Body ids in registry order; also the proxy handles
    pub fn body_ids(&self) -> Vec<u32> {
        self.registry.iter().map(|b| b.id.0).collect()
    }

    /// Flat xyz triples in registry order
    pub fn positions(&self) -> Vec<f64> {
        self.registry
            .iter()
            .flat_map(|b| [b.position.x, b.position.y, b.position.z])
            .collect()
    }

    /// Flat latitude/longitude pairs in registry order; NaN where unknown
    pub fn coordinates(&self) -> Vec<f64> {
        self.registry
            .iter()
            .flat_map(|b| match b.coordinates() {
                Some(c) => [c.latitude, c.longitude],
                None => [f64::NAN, f64::NAN],
            })
            .collect()
    }

    /// Resolve a pointer move with Rust-side picking. Returns the tooltip
    /// payload as JSON, or "null" when hidden.
    pub fn pointer_move(
        &self,
        client_x: f64,
        client_y: f64,
        width: f64,
        height: f64,
    ) -> Result<String, JsValue> {
        let presentation = self
            .hover_ray(client_x, client_y, width, height)
            .map_err(to_js)?;
        Self::payload_json(self.apply(presentation))
    }

    /// Resolve a pointer move from hits computed by a JS raycaster.
    /// `proxies[i]` pairs with `distances[i]`; unequal lengths are an error.
    pub fn pointer_hits(
        &self,
        proxies: Vec<u32>,
        distances: Vec<f64>,
        client_x: f64,
        client_y: f64,
    ) -> Result<String, JsValue> {
        let presentation = self
            .hover_hits(&proxies, &distances, client_x, client_y)
            .map_err(to_js)?;
        Self::payload_json(self.apply(presentation))
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    Ok(())
}
