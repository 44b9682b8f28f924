/// Terminal front end: renders the tracked bodies and shows a hover tooltip
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::{Point2, Point3};
use orbview_core::{
    BodyId, BodyRegistry, BodySphereCaster, Camera, FrameScheduler, HoverPresenter, HoverResult,
    PointerIntersectionResolver, Presentation, ScreenPoint,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::{AsciiRenderer, Globe};

/// Scheduler time unit: one nominal 60 Hz frame
const FRAME_SECONDS: f64 = 1.0 / 60.0;

const CAMERA_DISTANCE: f64 = 5.0;

/// Knobs for the terminal app
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub title: String,
    pub target_fps: u32,
    /// Bounding-sphere radius used when picking bodies, in scene units
    pub pick_radius: f64,
    pub show_globe: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            title: "orbview".to_string(),
            target_fps: 30,
            pick_radius: 0.15,
            show_globe: true,
        }
    }
}

/// Camera orbit angles around the scene origin, in radians
#[derive(Debug, Clone, Copy, Default)]
struct Orbit {
    yaw: f64,
    pitch: f64,
}

impl Orbit {
    fn nudge(&mut self, dyaw: f64, dpitch: f64) {
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).clamp(-1.5, 1.5);
    }

    fn eye(&self) -> Point3<f64> {
        Point3::new(
            CAMERA_DISTANCE * self.pitch.cos() * self.yaw.sin(),
            CAMERA_DISTANCE * self.pitch.sin(),
            CAMERA_DISTANCE * self.pitch.cos() * self.yaw.cos(),
        )
    }
}

/// Terminal cells are roughly twice as tall as wide
fn cell_camera(width: u16, height: u16) -> Camera {
    Camera::new(width as u32, height as u32 * 2)
}

/// Pointer cell to normalized device coordinates, +y up
pub fn cell_to_ndc(column: u16, row: u16, width: u16, height: u16) -> Point2<f64> {
    let x = (column as f64 + 0.5) / width.max(1) as f64 * 2.0 - 1.0;
    let y = -((row as f64 + 0.5) / height.max(1) as f64 * 2.0 - 1.0);
    Point2::new(x, y)
}

/// Main application struct for the terminal front end
pub struct TerminalApp {
    registry: BodyRegistry,
    scheduler: FrameScheduler,
    resolver: PointerIntersectionResolver,
    presenter: HoverPresenter,
    camera: Camera,
    orbit: Orbit,
    globe: Globe,
    renderer: AsciiRenderer,
    options: AppOptions,
    tooltip: Presentation,
    hovered: Option<BodyId>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(registry: BodyRegistry, options: AppOptions) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(registry, options, width, height))
    }

    fn with_size(registry: BodyRegistry, options: AppOptions, width: u16, height: u16) -> Self {
        Self {
            registry,
            scheduler: FrameScheduler::new(),
            resolver: PointerIntersectionResolver::new(),
            // Offsets are in cells here, not pixels
            presenter: HoverPresenter::new().with_offset(2.0, 1.0),
            camera: cell_camera(width, height),
            orbit: Orbit::default(),
            globe: Globe::new(1.0),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            options,
            tooltip: Presentation::Hidden,
            hovered: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.options.target_fps.max(1) as u64);
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            let dt = (frame_start - previous).as_secs_f64() / FRAME_SECONDS;
            previous = frame_start;
            self.update(dt);

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved,
                column,
                row,
                ..
            }) => self.pointer_moved(column, row),
            Event::Resize(width, height) => {
                self.camera = Camera {
                    position: self.camera.position,
                    ..cell_camera(width, height)
                };
                self.renderer.resize(width as usize, height as usize);
                self.tooltip = Presentation::Hidden;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.orbit.nudge(0.0, 0.1),
            KeyCode::Char('s') | KeyCode::Down => self.orbit.nudge(0.0, -0.1),
            KeyCode::Char('a') | KeyCode::Left => self.orbit.nudge(-0.1, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.orbit.nudge(0.1, 0.0),
            KeyCode::Char('g') => self.options.show_globe = !self.options.show_globe,
            _ => return,
        }
        self.camera.position = self.orbit.eye();
    }

    /// Pointer-move trigger: resolve the ray, then present
    fn pointer_moved(&mut self, column: u16, row: u16) {
        let ndc = cell_to_ndc(
            column,
            row,
            self.renderer.width() as u16,
            self.renderer.height() as u16,
        );
        let pointer = ScreenPoint::new(column as f64, row as f64);

        let result = self.camera.ray_from_ndc(ndc).and_then(|ray| {
            let caster = BodySphereCaster::new(&self.registry, self.options.pick_radius);
            self.resolver.resolve(&ray, &self.registry, &caster)
        });

        match result {
            Ok(result) => {
                self.hovered = match &result {
                    HoverResult::Hit(hit) => Some(hit.body_id),
                    HoverResult::None => None,
                };
                self.tooltip = self.presenter.present(&result, pointer);
            }
            Err(e) => {
                log::error!("hover resolution failed: {}", e);
                self.hovered = None;
                self.tooltip = Presentation::Hidden;
            }
        }
    }

    /// Frame trigger: one scheduler tick
    fn update(&mut self, dt: f64) {
        self.globe.advance(dt);
        let report = self.scheduler.tick(dt, &mut self.registry);
        if !report.degenerate.is_empty() {
            log::debug!("{} bodies kept stale coordinates", report.degenerate.len());
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        if self.options.show_globe {
            self.renderer.render_globe(&self.globe, &self.camera);
        }
        self.renderer
            .render_bodies(&self.registry, &self.camera, self.hovered);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        if let Presentation::Show(payload) = &self.tooltip {
            self.renderer.draw_tooltip(&mut stdout, payload)?;
        }

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | {} bodies | FPS: {:.1} | Mouse=Hover WASD/Arrows=Orbit G=Globe Q=Quit",
                self.options.title,
                self.registry.len(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use orbview_core::{Body, MotionRule, ProxyHandle};

    fn app_with_center_body() -> TerminalApp {
        let mut registry = BodyRegistry::new();
        registry
            .add(Body::new(
                BodyId(1),
                "Asteroid 1",
                Vector3::new(0.0, 0.0, 2.5),
                MotionRule::Stationary,
                ProxyHandle(1),
            ))
            .unwrap();
        FrameScheduler::new().refresh(&mut registry);
        TerminalApp::with_size(registry, AppOptions::default(), 80, 24)
    }

    #[test]
    fn test_cell_to_ndc() {
        let ndc = cell_to_ndc(0, 0, 80, 24);
        assert!(ndc.x < -0.9 && ndc.y > 0.9);
        let ndc = cell_to_ndc(79, 23, 80, 24);
        assert!(ndc.x > 0.9 && ndc.y < -0.9);
    }

    #[test]
    fn test_hover_over_body_shows_tooltip() {
        let mut app = app_with_center_body();
        // Center cell of an 80x24 screen
        app.pointer_moved(40, 12);

        assert_eq!(app.hovered, Some(BodyId(1)));
        let Presentation::Show(payload) = &app.tooltip else {
            panic!("tooltip should be visible");
        };
        assert_eq!(payload.lines[0], "Name: Asteroid 1");
        assert_eq!(payload.anchor, ScreenPoint::new(42.0, 13.0));
    }

    #[test]
    fn test_hover_over_empty_space_hides_tooltip() {
        let mut app = app_with_center_body();
        app.pointer_moved(40, 12);
        app.pointer_moved(2, 2);
        assert_eq!(app.hovered, None);
        assert_eq!(app.tooltip, Presentation::Hidden);
    }

    #[test]
    fn test_keys_orbit_camera_and_quit() {
        let mut app = app_with_center_body();
        app.handle_key(KeyCode::Right);
        assert!(app.camera.position.x > 0.0);
        assert!((app.camera.position.coords.norm() - CAMERA_DISTANCE).abs() < 1e-9);

        app.handle_key(KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_bundled_scenes_parse() {
        for text in [
            include_str!("../scenes/collision.scene"),
            include_str!("../scenes/mixed.scene"),
        ] {
            let manifest = orbview_core::parse_manifest(text).unwrap();
            let registry = manifest.build(1).unwrap();
            assert_eq!(registry.len(), manifest.bodies.len());
        }
    }

    #[test]
    fn test_update_ticks_bodies() {
        let mut registry = BodyRegistry::new();
        registry
            .add(Body::new(
                BodyId(1),
                "Asteroid 1",
                Vector3::new(2.5, 0.0, 0.0),
                MotionRule::AngularRevolution {
                    speed: 0.1,
                    radius: 2.5,
                },
                ProxyHandle(1),
            ))
            .unwrap();
        let mut app = TerminalApp::with_size(registry, AppOptions::default(), 80, 24);
        app.update(1.0);
        let body = app.registry().get(BodyId(1)).unwrap();
        assert!(body.position.y > 0.0);
        assert!(body.coordinates().is_some());
    }
}
