/// ASCII point renderer for the globe and the tracked bodies
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Rotation3, Vector3};
use orbview_core::{BodyId, BodyRegistry, Camera, PresentationPayload};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const BODY_GLYPH: char = 'o';

/// Axial tilt applied to the globe, in degrees
const GLOBE_TILT_DEG: f64 = -23.4;

/// Spin per frame, in radians
const GLOBE_SPIN: f64 = 0.002;

/// A lat/lon point cloud standing in for the planet mesh
pub struct Globe {
    radius: f64,
    spin: f64,
    points: Vec<Vector3<f64>>,
}

impl Globe {
    pub fn new(radius: f64) -> Self {
        let mut points = Vec::new();
        for lat_step in -17..=17 {
            let lat = (lat_step as f64 * 5.0).to_radians();
            let ring = ((lat.cos() * 96.0).round() as usize).max(1);
            for i in 0..ring {
                let lon = i as f64 / ring as f64 * std::f64::consts::TAU;
                points.push(Vector3::new(
                    lat.cos() * lon.sin(),
                    lat.sin(),
                    lat.cos() * lon.cos(),
                ));
            }
        }
        Self {
            radius,
            spin: 0.0,
            points,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.spin = (self.spin + GLOBE_SPIN * dt).rem_euclid(std::f64::consts::TAU);
    }

    fn orientation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), GLOBE_TILT_DEG.to_radians())
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.spin)
    }
}

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::DarkGrey,
};

/// ASCII renderer that splats scene points into terminal cells
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.cells.fill(BLANK);
    }

    pub fn render_globe(&mut self, globe: &Globe, camera: &Camera) {
        let orientation = globe.orientation();
        let light_dir = Vector3::new(-2.0, 0.5, 1.5).normalize();
        let to_camera = camera.position.coords.normalize();

        for local in &globe.points {
            let normal = orientation * local;
            // Back faces are hidden by the front ones anyway
            if normal.dot(&to_camera) < 0.0 {
                continue;
            }
            let brightness = normal.dot(&light_dir).max(0.0);
            let index = 1 + (brightness * (LUMINOSITY_RAMP.len() - 2) as f64) as usize;
            let glyph = LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)];
            let point = Point3::from(normal * globe.radius);
            self.splat(&point, camera, glyph, ramp_color(glyph));
        }
    }

    pub fn render_bodies(
        &mut self,
        registry: &BodyRegistry,
        camera: &Camera,
        highlighted: Option<BodyId>,
    ) {
        for body in registry {
            let color = if Some(body.id) == highlighted {
                Color::Yellow
            } else {
                Color::Green
            };
            self.splat(&Point3::from(body.position), camera, BODY_GLYPH, color);
        }
    }

    fn splat(&mut self, point: &Point3<f64>, camera: &Camera, glyph: char, color: Color) {
        let Some((x, y, depth)) =
            camera.project_to_screen(point, self.width as u32, self.height as u32)
        else {
            return;
        };
        let (x, y) = (x.floor() as usize, y.floor() as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = Cell { glyph, color };
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.glyph))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// Overlay a tooltip box, clipped to the screen
    pub fn draw_tooltip<W: Write>(
        &self,
        writer: &mut W,
        payload: &PresentationPayload,
    ) -> std::io::Result<()> {
        let col = payload.anchor.x.max(0.0) as usize;
        let row = payload.anchor.y.max(0.0) as usize;
        if col >= self.width {
            return Ok(());
        }
        let room = self.width - col;

        writer.queue(SetBackgroundColor(Color::Black))?;
        writer.queue(SetForegroundColor(Color::White))?;
        for (i, line) in payload.lines.iter().enumerate() {
            let y = row + i;
            if y >= self.height {
                break;
            }
            let text: String = format!(" {} ", line).chars().take(room).collect();
            writer.queue(crossterm::cursor::MoveTo(col as u16, y as u16))?;
            writer.queue(Print(text))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn ramp_color(glyph: char) -> Color {
    match glyph {
        ' ' | '.' | ':' => Color::DarkBlue,
        '-' | '=' => Color::Blue,
        '+' | '*' => Color::Cyan,
        '#' | '%' | '@' => Color::White,
        _ => Color::White,
    }
}
