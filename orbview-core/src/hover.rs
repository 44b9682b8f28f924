/// Tooltip payloads for hover results
use serde::Serialize;

use crate::resolver::HoverResult;

/// A position in screen pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationPayload {
    pub lines: Vec<String>,
    pub anchor: ScreenPoint,
}

impl PresentationPayload {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    Show(PresentationPayload),
    Hidden,
}

#[derive(Debug, Clone, Copy)]
pub struct HoverPresenter {
    offset: ScreenPoint,
    precision: usize,
}

impl HoverPresenter {
    pub fn new() -> Self {
        Self {
            offset: ScreenPoint::new(5.0, 5.0),
            precision: 2,
        }
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = ScreenPoint::new(x, y);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn present(&self, result: &HoverResult, pointer: ScreenPoint) -> Presentation {
        let HoverResult::Hit(hit) = result else {
            return Presentation::Hidden;
        };

        let p = self.precision;
        let (latitude, longitude) = match hit.coordinates {
            Some(c) => (format!("{:.p$}", c.latitude), format!("{:.p$}", c.longitude)),
            None => ("--".to_string(), "--".to_string()),
        };

        Presentation::Show(PresentationPayload {
            lines: vec![
                format!("Name: {}", hit.display_name),
                format!("Latitude: {}", latitude),
                format!("Longitude: {}", longitude),
            ],
            anchor: ScreenPoint::new(pointer.x + self.offset.x, pointer.y + self.offset.y),
        })
    }
}

impl Default for HoverPresenter {
    fn default() -> Self {
        Self::new()
    }
}
