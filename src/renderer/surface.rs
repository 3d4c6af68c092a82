//! Drawing surface contract and a command-recording implementation

use serde::{Deserialize, Serialize};

use super::transform::DevicePoint;

/// RGBA colour, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS `rgba()` string for canvas-style backends
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            f64::from(self.a) / 255.0
        )
    }

    /// Linear blend toward `other` (`t` clamped to [0, 1])
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Colours for scene elements
pub mod colors {
    use super::Color;

    pub const CURVE: Color = Color::rgb(0, 0, 0);
    pub const AXES: Color = Color::rgb(128, 128, 128);
    pub const CAR: Color = Color::rgb(107, 142, 35); // olivedrab
    pub const DOOR: Color = Color::rgb(165, 42, 42); // brown
    pub const OFFICE: Color = Color::rgb(119, 136, 153); // lightslategrey
    pub const OFFICE_REACHED: Color = Color::rgb(0, 0, 255);
    pub const LABEL: Color = Color::rgb(255, 255, 255);
    pub const FIELD_LOW: Color = Color::rgb(40, 90, 220);
    pub const FIELD_ZERO: Color = Color::rgb(255, 255, 255);
    pub const FIELD_HIGH: Color = Color::rgb(220, 50, 40);
}

/// Output sink for body rendering, in device coordinates
///
/// Mirrors the subset of a 2D canvas context the scene needs. The core only
/// ever writes to a surface.
pub trait Surface {
    /// Erase everything drawn so far
    fn clear(&mut self);
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: DevicePoint);
    fn line_to(&mut self, p: DevicePoint);
    /// Stroke the current path
    fn stroke(&mut self);
    fn fill_ellipse(&mut self, center: DevicePoint, radius_x: f64, radius_y: f64);
    /// Fill an axis-aligned rectangle whose top-left corner is `origin`
    fn fill_rect(&mut self, origin: DevicePoint, width: f64, height: f64);
    fn fill_text(&mut self, text: &str, at: DevicePoint);
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    StrokeColor(Color),
    FillColor(Color),
    LineWidth(f64),
    BeginPath,
    MoveTo(DevicePoint),
    LineTo(DevicePoint),
    Stroke,
    Ellipse {
        center: DevicePoint,
        radius_x: f64,
        radius_y: f64,
    },
    Rect {
        origin: DevicePoint,
        width: f64,
        height: f64,
    },
    Text {
        text: String,
        at: DevicePoint,
    },
}

/// Surface that records every call, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded rectangles with the fill colour active when each was drawn
    pub fn filled_rects(&self) -> Vec<(Color, DevicePoint, f64, f64)> {
        let mut fill = None;
        let mut rects = Vec::new();
        for cmd in &self.commands {
            match cmd {
                DrawCommand::FillColor(c) => fill = Some(*c),
                DrawCommand::Rect { origin, width, height } => {
                    if let Some(c) = fill {
                        rects.push((c, *origin, *width, *height));
                    }
                }
                _ => {}
            }
        }
        rects
    }

    /// Text labels in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for Recorder {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, p: DevicePoint) {
        self.commands.push(DrawCommand::MoveTo(p));
    }

    fn line_to(&mut self, p: DevicePoint) {
        self.commands.push(DrawCommand::LineTo(p));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_ellipse(&mut self, center: DevicePoint, radius_x: f64, radius_y: f64) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
        });
    }

    fn fill_rect(&mut self, origin: DevicePoint, width: f64, height: f64) {
        self.commands.push(DrawCommand::Rect { origin, width, height });
    }

    fn fill_text(&mut self, text: &str, at: DevicePoint) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
        });
    }
}
