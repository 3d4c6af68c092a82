//! Heat map of a scalar field, the landscape the car rolls down in 2D levels

use std::rc::Rc;

use super::Body;
use crate::func::Func2D;
use crate::renderer::{Color, LogicalPoint, Surface, Transform, colors};

/// Default cell edge in logical units
pub const CELL_SIZE: f64 = 0.25;

pub struct ColorPlot {
    pub func: Rc<dyn Func2D>,
    pub origin: LogicalPoint,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub cell_size: f64,
}

impl ColorPlot {
    pub fn new(func: Rc<dyn Func2D>, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            func,
            origin: LogicalPoint::default(),
            x_range,
            y_range,
            cell_size: CELL_SIZE,
        }
    }

    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Field value at absolute logical `(x, y)`
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        self.func.evaluate(x - self.origin.x, y - self.origin.y)
    }
}

/// Diverging ramp: blue below zero, white at zero, red above
///
/// Values are squashed with `v / (1 + |v|)` so any finite field maps into
/// the ramp without a global min/max pass.
pub fn field_color(value: f64) -> Option<Color> {
    if !value.is_finite() {
        return None;
    }
    let t = value / (1.0 + value.abs());
    Some(if t < 0.0 {
        colors::FIELD_ZERO.lerp(colors::FIELD_LOW, -t)
    } else {
        colors::FIELD_ZERO.lerp(colors::FIELD_HIGH, t)
    })
}

impl Body for ColorPlot {
    fn origin(&self) -> LogicalPoint {
        self.origin
    }

    fn render(&self, surface: &mut dyn Surface, transform: &Transform) {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let cols = ((x1 - x0) / self.cell_size).ceil().max(0.0) as usize;
        let rows = ((y1 - y0) / self.cell_size).ceil().max(0.0) as usize;
        let w = transform.to_device_size_x(self.cell_size);
        let h = transform.to_device_size_y(self.cell_size);

        for row in 0..rows {
            for col in 0..cols {
                let x = x0 + (col as f64 + 0.5) * self.cell_size;
                let y = y0 + (row as f64 + 0.5) * self.cell_size;
                let Some(color) = field_color(self.func.evaluate(x, y)) else {
                    continue;
                };
                let center = transform.to_device(self.origin.translated(&[x, y]));
                surface.set_fill_color(color);
                surface.fill_rect(center.with_offset(-w / 2.0, -h / 2.0), w, h);
            }
        }
    }
}
