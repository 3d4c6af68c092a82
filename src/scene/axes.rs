//! Coordinate axes with unit ticks

use super::Body;
use crate::renderer::{LogicalPoint, Surface, Transform, colors};

pub struct Axes {
    pub origin: LogicalPoint,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub tick_size: f64,
    pub x_interval: f64,
    pub y_interval: f64,
}

impl Axes {
    pub fn new(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            origin: LogicalPoint::default(),
            x_range,
            y_range,
            tick_size: 1.0,
            x_interval: 1.0,
            y_interval: 1.0,
        }
    }

    fn segment(&self, surface: &mut dyn Surface, transform: &Transform, from: [f64; 2], to: [f64; 2]) {
        surface.begin_path();
        surface.move_to(transform.to_device(self.origin.translated(&from)));
        surface.line_to(transform.to_device(self.origin.translated(&to)));
        surface.stroke();
    }

    /// Tick positions: every interval multiple inside `[start, end)`
    fn ticks(start: f64, end: f64, interval: f64) -> impl Iterator<Item = f64> {
        let first = (start / interval).ceil();
        (0..)
            .map(move |i| (first + i as f64) * interval)
            .take_while(move |v| *v < end)
    }
}

impl Body for Axes {
    fn origin(&self) -> LogicalPoint {
        self.origin
    }

    fn render(&self, surface: &mut dyn Surface, transform: &Transform) {
        surface.set_stroke_color(colors::AXES);
        surface.set_line_width(4.0);

        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        self.segment(surface, transform, [x0, 0.0], [x1, 0.0]);
        self.segment(surface, transform, [0.0, y0], [0.0, y1]);

        let half = self.tick_size / 2.0;
        for x in Self::ticks(x0, x1, self.x_interval) {
            self.segment(surface, transform, [x, -half], [x, half]);
        }
        for y in Self::ticks(y0, y1, self.y_interval) {
            self.segment(surface, transform, [-half, y], [half, y]);
        }
    }
}
