//! Graph of a one-variable function, the track the car rides on

use std::rc::Rc;

use super::Body;
use crate::func::Func1D;
use crate::renderer::{Color, LogicalPoint, Surface, Transform, colors};

/// Default sampling interval along x when drawing
pub const SAMPLE_STEP: f64 = 0.01;

pub struct Curve {
    pub func: Rc<dyn Func1D>,
    /// Drawn x interval, relative to the origin
    pub domain: (f64, f64),
    pub origin: LogicalPoint,
    pub color: Color,
    pub sample_step: f64,
}

impl Curve {
    pub fn new(func: Rc<dyn Func1D>, domain: (f64, f64)) -> Self {
        Self {
            func,
            domain,
            origin: LogicalPoint::default(),
            color: colors::CURVE,
            sample_step: SAMPLE_STEP,
        }
    }

    pub fn with_sample_step(mut self, step: f64) -> Self {
        self.sample_step = step;
        self
    }

    /// Curve height at absolute logical `x`, relative to the curve origin
    pub fn height_at(&self, x: f64) -> f64 {
        self.func.evaluate(x - self.origin.x)
    }
}

impl Body for Curve {
    fn origin(&self) -> LogicalPoint {
        self.origin
    }

    fn render(&self, surface: &mut dyn Surface, transform: &Transform) {
        surface.set_stroke_color(self.color);
        surface.set_line_width(4.0);
        surface.begin_path();

        let (start, end) = self.domain;
        let samples = ((end - start) / self.sample_step + 1e-9).floor().max(0.0) as usize;
        let mut pen_down = false;
        for i in 0..=samples {
            let x = start + i as f64 * self.sample_step;
            let y = self.func.evaluate(x);
            if !y.is_finite() {
                pen_down = false;
                continue;
            }
            let raw = transform.to_device(self.origin.translated(&[x, y]));
            if pen_down {
                surface.line_to(raw);
            } else {
                surface.move_to(raw);
                pen_down = true;
            }
        }
        surface.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::Polynomial;
    use crate::renderer::{DevicePoint, DrawCommand, Recorder};

    struct Reciprocal;

    impl Func1D for Reciprocal {
        fn evaluate(&self, x: f64) -> f64 {
            1.0 / x
        }

        fn describe(&self) -> String {
            "1/x".to_string()
        }
    }

    #[test]
    fn test_polyline_through_samples() {
        let curve = Curve::new(Rc::new(Polynomial::new(1.0, vec![0.0])), (0.0, 2.0)).with_sample_step(1.0);
        let t = Transform::new(10.0, -10.0, 5.0, 50.0).unwrap();
        let mut r = Recorder::new();
        curve.render(&mut r, &t);

        let points: Vec<_> = r
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::MoveTo(p) | DrawCommand::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(
            points,
            vec![
                DevicePoint::new(5.0, 50.0),
                DevicePoint::new(15.0, 40.0),
                DevicePoint::new(25.0, 30.0)
            ]
        );
        assert_eq!(r.commands.last(), Some(&DrawCommand::Stroke));
    }

    #[test]
    fn test_non_finite_samples_break_the_line() {
        let curve = Curve::new(Rc::new(Reciprocal), (-1.0, 1.0)).with_sample_step(1.0);
        let t = Transform::new(1.0, 1.0, 0.0, 0.0).unwrap();
        let mut r = Recorder::new();
        curve.render(&mut r, &t);
        let moves = r.commands.iter().filter(|c| matches!(c, DrawCommand::MoveTo(_))).count();
        // 1/0 = inf at x = 0 splits the graph in two
        assert_eq!(moves, 2);
    }

    #[test]
    fn test_height_is_relative_to_origin() {
        let mut curve = Curve::new(Rc::new(Polynomial::new(1.0, vec![0.0])), (0.0, 20.0));
        curve.origin = LogicalPoint::new(2.0, 0.0);
        assert_eq!(curve.height_at(5.0), 3.0);
    }
}
