//! The car: a point mass that rides a curve or rolls down a scalar field
//!
//! `step1d`/`step2d` take host timestamps and derive `dt` from the previous
//! call; `advance1d`/`advance2d` are the pure integrators behind them and
//! take `dt` directly.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision;
use crate::consts::{CAR_RADIUS, GRAVITY, SLOPE_PROBE_STEP};
use crate::func::gradient;
use crate::renderer::{LogicalPoint, Surface, Transform, colors};
use crate::scene::{Body, ColorPlot, Curve, Door, Office};
use crate::vector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub position: LogicalPoint,
    pub velocity: DVec2,
    pub radius: f64,
    /// Host timestamp (ms) of the previous step; `None` until the first one
    last_update_ms: Option<f64>,
}

impl Car {
    pub fn new(position: LogicalPoint) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            radius: CAR_RADIUS,
            last_update_ms: None,
        }
    }

    pub fn last_update_ms(&self) -> Option<f64> {
        self.last_update_ms
    }

    /// True once the car has been stepped at least once
    pub fn is_running(&self) -> bool {
        self.last_update_ms.is_some()
    }

    /// Seconds since the previous step; the first call seeds the clock and
    /// returns zero
    fn tick(&mut self, now_ms: f64) -> f64 {
        let last = self.last_update_ms.unwrap_or(now_ms);
        self.last_update_ms = Some(now_ms);
        (now_ms - last) / 1000.0
    }

    /// Advance along `curve` to host time `now_ms`
    pub fn step1d(&mut self, curve: &Curve, now_ms: f64) {
        let dt = self.tick(now_ms);
        self.advance1d(curve, dt);
    }

    /// Advance down the gradient of `field` to host time `now_ms`
    pub fn step2d(&mut self, field: &ColorPlot, now_ms: f64) {
        let dt = self.tick(now_ms);
        self.advance2d(field, dt);
    }

    /// One curve-constrained Euler step of `dt` seconds
    ///
    /// While the disc overlaps the curve only the tangential part of gravity
    /// acts; a disc that sank below the surface is lifted back onto it and
    /// loses the normal part of its velocity.
    pub fn advance1d(&mut self, curve: &Curve, dt: f64) {
        let local_x = self.position.x - curve.origin.x;
        let height = curve.func.evaluate(local_x);
        let mut acc = GRAVITY;

        if collision::disc_overlaps_curve(self.position, self.radius, curve.origin, height) {
            let slope = (curve.func.evaluate(local_x + SLOPE_PROBE_STEP) - height) / SLOPE_PROBE_STEP;
            // Vertical tangents divide by infinity here and go NaN, unguarded
            let tangent = vector::unit(&[1.0, slope]);

            acc = vector::to_dvec2(&vector::scale(vector::dot(&tangent, &acc), &tangent));

            if self.position.y - self.radius - curve.origin.y < height {
                self.position.y = height + curve.origin.y + self.radius;
                let along = vector::dot(&tangent, &self.velocity);
                self.velocity = vector::to_dvec2(&vector::scale(along, &tangent));
            }
        }

        self.integrate(acc, dt);
    }

    /// One free Euler step of `dt` seconds down the field's gradient
    pub fn advance2d(&mut self, field: &ColorPlot, dt: f64) {
        let acc = -gradient(
            &*field.func,
            self.position.x - field.origin.x,
            self.position.y - field.origin.y,
        );
        self.integrate(acc, dt);
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity
    fn integrate(&mut self, acc: DVec2, dt: f64) {
        self.velocity += acc * dt;
        self.position = self.position.translated(&(self.velocity * dt));
    }

    pub fn collides_door(&self, door: &Door) -> bool {
        collision::point_in_door(self.position, door.origin)
    }

    pub fn collides_office(&self, office: &Office) -> bool {
        collision::point_in_office(self.position, office.origin)
    }
}

impl Body for Car {
    fn origin(&self) -> LogicalPoint {
        self.position
    }

    fn render(&self, surface: &mut dyn Surface, transform: &Transform) {
        surface.set_stroke_color(colors::CAR);
        surface.set_fill_color(colors::CAR);
        surface.fill_ellipse(
            transform.to_device(self.position),
            transform.to_device_size_x(self.radius),
            transform.to_device_size_y(self.radius),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::{CompiledExpression, Func1D, Polynomial};
    use std::rc::Rc;

    fn flat(height: f64) -> Curve {
        Curve::new(Rc::new(Polynomial::new(height, Vec::new())), (0.0, 20.0))
    }

    fn ramp(slope: f64) -> Curve {
        Curve::new(Rc::new(Polynomial::new(slope, vec![0.0])), (0.0, 20.0))
    }

    #[test]
    fn test_first_step_seeds_clock_without_motion() {
        let mut car = Car::new(LogicalPoint::new(1.0, 5.0));
        assert!(!car.is_running());
        car.step1d(&flat(-100.0), 1000.0);
        assert!(car.is_running());
        assert_eq!(car.last_update_ms(), Some(1000.0));
        assert_eq!(car.position, LogicalPoint::new(1.0, 5.0));
        assert_eq!(car.velocity, DVec2::ZERO);

        car.step1d(&flat(-100.0), 1500.0);
        assert_eq!(car.last_update_ms(), Some(1500.0));
        assert!((car.velocity.y - -1.5).abs() < 1e-12);
    }

    #[test]
    fn test_free_fall_above_curve() {
        let mut car = Car::new(LogicalPoint::new(1.0, 5.0));
        car.advance1d(&flat(0.0), 0.1);
        // v = -0.3, y = 5 - 0.03
        assert!((car.velocity.y - -0.3).abs() < 1e-12);
        assert!((car.position.y - 4.97).abs() < 1e-12);
        assert_eq!(car.position.x, 1.0);
    }

    #[test]
    fn test_resting_on_flat_curve() {
        let rest = 2.0 + CAR_RADIUS;
        // Just below rest height so the strict overlap test fires
        let mut car = Car::new(LogicalPoint::new(3.0, rest - 1e-3));
        car.advance1d(&flat(2.0), 0.05);
        assert_eq!(car.velocity, DVec2::ZERO);
        assert_eq!(car.position.y, rest);
        assert_eq!(car.position.x, 3.0);

        car.advance1d(&flat(2.0), 0.05);
        assert!(car.position.y < rest);
    }

    #[test]
    fn test_slides_down_ramp() {
        // y = -x: tangent (1, -1)/sqrt(2), gravity along it is 3/sqrt(2)
        let curve = ramp(-1.0);
        let x = 2.0;
        let mut car = Car::new(LogicalPoint::new(x, -x + CAR_RADIUS - 1e-3));
        car.advance1d(&curve, 0.1);

        let along = 3.0 / 2f64.sqrt();
        let expected = DVec2::new(1.0, -1.0).normalize() * along * 0.1;
        assert!((car.velocity - expected).length() < 1e-3);
        assert!(car.velocity.x > 0.0);
        // Snapped onto the surface before integrating
        assert!(car.position.y > -x + CAR_RADIUS - 0.1);
    }

    #[test]
    fn test_snap_discards_normal_velocity() {
        let mut car = Car::new(LogicalPoint::new(5.0, CAR_RADIUS - 0.01));
        car.velocity = DVec2::new(2.0, -4.0);
        car.advance1d(&flat(0.0), 0.0);
        assert_eq!(car.velocity, DVec2::new(2.0, 0.0));
        assert_eq!(car.position.y, CAR_RADIUS);
    }

    #[test]
    fn test_curve_origin_offsets_contact() {
        let mut curve = flat(0.0);
        curve.origin = LogicalPoint::new(0.0, 3.0);
        let mut car = Car::new(LogicalPoint::new(1.0, 3.0 + CAR_RADIUS - 0.2));
        car.advance1d(&curve, 0.0);
        assert_eq!(car.position.y, 3.0 + CAR_RADIUS);
    }

    #[test]
    fn test_vertical_tangent_goes_non_finite() {
        struct Cliff;

        impl Func1D for Cliff {
            fn evaluate(&self, x: f64) -> f64 {
                if x < 1.0005 { 0.0 } else { f64::INFINITY }
            }

            fn describe(&self) -> String {
                "cliff".to_string()
            }
        }

        // Known boundary: an infinite slope is not defended against
        let curve = Curve::new(Rc::new(Cliff), (0.0, 2.0));
        let mut car = Car::new(LogicalPoint::new(1.0, CAR_RADIUS - 0.1));
        car.advance1d(&curve, 0.1);
        assert!(!car.velocity.is_finite());
    }

    #[test]
    fn test_rolls_down_field_gradient() {
        let field = ColorPlot::new(Rc::new(CompiledExpression::new("x^2+y^2")), (-10.0, 10.0), (-10.0, 10.0));
        let mut car = Car::new(LogicalPoint::new(-5.0, -5.0));
        car.step2d(&field, 0.0);
        assert_eq!(car.velocity, DVec2::ZERO);
        car.step2d(&field, 100.0);
        // -grad = (10, 10), dt = 0.1
        assert!((car.velocity - DVec2::new(1.0, 1.0)).length() < 1e-3);
        assert!((car.position.x - -4.9).abs() < 1e-3);
        assert!((car.position.y - -4.9).abs() < 1e-3);
    }

    #[test]
    fn test_collision_queries_delegate() {
        let car = Car::new(LogicalPoint::new(18.0, 1.0));
        assert!(car.collides_door(&Door::new(LogicalPoint::new(18.0, 0.0))));
        assert!(!car.collides_door(&Door::new(LogicalPoint::new(18.0, 1.0))));
        assert!(car.collides_office(&Office::new(LogicalPoint::new(18.5, 1.5), "H105")));
        assert!(!car.collides_office(&Office::new(LogicalPoint::new(19.0, 1.0), "H105")));
    }
}
