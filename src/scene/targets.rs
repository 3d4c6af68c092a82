//! Goal markers: the door that ends a level and offices to visit first

use serde::{Deserialize, Serialize};

use super::Body;
use crate::renderer::{LogicalPoint, Surface, Transform, colors};

/// Door footprint in logical units (stands on its origin)
pub const DOOR_WIDTH: f64 = 2.0;
pub const DOOR_HEIGHT: f64 = 4.0;
/// Office half-extent in logical units (centred on its origin)
pub const OFFICE_HALF_SIZE: f64 = 1.0;

/// Level exit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub origin: LogicalPoint,
    pub label: String,
}

impl Door {
    pub fn new(origin: LogicalPoint) -> Self {
        Self {
            origin,
            label: "H206".to_string(),
        }
    }
}

impl Body for Door {
    fn origin(&self) -> LogicalPoint {
        self.origin
    }

    fn render(&self, surface: &mut dyn Surface, transform: &Transform) {
        let base = transform.to_device(self.origin);
        let width = transform.to_device_size_x(DOOR_WIDTH);
        let height = transform.to_device_size_y(DOOR_HEIGHT);

        surface.set_fill_color(colors::DOOR);
        surface.fill_rect(base.with_offset(-width / 2.0, -height), width, height);
        surface.set_fill_color(colors::LABEL);
        surface.fill_text(
            &self.label,
            base.with_offset(-transform.to_device_size_x(0.7), -height / 2.0),
        );
    }
}

/// Checkpoint that must be reached before the door counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Office {
    pub origin: LogicalPoint,
    pub label: String,
    /// Set once the car overlaps the office during the current attempt
    pub reached: bool,
}

impl Office {
    pub fn new(origin: LogicalPoint, label: impl Into<String>) -> Self {
        Self {
            origin,
            label: label.into(),
            reached: false,
        }
    }
}

impl Body for Office {
    fn origin(&self) -> LogicalPoint {
        self.origin
    }

    fn render(&self, surface: &mut dyn Surface, transform: &Transform) {
        let center = transform.to_device(self.origin);
        let half_w = transform.to_device_size_x(OFFICE_HALF_SIZE);
        let half_h = transform.to_device_size_y(OFFICE_HALF_SIZE);

        surface.set_fill_color(if self.reached {
            colors::OFFICE_REACHED
        } else {
            colors::OFFICE
        });
        surface.fill_rect(center.with_offset(-half_w, -half_h), 2.0 * half_w, 2.0 * half_h);
        surface.set_fill_color(colors::LABEL);
        surface.fill_text(
            &self.label,
            center.with_offset(-half_w, transform.to_device_size_y(0.2)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DevicePoint, Recorder};

    fn transform() -> Transform {
        Transform::new(24.0, -24.0, 25.0, 250.0).unwrap()
    }

    #[test]
    fn test_door_stands_on_origin() {
        let door = Door::new(LogicalPoint::new(18.0, 0.0));
        let mut r = Recorder::new();
        door.render(&mut r, &transform());
        let rects = r.filled_rects();
        assert_eq!(rects.len(), 1);
        let (color, corner, w, h) = rects[0];
        assert_eq!(color, colors::DOOR);
        assert_eq!(corner, DevicePoint::new(25.0 + 18.0 * 24.0 - 24.0, 250.0 - 96.0));
        assert_eq!((w, h), (48.0, 96.0));
        assert_eq!(r.texts(), vec!["H206"]);
    }

    #[test]
    fn test_office_colour_follows_reached() {
        let mut office = Office::new(LogicalPoint::new(7.0, -5.0), "H105");
        let mut r = Recorder::new();
        office.render(&mut r, &transform());
        assert_eq!(r.filled_rects()[0].0, colors::OFFICE);

        office.reached = true;
        let mut r = Recorder::new();
        office.render(&mut r, &transform());
        assert_eq!(r.filled_rects()[0].0, colors::OFFICE_REACHED);
        assert_eq!(r.filled_rects()[0].2, 48.0);
    }
}
