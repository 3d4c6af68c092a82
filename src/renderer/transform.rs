//! Logical <-> device coordinate mapping

use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::vector::{self, Euclidean};

/// Position in simulation space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

impl LogicalPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point moved by a two-component vector
    ///
    /// # Panics
    /// If `v` is not two-dimensional.
    pub fn translated<V: Euclidean + ?Sized>(self, v: &V) -> Self {
        let sum = vector::add(&self, v);
        Self::new(sum[0], sum[1])
    }
}

impl From<[f64; 2]> for LogicalPoint {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Position in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

impl DevicePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn with_offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Affine per-axis mapping from logical to device space
///
/// A negative `y_scale` flips the y axis so logical "up" is screen "up".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Device units per logical unit along x
    pub x_scale: f64,
    /// Device units per logical unit along y
    pub y_scale: f64,
    /// Device x where logical x = 0
    pub x_offset: f64,
    /// Device y where logical y = 0
    pub y_offset: f64,
}

impl Transform {
    pub fn new(x_scale: f64, y_scale: f64, x_offset: f64, y_offset: f64) -> Result<Self, TransformError> {
        if x_scale == 0.0 || y_scale == 0.0 {
            return Err(TransformError::ZeroScale { x_scale, y_scale });
        }
        Ok(Self {
            x_scale,
            y_scale,
            x_offset,
            y_offset,
        })
    }

    pub fn to_device(&self, p: LogicalPoint) -> DevicePoint {
        DevicePoint::new(p.x * self.x_scale + self.x_offset, p.y * self.y_scale + self.y_offset)
    }

    pub fn to_logical(&self, p: DevicePoint) -> LogicalPoint {
        LogicalPoint::new((p.x - self.x_offset) / self.x_scale, (p.y - self.y_offset) / self.y_scale)
    }

    /// Unsigned device width of a logical length
    pub fn to_device_size_x(&self, dx: f64) -> f64 {
        (self.x_scale * dx).abs()
    }

    /// Unsigned device height of a logical length
    pub fn to_device_size_y(&self, dy: f64) -> f64 {
        (self.y_scale * dy).abs()
    }
}
