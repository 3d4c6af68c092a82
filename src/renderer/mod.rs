//! Rendering boundary
//!
//! Bodies draw through a `Transform` onto anything implementing `Surface`.
//! The physics never touches this module.

pub mod surface;
pub mod transform;

pub use surface::{Color, DrawCommand, Recorder, Surface, colors};
pub use transform::{DevicePoint, LogicalPoint, Transform};
