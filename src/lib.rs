//! Curve Rider - steer a function's shape so a sliding car reaches its door
//!
//! Core modules:
//! - `vector`: Dimension-agnostic arithmetic over anything that reads as a vector
//! - `func`: One- and two-variable functions (polynomial, derivative, user formula)
//! - `renderer`: Logical/device transform and the drawing surface contract
//! - `scene`: Drawable bodies and insertion-ordered scenes
//! - `sim`: The car, levels, and the per-frame session
//! - `records`: Stored completion times per level
//! - `platform`: Browser/native platform abstraction

pub mod error;
pub mod func;
pub mod platform;
pub mod records;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod vector;

pub use error::{ExprError, FuncError, LevelError, RecordError, SessionError, SettingsError, TransformError, VectorError};
pub use records::{AttemptRecord, MemoryStore, RecordStore};
pub use settings::Settings;
pub use sim::{Car, Level, Session, SessionEvent};

/// Physics and layout constants
pub mod consts {
    use glam::DVec2;

    /// Gravity in logical units/s²
    pub const GRAVITY: DVec2 = DVec2::new(0.0, -3.0);
    /// Car disc radius in logical units
    pub const CAR_RADIUS: f64 = 0.5;

    /// Forward-difference step for `Derivative`
    pub const DERIVATIVE_STEP: f64 = 1e-5;
    /// Step used to estimate the track slope under the car
    pub const SLOPE_PROBE_STEP: f64 = 1e-3;
    /// Forward-difference step for field gradients
    pub const GRADIENT_STEP: f64 = 1e-5;

    /// Below this height a 1D attempt is over
    pub const FALL_LIMIT_Y: f64 = -12.0;

    /// Canvas edge in device pixels
    pub const CANVAS_SIZE: f64 = 750.0;
}
