//! Simulation: the car, its static collision tests, levels and the session
//!
//! Nothing in here touches the platform. Time enters as host timestamps
//! (`step*`, `update`) or as explicit `dt` (`advance*`).

pub mod car;
pub mod collision;
pub mod level;
pub mod session;

pub use car::Car;
pub use collision::{disc_overlaps_curve, point_in_door, point_in_office};
pub use level::{BUILTIN_LEVELS, Level, MainScene, OfficeSpec};
pub use session::{SceneSurfaces, Session, SessionEvent};
