//! View and physics settings
//!
//! Persisted separately from attempt records in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_SIZE, FALL_LIMIT_Y};
use crate::error::SettingsError;
use crate::renderer::Transform;
use crate::scene::{color_plot::CELL_SIZE, curve::SAMPLE_STEP};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Edge length of each square canvas, in device pixels
    pub canvas_size: f64,

    // === 1D views ===
    /// Shared by the curve and derivative canvases
    pub curve_transform: Transform,
    /// x interval the curves are drawn over
    pub curve_domain: (f64, f64),
    pub curve_x_range: (f64, f64),
    pub curve_y_range: (f64, f64),
    pub sample_step: f64,

    // === 2D view ===
    pub color_transform: Transform,
    pub color_x_range: (f64, f64),
    pub color_y_range: (f64, f64),
    pub cell_size: f64,

    /// A 1D attempt ends once the car drops below this height
    pub fall_limit: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,

            curve_transform: Transform {
                x_scale: 24.0,
                y_scale: -24.0,
                x_offset: 25.0,
                y_offset: 250.0,
            },
            curve_domain: (0.0, 20.0),
            curve_x_range: (0.0, 20.0),
            curve_y_range: (-10.0, 10.0),
            sample_step: SAMPLE_STEP,

            color_transform: Transform {
                x_scale: 24.0,
                y_scale: -24.0,
                x_offset: 250.0,
                y_offset: 250.0,
            },
            color_x_range: (-10.0, 10.0),
            color_y_range: (-10.0, 10.0),
            cell_size: CELL_SIZE,

            fall_limit: FALL_LIMIT_Y,
        }
    }
}

impl Settings {
    /// Reject values the renderers cannot draw with
    ///
    /// Transforms are re-checked since serde fills them in without
    /// `Transform::new`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for t in [&self.curve_transform, &self.color_transform] {
            Transform::new(t.x_scale, t.y_scale, t.x_offset, t.y_offset)?;
        }
        for (name, value) in [("sample_step", self.sample_step), ("cell_size", self.cell_size)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::InvalidStep { name, value });
            }
        }
        for (name, (start, end)) in [
            ("curve_domain", self.curve_domain),
            ("curve_x_range", self.curve_x_range),
            ("curve_y_range", self.curve_y_range),
            ("color_x_range", self.color_x_range),
            ("color_y_range", self.color_y_range),
        ] {
            if !(start.is_finite() && end.is_finite() && start <= end) {
                return Err(SettingsError::InvalidRange { name, start, end });
            }
        }
        Ok(())
    }

    /// Parse settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "curve_rider_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Stored settings ignored: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
