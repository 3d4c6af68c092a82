//! Level descriptions: which views are live, which one drives the car, and
//! where the car, door and offices start

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::renderer::LogicalPoint;

/// Number of built-in levels
pub const BUILTIN_LEVELS: u32 = 7;

/// The view whose function moves the car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainScene {
    /// Ride the polynomial itself
    Curve1d,
    /// Ride the derivative of the polynomial
    Deriv1d,
    /// Roll down the user's scalar field
    Color2d,
}

impl MainScene {
    pub fn as_str(&self) -> &'static str {
        match self {
            MainScene::Curve1d => "curve1d",
            MainScene::Deriv1d => "deriv1d",
            MainScene::Color2d => "color2d",
        }
    }

    /// Levels driven by a curve (as opposed to a field)
    pub fn is_1d(&self) -> bool {
        !matches!(self, MainScene::Color2d)
    }
}

/// An office to visit, as written in level data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeSpec {
    pub at: LogicalPoint,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub curve1d: bool,
    pub deriv1d: bool,
    pub color2d: bool,
    pub main: MainScene,
    pub car: LogicalPoint,
    pub door: LogicalPoint,
    #[serde(default)]
    pub offices: Vec<OfficeSpec>,
}

impl Level {
    /// Check the main scene is one the level actually shows
    pub fn validate(&self) -> Result<(), LevelError> {
        let enabled = match self.main {
            MainScene::Curve1d => self.curve1d,
            MainScene::Deriv1d => self.deriv1d,
            MainScene::Color2d => self.color2d,
        };
        if enabled {
            Ok(())
        } else {
            Err(LevelError::MainSceneDisabled(self.main.as_str()))
        }
    }

    /// Parse and validate a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// One of the shipped levels, numbered from 1
    pub fn builtin(number: u32) -> Result<Self, LevelError> {
        let office = |x: f64, y: f64, label: &str| OfficeSpec {
            at: LogicalPoint::new(x, y),
            label: label.to_string(),
        };
        let ride = |main: MainScene, offices: Vec<OfficeSpec>| Level {
            curve1d: true,
            deriv1d: main == MainScene::Deriv1d,
            color2d: false,
            main,
            car: LogicalPoint::new(1.0, 5.0),
            door: LogicalPoint::new(18.0, 0.0),
            offices,
        };
        let roll = |offices: Vec<OfficeSpec>| Level {
            curve1d: false,
            deriv1d: false,
            color2d: true,
            main: MainScene::Color2d,
            car: LogicalPoint::new(-5.0, -5.0),
            door: LogicalPoint::new(0.0, 0.0),
            offices,
        };

        Ok(match number {
            1 => ride(MainScene::Curve1d, Vec::new()),
            2 => ride(MainScene::Deriv1d, Vec::new()),
            3 => ride(
                MainScene::Curve1d,
                vec![office(7.0, -5.0, "H105"), office(13.0, 0.0, "H204")],
            ),
            4 => ride(
                MainScene::Deriv1d,
                vec![office(5.0, -5.0, "H103"), office(15.0, 2.0, "H215")],
            ),
            5 => roll(Vec::new()),
            6 => roll(vec![office(5.0, -3.5, "H206")]),
            7 => roll(vec![
                office(-3.0, -3.0, "H106"),
                office(1.0, 6.0, "M101"),
                office(8.0, -7.0, "H204"),
            ]),
            other => return Err(LevelError::UnknownLevel(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        for n in 1..=BUILTIN_LEVELS {
            let level = Level::builtin(n).unwrap();
            level.validate().unwrap();
        }
        assert!(matches!(Level::builtin(0), Err(LevelError::UnknownLevel(0))));
        assert!(matches!(Level::builtin(8), Err(LevelError::UnknownLevel(8))));
    }

    #[test]
    fn test_builtin_contents() {
        let level = Level::builtin(4).unwrap();
        assert!(level.curve1d && level.deriv1d && !level.color2d);
        assert_eq!(level.main, MainScene::Deriv1d);
        assert_eq!(level.offices[1].label, "H215");

        let level = Level::builtin(7).unwrap();
        assert_eq!(level.main, MainScene::Color2d);
        assert_eq!(level.offices.len(), 3);
        assert!(!level.main.is_1d());
    }

    #[test]
    fn test_json_round_trip_and_validation() {
        let json = r#"{
            "curve1d": true, "deriv1d": false, "color2d": false,
            "main": "curve1d",
            "car": {"x": 1, "y": 5},
            "door": {"x": 18, "y": 0}
        }"#;
        let level = Level::from_json(json).unwrap();
        assert_eq!(level, Level::builtin(1).unwrap());

        let bad = json.replace(r#""main": "curve1d""#, r#""main": "color2d""#);
        assert!(matches!(
            Level::from_json(&bad),
            Err(LevelError::MainSceneDisabled("color2d"))
        ));
        assert!(matches!(Level::from_json("{"), Err(LevelError::Json(_))));
    }
}
