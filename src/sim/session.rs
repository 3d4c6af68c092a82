//! One level being played: scenes, the learner's functions, and the attempt
//! state machine driven once per frame

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use serde::Serialize;

use super::car::Car;
use super::level::{Level, MainScene};
use crate::error::{LevelError, SessionError};
use crate::func::{CompiledExpression, Derivative, Func1D, Func2D, Polynomial};
use crate::records::{AttemptRecord, RecordStore};
use crate::renderer::Surface;
use crate::scene::{Axes, ColorPlot, Curve, Door, Office, Scene, shared};
use crate::settings::Settings;

/// Polynomial shown when a level opens
pub const DEFAULT_COEFFICIENT: f64 = 0.1;
pub const DEFAULT_ROOTS: [f64; 1] = [0.0];
/// Field formula shown when a level opens
pub const DEFAULT_FORMULA: &str = "x^2+y^2";

/// Something that happened during an `update`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The car entered an office for the first time this attempt
    OfficeReached { label: String },
    /// The car reached the door with every office visited
    Won { formula: String, time_ms: u64 },
    /// The car dropped below the fall limit (1D levels only)
    FellOff,
}

/// Where each view paints; views the level does not enable are left alone
pub struct SceneSurfaces<'a> {
    pub curve: &'a mut dyn Surface,
    pub deriv: &'a mut dyn Surface,
    pub color: &'a mut dyn Surface,
}

/// What the car moves against
enum Track {
    Curve(Rc<RefCell<Curve>>),
    Field(Rc<RefCell<ColorPlot>>),
}

pub struct Session {
    level: Level,
    number: u32,
    settings: Settings,

    polynomial: Rc<RefCell<Polynomial>>,
    expression: Rc<RefCell<CompiledExpression>>,

    curve_scene: Option<Scene>,
    deriv_scene: Option<Scene>,
    color_scene: Option<Scene>,

    track: Track,
    car: Rc<RefCell<Car>>,
    door: Rc<RefCell<Door>>,
    offices: Vec<Rc<RefCell<Office>>>,

    playing: bool,
    inputs_locked: bool,
    won: bool,
    start_ms: f64,
}

impl Session {
    /// Build the scenes `level` enables; `number` keys the attempt records
    pub fn new(level: Level, number: u32, settings: Settings) -> Result<Self, LevelError> {
        level.validate()?;

        let polynomial = Rc::new(RefCell::new(Polynomial::new(
            DEFAULT_COEFFICIENT,
            DEFAULT_ROOTS.to_vec(),
        )));
        let expression = Rc::new(RefCell::new(CompiledExpression::new(DEFAULT_FORMULA)));

        let axes1d = shared(Axes::new(settings.curve_x_range, settings.curve_y_range));
        let mut curve = None;
        let mut deriv = None;
        let mut plot = None;

        let curve_scene = level.curve1d.then(|| {
            let body = shared(
                Curve::new(Rc::new(polynomial.clone()), settings.curve_domain)
                    .with_sample_step(settings.sample_step),
            );
            let mut scene = Scene::new(settings.curve_transform);
            scene.add(axes1d.clone());
            scene.add(body.clone());
            curve = Some(body);
            scene
        });

        let deriv_scene = level.deriv1d.then(|| {
            let body = shared(
                Curve::new(
                    Rc::new(Derivative::new(polynomial.clone())),
                    settings.curve_domain,
                )
                .with_sample_step(settings.sample_step),
            );
            let mut scene = Scene::new(settings.curve_transform);
            scene.add(axes1d.clone());
            scene.add(body.clone());
            deriv = Some(body);
            scene
        });

        let color_scene = level.color2d.then(|| {
            let body = shared(
                ColorPlot::new(
                    Rc::new(expression.clone()),
                    settings.color_x_range,
                    settings.color_y_range,
                )
                .with_cell_size(settings.cell_size),
            );
            let mut scene = Scene::new(settings.color_transform);
            scene.add(body.clone());
            scene.add(shared(Axes::new(settings.color_x_range, settings.color_y_range)));
            plot = Some(body);
            scene
        });

        let disabled = || LevelError::MainSceneDisabled(level.main.as_str());
        let track = match level.main {
            MainScene::Curve1d => Track::Curve(curve.ok_or_else(disabled)?),
            MainScene::Deriv1d => Track::Curve(deriv.ok_or_else(disabled)?),
            MainScene::Color2d => Track::Field(plot.ok_or_else(disabled)?),
        };

        let door = shared(Door::new(level.door));
        let offices = level
            .offices
            .iter()
            .map(|spec| shared(Office::new(spec.at, spec.label.clone())))
            .collect();
        let car = shared(Car::new(level.car));

        let mut session = Self {
            level,
            number,
            settings,
            polynomial,
            expression,
            curve_scene,
            deriv_scene,
            color_scene,
            track,
            car,
            door,
            offices,
            playing: false,
            inputs_locked: false,
            won: false,
            start_ms: 0.0,
        };

        let door = session.door.clone();
        let offices = session.offices.clone();
        let car = session.car.clone();
        if let Some(scene) = session.main_scene_mut() {
            scene.add(door);
            for office in offices {
                scene.add(office);
            }
            scene.add(car);
        }

        info!(
            "Level {} ready (main scene: {})",
            session.number,
            session.level.main.as_str()
        );
        Ok(session)
    }

    fn main_scene_mut(&mut self) -> Option<&mut Scene> {
        match self.level.main {
            MainScene::Curve1d => self.curve_scene.as_mut(),
            MainScene::Deriv1d => self.deriv_scene.as_mut(),
            MainScene::Color2d => self.color_scene.as_mut(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn inputs_locked(&self) -> bool {
        self.inputs_locked
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn car(&self) -> Car {
        self.car.borrow().clone()
    }

    pub fn offices(&self) -> Vec<Office> {
        self.offices.iter().map(|o| o.borrow().clone()).collect()
    }

    pub fn polynomial(&self) -> Polynomial {
        self.polynomial.borrow().clone()
    }

    /// Source text of the live field formula
    pub fn formula(&self) -> String {
        self.expression.borrow().source().to_string()
    }

    /// The learner's function as stored with a win: the polynomial on 1D
    /// levels (derivative levels included), the field formula on 2D ones
    pub fn main_formula(&self) -> String {
        if self.level.main.is_1d() {
            self.polynomial.borrow().describe()
        } else {
            self.expression.borrow().describe()
        }
    }

    fn check_unlocked(&self) -> Result<(), SessionError> {
        if self.inputs_locked {
            warn!("Input ignored: attempt in progress");
            return Err(SessionError::InputLocked);
        }
        Ok(())
    }

    fn check_polynomial_input(&self, name: &'static str) -> Result<(), SessionError> {
        self.check_unlocked()?;
        if !(self.level.curve1d || self.level.deriv1d) {
            return Err(SessionError::NoSuchInput(name));
        }
        Ok(())
    }

    pub fn set_coefficient(&mut self, a: f64) -> Result<(), SessionError> {
        self.check_polynomial_input("coefficient")?;
        self.polynomial.borrow_mut().set_coefficient(a);
        debug!("Coefficient set to {a}");
        Ok(())
    }

    /// Replace the roots from comma-separated text; bad text keeps the old roots
    pub fn set_roots(&mut self, text: &str) -> Result<(), SessionError> {
        self.check_polynomial_input("roots")?;
        let roots = Polynomial::parse_roots(text).inspect_err(|e| warn!("Roots {text:?} rejected: {e}"))?;
        self.polynomial.borrow_mut().set_roots(roots);
        debug!("Roots set to {text:?}");
        Ok(())
    }

    /// Replace the field formula; bad text keeps the old formula
    pub fn set_formula(&mut self, text: &str) -> Result<(), SessionError> {
        self.check_unlocked()?;
        if !self.level.color2d {
            return Err(SessionError::NoSuchInput("formula"));
        }
        self.expression
            .borrow_mut()
            .recompile(text)
            .inspect_err(|e| warn!("Formula {text:?} rejected: {e}"))?;
        Ok(())
    }

    fn reset_offices(&mut self) {
        for office in &self.offices {
            office.borrow_mut().reached = false;
        }
    }

    /// Put a fresh car at the level start, on top of the main scene
    fn replace_car(&mut self) {
        let old = self.car.clone();
        let car = shared(Car::new(self.level.car));
        if let Some(scene) = self.main_scene_mut() {
            scene.remove(&old);
            scene.add(car.clone());
        }
        self.car = car;
    }

    /// Start an attempt at host time `now_ms`
    pub fn play(&mut self, now_ms: f64) {
        self.reset_offices();
        self.replace_car();
        self.playing = true;
        self.won = false;
        self.start_ms = now_ms;
        self.inputs_locked = true;
        info!("Level {}: attempt started with {}", self.number, self.main_formula());
    }

    /// Abort a running attempt, or reset a finished one
    pub fn stop(&mut self) {
        if !self.playing {
            self.reset_offices();
            self.replace_car();
            self.won = false;
        }
        self.playing = false;
        self.inputs_locked = false;
    }

    /// Advance one frame to host time `now_ms`
    pub fn update(&mut self, now_ms: f64, store: &mut dyn RecordStore) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if !self.playing {
            return events;
        }

        match &self.track {
            Track::Curve(curve) => self.car.borrow_mut().step1d(&curve.borrow(), now_ms),
            Track::Field(plot) => self.car.borrow_mut().step2d(&plot.borrow(), now_ms),
        }
        let car = self.car.borrow().clone();

        for office in &self.offices {
            let mut office = office.borrow_mut();
            if !office.reached && car.collides_office(&office) {
                office.reached = true;
                debug!("Office {} reached", office.label);
                events.push(SessionEvent::OfficeReached {
                    label: office.label.clone(),
                });
            }
        }

        let all_reached = self.offices.iter().all(|o| o.borrow().reached);
        if all_reached && car.collides_door(&self.door.borrow()) {
            let formula = self.main_formula();
            let time_ms = (now_ms - self.start_ms).max(0.0).round() as u64;
            self.playing = false;
            self.inputs_locked = true;
            self.won = true;
            self.save_win(store, &formula, time_ms);
            info!("Level {} won in {time_ms} ms with {formula}", self.number);
            events.push(SessionEvent::Won { formula, time_ms });
        } else if self.level.main.is_1d() && car.position.y < self.settings.fall_limit {
            self.playing = false;
            self.inputs_locked = false;
            info!("Level {}: car fell off at x = {:.2}", self.number, car.position.x);
            events.push(SessionEvent::FellOff);
        }

        events
    }

    fn save_win(&self, store: &mut dyn RecordStore, formula: &str, time_ms: u64) {
        let mut record = self.record(store);
        record.record(formula, time_ms);
        record.save(store, self.number);
    }

    /// This level's stored wins; a corrupt record reads as empty
    pub fn record(&self, store: &dyn RecordStore) -> AttemptRecord {
        AttemptRecord::load(store, self.number).unwrap_or_else(|e| {
            warn!("Level {} record unreadable, starting fresh: {e}", self.number);
            AttemptRecord::new()
        })
    }

    /// Paint every enabled view into its surface
    pub fn render(&self, surfaces: &mut SceneSurfaces<'_>) {
        if let Some(scene) = &self.curve_scene {
            scene.render_all(surfaces.curve);
        }
        if let Some(scene) = &self.deriv_scene {
            scene.render_all(surfaces.deriv);
        }
        if let Some(scene) = &self.color_scene {
            scene.render_all(surfaces.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExprError, FuncError};
    use crate::records::MemoryStore;
    use crate::renderer::{LogicalPoint, Recorder, colors};
    use crate::sim::level::OfficeSpec;

    fn level_with(main: MainScene, car: (f64, f64), door: (f64, f64)) -> Level {
        Level {
            curve1d: main != MainScene::Color2d,
            deriv1d: main == MainScene::Deriv1d,
            color2d: main == MainScene::Color2d,
            main,
            car: LogicalPoint::new(car.0, car.1),
            door: LogicalPoint::new(door.0, door.1),
            offices: Vec::new(),
        }
    }

    fn session(level: Level) -> Session {
        Session::new(level, 1, Settings::default()).unwrap()
    }

    #[test]
    fn test_defaults_and_scene_layout() {
        let s = session(Level::builtin(2).unwrap());
        assert_eq!(s.polynomial().describe(), "0.1(x-0)");
        assert_eq!(s.main_formula(), "0.1(x-0)");
        assert_eq!(s.car().position, LogicalPoint::new(1.0, 5.0));

        let (mut curve, mut deriv, mut color) = (Recorder::new(), Recorder::new(), Recorder::new());
        s.render(&mut SceneSurfaces {
            curve: &mut curve,
            deriv: &mut deriv,
            color: &mut color,
        });
        // Door only in the main (derivative) scene
        assert!(curve.filled_rects().iter().all(|r| r.0 != colors::DOOR));
        assert!(deriv.filled_rects().iter().any(|r| r.0 == colors::DOOR));
        assert!(color.commands.is_empty());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut level = Level::builtin(1).unwrap();
        level.main = MainScene::Color2d;
        assert!(matches!(
            Session::new(level, 1, Settings::default()),
            Err(LevelError::MainSceneDisabled("color2d"))
        ));
    }

    #[test]
    fn test_inputs_lock_while_playing() {
        let mut s = session(Level::builtin(1).unwrap());
        s.set_coefficient(0.5).unwrap();
        s.set_roots("0, 5").unwrap();
        assert_eq!(s.polynomial().describe(), "0.5(x-0)(x-5)");

        s.play(0.0);
        assert!(s.is_playing() && s.inputs_locked());
        assert_eq!(s.set_coefficient(1.0), Err(SessionError::InputLocked));
        assert_eq!(s.set_roots("1"), Err(SessionError::InputLocked));

        s.stop();
        assert!(!s.is_playing() && !s.inputs_locked());
        s.set_coefficient(1.0).unwrap();
    }

    #[test]
    fn test_rejected_input_keeps_previous_state() {
        let mut s = session(Level::builtin(1).unwrap());
        assert_eq!(
            s.set_roots("0, five"),
            Err(SessionError::Func(FuncError::InvalidRoot("five".to_string())))
        );
        assert_eq!(s.polynomial().roots, vec![0.0]);
        assert_eq!(s.set_formula("x"), Err(SessionError::NoSuchInput("formula")));

        let mut s = session(Level::builtin(5).unwrap());
        assert!(matches!(
            s.set_formula("x +* y"),
            Err(SessionError::Expr(ExprError::UnexpectedToken(_)))
        ));
        assert_eq!(s.formula(), DEFAULT_FORMULA);
        assert_eq!(s.set_coefficient(1.0), Err(SessionError::NoSuchInput("coefficient")));
        s.set_formula("x+y").unwrap();
        assert_eq!(s.main_formula(), "x+y");
    }

    #[test]
    fn test_win_saves_record_and_locks() {
        let mut store = MemoryStore::new();
        let mut s = session(level_with(MainScene::Curve1d, (18.0, 2.0), (18.0, 0.0)));

        s.play(1000.0);
        let events = s.update(1500.0, &mut store);
        assert_eq!(events, vec![SessionEvent::Won {
            formula: "0.1(x-0)".to_string(),
            time_ms: 500,
        }]);
        assert!(s.is_won() && !s.is_playing() && s.inputs_locked());
        assert_eq!(store.get("s1").as_deref(), Some("0.1(x-0)"));
        assert_eq!(store.get("t1").as_deref(), Some("500"));
        assert_eq!(s.set_coefficient(2.0), Err(SessionError::InputLocked));

        // Further frames do nothing until reset
        assert!(s.update(2000.0, &mut store).is_empty());

        s.stop();
        assert!(!s.is_won() && !s.inputs_locked());
        assert_eq!(s.car().position, LogicalPoint::new(18.0, 2.0));
        assert!(!s.car().is_running());

        // A faster win with the same formula replaces the old time
        s.play(0.0);
        s.update(200.0, &mut store);
        assert_eq!(store.get("t1").as_deref(), Some("200"));
        assert_eq!(s.record(&store).entries.len(), 1);
    }

    #[test]
    fn test_derivative_win_is_keyed_by_polynomial() {
        let mut store = MemoryStore::new();
        let level = level_with(MainScene::Deriv1d, (18.0, 2.0), (18.0, 0.0));
        let mut s = Session::new(level, 2, Settings::default()).unwrap();
        s.set_roots("0, 5").unwrap();
        s.play(0.0);
        assert_eq!(s.update(40.0, &mut store), vec![SessionEvent::Won {
            formula: "0.1(x-0)(x-5)".to_string(),
            time_ms: 40,
        }]);
        assert_eq!(store.get("s2").as_deref(), Some("0.1(x-0)(x-5)"));
    }

    #[test]
    fn test_idle_frames_do_nothing() {
        let mut store = MemoryStore::new();
        let mut level = level_with(MainScene::Curve1d, (18.0, 2.0), (18.0, 0.0));
        level.offices.push(OfficeSpec {
            at: LogicalPoint::new(18.0, 2.0),
            label: "H105".to_string(),
        });
        let mut s = session(level);
        assert!(s.update(0.0, &mut store).is_empty());
        assert!(s.update(500.0, &mut store).is_empty());
        assert!(!s.offices()[0].reached);
        assert!(!s.car().is_running());
        assert!(store.get("s1").is_none());
    }

    #[test]
    fn test_offices_gate_the_door() {
        let mut store = MemoryStore::new();
        let mut level = level_with(MainScene::Curve1d, (18.0, 2.0), (18.0, 0.0));
        level.offices.push(OfficeSpec {
            at: LogicalPoint::new(5.0, 5.0),
            label: "H105".to_string(),
        });
        let mut s = session(level.clone());
        s.play(0.0);
        assert!(s.update(16.0, &mut store).is_empty());
        assert!(s.is_playing());
        assert!(store.get("s1").is_none());

        level.offices[0].at = LogicalPoint::new(18.0, 2.5);
        let mut s = session(level);
        s.play(0.0);
        assert_eq!(s.update(16.0, &mut store), vec![
            SessionEvent::OfficeReached {
                label: "H105".to_string(),
            },
            SessionEvent::Won {
                formula: "0.1(x-0)".to_string(),
                time_ms: 16,
            },
        ]);
        assert!(s.offices()[0].reached);

        // Replaying clears the visit
        s.stop();
        assert!(!s.offices()[0].reached);
    }

    #[test]
    fn test_falling_off_ends_attempt() {
        let mut store = MemoryStore::new();
        let mut s = session(level_with(MainScene::Curve1d, (1.0, -11.9), (18.0, 0.0)));
        s.set_coefficient(0.0).unwrap();
        s.play(0.0);
        assert!(s.update(0.0, &mut store).is_empty());
        assert_eq!(s.update(1000.0, &mut store), vec![SessionEvent::FellOff]);
        assert!(!s.is_playing() && !s.inputs_locked() && !s.is_won());

        // Stop after a fall puts the car back at the start
        s.stop();
        assert_eq!(s.car().position, LogicalPoint::new(1.0, -11.9));
    }

    #[test]
    fn test_fields_have_no_fall_limit() {
        let mut store = MemoryStore::new();
        let mut s = session(level_with(MainScene::Color2d, (5.0, -13.0), (0.0, 0.0)));
        s.set_formula("0").unwrap();
        s.play(0.0);
        s.update(0.0, &mut store);
        assert!(s.update(1000.0, &mut store).is_empty());
        assert!(s.is_playing());
    }

    #[test]
    fn test_car_rolls_into_door_on_bowl() {
        let mut store = MemoryStore::new();
        let mut s = session(Level::builtin(5).unwrap());
        s.play(0.0);

        let mut won = None;
        for frame in 0..300 {
            let events = s.update(frame as f64 * 1000.0 / 60.0, &mut store);
            if let Some(SessionEvent::Won { formula, time_ms }) = events.into_iter().next() {
                won = Some((formula, time_ms));
                break;
            }
        }
        let (formula, time_ms) = won.expect("car should reach the door");
        assert_eq!(formula, DEFAULT_FORMULA);
        assert!(time_ms > 0 && time_ms < 5000);
    }
}
