//! Curve Rider entry point
//!
//! Natively this is a headless runner: it plays one level with the given
//! function, feeding synthetic frame timestamps, and logs the outcome. The
//! browser build is driven through `platform::web::WebSession` instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use curve_rider::platform;
    use curve_rider::renderer::Recorder;
    use curve_rider::sim::{BUILTIN_LEVELS, Level, SceneSurfaces, Session, SessionEvent};
    use curve_rider::{MemoryStore, Settings};

    #[derive(Debug, Parser)]
    #[command(name = "curve-rider", about = "Play a Curve Rider level headlessly")]
    struct Args {
        /// Built-in level number
        #[arg(long, default_value_t = 1)]
        level: u32,
        /// Leading polynomial coefficient (1D levels)
        #[arg(long)]
        coefficient: Option<f64>,
        /// Comma-separated polynomial roots (1D levels)
        #[arg(long)]
        roots: Option<String>,
        /// Field formula in x and y (2D levels)
        #[arg(long)]
        formula: Option<String>,
        /// Simulated frames per second
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Give up after this much simulated time
        #[arg(long, default_value_t = 30.0)]
        max_seconds: f64,
    }

    pub fn run() -> Result<()> {
        platform::init_logging();
        let args = Args::parse();

        if !(1..=BUILTIN_LEVELS).contains(&args.level) {
            bail!("level must be between 1 and {BUILTIN_LEVELS}");
        }
        if args.fps.is_nan() || args.fps <= 0.0 {
            bail!("fps must be positive");
        }

        let level = Level::builtin(args.level)?;
        let mut session = Session::new(level, args.level, Settings::load())?;
        if let Some(a) = args.coefficient {
            session.set_coefficient(a).context("setting coefficient")?;
        }
        if let Some(roots) = &args.roots {
            session.set_roots(roots).context("setting roots")?;
        }
        if let Some(formula) = &args.formula {
            session.set_formula(formula).context("setting formula")?;
        }

        let mut store = MemoryStore::new();
        let (mut curve, mut deriv, mut color) = (Recorder::new(), Recorder::new(), Recorder::new());
        let frame_ms = 1000.0 / args.fps;
        let frames = (args.max_seconds * args.fps).ceil() as u64;

        session.play(0.0);
        let mut outcome = None;
        for frame in 0..=frames {
            for event in session.update(frame as f64 * frame_ms, &mut store) {
                match event {
                    SessionEvent::OfficeReached { label } => log::info!("Reached office {label}"),
                    SessionEvent::Won { .. } | SessionEvent::FellOff => outcome = Some(event),
                }
            }
            session.render(&mut SceneSurfaces {
                curve: &mut curve,
                deriv: &mut deriv,
                color: &mut color,
            });
            if outcome.is_some() {
                break;
            }
        }

        let car = session.car();
        match outcome {
            Some(SessionEvent::Won { formula, time_ms }) => {
                log::info!("Won level {} with {formula} in {time_ms} ms", args.level);
            }
            Some(SessionEvent::FellOff) => {
                log::info!("Car fell off at ({:.2}, {:.2})", car.position.x, car.position.y);
            }
            _ => {
                log::info!(
                    "No result after {} s, car at ({:.2}, {:.2})",
                    args.max_seconds,
                    car.position.x,
                    car.position.y
                );
            }
        }

        let record = session.record(&store);
        for entry in &record.entries {
            log::info!("Record: {} -> {} ms", entry.formula, entry.time_ms);
        }
        log::debug!(
            "Last frame: {} curve, {} derivative, {} colour commands",
            curve.commands.len(),
            deriv.commands.len(),
            color.commands.len()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
