//! Flappy Fun headless demo
//!
//! Runs one session on the native frame driver with the autopilot flapping
//! from the main thread, then logs the result.
//!
//! Usage: `flappy-fun [CONFIG.json] [--seconds N]`

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};

use flappy_fun::platform::driver::{DEFAULT_FRAME_INTERVAL, FrameDriver};
use flappy_fun::sim::{EventRecorder, GameEvent, Session, SessionPhase, autopilot};
use flappy_fun::tuning::GameConfig;

struct Args {
    config: Option<String>,
    seconds: u64,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        seconds: 30,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seconds" => {
                let value = iter.next().context("--seconds needs a value")?;
                args.seconds = value
                    .parse()
                    .with_context(|| format!("invalid --seconds value: {value}"))?;
            }
            flag if flag.starts_with("--") => bail!("unknown flag: {flag}"),
            path => args.config = Some(path.to_string()),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => GameConfig::default(),
    };
    let mut session = Session::new(config.clone()).context("invalid game configuration")?;
    let recorder = EventRecorder::new();
    session.add_observer(Box::new(recorder.clone()));

    log::info!("Flappy Fun (headless) starting, limit {}s", args.seconds);
    let driver = FrameDriver::spawn(session, DEFAULT_FRAME_INTERVAL);
    let deadline = Instant::now() + Duration::from_secs(args.seconds);

    while !driver.is_finished() && Instant::now() < deadline {
        if autopilot::should_flap(&driver.snapshot(), &config) {
            driver.flap();
        }
        for event in recorder.drain() {
            match event {
                GameEvent::ScoreChanged(score) => log::debug!("Score: {}", score),
                GameEvent::LevelChanged(level) => log::info!("Reached level {}", level),
                GameEvent::SessionEnded { .. } => {}
            }
        }
        std::thread::sleep(DEFAULT_FRAME_INTERVAL / 2);
    }

    driver.cancel();
    let session = driver
        .join()
        .context("frame driver did not hand back the session")?;

    match session.phase() {
        SessionPhase::Ended => log::info!(
            "Game over: score {} at level {}",
            session.score(),
            session.level()
        ),
        _ => log::info!(
            "Time limit reached: score {} at level {} after {} ticks",
            session.score(),
            session.level(),
            session.tick_count()
        ),
    }
    println!("score={} level={}", session.score(), session.level());

    Ok(())
}
