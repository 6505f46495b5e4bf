//! Background frame driver
//!
//! Ticks a [`Session`] once per frame interval on its own thread. The
//! interval only paces the loop; each tick still advances one nominal frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::Rng;
use rand_pcg::Pcg32;

use crate::sim::{FlapSignal, Session, SessionPhase, Snapshot, TickOutcome};

/// Nominal frame interval (~60 Hz)
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct Shared<R> {
    session: Mutex<Session<R>>,
    cancelled: AtomicBool,
    finished: AtomicBool,
}

impl<R> Shared<R> {
    fn lock(&self) -> MutexGuard<'_, Session<R>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs the tick loop until the session ends or the driver is cancelled
pub struct FrameDriver<R = Pcg32> {
    shared: Arc<Shared<R>>,
    flap: FlapSignal,
    thread: Option<JoinHandle<()>>,
}

impl<R: Rng + Send + 'static> FrameDriver<R> {
    /// Start ticking `session` every `frame_interval`.
    ///
    /// The session is started first if it is not already running.
    pub fn spawn(mut session: Session<R>, frame_interval: Duration) -> Self {
        if session.phase() != SessionPhase::Running {
            session.start();
        }
        let flap = session.flap_signal();
        let shared = Arc::new(Shared {
            session: Mutex::new(session),
            cancelled: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        });

        let worker = Arc::clone(&shared);
        let thread = thread::spawn(move || run_loop(&worker, frame_interval));

        Self {
            shared,
            flap,
            thread: Some(thread),
        }
    }
}

impl<R: Rng> FrameDriver<R> {
    /// Request a flap for the next tick. Never blocks.
    pub fn flap(&self) {
        self.flap.raise();
    }

    pub fn snapshot(&self) -> Snapshot {
        self.shared.lock().snapshot()
    }

    /// True once the loop has exited
    pub fn is_finished(&self) -> bool {
        self.shared.finished.load(Ordering::Acquire)
    }

    /// Stop ticking. Once this returns no further tick touches the session.
    pub fn cancel(&self) {
        let _session = self.shared.lock();
        self.shared.cancelled.store(true, Ordering::Release);
    }

    /// Wait for the loop to exit and take the session back.
    ///
    /// `None` only if the worker still holds a reference after being joined.
    pub fn join(mut self) -> Option<Session<R>> {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Frame driver thread panicked");
            }
        }

        let shared = Arc::clone(&self.shared);
        drop(self);

        Arc::into_inner(shared).map(|shared| {
            shared
                .session
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner)
        })
    }
}

impl<R> Drop for FrameDriver<R> {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.shared.cancelled.store(true, Ordering::Release);
            let _ = thread.join();
        }
    }
}

fn run_loop<R: Rng>(shared: &Shared<R>, frame_interval: Duration) {
    let mut next_frame = Instant::now();

    loop {
        let outcome = {
            let mut session = shared.lock();
            if shared.cancelled.load(Ordering::Acquire) {
                log::info!("Frame driver cancelled at tick {}", session.tick_count());
                break;
            }
            session.tick()
        };

        match outcome {
            TickOutcome::Continued => {}
            TickOutcome::Ended { .. } | TickOutcome::Idle => break,
        }

        next_frame += frame_interval;
        let now = Instant::now();
        if next_frame > now {
            thread::sleep(next_frame - now);
        } else {
            // Running behind; don't try to catch up
            next_frame = now;
        }
    }

    shared.finished.store(true, Ordering::Release);
}
