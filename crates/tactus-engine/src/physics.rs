//! The physics thread: a continuous fixed-timestep tick loop with
//! cooperative run/stop control.
//!
//! The loop owns the [`SimulationContext`] for its lifetime; control
//! crosses the thread boundary only through atomic flags, checked at
//! tick boundaries. The loop never blocks on the haptic servo — the
//! bridge publish inside `step` writes the inactive slot and flips.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::context::SimulationContext;

/// Handle to a running physics thread.
pub struct PhysicsLoop {
    handle: Option<JoinHandle<SimulationContext>>,
    running: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl PhysicsLoop {
    /// Spawns the physics thread, ticking immediately.
    ///
    /// The tick cadence is paced to the context's timestep by sleeping
    /// out the remainder of each period (a coarse but drift-free-enough
    /// scheme for a fixed-step loop; the haptic side has its own clock).
    pub fn spawn(ctx: SimulationContext) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let stop = Arc::new(AtomicBool::new(false));

        let thread_running = Arc::clone(&running);
        let thread_stop = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("tactus-physics".into())
            .spawn(move || run_loop(ctx, thread_running, thread_stop))
            .expect("spawning the physics thread is a fatal resource error");

        Self {
            handle: Some(handle),
            running,
            stop,
        }
    }

    /// Suspends ticking (the thread idles; state is preserved).
    pub fn pause(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Resumes ticking after `pause`.
    pub fn resume(&self) {
        self.running.store(true, Ordering::Release);
    }

    /// Whether the loop is currently ticking.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.stop.load(Ordering::Acquire)
    }

    /// Stops the thread cooperatively and returns the context.
    pub fn stop(mut self) -> SimulationContext {
        self.stop.store(true, Ordering::Release);
        let handle = self.handle.take().expect("stop consumes the loop once");
        match handle.join() {
            Ok(ctx) => ctx,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

impl Drop for PhysicsLoop {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(
    mut ctx: SimulationContext,
    running: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
) -> SimulationContext {
    let period = Duration::from_secs_f64(ctx.dt);
    while !stop.load(Ordering::Acquire) {
        if !running.load(Ordering::Acquire) {
            // Paused: idle without burning a core, re-check promptly.
            std::thread::sleep(Duration::from_millis(1));
            continue;
        }
        let started = std::time::Instant::now();
        ctx.step();
        if let Some(remaining) = period.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }
    ctx
}
