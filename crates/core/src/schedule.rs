//! Tick scheduling and the per-frame driver shared by every surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use tracing::info;

use crate::cycle::{AnimationCycle, TickReport};
use crate::transition::AdvanceReport;

/// Cloneable cancellation token. Once stopped, the schedule never fires again.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Fixed-delay timer: after firing, the next tick is due one period after
/// the time it actually fired.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    period_ms: f64,
    next_due_ms: f64,
    stop: StopHandle,
}

impl TickSchedule {
    /// The first tick is due one period after `start_ms`.
    pub fn new(period_ms: f64, start_ms: f64) -> Self {
        Self {
            period_ms,
            next_due_ms: start_ms + period_ms,
            stop: StopHandle::new(),
        }
    }

    /// Fires at most once per call.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.stop.is_stopped() || now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms + self.period_ms;
        true
    }

    pub fn next_due_ms(&self) -> f64 {
        self.next_due_ms
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub tick: Option<TickReport>,
    pub advanced: AdvanceReport,
}

/// Owns a cycle, its schedule and its random source.
#[derive(Debug)]
pub struct CycleDriver<R: Rng> {
    cycle: AnimationCycle,
    schedule: TickSchedule,
    rng: R,
}

impl<R: Rng> CycleDriver<R> {
    pub fn new(cycle: AnimationCycle, rng: R, start_ms: f64) -> Self {
        let period = cycle.config().cycle.period_ms as f64;
        Self {
            cycle,
            schedule: TickSchedule::new(period, start_ms),
            rng,
        }
    }

    /// Fire a tick if one is due, then step transitions to `now_ms`.
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        let tick = self
            .schedule
            .poll(now_ms)
            .then(|| self.cycle.tick(&mut self.rng, now_ms));
        let advanced = self.cycle.advance(now_ms);
        FrameReport { tick, advanced }
    }

    pub fn stop(&self) {
        if !self.schedule.stop.is_stopped() {
            info!(ticks = self.cycle.ticks(), "cycle stopped");
        }
        self.schedule.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.schedule.stop_handle()
    }

    pub fn is_stopped(&self) -> bool {
        self.schedule.stop.is_stopped()
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    pub fn cycle(&self) -> &AnimationCycle {
        &self.cycle
    }

    pub fn cycle_mut(&mut self) -> &mut AnimationCycle {
        &mut self.cycle
    }
}
