//! Pure timing logic library with no platform dependencies.
//! Testable on host; the caller supplies the clock reading on every call
//! and the repeating tick through a [`Ticker`].

mod format;
mod laps;

pub use format::{format_duration, pad_zero, TimeComponents};
pub use laps::{classify_laps, LapHighlights, LapRecord};

/// Sampling cadence while running.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Stopped,
    Running,
    Paused,
}

/// A cancellable repeating task. Each fired tick should end up in
/// [`Stopwatch::tick`].
pub trait Ticker {
    type Handle;

    fn schedule(&mut self, interval_ms: u64) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

pub struct Stopwatch<T: Ticker> {
    state: TimerState,
    // elapsed = accumulated_ms + (now - segment_start_ms) while running
    accumulated_ms: u64,
    segment_start_ms: u64,
    elapsed_ms: u64,
    last_lap_ms: u64,
    laps: Vec<LapRecord>,
    interval_ms: u64,
    ticker: T,
    tick_handle: Option<T::Handle>,
    on_refresh: Option<Box<dyn FnMut(TimeComponents)>>,
}

impl<T: Ticker> Stopwatch<T> {
    pub fn new(ticker: T) -> Self {
        Self::with_interval(ticker, DEFAULT_TICK_INTERVAL_MS)
    }

    pub fn with_interval(ticker: T, interval_ms: u64) -> Self {
        Self {
            state: TimerState::Stopped,
            accumulated_ms: 0,
            segment_start_ms: 0,
            elapsed_ms: 0,
            last_lap_ms: 0,
            laps: Vec::new(),
            interval_ms: interval_ms.max(1),
            ticker,
            tick_handle: None,
            on_refresh: None,
        }
    }

    /// Called with the current components on every tick and on reset.
    pub fn set_refresh_listener<F>(&mut self, listener: F)
    where
        F: FnMut(TimeComponents) + 'static,
    {
        self.on_refresh = Some(Box::new(listener));
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.state == TimerState::Running {
            return;
        }
        self.accumulated_ms = self.elapsed_ms;
        self.segment_start_ms = now_ms;
        self.state = TimerState::Running;
        self.stop_ticking();
        self.tick_handle = Some(self.ticker.schedule(self.interval_ms));
        log::debug!("stopwatch started at {} ms elapsed", self.elapsed_ms);
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.state != TimerState::Running {
            return;
        }
        self.sample(now_ms);
        self.stop_ticking();
        self.state = TimerState::Paused;
        log::debug!("stopwatch paused at {} ms", self.elapsed_ms);
    }

    pub fn reset(&mut self) {
        self.stop_ticking();
        self.state = TimerState::Stopped;
        self.accumulated_ms = 0;
        self.segment_start_ms = 0;
        self.elapsed_ms = 0;
        self.last_lap_ms = 0;
        self.laps.clear();
        log::debug!("stopwatch reset");
        self.notify();
    }

    /// Periodic callback body. Returns false for a stale tick that arrived
    /// after the stopwatch stopped running.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.sample(now_ms);
        self.notify();
        true
    }

    /// Record a lap and return its formatted split, or `None` when not running.
    pub fn lap(&mut self, now_ms: u64) -> Option<String> {
        if self.state != TimerState::Running {
            return None;
        }
        self.sample(now_ms);
        let split = self.elapsed_ms - self.last_lap_ms;
        let index = self.laps.len() as u32 + 1;
        self.laps.push(LapRecord::new(index, self.elapsed_ms, split));
        self.last_lap_ms = self.elapsed_ms;

        let formatted = format_duration(split);
        log::info!("lap {}: {}", index, formatted);
        Some(formatted)
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Elapsed time as of the last sample. Frozen while paused.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn last_lap_mark(&self) -> u64 {
        self.last_lap_ms
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn last_lap(&self) -> Option<&LapRecord> {
        self.laps.last()
    }

    pub fn current_time_components(&self) -> TimeComponents {
        TimeComponents::from_ms(self.elapsed_ms)
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    fn sample(&mut self, now_ms: u64) {
        let current = self.accumulated_ms + now_ms.saturating_sub(self.segment_start_ms);
        // A clock reading behind the last sample must not move time backwards.
        self.elapsed_ms = self.elapsed_ms.max(current);
    }

    fn stop_ticking(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            self.ticker.cancel(handle);
        }
    }

    fn notify(&mut self) {
        let components = self.current_time_components();
        if let Some(listener) = self.on_refresh.as_mut() {
            listener(components);
        }
    }
}

impl<T: Ticker> Drop for Stopwatch<T> {
    fn drop(&mut self) {
        self.stop_ticking();
    }
}
