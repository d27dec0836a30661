use timer_core::{Stopwatch, Ticker};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyOutcome {
    Redraw,
    ToggleTheme,
    Quit,
    Ignored,
}

pub struct StopwatchState<T: Ticker> {
    pub timer: Stopwatch<T>,
}

impl<T: Ticker> StopwatchState<T> {
    pub fn new(ticker: T, interval_ms: u64) -> Self {
        Self {
            timer: Stopwatch::with_interval(ticker, interval_ms),
        }
    }

    /// Apply one key press. Lap only counts while running, reset only while not.
    pub fn handle_key(&mut self, key: char, now_ms: u64) -> KeyOutcome {
        match key {
            ' ' | '\r' | '\n' => {
                if self.timer.is_running() {
                    self.timer.pause(now_ms);
                } else {
                    self.timer.start(now_ms);
                }
                KeyOutcome::Redraw
            }
            'l' | 'L' => match self.timer.lap(now_ms) {
                Some(_) => KeyOutcome::Redraw,
                None => KeyOutcome::Ignored,
            },
            'r' | 'R' => {
                if self.timer.is_running() {
                    return KeyOutcome::Ignored;
                }
                self.timer.reset();
                KeyOutcome::Redraw
            }
            't' | 'T' => KeyOutcome::ToggleTheme,
            'q' | 'Q' => {
                self.timer.pause(now_ms);
                KeyOutcome::Quit
            }
            _ => KeyOutcome::Ignored,
        }
    }
}
