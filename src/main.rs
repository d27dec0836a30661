mod config;
mod pump;
mod stopwatch;
mod storage;
mod ui;

use std::io::{self, BufRead, Stdout};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Instant;

use num_traits::{FromPrimitive, ToPrimitive};

use crate::config::AppConfig;
use crate::pump::PumpTicker;
use crate::stopwatch::{KeyOutcome, StopwatchState};
use crate::storage::{FileStore, PreferenceStorage, Theme};

#[derive(Clone, Copy, PartialEq, Eq, Debug, num_derive::FromPrimitive, num_derive::ToPrimitive)]
pub enum AppOp {
    Redraw = 0,
    Key,
    Pump,
    Quit,
}

/// Scalar message posted to the event loop: an `AppOp` opcode plus one argument.
#[derive(Clone, Copy, Debug)]
pub struct Message {
    pub id: usize,
    pub arg: usize,
}

impl Message {
    pub fn new(op: AppOp, arg: usize) -> Self {
        Self {
            id: op.to_usize().unwrap_or(usize::MAX),
            arg,
        }
    }
}

struct StopwatchApp {
    stopwatch: StopwatchState<PumpTicker>,
    storage: PreferenceStorage<FileStore>,
    theme: Theme,
    clock: Instant,
    out: Stdout,
}

impl StopwatchApp {
    fn new(config: &AppConfig, ticker: PumpTicker, main: Sender<Message>) -> Self {
        let store = match FileStore::open(&config.prefs_path) {
            Ok(store) => store,
            Err(e) => {
                log::error!("{}; starting with empty preferences", e);
                FileStore::empty(&config.prefs_path)
            }
        };
        let storage = PreferenceStorage::new(store);
        let theme = storage.load_theme(config.prefers_dark);
        log::info!("theme is {} (prefs at {})", theme, storage.store().path().display());

        let mut stopwatch = StopwatchState::new(ticker, config.tick_interval_ms);
        stopwatch.timer.set_refresh_listener(move |_| {
            main.send(Message::new(AppOp::Redraw, 0)).ok();
        });

        Self {
            stopwatch,
            storage,
            theme,
            clock: Instant::now(),
            out: io::stdout(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    fn redraw(&mut self) -> io::Result<()> {
        let frame = ui::draw_stopwatch(&self.stopwatch.timer, self.theme);
        frame.write_to(&mut self.out.lock(), self.theme)
    }

    fn handle_pump(&mut self, generation: u64) {
        if generation != self.stopwatch.timer.ticker().generation() {
            log::trace!("dropping stale pump {}", generation);
            return;
        }
        let now = self.now_ms();
        self.stopwatch.timer.tick(now);
    }

    /// Returns false when the app should quit.
    fn handle_key(&mut self, key: char) -> io::Result<bool> {
        let now = self.now_ms();
        match self.stopwatch.handle_key(key, now) {
            KeyOutcome::Redraw => self.redraw()?,
            KeyOutcome::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.storage.save_theme(self.theme);
                self.redraw()?;
            }
            KeyOutcome::Quit => return Ok(false),
            KeyOutcome::Ignored => {}
        }
        Ok(true)
    }
}

fn key_thread(main: Sender<Message>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("can't read keys: {}", e);
                break;
            }
        };
        // Enter on its own toggles start/pause
        let keys: Vec<char> = if line.is_empty() { vec!['\n'] } else { line.chars().collect() };
        for key in keys {
            if main.send(Message::new(AppOp::Key, key as usize)).is_err() {
                return;
            }
        }
    }
    main.send(Message::new(AppOp::Quit, 0)).ok();
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    env_logger::Builder::new()
        .filter_level(config.log_level)
        .init();
    log::info!("stopwatch PID is {}", std::process::id());

    let (main_tx, main_rx) = mpsc::channel();
    let (ticker, pump_join) = pump::spawn(main_tx.clone());
    let mut app = StopwatchApp::new(&config, ticker, main_tx.clone());

    let key_tx = main_tx.clone();
    thread::spawn(move || key_thread(key_tx));
    drop(main_tx);

    app.redraw()?;
    while let Ok(msg) = main_rx.recv() {
        match FromPrimitive::from_usize(msg.id) {
            Some(AppOp::Redraw) => app.redraw()?,
            Some(AppOp::Key) => {
                let key = char::from_u32(msg.arg as u32).unwrap_or('\u{0000}');
                if key != '\u{0000}' && !app.handle_key(key)? {
                    break;
                }
            }
            Some(AppOp::Pump) => app.handle_pump(msg.arg as u64),
            Some(AppOp::Quit) => break,
            None => log::error!("unknown opcode: {:?}", msg),
        }
    }

    // Clean up
    let now = app.now_ms();
    app.stopwatch.timer.pause(now);
    app.stopwatch.timer.ticker().shutdown();
    if pump_join.join().is_err() {
        log::error!("pump thread panicked");
    }
    log::info!("stopped at {}", timer_core::format_duration(app.stopwatch.timer.elapsed_ms()));
    Ok(())
}
