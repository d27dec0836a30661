use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use timer_core::Ticker;

use crate::{AppOp, Message};

enum PumpControl {
    Start { generation: u64, interval_ms: u64 },
    Stop,
    Quit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PumpHandle(u64);

/// Drives the stopwatch tick from a background thread. Each `schedule` bumps
/// the generation; `Pump` messages carry the generation that produced them.
pub struct PumpTicker {
    control: Sender<PumpControl>,
    generation: u64,
}

impl PumpTicker {
    /// Generation of the most recent schedule.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn shutdown(&self) {
        self.control.send(PumpControl::Quit).ok();
    }

    fn send(&self, msg: PumpControl) {
        if self.control.send(msg).is_err() {
            log::warn!("pump thread is gone");
        }
    }
}

impl Ticker for PumpTicker {
    type Handle = PumpHandle;

    fn schedule(&mut self, interval_ms: u64) -> PumpHandle {
        self.generation += 1;
        self.send(PumpControl::Start {
            generation: self.generation,
            interval_ms,
        });
        PumpHandle(self.generation)
    }

    fn cancel(&mut self, handle: PumpHandle) {
        // An older handle's pump was already replaced by a newer schedule.
        if handle.0 == self.generation {
            self.send(PumpControl::Stop);
        }
    }
}

pub fn spawn(main: Sender<Message>) -> (PumpTicker, JoinHandle<()>) {
    let (control, control_rx) = mpsc::channel();
    let join = thread::spawn(move || pump_thread(control_rx, main));
    (
        PumpTicker {
            control,
            generation: 0,
        },
        join,
    )
}

fn pump_thread(control: Receiver<PumpControl>, main: Sender<Message>) {
    let mut interval_ms = 10u64;
    let mut generation = 0u64;
    let mut running = false;

    loop {
        if running {
            thread::sleep(Duration::from_millis(interval_ms));
            if main.send(Message::new(AppOp::Pump, generation as usize)).is_err() {
                break;
            }
        }

        // Non-blocking when running, block-wait when stopped
        let msg = if running {
            match control.try_recv() {
                Ok(msg) => Some(msg),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            }
        } else {
            match control.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break,
            }
        };

        match msg {
            Some(PumpControl::Start {
                generation: gen,
                interval_ms: ms,
            }) => {
                generation = gen;
                interval_ms = ms.max(1);
                running = true;
            }
            Some(PumpControl::Stop) => running = false,
            Some(PumpControl::Quit) => break,
            None => {}
        }
    }
    log::debug!("pump thread exiting");
}

#[cfg(test)]
mod tests {
    use num_traits::FromPrimitive;

    use super::*;

    #[test]
    fn test_pump_delivers_current_generation() {
        let (tx, rx) = mpsc::channel();
        let (mut ticker, join) = spawn(tx);

        let first = ticker.schedule(1);
        ticker.cancel(first);
        let second = ticker.schedule(1);
        assert_eq!(second, PumpHandle(2));
        assert_eq!(ticker.generation(), 2);

        // Stale pumps from the first schedule may arrive before the restart lands.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut seen_current = false;
        while std::time::Instant::now() < deadline {
            let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(AppOp::from_usize(msg.id), Some(AppOp::Pump));
            if msg.arg == 2 {
                seen_current = true;
                break;
            }
        }
        assert!(seen_current);

        ticker.cancel(second);
        ticker.shutdown();
        join.join().unwrap();
    }

    #[test]
    fn test_stale_cancel_keeps_pump_running() {
        let (tx, rx) = mpsc::channel();
        let (mut ticker, join) = spawn(tx);

        let _current = ticker.schedule(1);
        ticker.cancel(PumpHandle(0));
        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(msg.arg, 1);

        ticker.shutdown();
        join.join().unwrap();
    }
}
