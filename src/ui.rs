use std::io::{self, Write};

use timer_core::{classify_laps, format_duration, pad_zero, Stopwatch, Ticker};

use crate::storage::Theme;

const CLEAR: &str = "\x1b[2J\x1b[H";
const RESET: &str = "\x1b[0m";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Style {
    Title,
    Normal,
    Dim,
    Fastest,
    Slowest,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    pub text: String,
    pub style: Style,
}

impl Line {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Default)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    fn push(&mut self, text: impl Into<String>, style: Style) {
        self.lines.push(Line::new(text, style));
    }

    #[cfg(test)]
    pub fn text(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    pub fn write_to<W: Write>(&self, out: &mut W, theme: Theme) -> io::Result<()> {
        let palette = Palette::for_theme(theme);
        write!(out, "{}{}", CLEAR, palette.base)?;
        for line in &self.lines {
            writeln!(out, "{}{}{}{}", palette.style(line.style), line.text, RESET, palette.base)?;
        }
        write!(out, "{}", RESET)?;
        out.flush()
    }
}

struct Palette {
    base: &'static str,
    title: &'static str,
    dim: &'static str,
    fastest: &'static str,
    slowest: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                base: "\x1b[97;40m",
                title: "\x1b[1;96m",
                dim: "\x1b[90m",
                fastest: "\x1b[92m",
                slowest: "\x1b[91m",
            },
            Theme::Light => Palette {
                base: "\x1b[30;107m",
                title: "\x1b[1;34m",
                dim: "\x1b[37m",
                fastest: "\x1b[32m",
                slowest: "\x1b[31m",
            },
        }
    }

    fn style(&self, style: Style) -> &'static str {
        match style {
            Style::Title => self.title,
            Style::Normal => "",
            Style::Dim => self.dim,
            Style::Fastest => self.fastest,
            Style::Slowest => self.slowest,
        }
    }
}

fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[ {} ]", label)
    } else {
        format!("( {} )", label.to_lowercase())
    }
}

pub fn draw_stopwatch<T: Ticker>(timer: &Stopwatch<T>, theme: Theme) -> Frame {
    let mut frame = Frame::default();
    frame.push(format!("STOPWATCH  ({})", theme), Style::Title);
    frame.push("", Style::Normal);

    let t = timer.current_time_components();
    frame.push(
        format!(
            "  {} : {} : {} . {}",
            pad_zero(t.hours),
            pad_zero(t.minutes.into()),
            pad_zero(t.seconds.into()),
            pad_zero(t.hundredths.into())
        ),
        Style::Normal,
    );
    frame.push("  HH   MM   SS   ff", Style::Dim);
    frame.push("", Style::Normal);

    let running = timer.is_running();
    let start_label = if running { "Pause" } else { "Start" };
    frame.push(
        format!(
            "{}  {}  {}",
            button(start_label, true),
            button("Lap", running),
            button("Reset", running || timer.elapsed_ms() > 0)
        ),
        Style::Normal,
    );

    let laps = timer.laps();
    if !laps.is_empty() {
        frame.push("", Style::Normal);
        frame.push("LAPS", Style::Title);
        let highlights = classify_laps(laps);
        // Most recent first
        for lap in laps.iter().rev() {
            let split = format_duration(lap.split_ms());
            let (style, tag) = if highlights.fastest == Some(lap.index()) {
                (Style::Fastest, "  fastest")
            } else if highlights.slowest == Some(lap.index()) {
                (Style::Slowest, "  slowest")
            } else {
                (Style::Normal, "")
            };
            frame.push(format!("Lap {:<3} {}{}", lap.index(), split, tag), style);
        }
    }

    frame.push("", Style::Normal);
    frame.push("space=start/pause  l=lap  r=reset  t=theme  q=quit", Style::Dim);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullTicker;

    impl Ticker for NullTicker {
        type Handle = ();
        fn schedule(&mut self, _interval_ms: u64) {}
        fn cancel(&mut self, _handle: ()) {}
    }

    #[test]
    fn test_fresh_frame() {
        let sw = Stopwatch::new(NullTicker);
        let frame = draw_stopwatch(&sw, Theme::Light);
        let text = frame.text();
        assert_eq!(text[0], "STOPWATCH  (light)");
        assert_eq!(text[2], "  00 : 00 : 00 . 00");
        assert_eq!(text[5], "[ Start ]  ( lap )  ( reset )");
        assert!(!text.contains(&"LAPS"));
    }

    #[test]
    fn test_running_frame_with_laps() {
        let mut sw = Stopwatch::new(NullTicker);
        sw.start(0);
        sw.lap(3_000);
        sw.lap(4_000);
        sw.lap(9_000);
        sw.tick(3_723_450);

        let frame = draw_stopwatch(&sw, Theme::Dark);
        let text = frame.text();
        assert_eq!(text[2], "  01 : 02 : 03 . 45");
        assert_eq!(text[5], "[ Pause ]  [ Lap ]  [ Reset ]");

        let laps_at = text.iter().position(|l| *l == "LAPS").unwrap();
        assert_eq!(text[laps_at + 1], "Lap 3   00:05.00  slowest");
        assert_eq!(text[laps_at + 2], "Lap 2   00:01.00  fastest");
        assert_eq!(text[laps_at + 3], "Lap 1   00:03.00");
        assert_eq!(frame.lines[laps_at + 1].style, Style::Slowest);
        assert_eq!(frame.lines[laps_at + 2].style, Style::Fastest);
    }

    #[test]
    fn test_paused_frame_enables_reset() {
        let mut sw = Stopwatch::new(NullTicker);
        sw.start(0);
        sw.pause(10);
        let frame = draw_stopwatch(&sw, Theme::Light);
        assert_eq!(frame.text()[5], "[ Start ]  ( lap )  [ Reset ]");
    }

    #[test]
    fn test_write_to() {
        let sw = Stopwatch::new(NullTicker);
        let frame = draw_stopwatch(&sw, Theme::Dark);
        let mut out = Vec::new();
        frame.write_to(&mut out, Theme::Dark).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.starts_with(CLEAR));
        assert!(written.contains("00 : 00 : 00 . 00"));
        assert!(written.ends_with(RESET));
    }
}
