//! Lap records and fastest/slowest classification.

/// One recorded lap. Immutable once created.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LapRecord {
    index: u32,
    cumulative_ms: u64,
    split_ms: u64,
}

impl LapRecord {
    pub(crate) fn new(index: u32, cumulative_ms: u64, split_ms: u64) -> Self {
        Self {
            index,
            cumulative_ms,
            split_ms,
        }
    }

    /// 1-based position in the lap list.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Elapsed time when the lap was recorded.
    pub fn cumulative_ms(&self) -> u64 {
        self.cumulative_ms
    }

    /// Time since the previous lap, or since the start for lap 1.
    pub fn split_ms(&self) -> u64 {
        self.split_ms
    }
}

/// Lap indices to highlight, by `LapRecord::index`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LapHighlights {
    pub fastest: Option<u32>,
    pub slowest: Option<u32>,
}

/// Find the fastest and slowest laps. Needs at least two laps; ties go to the
/// earliest lap, and a slowest lap is only reported for a non-zero split.
pub fn classify_laps(laps: &[LapRecord]) -> LapHighlights {
    if laps.len() < 2 {
        return LapHighlights::default();
    }

    let mut fastest: Option<&LapRecord> = None;
    let mut slowest: Option<&LapRecord> = None;
    for lap in laps {
        if fastest.map_or(true, |f| lap.split_ms < f.split_ms) {
            fastest = Some(lap);
        }
        if lap.split_ms > slowest.map_or(0, |s| s.split_ms) {
            slowest = Some(lap);
        }
    }

    LapHighlights {
        fastest: fastest.map(|l| l.index),
        slowest: slowest.map(|l| l.index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laps(splits: &[u64]) -> Vec<LapRecord> {
        let mut total = 0;
        splits
            .iter()
            .enumerate()
            .map(|(i, &split)| {
                total += split;
                LapRecord::new(i as u32 + 1, total, split)
            })
            .collect()
    }

    #[test]
    fn test_single_lap_has_no_highlights() {
        assert_eq!(classify_laps(&[]), LapHighlights::default());
        assert_eq!(classify_laps(&laps(&[1200])), LapHighlights::default());
    }

    #[test]
    fn test_fastest_and_slowest() {
        let h = classify_laps(&laps(&[3000, 1000, 5000, 2000]));
        assert_eq!(h.fastest, Some(2));
        assert_eq!(h.slowest, Some(3));
    }

    #[test]
    fn test_ties_pick_earliest() {
        let h = classify_laps(&laps(&[2000, 1000, 2000, 1000]));
        assert_eq!(h.fastest, Some(2));
        assert_eq!(h.slowest, Some(1));
    }

    #[test]
    fn test_all_zero_splits() {
        let h = classify_laps(&laps(&[0, 0, 0]));
        assert_eq!(h.fastest, Some(1));
        assert_eq!(h.slowest, None);
    }
}
