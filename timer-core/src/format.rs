//! Duration decomposition and display formatting.

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// A duration split into display units. Hours are unbounded.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TimeComponents {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
    pub hundredths: u8,
}

impl TimeComponents {
    pub fn from_ms(ms: u64) -> Self {
        Self {
            hours: ms / MS_PER_HOUR,
            minutes: ((ms / MS_PER_MINUTE) % 60) as u8,
            seconds: ((ms / MS_PER_SECOND) % 60) as u8,
            hundredths: ((ms % MS_PER_SECOND) / 10) as u8,
        }
    }
}

/// Left-pad with zeros to at least two digits. Never drops digits.
pub fn pad_zero(value: u64) -> String {
    format!("{:02}", value)
}

/// Format milliseconds as "MM:SS.ff", with an "HH:" prefix once hours are non-zero.
pub fn format_duration(ms: u64) -> String {
    let t = TimeComponents::from_ms(ms);
    let hours = if t.hours > 0 {
        format!("{}:", pad_zero(t.hours))
    } else {
        String::new()
    };
    format!(
        "{}{}:{}.{}",
        hours,
        pad_zero(t.minutes.into()),
        pad_zero(t.seconds.into()),
        pad_zero(t.hundredths.into())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        assert_eq!(TimeComponents::from_ms(0), TimeComponents::default());
        let t = TimeComponents::from_ms(3_723_456);
        assert_eq!(t.hours, 1);
        assert_eq!(t.minutes, 2);
        assert_eq!(t.seconds, 3);
        assert_eq!(t.hundredths, 45);
    }

    #[test]
    fn test_hours_do_not_wrap() {
        let t = TimeComponents::from_ms(25 * MS_PER_HOUR + 5);
        assert_eq!(t.hours, 25);
        assert_eq!(t.hundredths, 0);
        assert_eq!(format_duration(125 * MS_PER_HOUR), "125:00:00.00");
    }

    #[test]
    fn test_pad_zero() {
        assert_eq!(pad_zero(0), "00");
        assert_eq!(pad_zero(7), "07");
        assert_eq!(pad_zero(42), "42");
        assert_eq!(pad_zero(100), "100");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00.00");
        assert_eq!(format_duration(9), "00:00.00");
        assert_eq!(format_duration(1_500), "00:01.50");
        assert_eq!(format_duration(59_990), "00:59.99");
        assert_eq!(format_duration(60_000), "01:00.00");
        assert_eq!(format_duration(3_599_999), "59:59.99");
        assert_eq!(format_duration(3_661_000), "01:01:01.00");
    }
}
