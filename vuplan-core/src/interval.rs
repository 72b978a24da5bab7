use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// A normalized, non-negative duration expressed as whole hours, minutes, and
/// seconds. Carries always propagate upwards, so two intervals describing the
/// same length of time compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeInterval {
    hours: u64,
    minutes: u64,
    seconds: u64,
}

impl TimeInterval {
    pub const ZERO: TimeInterval = TimeInterval {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    #[must_use]
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self::from_secs(
            hours
                .saturating_mul(3600)
                .saturating_add(minutes.saturating_mul(60))
                .saturating_add(seconds),
        )
    }

    #[must_use]
    pub fn from_secs(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.total_seconds())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl FromStr for TimeInterval {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(Error::InvalidInterval(raw.to_string()));
        }

        let mut parts = [0u64; 3];
        let mut count = 0usize;
        for piece in s.split(':') {
            if count == 3 {
                return Err(Error::InvalidInterval(raw.to_string()));
            }
            parts[count] = component(piece, raw)?;
            count += 1;
        }

        // Right-aligned: a single component is seconds, two are mm:ss.
        let (h, m, s) = match count {
            1 => (0, 0, parts[0]),
            2 => (0, parts[0], parts[1]),
            _ => (parts[0], parts[1], parts[2]),
        };
        Ok(Self::new(h, m, s))
    }
}

fn component(piece: &str, raw: &str) -> Result<u64, Error> {
    let value: i64 = piece
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInterval(raw.to_string()))?;
    if value < 0 {
        return Err(Error::InvalidInterval(raw.to_string()));
    }
    Ok(value as u64)
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> TimeInterval {
        s.parse().unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn parses_all_accepted_forms() {
        assert_eq!(parse("01:02:03").total_seconds(), 3723);
        assert_eq!(parse("02:30").total_seconds(), 150);
        assert_eq!(parse("45").total_seconds(), 45);
        assert_eq!(parse(" 00 : 00 : 10 ").total_seconds(), 10);
    }

    #[test]
    fn normalizes_component_carry() {
        let i = TimeInterval::new(0, 0, 90);
        assert_eq!(i, TimeInterval::new(0, 1, 30));
        assert_eq!(i.to_string(), "00:01:30");
        assert_eq!(TimeInterval::from_secs(3661).to_string(), "01:01:01");
    }

    #[test]
    fn rejects_negative_and_unparsable_components() {
        for bad in ["-5", "00:-1:00", "abc", "1:2:3:4", "", "1.5"] {
            let err = bad.parse::<TimeInterval>();
            assert!(err.is_err(), "expected `{bad}` to be rejected");
        }
    }

    #[test]
    fn reparsing_display_output_round_trips() {
        let i = parse("1:2:3");
        assert_eq!(parse(&i.to_string()), i);
    }
}
