//! Relative time windows such as `5m`.

use crate::error::FilterError;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    fn suffix(&self) -> char {
        match self {
            TimeUnit::Seconds => 's',
            TimeUnit::Minutes => 'm',
            TimeUnit::Hours => 'h',
        }
    }
}

/// How far back from "now" a record may start and still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub value: u32,
    pub unit: TimeUnit,
}

impl TimeWindow {
    pub fn new(value: u32, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    /// Parse shorthand like `5s`, `2m` or `1h`.
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        let normalized = input.trim().to_ascii_lowercase();
        let invalid = || FilterError::InvalidTimeWindow(input.to_string());

        let unit = match normalized.chars().last() {
            Some('s') => TimeUnit::Seconds,
            Some('m') => TimeUnit::Minutes,
            Some('h') => TimeUnit::Hours,
            _ => return Err(invalid()),
        };

        let digits = &normalized[..normalized.len() - 1];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value = digits.parse().map_err(|_| invalid())?;

        // Reject spans that reach past the earliest representable instant.
        let window = Self { value, unit };
        window
            .to_delta()
            .and_then(|delta| DateTime::<Utc>::UNIX_EPOCH.checked_sub_signed(delta))
            .ok_or_else(invalid)?;

        Ok(window)
    }

    /// The window as a duration, `None` if it overflows `TimeDelta`.
    pub fn to_delta(&self) -> Option<TimeDelta> {
        let value = i64::from(self.value);
        match self.unit {
            TimeUnit::Seconds => TimeDelta::try_seconds(value),
            TimeUnit::Minutes => TimeDelta::try_minutes(value),
            TimeUnit::Hours => TimeDelta::try_hours(value),
        }
    }

    /// Earliest start that still falls inside the window.
    ///
    /// Saturates at the minimum representable instant.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.to_delta()
            .and_then(|delta| now.checked_sub_signed(delta))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl FromStr for TimeWindow {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(
            TimeWindow::parse("5s").unwrap(),
            TimeWindow::new(5, TimeUnit::Seconds)
        );
        assert_eq!(
            TimeWindow::parse("2m").unwrap(),
            TimeWindow::new(2, TimeUnit::Minutes)
        );
        assert_eq!(
            TimeWindow::parse(" 1H ").unwrap(),
            TimeWindow::new(1, TimeUnit::Hours)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "5", "m", "5d", "abc", "-5m", "5 m", "1.5h"] {
            assert!(TimeWindow::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_to_delta() {
        assert_eq!(
            TimeWindow::new(90, TimeUnit::Seconds).to_delta(),
            Some(TimeDelta::seconds(90))
        );
        assert_eq!(
            TimeWindow::new(2, TimeUnit::Minutes).to_delta(),
            Some(TimeDelta::seconds(120))
        );
        assert_eq!(
            TimeWindow::new(1, TimeUnit::Hours).to_delta(),
            Some(TimeDelta::seconds(3600))
        );
    }

    #[test]
    fn test_parse_rejects_unrepresentable_span() {
        for huge in ["2500000000h", "3000000000h", "4294967295h"] {
            assert_eq!(
                TimeWindow::parse(huge),
                Err(FilterError::InvalidTimeWindow(huge.to_string()))
            );
        }
        assert!(TimeWindow::parse("100000h").is_ok());
        assert!(TimeWindow::parse("4294967295s").is_ok());
    }

    #[test]
    fn test_cutoff() {
        let now = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(1);
        assert_eq!(
            TimeWindow::new(5, TimeUnit::Minutes).cutoff(now),
            now - TimeDelta::minutes(5)
        );
    }

    #[test]
    fn test_cutoff_saturates_for_oversized_window() {
        let window = TimeWindow::new(u32::MAX, TimeUnit::Hours);
        assert_eq!(window.cutoff(Utc::now()), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_display_round_trips_shorthand() {
        assert_eq!(TimeWindow::parse("10m").unwrap().to_string(), "10m");
    }
}
