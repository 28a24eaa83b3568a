//! Status code predicate.

use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A hundred-wide status bucket such as `4xx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusClass(u16);

impl StatusClass {
    /// Bucket for a status code (`404` is `4xx`).
    pub fn of(code: u16) -> Self {
        StatusClass(code / 100)
    }

    pub fn contains(&self, code: u16) -> bool {
        code / 100 == self.0
    }
}

impl FromStr for StatusClass {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_bytes() {
            [digit @ b'1'..=b'5', b'x', b'x'] => Ok(StatusClass(u16::from(digit - b'0'))),
            _ => Err(FilterError::InvalidStatusRange(s.to_string())),
        }
    }
}

impl TryFrom<String> for StatusClass {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusClass> for String {
    fn from(class: StatusClass) -> Self {
        class.to_string()
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}xx", self.0)
    }
}

/// Status filter: exact codes OR buckets, optionally restricted to errors.
///
/// With no exact codes and no buckets every code passes, subject only to
/// `errors_only`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFilter {
    #[serde(default)]
    pub exact: Vec<u16>,
    #[serde(default)]
    pub ranges: Vec<StatusClass>,
    #[serde(default)]
    pub errors_only: bool,
}

impl StatusFilter {
    pub fn errors() -> Self {
        Self {
            errors_only: true,
            ..Self::default()
        }
    }

    pub fn with_exact(mut self, code: u16) -> Self {
        self.exact.push(code);
        self
    }

    pub fn with_range(mut self, class: StatusClass) -> Self {
        self.ranges.push(class);
        self
    }

    /// Parse user input such as `404`, `4xx` or `404,5xx`.
    pub fn parse(value: &str, errors_only: bool) -> Result<Self, FilterError> {
        let mut filter = Self {
            errors_only,
            ..Self::default()
        };

        for token in value.split(',') {
            let token = token.trim().to_ascii_lowercase();
            if let Ok(class) = token.parse::<StatusClass>() {
                filter.ranges.push(class);
                continue;
            }
            if is_range_shaped(&token) {
                return Err(FilterError::InvalidStatusRange(token));
            }

            let code: u16 = token
                .parse()
                .map_err(|_| FilterError::InvalidStatus(token.clone()))?;
            if !(100..=599).contains(&code) {
                return Err(FilterError::StatusOutOfRange(token));
            }
            filter.exact.push(code);
        }

        Ok(filter)
    }

    pub fn matches(&self, code: u16) -> bool {
        if self.errors_only && code < 400 {
            return false;
        }

        if self.exact.is_empty() && self.ranges.is_empty() {
            return true;
        }

        self.exact.contains(&code) || self.ranges.contains(&StatusClass::of(code))
    }
}

/// `<digit>xx`, whether or not the digit names a real bucket.
fn is_range_shaped(token: &str) -> bool {
    matches!(token.as_bytes(), [b'0'..=b'9', b'x', b'x'])
}
