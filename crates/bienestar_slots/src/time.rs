// --- File: crates/bienestar_slots/src/time.rs ---
//! Wall-clock time of day used for every slot computation.
//!
//! Stored values reach the core as strings (`"08:00"`, `"10:00 a.m."`, `"3:30 PM"`).
//! They are parsed once into [`TimeOfDay`] at the boundary so the generator and the
//! occupancy filter compare integers instead of strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Raised when a stored or submitted time cannot be read as a time of day.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time of day '{input}': {reason}")]
pub struct TimeParseError {
    pub input: String,
    pub reason: &'static str,
}

impl TimeParseError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Minutes since midnight, `0..=1440`.
///
/// `24:00` is representable so a window can close at the end of the day; it is never
/// produced as a slot because slots are strictly before their window's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        u16::try_from(minutes)
            .ok()
            .filter(|m| *m <= MINUTES_PER_DAY)
            .map(TimeOfDay)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Adds `minutes`, returning `None` past `24:00`.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.minutes().checked_add(minutes)?)
    }

    /// Parses the canonical stored form: `HH:MM` (a single-digit hour is tolerated).
    ///
    /// ```
    /// use bienestar_slots::time::TimeOfDay;
    ///
    /// let t = TimeOfDay::parse("08:30").unwrap();
    /// assert_eq!(t.to_string(), "08:30");
    /// assert!(TimeOfDay::parse("8.30").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let trimmed = input.trim();
        let (hour, minute) = trimmed
            .split_once(':')
            .ok_or_else(|| TimeParseError::new(input, "expected HH:MM"))?;
        if minute.len() != 2 {
            return Err(TimeParseError::new(input, "minutes must have two digits"));
        }
        let hour = parse_component(input, hour, 2)?;
        let minute = parse_component(input, minute, 2)?;
        if hour > 24 || (hour == 24 && minute != 0) {
            return Err(TimeParseError::new(input, "hour out of range"));
        }
        Self::from_hm(hour, minute).ok_or_else(|| TimeParseError::new(input, "minute out of range"))
    }

    /// Parses any time format the portal has written into appointment records.
    ///
    /// Accepts `HH:MM`, `H:MM`, `HH:MM:SS` and 12-hour forms with an `am`/`pm`
    /// suffix in any case, with or without dots and spaces (`"10:00 a.m."`,
    /// `"3:30PM"`). Seconds are validated and dropped.
    pub fn parse_lenient(input: &str) -> Result<Self, TimeParseError> {
        let compact: String = input
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .collect();

        let (clock, meridiem) = if let Some(rest) = compact.strip_suffix("am") {
            (rest, Some(Meridiem::Am))
        } else if let Some(rest) = compact.strip_suffix("pm") {
            (rest, Some(Meridiem::Pm))
        } else {
            (compact.as_str(), None)
        };

        let mut parts = clock.split(':');
        let hour = parts
            .next()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TimeParseError::new(input, "missing hour"))?;
        let hour = parse_component(input, hour, 2)?;
        let minute = match parts.next() {
            Some(m) if m.len() == 2 => parse_component(input, m, 2)?,
            Some(_) => return Err(TimeParseError::new(input, "minutes must have two digits")),
            // "3pm" style: hour only, only valid with a meridiem
            None if meridiem.is_some() => 0,
            None => return Err(TimeParseError::new(input, "expected HH:MM")),
        };
        if let Some(seconds) = parts.next() {
            if seconds.len() != 2 || parse_component(input, seconds, 2)? >= 60 {
                return Err(TimeParseError::new(input, "invalid seconds"));
            }
        }
        if parts.next().is_some() {
            return Err(TimeParseError::new(input, "too many ':' separators"));
        }

        let hour = match meridiem {
            None => hour,
            Some(_) if hour == 0 || hour > 12 => {
                return Err(TimeParseError::new(input, "12-hour clock hour must be 1-12"))
            }
            Some(Meridiem::Am) => hour % 12,
            Some(Meridiem::Pm) => hour % 12 + 12,
        };
        if hour >= 24 {
            return Err(TimeParseError::new(input, "hour out of range"));
        }
        Self::from_hm(hour, minute).ok_or_else(|| TimeParseError::new(input, "minute out of range"))
    }

    /// The portal's 12-hour label, e.g. `9:00 a.m.` or `12:30 p.m.`.
    pub fn to_12h_label(self) -> String {
        let hour = self.hour() % 24;
        let suffix = if hour < 12 { "a.m." } else { "p.m." };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hour, self.minute(), suffix)
    }
}

fn parse_component(input: &str, digits: &str, max_len: usize) -> Result<u32, TimeParseError> {
    if digits.is_empty() || digits.len() > max_len || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::new(input, "non-numeric component"));
    }
    digits
        .parse()
        .map_err(|_| TimeParseError::new(input, "non-numeric component"))
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Request bodies may carry any of the stored formats.
impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse_lenient(&raw).map_err(serde::de::Error::custom)
    }
}
