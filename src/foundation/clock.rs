use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use crate::foundation::error::{SlipError, SlipResult};

/// A wall-clock time of day as entered in the form (`"HH:MM"`, 24-hour).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    /// Hour in `0..=23`.
    pub hour: u8,
    /// Minute in `0..=59`.
    pub minute: u8,
}

impl ClockTime {
    /// Build a time of day, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8) -> SlipResult<Self> {
        if hour > 23 {
            return Err(SlipError::validation(format!("hour {hour} out of range")));
        }
        if minute > 59 {
            return Err(SlipError::validation(format!("minute {minute} out of range")));
        }
        Ok(Self { hour, minute })
    }

    /// Parse `"H:MM"` or `"HH:MM"`.
    pub fn parse(s: &str) -> SlipResult<Self> {
        let bad = || SlipError::validation(format!("'{s}' is not an HH:MM time"));

        let (h, m) = s.split_once(':').ok_or_else(bad)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(bad());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }

        let hour: u8 = h.parse().map_err(|_| bad())?;
        let minute: u8 = m.parse().map_err(|_| bad())?;
        Self::new(hour, minute)
    }

    /// Render as `"H:MM AM"` / `"H:MM PM"`.
    pub fn to_12_hour(self) -> String {
        let suffix = if self.hour >= 12 { "PM" } else { "AM" };
        let hour12 = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{hour12}:{:02} {suffix}", self.minute)
    }
}

/// `HH:MM`, 24-hour, zero-padded.
impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Convert a 24-hour `"HH:MM"` string into the 12-hour form printed on receipts.
///
/// Empty input yields an empty string. Input that does not parse is returned unchanged.
pub fn format_time_12_hour(time24: &str) -> String {
    if time24.is_empty() {
        return String::new();
    }
    match ClockTime::parse(time24) {
        Ok(t) => t.to_12_hour(),
        Err(_) => time24.to_string(),
    }
}

/// `M/D/YYYY`, the short US date used in signature and footer stamps.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// `HH:MM AM|PM` with a zero-padded hour, used in the footer stamp.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/clock.rs"]
mod tests;
