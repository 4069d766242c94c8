use std::{fmt, str::FromStr};

use crate::foundation::{
    clock::ClockTime,
    error::{SlipError, SlipResult},
};

/// Every input of the locator slip form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Applicant's complete name.
    FullName,
    /// Applicant's rank or position.
    Rank,
    /// Time of leaving campus (`HH:MM`).
    TimeOut,
    /// Expected time of return (`HH:MM`).
    TimeReturn,
    /// Destination(s).
    PlacesToVisit,
    /// Optional purpose of the visit.
    ReasonForVisit,
    /// Digital-signature agreement checkbox.
    Agreed,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 7] = [
        Field::FullName,
        Field::Rank,
        Field::TimeOut,
        Field::TimeReturn,
        Field::PlacesToVisit,
        Field::ReasonForVisit,
        Field::Agreed,
    ];

    /// Name used in the JSON submission and on the command line.
    pub fn wire_name(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Rank => "rank",
            Field::TimeOut => "timeOut",
            Field::TimeReturn => "timeReturn",
            Field::PlacesToVisit => "placesToVisit",
            Field::ReasonForVisit => "reasonForVisit",
            Field::Agreed => "agreed",
        }
    }

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full Name",
            Field::Rank => "Rank",
            Field::TimeOut => "Time to be Out",
            Field::TimeReturn => "Time to Return",
            Field::PlacesToVisit => "Place(s) to be Visited",
            Field::ReasonForVisit => "Reason(s) for the Visit",
            Field::Agreed => "Digital Signature Agreement",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Field {
    type Err = SlipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.wire_name() == s)
            .ok_or_else(|| SlipError::validation(format!("unknown form field '{s}'")))
    }
}

/// The in-memory contents of one locator slip form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    /// Applicant's complete name.
    pub full_name: String,
    /// Rank or position, one of the configured ranks.
    pub rank: String,
    /// Time of leaving campus as typed.
    pub time_out: String,
    /// Expected time of return as typed.
    pub time_return: String,
    /// Destination(s).
    pub places_to_visit: String,
    /// Purpose of the visit; may be empty.
    pub reason_for_visit: String,
    /// Whether the applicant certified the information.
    pub agreed: bool,
}

/// JSON body posted to the submission endpoint. The agreement flag is not sent.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlipPayload {
    /// `fullName`.
    pub full_name: String,
    /// `rank`.
    pub rank: String,
    /// `timeOut`, `HH:MM` 24-hour.
    pub time_out: String,
    /// `timeReturn`, `HH:MM` 24-hour.
    pub time_return: String,
    /// `placesToVisit`.
    pub places_to_visit: String,
    /// `reasonForVisit`, empty when not given.
    pub reason_for_visit: String,
}

impl FormState {
    /// Set one field from its textual value.
    ///
    /// `Field::Agreed` accepts `true/false`, `yes/no`, `on/off` and `1/0`.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> SlipResult<()> {
        let value = value.into();
        match field {
            Field::FullName => self.full_name = value,
            Field::Rank => self.rank = value,
            Field::TimeOut => self.time_out = value,
            Field::TimeReturn => self.time_return = value,
            Field::PlacesToVisit => self.places_to_visit = value,
            Field::ReasonForVisit => self.reason_for_visit = value,
            Field::Agreed => self.agreed = parse_flag(&value)?,
        }
        Ok(())
    }

    /// Tick or clear the agreement checkbox.
    pub fn set_agreed(&mut self, agreed: bool) {
        self.agreed = agreed;
    }

    /// Current value of a text field; `Agreed` renders as `"true"`/`"false"`.
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::FullName => self.full_name.clone(),
            Field::Rank => self.rank.clone(),
            Field::TimeOut => self.time_out.clone(),
            Field::TimeReturn => self.time_return.clone(),
            Field::PlacesToVisit => self.places_to_visit.clone(),
            Field::ReasonForVisit => self.reason_for_visit.clone(),
            Field::Agreed => self.agreed.to_string(),
        }
    }

    /// Wire body for this form. Times that parse are sent zero-padded (`"8:00"` becomes `"08:00"`).
    pub fn payload(&self) -> SlipPayload {
        SlipPayload {
            full_name: self.full_name.clone(),
            rank: self.rank.clone(),
            time_out: wire_time(&self.time_out),
            time_return: wire_time(&self.time_return),
            places_to_visit: self.places_to_visit.clone(),
            reason_for_visit: self.reason_for_visit.clone(),
        }
    }
}

fn wire_time(s: &str) -> String {
    match ClockTime::parse(s) {
        Ok(t) => t.to_string(),
        Err(_) => s.to_string(),
    }
}

fn parse_flag(s: &str) -> SlipResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "" => Ok(false),
        other => Err(SlipError::validation(format!(
            "'{other}' is not a yes/no value"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/form/state.rs"]
mod tests;
