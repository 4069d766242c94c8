use std::collections::BTreeMap;

use crate::{
    config::settings::SlipConfig,
    foundation::clock::ClockTime,
    form::state::{Field, FormState},
};

/// Per-field messages produced by the last validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    by_field: BTreeMap<Field, String>,
}

impl ValidationErrors {
    /// No field has an error.
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// Number of fields with an error.
    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    /// Message for `field`, if it has one.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.by_field.get(&field).map(String::as_str)
    }

    /// Whether `field` has an error.
    pub fn contains(&self, field: Field) -> bool {
        self.by_field.contains_key(&field)
    }

    /// Fields with errors, in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.by_field.keys().copied()
    }

    /// `(field, message)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.by_field.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Drop the error for one field, returning whether there was one.
    pub fn clear(&mut self, field: Field) -> bool {
        self.by_field.remove(&field).is_some()
    }

    fn insert(&mut self, field: Field, msg: impl Into<String>) {
        self.by_field.insert(field, msg.into());
    }
}

/// Check a form against the submission rules.
///
/// Required: full name, rank, both times, places to visit, and the agreement. The reason for
/// the visit is free text and never checked.
pub fn validate_form(form: &FormState, cfg: &SlipConfig) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if form.full_name.trim().is_empty() {
        errors.insert(Field::FullName, "Full name is required");
    }

    if form.rank.is_empty() {
        errors.insert(Field::Rank, "Rank is required");
    } else if !cfg.is_valid_rank(&form.rank) {
        errors.insert(
            Field::Rank,
            format!("Rank must be one of: {}", cfg.valid_ranks.join(", ")),
        );
    }

    check_time(
        &mut errors,
        Field::TimeOut,
        &form.time_out,
        "Time to be out is required",
    );
    check_time(
        &mut errors,
        Field::TimeReturn,
        &form.time_return,
        "Time to return is required",
    );

    if form.places_to_visit.trim().is_empty() {
        errors.insert(Field::PlacesToVisit, "Place(s) to be visited is required");
    }

    if !form.agreed {
        errors.insert(
            Field::Agreed,
            "You must certify the information to digitally sign this request",
        );
    }

    errors
}

fn check_time(errors: &mut ValidationErrors, field: Field, value: &str, required_msg: &str) {
    if value.is_empty() {
        errors.insert(field, required_msg);
    } else if ClockTime::parse(value).is_err() {
        errors.insert(field, "Time must be in HH:MM 24-hour form");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/form/validate.rs"]
mod tests;
