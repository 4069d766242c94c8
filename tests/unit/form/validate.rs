use super::*;

fn complete_form() -> FormState {
    FormState {
        full_name: "Juan M. Dela Cruz".to_string(),
        rank: "Teacher I".to_string(),
        time_out: "08:00".to_string(),
        time_return: "10:00".to_string(),
        places_to_visit: "Division Office".to_string(),
        reason_for_visit: String::new(),
        agreed: true,
    }
}

const REQUIRED: [Field; 5] = [
    Field::FullName,
    Field::Rank,
    Field::TimeOut,
    Field::TimeReturn,
    Field::PlacesToVisit,
];

#[test]
fn complete_form_has_no_errors() {
    let errors = validate_form(&complete_form(), &SlipConfig::default());
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn reason_is_optional() {
    let mut form = complete_form();
    form.reason_for_visit = "Submit documents".to_string();
    assert!(validate_form(&form, &SlipConfig::default()).is_empty());
}

#[test]
fn errors_cover_exactly_the_empty_fields() {
    let cfg = SlipConfig::default();
    // Every non-empty subset of the required fields, blanked out.
    for mask in 1u32..(1 << REQUIRED.len()) {
        let mut form = complete_form();
        let mut expected = Vec::new();
        for (i, field) in REQUIRED.iter().enumerate() {
            if mask & (1 << i) != 0 {
                form.set(*field, "").unwrap();
                expected.push(*field);
            }
        }

        let errors = validate_form(&form, &cfg);
        let got: Vec<Field> = errors.fields().collect();
        assert_eq!(got, expected, "mask {mask:#07b}");
    }
}

#[test]
fn whitespace_only_name_and_places_count_as_empty() {
    let mut form = complete_form();
    form.full_name = "   ".to_string();
    form.places_to_visit = "\n\t".to_string();

    let errors = validate_form(&form, &SlipConfig::default());
    assert_eq!(errors.get(Field::FullName), Some("Full name is required"));
    assert_eq!(
        errors.get(Field::PlacesToVisit),
        Some("Place(s) to be visited is required")
    );
    assert_eq!(errors.len(), 2);
}

#[test]
fn required_messages_match_form_copy() {
    let errors = validate_form(&FormState::default(), &SlipConfig::default());
    assert_eq!(errors.get(Field::Rank), Some("Rank is required"));
    assert_eq!(errors.get(Field::TimeOut), Some("Time to be out is required"));
    assert_eq!(errors.get(Field::TimeReturn), Some("Time to return is required"));
    assert!(errors.contains(Field::Agreed));
    assert!(!errors.contains(Field::ReasonForVisit));
}

#[test]
fn unknown_rank_is_rejected() {
    let mut form = complete_form();
    form.rank = "Janitor".to_string();
    let errors = validate_form(&form, &SlipConfig::default());
    assert!(errors.get(Field::Rank).unwrap().starts_with("Rank must be one of:"));
    assert_eq!(errors.len(), 1);
}

#[test]
fn malformed_time_is_rejected() {
    let mut form = complete_form();
    form.time_return = "10am".to_string();
    let errors = validate_form(&form, &SlipConfig::default());
    assert_eq!(
        errors.get(Field::TimeReturn),
        Some("Time must be in HH:MM 24-hour form")
    );
    assert_eq!(errors.len(), 1);
}

#[test]
fn missing_agreement_is_rejected() {
    let mut form = complete_form();
    form.agreed = false;
    let errors = validate_form(&form, &SlipConfig::default());
    assert_eq!(errors.fields().collect::<Vec<_>>(), [Field::Agreed]);
}

#[test]
fn clear_removes_one_entry() {
    let mut errors = validate_form(&FormState::default(), &SlipConfig::default());
    let before = errors.len();
    assert!(errors.clear(Field::Rank));
    assert!(!errors.clear(Field::Rank));
    assert_eq!(errors.len(), before - 1);
}
