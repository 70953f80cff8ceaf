use regex::Regex;
use std::sync::LazyLock;

use super::{ErrorState, Field, FieldError, FormState};

// local-part@domain.tld, ASCII only, tld of two or more letters
static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

pub(crate) fn is_valid_email(value: &str) -> bool {
    RE_EMAIL.is_match(value)
}

fn required(value: &str, err: FieldError) -> Option<FieldError> {
    value.trim().is_empty().then_some(err)
}

fn check_email(value: &str) -> Option<FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Some(FieldError::EmailRequired)
    } else if !is_valid_email(value) {
        Some(FieldError::EmailInvalid)
    } else {
        None
    }
}

/// Run every rule against `state` and return a fresh error set
///
/// Rules are independent: a failing field never stops the others from being
/// checked.
pub(crate) fn validate(state: &FormState) -> ErrorState {
    let mut errors = ErrorState::default();

    errors[Field::Name] = required(&state.name, FieldError::NameRequired);
    errors[Field::LastName] = required(&state.last_name, FieldError::LastNameRequired);
    errors[Field::Email] = check_email(&state.email);
    errors[Field::Message] = required(&state.message, FieldError::MessageRequired);
    errors[Field::InquiryType] = state
        .inquiry_type
        .is_none()
        .then_some(FieldError::InquiryTypeRequired);
    errors[Field::Consent] = (!state.consent).then_some(FieldError::ConsentRequired);

    errors
}
