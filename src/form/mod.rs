//! Contact form model: fields, values, per-field errors
//!
//! The controller that drives validation and the success window lives in
//! `controller`; the static rules live in `validate`.

pub mod controller;
mod validate;

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use thiserror::Error;

pub use controller::{Annotation, FormController, SubmissionPhase};

/// Announcement published when a submission passes validation
pub const SUCCESS_ANNOUNCEMENT: &str = "Form submitted successfully.";

/// Errors raised when turning raw identifiers into typed form values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown form field: {0}")]
    UnknownField(String),

    #[error("unknown inquiry type: {0}")]
    UnknownInquiryType(String),
}

/// The form's fields, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    LastName,
    Email,
    Message,
    InquiryType,
    Consent,
}

impl Field {
    /// Every field in declaration order (the order errors are announced in)
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::LastName,
        Field::Email,
        Field::Message,
        Field::InquiryType,
        Field::Consent,
    ];

    /// Stable identifier used for the field's input
    pub fn id(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Message => "message",
            Field::InquiryType => "inquiryType",
            Field::Consent => "consent",
        }
    }

    /// Identifier of the element holding this field's error text
    pub fn error_id(self) -> &'static str {
        match self {
            Field::Name => "name-error",
            Field::LastName => "lastName-error",
            Field::Email => "email-error",
            Field::Message => "message-error",
            Field::InquiryType => "inquiryType-error",
            Field::Consent => "consent-error",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::LastName => "LastName",
            Field::Email => "Email",
            Field::Message => "Message",
            Field::InquiryType => "Query Type",
            Field::Consent => "Consent",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Field {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.id() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// The two accepted inquiry types. "Not chosen yet" is `None` on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InquiryType {
    GeneralInquiry,
    SupportRequest,
}

impl InquiryType {
    pub const ALL: [InquiryType; 2] = [InquiryType::GeneralInquiry, InquiryType::SupportRequest];

    pub fn label(self) -> &'static str {
        match self {
            InquiryType::GeneralInquiry => "General Inquiry",
            InquiryType::SupportRequest => "Support Request",
        }
    }
}

impl fmt::Display for InquiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InquiryType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InquiryType::ALL
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| FormError::UnknownInquiryType(s.to_string()))
    }
}

/// Current values of every field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
    pub inquiry_type: Option<InquiryType>,
    pub consent: bool,
}

impl FormState {
    /// Text value of a free-text field, `None` for the choice fields
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::LastName => Some(&self.last_name),
            Field::Email => Some(&self.email),
            Field::Message => Some(&self.message),
            Field::InquiryType | Field::Consent => None,
        }
    }

    /// Store a value verbatim
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(v) => self.name = v,
            FieldUpdate::LastName(v) => self.last_name = v,
            FieldUpdate::Email(v) => self.email = v,
            FieldUpdate::Message(v) => self.message = v,
            FieldUpdate::InquiryType(v) => self.inquiry_type = v,
            FieldUpdate::Consent(v) => self.consent = v,
        }
    }
}

/// A typed assignment to one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    LastName(String),
    Email(String),
    Message(String),
    InquiryType(Option<InquiryType>),
    Consent(bool),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Name(_) => Field::Name,
            FieldUpdate::LastName(_) => Field::LastName,
            FieldUpdate::Email(_) => Field::Email,
            FieldUpdate::Message(_) => Field::Message,
            FieldUpdate::InquiryType(_) => Field::InquiryType,
            FieldUpdate::Consent(_) => Field::Consent,
        }
    }

    /// Build a text update for one of the free-text fields
    pub fn text(field: Field, value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        match field {
            Field::Name => Some(FieldUpdate::Name(value)),
            Field::LastName => Some(FieldUpdate::LastName(value)),
            Field::Email => Some(FieldUpdate::Email(value)),
            Field::Message => Some(FieldUpdate::Message(value)),
            Field::InquiryType | Field::Consent => None,
        }
    }
}

/// A single validation failure and its user-facing text
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Name is required.")]
    NameRequired,

    #[error("Lastname is required.")]
    LastNameRequired,

    #[error("Email is required.")]
    EmailRequired,

    #[error("Please enter a valid email address.")]
    EmailInvalid,

    #[error("Message is required.")]
    MessageRequired,

    #[error("Please select an inquiry type.")]
    InquiryTypeRequired,

    #[error("You must consent before submitting.")]
    ConsentRequired,
}

/// Per-field error slots, one per `Field`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    slots: [Option<FieldError>; 6],
}

impl ErrorState {
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self[field]
    }

    pub fn clear(&mut self, field: Field) {
        self[field] = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Fields with an error, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(|field| self[field].map(|err| (field, err)))
    }

    /// All error texts joined by single spaces, in declaration order
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(_, err)| err.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Index<Field> for ErrorState {
    type Output = Option<FieldError>;

    fn index(&self, field: Field) -> &Self::Output {
        &self.slots[field.index()]
    }
}

impl IndexMut<Field> for ErrorState {
    fn index_mut(&mut self, field: Field) -> &mut Self::Output {
        &mut self.slots[field.index()]
    }
}
