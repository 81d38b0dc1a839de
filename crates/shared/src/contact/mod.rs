use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::{Validate, ValidationError};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

pub const REQUIRED: &str = "required";
pub const INVALID_EMAIL: &str = "email";

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(REQUIRED).with_message(Cow::Borrowed("required")));
    }

    Ok(())
}

fn email_address(value: &str) -> Result<(), ValidationError> {
    required(value)?;

    if !EMAIL.is_match(value) {
        return Err(ValidationError::new(INVALID_EMAIL)
            .with_message(Cow::Borrowed("must look like local@domain.tld")));
    }

    Ok(())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Fields of the contact form, in display order.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

/// What a visitor typed into the contact form.
///
/// Missing keys deserialize as empty strings so that the relay can answer
/// with `invalid-argument` instead of a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "email_address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub message: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Field::VARIANTS.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Outcome of one delivery attempt, as returned by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_deserialize_empty() {
        let form: ContactForm = serde_json::from_str(r#"{"name":"Aida"}"#).unwrap();
        assert_eq!(form.name, "Aida");
        assert!(form.email.is_empty());
        assert!(form.message.is_empty());
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@mail.example.kz"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a b@c.kz"));
    }

    #[test]
    fn validation_reports_only_broken_fields() {
        assert!(ContactForm::new("Aida", "a@b.co", "Hello").validate().is_ok());

        let errors = ContactForm::new("  ", "a@b", "Hello").validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["name"][0].code, REQUIRED);
        assert_eq!(fields["email"][0].code, INVALID_EMAIL);
        assert!(!fields.contains_key("message"));

        let errors = ContactForm::default().validate().unwrap_err();
        assert_eq!(errors.field_errors()["email"][0].code, REQUIRED);
    }

    #[test]
    fn set_and_clear() {
        let mut form = ContactForm::default();
        form.set(Field::Email, "a@b.co");
        assert_eq!(form.get(Field::Email), "a@b.co");
        assert!(!form.is_empty());

        form.clear();
        assert!(form.is_empty());
    }

    #[test]
    fn success_omits_error_key() {
        let json = serde_json::to_string(&SubmissionResult::delivered()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);

        let result: SubmissionResult =
            serde_json::from_str(r#"{"success":false,"error":"x"}"#).unwrap();
        assert_eq!(result, SubmissionResult::failed("x"));
    }
}
