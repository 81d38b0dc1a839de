use std::{collections::BTreeMap, str::FromStr};

use validator::{Validate, ValidationErrors};
use yurline_shared::{ContactForm, Field, INVALID_EMAIL};

/// Per-field messages shown next to the inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<Field, String>);

impl FormErrors {
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();

        for (name, errors) in errors.field_errors() {
            let Ok(field) = Field::from_str(&name) else {
                continue;
            };
            if let Some(error) = errors.first() {
                fields.insert(field, message_for(field, &error.code));
            }
        }

        Self(fields)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn message_for(field: Field, code: &str) -> String {
    match (field, code) {
        (Field::Email, INVALID_EMAIL) => "Please enter a valid email address".to_owned(),
        (Field::Name, _) => "Please enter your name".to_owned(),
        (Field::Email, _) => "Please enter your email".to_owned(),
        (Field::Message, _) => "Please enter a message".to_owned(),
    }
}

/// Recomputes every field error for `form`.
pub fn validate_form(form: &ContactForm) -> FormErrors {
    match form.validate() {
        Ok(()) => FormErrors::default(),
        Err(errors) => FormErrors::from_validation(&errors),
    }
}
