//! The form submission boundary: raw string inputs keyed by field name.
//!
//! Entities implement [`FromForm`] to turn a submission into a typed candidate
//! and [`IntoForm`] to pre-fill an edit form. Parse failures are collected per
//! field into the same [`ValidationErrors`] the schema produces, so a form can
//! show every problem at once.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Constraint, ValidationErrors};
use crate::entity::Choice;

/// Raw form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    values: BTreeMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(|s| s.as_str())
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.values.remove(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Start reading typed values out of this form.
    pub fn reader(&self) -> FormReader<'_> {
        FormReader {
            form: self,
            errors: ValidationErrors::new(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (field, value) in iter {
            form.set(field, value);
        }
        form
    }
}

/// Typed reads over a [`FormData`], collecting parse errors per field.
///
/// Each read returns a value even on failure (a placeholder) so that all
/// fields are visited; [`FormReader::finish`] then fails if anything was
/// recorded, and the placeholder never escapes.
pub struct FormReader<'a> {
    form: &'a FormData,
    errors: ValidationErrors,
}

impl<'a> FormReader<'a> {
    fn raw(&self, field: &str) -> &'a str {
        self.form.get(field).map(str::trim).unwrap_or("")
    }

    /// Trimmed text. Missing fields read as empty; the schema decides
    /// whether that is allowed.
    pub fn text(&mut self, field: &str) -> String {
        self.raw(field).to_string()
    }

    /// A number of any `FromStr` type. Blank input is an error.
    pub fn number<N: FromStr + Default>(&mut self, field: &str) -> N {
        let raw = self.raw(field);
        if raw.is_empty() {
            self.errors.add(field, "is required");
            return N::default();
        }
        match raw.replace(',', "").parse::<N>() {
            Ok(value) => value,
            Err(_) => {
                self.errors.add(field, "must be a valid number");
                N::default()
            }
        }
    }

    /// A number that must also satisfy `bounds`. Input outside the bounds
    /// gets the schema's range message even when it would not fit in `N`
    /// (300 for a `u8` field), instead of a parse error.
    pub fn bounded<N: FromStr + Default>(&mut self, field: &str, bounds: Constraint) -> N {
        let wide = self.raw(field).replace(',', "").parse::<f64>();
        if let Some(message) = wide.ok().and_then(|value| bounds.check_number(value)) {
            self.errors.add(field, message);
            return N::default();
        }
        self.number(field)
    }

    /// One value of an enumerated field.
    pub fn choice<C: Choice>(&mut self, field: &str) -> C {
        let raw = self.raw(field);
        match C::parse(raw) {
            Some(value) => value,
            None => {
                let message = if raw.is_empty() {
                    "is required".to_string()
                } else {
                    format!("must be one of: {}", C::options().join(", "))
                };
                self.errors.add(field, message);
                C::VARIANTS[0]
            }
        }
    }

    /// Comma-separated entries, trimmed, blanks dropped.
    pub fn list(&mut self, field: &str) -> Vec<String> {
        self.raw(field)
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// A checkbox. Missing reads as unchecked.
    pub fn flag(&mut self, field: &str) -> bool {
        match self.raw(field).to_ascii_lowercase().as_str() {
            "" | "false" | "off" | "no" | "0" => false,
            "true" | "on" | "yes" | "1" => true,
            _ => {
                self.errors.add(field, "must be checked or unchecked");
                false
            }
        }
    }

    /// Hand back the candidate, or every parse error recorded while reading.
    pub fn finish<T>(self, candidate: T) -> Result<T, ValidationErrors> {
        self.errors.into_result().map(|()| candidate)
    }
}

/// Build a typed candidate from a form submission.
pub trait FromForm: Sized {
    fn from_form(form: &FormData) -> Result<Self, ValidationErrors>;
}

/// Render a record's fields as a pre-filled form for editing.
pub trait IntoForm {
    fn to_form(&self) -> FormData;
}
