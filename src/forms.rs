//! Form decoding and the validation/sanitization pipeline.
//!
//! Mutation endpoints accept `application/x-www-form-urlencoded` bodies.
//! The raw pairs are collected into [`FormData`], and each entity's form type
//! runs its fields through the helpers here, accumulating every error before
//! the handler inspects the result. Nothing short-circuits: a submission with
//! three bad fields reports three errors.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// One field-level validation error, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Decoded form body. Every field is a sequence of values: a key submitted
/// once yields one element, a repeated key yields all of them, an absent key
/// yields an empty slice. Multi-valued domain fields therefore never see a
/// bare scalar.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl FormData {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut data = FormData::default();
        for (name, value) in pairs {
            data.push(name, value);
        }
        data
    }

    fn push(&mut self, name: String, value: String) {
        if !self.fields.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.fields.entry(name).or_default().push(value);
    }

    /// All submitted values for a field (empty when absent).
    pub fn values(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First submitted value for a scalar field, or "" when absent.
    pub fn first(&self, name: &str) -> &str {
        self.values(name).first().map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
impl<const N: usize> From<[(&str, &str); N]> for FormData {
    fn from(pairs: [(&str, &str); N]) -> Self {
        FormData::from_pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Trim surrounding whitespace and escape HTML-sensitive characters.
pub fn sanitize(raw: &str) -> String {
    escape(raw.trim())
}

/// Escape `& < > " ' /` into HTML entities.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// Required field: sanitized value must be non-empty, else `message` is
/// recorded against `field`.
pub fn required(
    form: &FormData,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> String {
    let value = sanitize(form.first(field));
    if value.is_empty() {
        errors.push(FieldError::new(field, message));
    }
    value
}

/// Required name field: non-empty, within `max_len`, alphanumeric only.
pub fn required_name(
    form: &FormData,
    field: &str,
    label: &str,
    max_len: usize,
    errors: &mut Vec<FieldError>,
) -> String {
    let value = sanitize(form.first(field));
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{} must be specified.", label)));
    } else {
        if value.chars().count() > max_len {
            errors.push(FieldError::new(
                field,
                format!("{} must not exceed {} characters.", label, max_len),
            ));
        }
        if !value.chars().all(char::is_alphanumeric) {
            errors.push(FieldError::new(
                field,
                format!("{} has non-alphanumeric characters.", label),
            ));
        }
    }
    value
}

/// Optional ISO-8601 date field. Blank or absent is valid (`None`); a
/// non-blank value that fails to parse records "Invalid <label>".
pub fn optional_date(
    form: &FormData,
    field: &str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let raw = form.first(field).trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(field, format!("Invalid {}", label)));
            None
        }
    }
}

/// Multi-valued id field: each value must parse as an identifier. Zero, one
/// or many submissions yield a sequence of matching length.
pub fn id_list(
    form: &FormData,
    field: &str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Vec<i32> {
    let mut ids = Vec::new();
    for raw in form.values(field) {
        match raw.trim().parse::<i32>() {
            Ok(id) => ids.push(id),
            Err(_) => errors.push(FieldError::new(field, format!("Invalid {}", label))),
        }
    }
    ids
}

/// Required reference field: must be present and parse as an identifier.
pub fn required_id(
    form: &FormData,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<i32> {
    let raw = form.first(field).trim();
    match raw.parse::<i32>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_field_is_empty_sequence() {
        let form = FormData::from([("title", "x")]);
        assert!(form.values("genre").is_empty());
    }

    #[test]
    fn single_value_wraps_into_one_element() {
        let form = FormData::from([("genre", "3")]);
        assert_eq!(form.values("genre"), ["3"]);
    }

    #[test]
    fn repeated_field_keeps_all_values_in_order() {
        let form = FormData::from([("genre", "3"), ("genre", "1"), ("genre", "9")]);
        assert_eq!(form.values("genre"), ["3", "1", "9"]);
    }

    #[test]
    fn sanitize_trims_and_escapes() {
        assert_eq!(sanitize("  a<b>&'\"/  "), "a&lt;b&gt;&amp;&#x27;&quot;&#x2F;");
    }

    #[test]
    fn required_records_error_on_blank() {
        let form = FormData::from([("imprint", "   ")]);
        let mut errors = Vec::new();
        let value = required(&form, "imprint", "Imprint must be specified.", &mut errors);
        assert_eq!(value, "");
        assert_eq!(errors, [FieldError::new("imprint", "Imprint must be specified.")]);
    }

    #[test]
    fn required_name_flags_non_alphanumeric() {
        let form = FormData::from([("first_name", "Jane-Marie")]);
        let mut errors = Vec::new();
        required_name(&form, "first_name", "First name", 100, &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("non-alphanumeric"));
    }

    #[test]
    fn optional_date_blank_is_none_without_error() {
        let form = FormData::from([("date_of_birth", "")]);
        let mut errors = Vec::new();
        assert_eq!(optional_date(&form, "date_of_birth", "date of birth", &mut errors), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn optional_date_malformed_is_error() {
        let form = FormData::from([("due_back", "next tuesday")]);
        let mut errors = Vec::new();
        assert_eq!(optional_date(&form, "due_back", "date", &mut errors), None);
        assert_eq!(errors, [FieldError::new("due_back", "Invalid date")]);
    }

    #[test]
    fn id_list_collects_parsed_ids() {
        let form = FormData::from([("genre", "4"), ("genre", "x"), ("genre", "7")]);
        let mut errors = Vec::new();
        let ids = id_list(&form, "genre", "genre", &mut errors);
        assert_eq!(ids, [4, 7]);
        assert_eq!(errors.len(), 1);
    }
}
