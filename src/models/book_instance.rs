//! BookInstance (physical copy) model and related types

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::forms::{self, FieldError, FormData};
use crate::models::Book;

/// Lending status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "copy_status")]
pub enum CopyStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl Default for CopyStatus {
    fn default() -> Self {
        CopyStatus::Maintenance
    }
}

impl CopyStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(CopyStatus::Available),
            "Maintenance" => Some(CopyStatus::Maintenance),
            "Loaned" => Some(CopyStatus::Loaned),
            "Reserved" => Some(CopyStatus::Reserved),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Available => "Available",
            CopyStatus::Maintenance => "Maintenance",
            CopyStatus::Loaned => "Loaned",
            CopyStatus::Reserved => "Reserved",
        }
    }
}

/// Full book-instance model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: CopyStatus,
    pub due_back: NaiveDate,
}

impl BookInstance {
    /// Canonical path of the copy's detail page.
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

/// Copy with its book reference resolved; `book` is `None` when dangling.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceWithBook {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub book: Option<Book>,
}

/// Sanitized book-instance form submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceForm {
    pub book_id: Option<i32>,
    pub imprint: String,
    pub status: CopyStatus,
    pub due_back: NaiveDate,
}

impl BookInstanceForm {
    /// Validate and sanitize a copy submission. Status defaults to
    /// Maintenance when absent; an unknown status value is a field error,
    /// not a silent fallback. A blank due_back defaults to today.
    pub fn from_form(form: &FormData) -> (Self, Vec<FieldError>) {
        let mut errors = Vec::new();
        let book_id = forms::required_id(form, "book", "Book must be specified", &mut errors);
        let imprint = forms::required(form, "imprint", "Imprint must be specified", &mut errors);

        let raw_status = form.first("status").trim();
        let status = if raw_status.is_empty() {
            CopyStatus::default()
        } else {
            match CopyStatus::parse(raw_status) {
                Some(status) => status,
                None => {
                    errors.push(FieldError::new("status", "Invalid status"));
                    CopyStatus::default()
                }
            }
        };

        let due_back = forms::optional_date(form, "due_back", "date", &mut errors)
            .unwrap_or_else(|| Utc::now().date_naive());

        (
            Self {
                book_id,
                imprint,
                status,
                due_back,
            },
            errors,
        )
    }
}

impl From<&BookInstance> for BookInstanceForm {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book_id: Some(instance.book_id),
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: instance.due_back,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_maintenance() {
        let form = FormData::from([("book", "1"), ("imprint", "Penguin, 1996")]);
        let (parsed, errors) = BookInstanceForm::from_form(&form);
        assert!(errors.is_empty());
        assert_eq!(parsed.status, CopyStatus::Maintenance);
    }

    #[test]
    fn unknown_status_is_a_field_error() {
        let form = FormData::from([
            ("book", "1"),
            ("imprint", "Penguin, 1996"),
            ("status", "Lost"),
        ]);
        let (_, errors) = BookInstanceForm::from_form(&form);
        assert_eq!(errors, [FieldError::new("status", "Invalid status")]);
    }

    #[test]
    fn malformed_due_back_names_the_field() {
        let form = FormData::from([
            ("book", "1"),
            ("imprint", "Penguin, 1996"),
            ("due_back", "2024-13-40"),
        ]);
        let (_, errors) = BookInstanceForm::from_form(&form);
        assert_eq!(errors, [FieldError::new("due_back", "Invalid date")]);
    }

    #[test]
    fn blank_due_back_defaults_to_today() {
        let form = FormData::from([("book", "1"), ("imprint", "Penguin, 1996")]);
        let (parsed, errors) = BookInstanceForm::from_form(&form);
        assert!(errors.is_empty());
        assert_eq!(parsed.due_back, Utc::now().date_naive());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            CopyStatus::Available,
            CopyStatus::Maintenance,
            CopyStatus::Loaned,
            CopyStatus::Reserved,
        ] {
            assert_eq!(CopyStatus::parse(status.as_str()), Some(status));
        }
    }
}
