//! Genre model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::forms::{self, FieldError, FormData};

/// Full genre model from database. Names are unique (exact, case-sensitive);
/// uniqueness is enforced by the create/update guard, not a DB constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    /// Canonical path of the genre's detail page.
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

/// Sanitized genre form submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreForm {
    pub name: String,
}

impl GenreForm {
    pub fn from_form(form: &FormData) -> (Self, Vec<FieldError>) {
        let mut errors = Vec::new();
        let name = forms::required(form, "name", "Genre name required", &mut errors);
        (Self { name }, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected_after_trim() {
        let form = FormData::from([("name", "  \t ")]);
        let (_, errors) = GenreForm::from_form(&form);
        assert_eq!(errors, [FieldError::new("name", "Genre name required")]);
    }

    #[test]
    fn name_is_trimmed_and_escaped() {
        let form = FormData::from([("name", " Science <Fiction> ")]);
        let (parsed, errors) = GenreForm::from_form(&form);
        assert!(errors.is_empty());
        assert_eq!(parsed.name, "Science &lt;Fiction&gt;");
    }
}
