//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::forms::{self, FieldError, FormData};

pub const NAME_MAX_LEN: usize = 100;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// Display name, family name first.
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// "birth - death" with absent sides left blank.
    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            format_date(self.date_of_birth),
            format_date(self.date_of_death)
        )
    }

    /// Canonical path of the author's detail page.
    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Sanitized author form submission (create and update share the fields)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorForm {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorForm {
    /// Run the submitted fields through the validation pipeline. All fields
    /// are checked; errors accumulate rather than short-circuit.
    pub fn from_form(form: &FormData) -> (Self, Vec<FieldError>) {
        let mut errors = Vec::new();
        let first_name =
            forms::required_name(form, "first_name", "First name", NAME_MAX_LEN, &mut errors);
        let family_name =
            forms::required_name(form, "family_name", "Family name", NAME_MAX_LEN, &mut errors);
        let date_of_birth =
            forms::optional_date(form, "date_of_birth", "date of birth", &mut errors);
        let date_of_death =
            forms::optional_date(form, "date_of_death", "date of death", &mut errors);

        (
            Self {
                first_name,
                family_name,
                date_of_birth,
                date_of_death,
            },
            errors,
        )
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(birth: Option<NaiveDate>, death: Option<NaiveDate>) -> Author {
        Author {
            id: 1,
            first_name: "Jane".to_string(),
            family_name: "Austen".to_string(),
            date_of_birth: birth,
            date_of_death: death,
        }
    }

    #[test]
    fn name_is_family_name_first() {
        assert_eq!(author(None, None).name(), "Austen, Jane");
    }

    #[test]
    fn lifespan_formats_both_dates() {
        let a = author(
            NaiveDate::from_ymd_opt(1775, 12, 16),
            NaiveDate::from_ymd_opt(1817, 7, 18),
        );
        assert_eq!(a.lifespan(), "Dec 16, 1775 - Jul 18, 1817");
    }

    #[test]
    fn lifespan_tolerates_missing_dates() {
        assert_eq!(author(None, None).lifespan(), " - ");
        let a = author(NaiveDate::from_ymd_opt(1775, 12, 16), None);
        assert_eq!(a.lifespan(), "Dec 16, 1775 - ");
    }

    #[test]
    fn url_points_at_detail_page() {
        assert_eq!(author(None, None).url(), "/catalog/author/1");
    }

    #[test]
    fn form_collects_all_errors() {
        let form = FormData::from([
            ("first_name", ""),
            ("family_name", "Le Guin"),
            ("date_of_birth", "21-10-1929"),
        ]);
        let (_, errors) = AuthorForm::from_form(&form);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["first_name", "family_name", "date_of_birth"]);
    }

    #[test]
    fn form_accepts_valid_submission() {
        let form = FormData::from([
            ("first_name", " Jane "),
            ("family_name", "Austen"),
            ("date_of_birth", "1775-12-16"),
            ("date_of_death", ""),
        ]);
        let (parsed, errors) = AuthorForm::from_form(&form);
        assert!(errors.is_empty());
        assert_eq!(parsed.first_name, "Jane");
        assert_eq!(parsed.date_of_birth, NaiveDate::from_ymd_opt(1775, 12, 16));
        assert_eq!(parsed.date_of_death, None);
    }
}
