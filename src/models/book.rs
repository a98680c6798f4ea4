//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::forms::{self, FieldError, FormData};
use crate::models::{Author, Genre};

/// Full book model from database. `author_id` and the genre links are plain
/// identifiers with no FK constraint; a dangling reference stays stored and
/// read paths must render it as unresolved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
}

impl Book {
    /// Canonical path of the book's detail page.
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Book with its author reference resolved. `author` is `None` when the
/// stored id no longer matches an author record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookWithAuthor {
    #[serde(flatten)]
    pub book: Book,
    pub author: Option<Author>,
}

/// Book with author and genre references resolved for the detail page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
}

/// Sanitized book form submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookForm {
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<i32>,
}

impl BookForm {
    /// Validate and sanitize a book submission. The genre field is
    /// multi-valued: absent, single and repeated submissions all normalize
    /// to a sequence.
    pub fn from_form(form: &FormData) -> (Self, Vec<FieldError>) {
        let mut errors = Vec::new();
        let title = forms::required(form, "title", "Title must not be empty.", &mut errors);
        let author_id =
            forms::required_id(form, "author", "Author must not be empty.", &mut errors);
        let summary = forms::required(form, "summary", "Summary must not be empty.", &mut errors);
        let isbn = forms::required(form, "isbn", "ISBN must not be empty.", &mut errors);
        // A genre selected more than once counts once
        let mut seen = std::collections::HashSet::new();
        let mut genre_ids = forms::id_list(form, "genre", "genre", &mut errors);
        genre_ids.retain(|id| seen.insert(*id));

        (
            Self {
                title,
                author_id,
                summary,
                isbn,
                genre_ids,
            },
            errors,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_genre_field_normalizes_to_empty_list() {
        let form = FormData::from([
            ("title", "Emma"),
            ("author", "1"),
            ("summary", "A novel"),
            ("isbn", "9780141439587"),
        ]);
        let (parsed, errors) = BookForm::from_form(&form);
        assert!(errors.is_empty());
        assert!(parsed.genre_ids.is_empty());
    }

    #[test]
    fn repeated_genre_field_keeps_every_selection() {
        let form = FormData::from([
            ("title", "Emma"),
            ("author", "1"),
            ("summary", "A novel"),
            ("isbn", "9780141439587"),
            ("genre", "2"),
            ("genre", "5"),
        ]);
        let (parsed, errors) = BookForm::from_form(&form);
        assert!(errors.is_empty());
        assert_eq!(parsed.genre_ids, [2, 5]);
    }

    #[test]
    fn duplicate_genre_selection_counts_once() {
        let form = FormData::from([
            ("title", "Emma"),
            ("author", "1"),
            ("summary", "A novel"),
            ("isbn", "9780141439587"),
            ("genre", "2"),
            ("genre", "2"),
            ("genre", "5"),
        ]);
        let (parsed, errors) = BookForm::from_form(&form);
        assert!(errors.is_empty());
        assert_eq!(parsed.genre_ids, [2, 5]);
    }

    #[test]
    fn missing_required_fields_all_reported() {
        let form = FormData::from([("genre", "2")]);
        let (_, errors) = BookForm::from_form(&form);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["title", "author", "summary", "isbn"]);
    }
}
