//! Genre management service.
//!
//! Genre names are unique. Instead of rejecting a duplicate submission the
//! service resolves it to the already-stored record, so two creations of the
//! same name converge on one identity. Deletion is guarded by dependent books
//! just like authors.

use crate::{
    error::AppResult,
    models::{genre::GenreForm, Book, Genre},
    repository::Repository,
};

/// Outcome of a guarded genre deletion
#[derive(Debug)]
pub enum GenreDeletion {
    Deleted,
    /// Genre still has dependent books; nothing was removed
    Blocked {
        genre: Genre,
        books: Vec<Book>,
    },
    Missing,
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All genres sorted by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    /// Genre with every book linked to it; `None` when the id is unknown
    pub async fn detail(&self, id: i32) -> AppResult<Option<(Genre, Vec<Book>)>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.get(id),
            self.repository.books.by_genre(id),
        )?;
        Ok(genre.map(|genre| (genre, books)))
    }

    /// Create with the duplicate guard: an existing genre with the same name
    /// (exact, case-sensitive) is returned as-is and nothing is inserted.
    pub async fn create(&self, form: &GenreForm) -> AppResult<Genre> {
        if let Some(existing) = self.repository.genres.find_by_name(&form.name).await? {
            tracing::debug!("Genre '{}' already exists as id={}", form.name, existing.id);
            return Ok(existing);
        }
        self.repository.genres.create(&form.name).await
    }

    /// Update with the duplicate guard against records other than `id`:
    /// when another genre already holds the submitted name, that record is
    /// returned and the rename is skipped.
    pub async fn update(&self, id: i32, form: &GenreForm) -> AppResult<Option<Genre>> {
        if let Some(existing) = self.repository.genres.find_by_name(&form.name).await? {
            if existing.id != id {
                return Ok(Some(existing));
            }
        }
        self.repository.genres.update(id, &form.name).await
    }

    /// Delete with the dependent-books guard
    pub async fn delete(&self, id: i32) -> AppResult<GenreDeletion> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.get(id),
            self.repository.books.by_genre(id),
        )?;

        let Some(genre) = genre else {
            return Ok(GenreDeletion::Missing);
        };
        if !books.is_empty() {
            return Ok(GenreDeletion::Blocked { genre, books });
        }

        self.repository.genres.delete(id).await?;
        Ok(GenreDeletion::Deleted)
    }
}
