//! Author management service.
//!
//! Deletion is guarded: an author referenced by at least one book is never
//! removed. The guard reads complete before any destructive write is issued.

use crate::{
    error::AppResult,
    models::{author::AuthorForm, Author, Book},
    repository::Repository,
};

/// Outcome of a guarded author deletion
#[derive(Debug)]
pub enum AuthorDeletion {
    /// Author removed
    Deleted,
    /// Author still has dependent books; nothing was removed
    Blocked {
        author: Author,
        books: Vec<Book>,
    },
    /// No such author; nothing to delete
    Missing,
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All authors, family name first ordering
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    /// Author with every book referencing them. `None` when the author id is
    /// unknown; an author with zero books is a valid result.
    pub async fn detail(&self, id: i32) -> AppResult<Option<(Author, Vec<Book>)>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.get(id),
            self.repository.books.by_author(id),
        )?;
        Ok(author.map(|author| (author, books)))
    }

    /// Create unconditionally (no uniqueness guard for authors)
    pub async fn create(&self, form: &AuthorForm) -> AppResult<Author> {
        self.repository.authors.create(form).await
    }

    /// Update in place, keeping the same id
    pub async fn update(&self, id: i32, form: &AuthorForm) -> AppResult<Option<Author>> {
        self.repository.authors.update(id, form).await
    }

    /// Delete with the dependent-books guard
    pub async fn delete(&self, id: i32) -> AppResult<AuthorDeletion> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.get(id),
            self.repository.books.by_author(id),
        )?;

        let Some(author) = author else {
            return Ok(AuthorDeletion::Missing);
        };
        if !books.is_empty() {
            return Ok(AuthorDeletion::Blocked { author, books });
        }

        self.repository.authors.delete(id).await?;
        Ok(AuthorDeletion::Deleted)
    }
}
