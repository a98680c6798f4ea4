//! Catalog service: books, their physical copies, and the home page counts.
//!
//! Multi-read pages fan out their queries with `try_join!`; the first store
//! failure short-circuits the group. An absent primary record maps to `None`
//! for the caller to translate, while empty dependent collections are valid.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::{BookDetails, BookForm, BookWithAuthor},
        book_instance::{BookInstanceForm, BookInstanceWithBook},
        Author, Book, BookInstance, CopyStatus, Genre,
    },
    repository::Repository,
};

/// The five independent counts shown on the home page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Home page counts, issued concurrently and joined
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let (book_count, book_instance_count, book_instance_available_count, author_count, genre_count) =
            tokio::try_join!(
                self.repository.books.count(),
                self.repository.book_instances.count(),
                self.repository.book_instances.count_by_status(CopyStatus::Available),
                self.repository.authors.count(),
                self.repository.genres.count(),
            )?;

        Ok(CatalogCounts {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        })
    }

    // =========================================================================
    // Books
    // =========================================================================

    /// All books with authors resolved, sorted by title
    pub async fn book_list(&self) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.books.list().await
    }

    /// Book with author/genres resolved plus every copy of it
    pub async fn book_detail(
        &self,
        id: i32,
    ) -> AppResult<Option<(BookDetails, Vec<BookInstance>)>> {
        let (details, instances) = tokio::try_join!(
            self.repository.books.get_details(id),
            self.repository.book_instances.by_book(id),
        )?;
        Ok(details.map(|details| (details, instances)))
    }

    /// The option lists a book form needs (author and genre selects)
    pub async fn book_form_options(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(self.repository.authors.list(), self.repository.genres.list())
    }

    /// Create unconditionally (no uniqueness guard for books)
    pub async fn create_book(&self, form: &BookForm) -> AppResult<Book> {
        self.repository.books.create(form).await
    }

    pub async fn update_book(&self, id: i32, form: &BookForm) -> AppResult<Option<Book>> {
        self.repository.books.update(id, form).await
    }

    /// Book together with its copies, for the delete confirmation page
    pub async fn book_delete_view(
        &self,
        id: i32,
    ) -> AppResult<Option<(Book, Vec<BookInstance>)>> {
        let (book, instances) = tokio::try_join!(
            self.repository.books.get(id),
            self.repository.book_instances.by_book(id),
        )?;
        Ok(book.map(|book| (book, instances)))
    }

    /// Unguarded delete; returns whether a record was removed
    pub async fn delete_book(&self, id: i32) -> AppResult<bool> {
        Ok(self.repository.books.delete(id).await? > 0)
    }

    // =========================================================================
    // Book instances
    // =========================================================================

    /// All copies with their book resolved
    pub async fn instance_list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        self.repository.book_instances.list().await
    }

    /// One copy with its book resolved; `None` when the id is unknown.
    /// A dangling book reference is reported as `book: None`, not an error.
    pub async fn instance_detail(&self, id: i32) -> AppResult<Option<BookInstanceWithBook>> {
        self.repository.book_instances.get_with_book(id).await
    }

    /// The book list an instance form needs for its select
    pub async fn instance_form_options(&self) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.books.list().await
    }

    pub async fn create_instance(&self, form: &BookInstanceForm) -> AppResult<BookInstance> {
        self.repository.book_instances.create(form).await
    }

    pub async fn update_instance(
        &self,
        id: i32,
        form: &BookInstanceForm,
    ) -> AppResult<Option<BookInstance>> {
        self.repository.book_instances.update(id, form).await
    }

    /// Unguarded delete; returns the owning book's id for the redirect, or
    /// `None` when there was nothing to delete
    pub async fn delete_instance(&self, id: i32) -> AppResult<Option<i32>> {
        let Some(instance) = self.repository.book_instances.get(id).await? else {
            return Ok(None);
        };
        self.repository.book_instances.delete(id).await?;
        Ok(Some(instance.book_id))
    }
}
