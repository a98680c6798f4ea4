//! Books repository.
//!
//! Author and genre references are stored as bare ids with no FK constraint.
//! Resolution happens here, explicitly per field, and a reference whose id no
//! longer exists comes back as `None` / missing instead of an error.

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookDetails, BookForm, BookWithAuthor},
        Author, Genre,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all books sorted by title, each with its author resolved
    pub async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, b.author_id, b.summary, b.isbn,
                   a.id AS resolved_author_id, a.first_name, a.family_name,
                   a.date_of_birth, a.date_of_death
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_book_with_author).collect())
    }

    /// Get book by ID; `None` when absent
    pub async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    /// Get book by ID with author and genre references resolved.
    /// A dangling author id yields `author: None`; genre links whose genre
    /// is gone are dropped from the list.
    pub async fn get_details(&self, id: i32) -> AppResult<Option<BookDetails>> {
        let Some(book) = self.get(id).await? else {
            return Ok(None);
        };

        let author = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, family_name, date_of_birth, date_of_death \
             FROM authors WHERE id = $1",
        )
        .bind(book.author_id)
        .fetch_optional(&self.pool)
        .await?;

        let genres = self.genres_of(id).await?;

        Ok(Some(BookDetails {
            book,
            author,
            genres,
        }))
    }

    /// Resolved genres of a book, in the order they were attached
    pub async fn genres_of(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY bg.position
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    /// Stored genre ids of a book (unresolved, dangling ids included)
    pub async fn genre_ids_of(&self, book_id: i32) -> AppResult<Vec<i32>> {
        let ids: Vec<i32> = sqlx::query_scalar(
            "SELECT genre_id FROM book_genres WHERE book_id = $1 ORDER BY position",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// All books referencing an author (delete-guard dependents)
    pub async fn by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn FROM books \
             WHERE author_id = $1 ORDER BY title",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// All books linked to a genre (delete-guard dependents)
    pub async fn by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.author_id, b.summary, b.isbn
            FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn create(&self, form: &BookForm) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author_id, summary, isbn) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, author_id, summary, isbn",
        )
        .bind(&form.title)
        .bind(form.author_id)
        .bind(&form.summary)
        .bind(&form.isbn)
        .fetch_one(&self.pool)
        .await?;

        self.set_genres(book.id, &form.genre_ids).await?;
        Ok(book)
    }

    /// Update in place, replacing genre links; `None` when the id has no record
    pub async fn update(&self, id: i32, form: &BookForm) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET title = $1, author_id = $2, summary = $3, isbn = $4 \
             WHERE id = $5 \
             RETURNING id, title, author_id, summary, isbn",
        )
        .bind(&form.title)
        .bind(form.author_id)
        .bind(&form.summary)
        .bind(&form.isbn)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match book {
            Some(book) => {
                self.set_genres(book.id, &form.genre_ids).await?;
                Ok(Some(book))
            }
            None => Ok(None),
        }
    }

    async fn set_genres(&self, book_id: i32, genre_ids: &[i32]) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        for (position, genre_id) in genre_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id, position) VALUES ($1, $2, $3) \
                 ON CONFLICT (book_id, genre_id) DO NOTHING",
            )
            .bind(book_id)
            .bind(genre_id)
            .bind(position as i32)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Delete by ID together with its genre links, returning the number of
    /// book rows removed
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn row_to_book_with_author(row: &sqlx::postgres::PgRow) -> BookWithAuthor {
    let book = Book {
        id: row.get("id"),
        title: row.get("title"),
        author_id: row.get("author_id"),
        summary: row.get("summary"),
        isbn: row.get("isbn"),
    };
    let author = row
        .get::<Option<i32>, _>("resolved_author_id")
        .map(|author_id| Author {
            id: author_id,
            first_name: row.get("first_name"),
            family_name: row.get("family_name"),
            date_of_birth: row.get("date_of_birth"),
            date_of_death: row.get("date_of_death"),
        });
    BookWithAuthor { book, author }
}
