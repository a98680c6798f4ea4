//! Book instances (physical copies) repository

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstance, BookInstanceForm, BookInstanceWithBook},
        Book, CopyStatus,
    },
};

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all copies with their book resolved; a dangling book id reads
    /// as `book: None`
    pub async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        let rows = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back,
                   b.id AS resolved_book_id, b.title, b.author_id, b.summary, b.isbn
            FROM book_instances bi
            LEFT JOIN books b ON b.id = bi.book_id
            ORDER BY bi.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_instance_with_book).collect())
    }

    /// Get copy by ID; `None` when absent
    pub async fn get(&self, id: i32) -> AppResult<Option<BookInstance>> {
        let instance = sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(instance)
    }

    /// Get copy by ID with its book resolved
    pub async fn get_with_book(&self, id: i32) -> AppResult<Option<BookInstanceWithBook>> {
        let row = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back,
                   b.id AS resolved_book_id, b.title, b.author_id, b.summary, b.isbn
            FROM book_instances bi
            LEFT JOIN books b ON b.id = bi.book_id
            WHERE bi.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_instance_with_book))
    }

    /// All copies of a book
    pub async fn by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances \
             WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(instances)
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies with the given status
    pub async fn count_by_status(&self, status: CopyStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn create(&self, form: &BookInstanceForm) -> AppResult<BookInstance> {
        let instance = sqlx::query_as::<_, BookInstance>(
            "INSERT INTO book_instances (book_id, imprint, status, due_back) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, book_id, imprint, status, due_back",
        )
        .bind(form.book_id)
        .bind(&form.imprint)
        .bind(form.status)
        .bind(form.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(instance)
    }

    /// Update in place; `None` when the id has no record
    pub async fn update(
        &self,
        id: i32,
        form: &BookInstanceForm,
    ) -> AppResult<Option<BookInstance>> {
        let instance = sqlx::query_as::<_, BookInstance>(
            "UPDATE book_instances \
             SET book_id = $1, imprint = $2, status = $3, due_back = $4 \
             WHERE id = $5 \
             RETURNING id, book_id, imprint, status, due_back",
        )
        .bind(form.book_id)
        .bind(&form.imprint)
        .bind(form.status)
        .bind(form.due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(instance)
    }

    /// Delete by ID, returning the number of rows removed
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn row_to_instance_with_book(row: &sqlx::postgres::PgRow) -> BookInstanceWithBook {
    let instance = BookInstance {
        id: row.get("id"),
        book_id: row.get("book_id"),
        imprint: row.get("imprint"),
        status: row.get("status"),
        due_back: row.get("due_back"),
    };
    let book = row.get::<Option<i32>, _>("resolved_book_id").map(|book_id| Book {
        id: book_id,
        title: row.get("title"),
        author_id: row.get("author_id"),
        summary: row.get("summary"),
        isbn: row.get("isbn"),
    });
    BookInstanceWithBook { instance, book }
}
