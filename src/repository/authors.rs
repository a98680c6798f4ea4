//! Authors repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::author::AuthorForm, models::Author};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all authors sorted by family name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, family_name, date_of_birth, date_of_death \
             FROM authors ORDER BY family_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get author by ID; `None` when absent
    pub async fn get(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, family_name, date_of_birth, date_of_death \
             FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    /// Count all authors
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn create(&self, form: &AuthorForm) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (first_name, family_name, date_of_birth, date_of_death) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, first_name, family_name, date_of_birth, date_of_death",
        )
        .bind(&form.first_name)
        .bind(&form.family_name)
        .bind(form.date_of_birth)
        .bind(form.date_of_death)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    /// Update in place; `None` when the id has no record
    pub async fn update(&self, id: i32, form: &AuthorForm) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "UPDATE authors \
             SET first_name = $1, family_name = $2, date_of_birth = $3, date_of_death = $4 \
             WHERE id = $5 \
             RETURNING id, first_name, family_name, date_of_birth, date_of_death",
        )
        .bind(&form.first_name)
        .bind(&form.family_name)
        .bind(form.date_of_birth)
        .bind(form.date_of_death)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    /// Delete by ID, returning the number of rows removed
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
