//! Book pages and form endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    forms::{FieldError, FormData},
    models::{
        book::{BookDetails, BookForm, BookWithAuthor},
        Author, Book, BookInstance, Genre,
    },
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct BookListEntry {
    #[serde(flatten)]
    pub book: BookWithAuthor,
    pub url: String,
}

#[derive(Serialize, ToSchema)]
pub struct BookListPage {
    pub title: String,
    pub book_list: Vec<BookListEntry>,
}

#[derive(Serialize, ToSchema)]
pub struct BookDetailPage {
    pub title: String,
    pub book: BookDetails,
    /// Copies of this book; empty is a valid page
    pub book_instances: Vec<BookInstance>,
}

#[derive(Serialize, ToSchema)]
pub struct BookFormPage {
    pub title: String,
    /// Authors for the form's select
    pub authors: Vec<Author>,
    /// Genres for the form's checkboxes
    pub genres: Vec<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookForm>,
    pub errors: Vec<FieldError>,
}

#[derive(Serialize, ToSchema)]
pub struct BookDeletePage {
    pub title: String,
    pub book: Book,
    pub book_instances: Vec<BookInstance>,
}

/// List all books with their author, sorted by title
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list page", body = BookListPage)
    )
)]
pub async fn book_list(State(state): State<AppState>) -> AppResult<Json<BookListPage>> {
    let books = state.services.catalog.book_list().await?;
    Ok(Json(BookListPage {
        title: "Book List".to_string(),
        book_list: books
            .into_iter()
            .map(|book| BookListEntry {
                url: book.book.url(),
                book,
            })
            .collect(),
    }))
}

/// Book detail page with resolved author, genres and the book's copies.
/// A dangling author reference renders as an absent author, not a failure.
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book detail page", body = BookDetailPage),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetailPage>> {
    let (book, book_instances) = state
        .services
        .catalog
        .book_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    Ok(Json(BookDetailPage {
        title: book.book.title.clone(),
        book,
        book_instances,
    }))
}

/// Blank book form with author and genre options
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 200, description = "Book form page", body = BookFormPage)
    )
)]
pub async fn book_create_get(State(state): State<AppState>) -> AppResult<Json<BookFormPage>> {
    let (authors, genres) = state.services.catalog.book_form_options().await?;
    Ok(Json(BookFormPage {
        title: "Create Book".to_string(),
        authors,
        genres,
        book: None,
        errors: Vec::new(),
    }))
}

/// Handle book create form submission
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 303, description = "Created; redirect to the book's page"),
        (status = 422, description = "Validation errors; form re-rendered", body = BookFormPage)
    )
)]
pub async fn book_create_post(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = FormData::from_pairs(pairs);
    let (parsed, errors) = BookForm::from_form(&form);

    if !errors.is_empty() {
        // Re-render needs the option lists again
        let (authors, genres) = state.services.catalog.book_form_options().await?;
        let page = BookFormPage {
            title: "Create Book".to_string(),
            authors,
            genres,
            book: Some(parsed),
            errors,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response());
    }

    let book = state.services.catalog.create_book(&parsed).await?;
    Ok(Redirect::to(&book.url()).into_response())
}

/// Delete confirmation page. Book deletion is not guarded; the copies are
/// shown for information only.
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Delete confirmation page", body = BookDeletePage),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDeletePage>> {
    let (book, book_instances) = state
        .services
        .catalog
        .book_delete_view(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    Ok(Json(BookDeletePage {
        title: "Delete Book".to_string(),
        book,
        book_instances,
    }))
}

/// Handle book delete submission (unconditional)
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Deleted (or nothing to delete); redirect to the book list")
    )
)]
pub async fn book_delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    state.services.catalog.delete_book(id).await?;
    Ok(Redirect::to("/catalog/books"))
}

/// Book form prefilled for update
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book form page", body = BookFormPage),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookFormPage>> {
    let ((details, _), (authors, genres)) = tokio::try_join!(
        async {
            state
                .services
                .catalog
                .book_detail(id)
                .await?
                .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
        },
        state.services.catalog.book_form_options(),
    )?;

    let book = BookForm {
        title: details.book.title.clone(),
        author_id: Some(details.book.author_id),
        summary: details.book.summary.clone(),
        isbn: details.book.isbn.clone(),
        genre_ids: details.genres.iter().map(|g| g.id).collect(),
    };

    Ok(Json(BookFormPage {
        title: "Update Book".to_string(),
        authors,
        genres,
        book: Some(book),
        errors: Vec::new(),
    }))
}

/// Handle book update form submission; the record keeps its id
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Updated; redirect to the book's page"),
        (status = 422, description = "Validation errors; form re-rendered", body = BookFormPage),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = FormData::from_pairs(pairs);
    let (parsed, errors) = BookForm::from_form(&form);

    if !errors.is_empty() {
        let (authors, genres) = state.services.catalog.book_form_options().await?;
        let page = BookFormPage {
            title: "Update Book".to_string(),
            authors,
            genres,
            book: Some(parsed),
            errors,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response());
    }

    let book = state
        .services
        .catalog
        .update_book(id, &parsed)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    Ok(Redirect::to(&book.url()).into_response())
}
