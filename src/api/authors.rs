//! Author pages and form endpoints

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
    models::{author::AuthorForm, Author, Book},
    services::authors::AuthorDeletion,
    AppState,
};

/// Author projection with the derived display fields templates use
#[derive(Serialize, ToSchema)]
pub struct AuthorModel {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub lifespan: String,
    pub url: String,
}

impl From<Author> for AuthorModel {
    fn from(author: Author) -> Self {
        Self {
            name: author.name(),
            lifespan: author.lifespan(),
            url: author.url(),
            author,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AuthorListPage {
    pub title: String,
    pub author_list: Vec<AuthorModel>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthorDetailPage {
    pub title: String,
    pub author: AuthorModel,
    /// Books referencing this author; empty is a valid page
    pub author_books: Vec<Book>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthorFormPage {
    pub title: String,
    /// Sanitized values to re-render, absent on a blank form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorForm>,
    pub errors: Vec<FieldError>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthorDeletePage {
    pub title: String,
    pub author: AuthorModel,
    /// Dependent books blocking deletion (empty when deletion may proceed)
    pub author_books: Vec<Book>,
}

/// List all authors, sorted by family name
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Author list page", body = AuthorListPage)
    )
)]
pub async fn author_list(State(state): State<AppState>) -> AppResult<Json<AuthorListPage>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(AuthorListPage {
        title: "Author List".to_string(),
        author_list: authors.into_iter().map(AuthorModel::from).collect(),
    }))
}

/// Author detail page with their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author detail page", body = AuthorDetailPage),
        (status = 404, description = "Author not found")
    )
)]
pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetailPage>> {
    let (author, author_books) = state
        .services
        .authors
        .detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

    Ok(Json(AuthorDetailPage {
        title: "Author Detail".to_string(),
        author: author.into(),
        author_books,
    }))
}

/// Blank author form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "Author form page", body = AuthorFormPage)
    )
)]
pub async fn author_create_get() -> Json<AuthorFormPage> {
    Json(AuthorFormPage {
        title: "Create Author".to_string(),
        author: None,
        errors: Vec::new(),
    })
}

/// Handle author create form submission
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 303, description = "Created; redirect to the author's page"),
        (status = 422, description = "Validation errors; form re-rendered", body = AuthorFormPage)
    )
)]
pub async fn author_create_post(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = FormData::from_pairs(pairs);
    let (parsed, errors) = AuthorForm::from_form(&form);

    if !errors.is_empty() {
        let page = AuthorFormPage {
            title: "Create Author".to_string(),
            author: Some(parsed),
            errors,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response());
    }

    let author = state.services.authors.create(&parsed).await?;
    Ok(Redirect::to(&author.url()).into_response())
}

/// Delete confirmation page listing dependent books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Delete confirmation page", body = AuthorDeletePage),
        (status = 404, description = "Author not found")
    )
)]
pub async fn author_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDeletePage>> {
    let (author, author_books) = state
        .services
        .authors
        .detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

    Ok(Json(AuthorDeletePage {
        title: "Delete Author".to_string(),
        author: author.into(),
        author_books,
    }))
}

/// Handle author delete submission. Deletion is refused while books still
/// reference the author; the confirmation page comes back with the
/// dependents instead.
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 303, description = "Deleted (or nothing to delete); redirect to the author list"),
        (status = 200, description = "Blocked by dependent books", body = AuthorDeletePage)
    )
)]
pub async fn author_delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    match state.services.authors.delete(id).await? {
        AuthorDeletion::Deleted | AuthorDeletion::Missing => {
            Ok(Redirect::to("/catalog/authors").into_response())
        }
        AuthorDeletion::Blocked { author, books } => {
            let page = AuthorDeletePage {
                title: "Delete Author".to_string(),
                author: author.into(),
                author_books: books,
            };
            Ok(Json(page).into_response())
        }
    }
}

/// Author form prefilled for update
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author form page", body = AuthorFormPage),
        (status = 404, description = "Author not found")
    )
)]
pub async fn author_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorFormPage>> {
    let (author, _) = state
        .services
        .authors
        .detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

    Ok(Json(AuthorFormPage {
        title: "Update Author".to_string(),
        author: Some(AuthorForm::from(&author)),
        errors: Vec::new(),
    }))
}

/// Handle author update form submission; the record keeps its id
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 303, description = "Updated; redirect to the author's page"),
        (status = 422, description = "Validation errors; form re-rendered", body = AuthorFormPage),
        (status = 404, description = "Author not found")
    )
)]
pub async fn author_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = FormData::from_pairs(pairs);
    let (parsed, errors) = AuthorForm::from_form(&form);

    if !errors.is_empty() {
        let page = AuthorFormPage {
            title: "Update Author".to_string(),
            author: Some(parsed),
            errors,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response());
    }

    let author = state
        .services
        .authors
        .update(id, &parsed)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

    Ok(Redirect::to(&author.url()).into_response())
}
