//! Genre pages and form endpoints

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
    models::{genre::GenreForm, Book, Genre},
    services::genres::GenreDeletion,
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct GenreListPage {
    pub title: String,
    pub genre_list: Vec<Genre>,
}

#[derive(Serialize, ToSchema)]
pub struct GenreDetailPage {
    pub title: String,
    pub genre: Genre,
    /// Books linked to this genre; empty is a valid page
    pub genre_books: Vec<Book>,
}

#[derive(Serialize, ToSchema)]
pub struct GenreFormPage {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<GenreForm>,
    pub errors: Vec<FieldError>,
}

#[derive(Serialize, ToSchema)]
pub struct GenreDeletePage {
    pub title: String,
    pub genre: Genre,
    /// Dependent books blocking deletion (empty when deletion may proceed)
    pub genre_books: Vec<Book>,
}

/// List all genres, sorted by name
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genre list page", body = GenreListPage)
    )
)]
pub async fn genre_list(State(state): State<AppState>) -> AppResult<Json<GenreListPage>> {
    let genre_list = state.services.genres.list().await?;
    Ok(Json(GenreListPage {
        title: "Genre List".to_string(),
        genre_list,
    }))
}

/// Genre detail page with its books
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre detail page", body = GenreDetailPage),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenreDetailPage>> {
    let (genre, genre_books) = state
        .services
        .genres
        .detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

    Ok(Json(GenreDetailPage {
        title: "Genre Detail".to_string(),
        genre,
        genre_books,
    }))
}

/// Blank genre form
#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "Genre form page", body = GenreFormPage)
    )
)]
pub async fn genre_create_get() -> Json<GenreFormPage> {
    Json(GenreFormPage {
        title: "Create Genre".to_string(),
        genre: None,
        errors: Vec::new(),
    })
}

/// Handle genre create form submission. A name that already exists resolves
/// to the existing record: no duplicate is inserted and the redirect targets
/// the existing genre's page.
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 303, description = "Redirect to the (new or already existing) genre's page"),
        (status = 422, description = "Validation errors; form re-rendered", body = GenreFormPage)
    )
)]
pub async fn genre_create_post(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = FormData::from_pairs(pairs);
    let (parsed, errors) = GenreForm::from_form(&form);

    if !errors.is_empty() {
        let page = GenreFormPage {
            title: "Create Genre".to_string(),
            genre: Some(parsed),
            errors,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response());
    }

    let genre = state.services.genres.create(&parsed).await?;
    Ok(Redirect::to(&genre.url()).into_response())
}

/// Delete confirmation page listing dependent books
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Delete confirmation page", body = GenreDeletePage),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn genre_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenreDeletePage>> {
    let (genre, genre_books) = state
        .services
        .genres
        .detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

    Ok(Json(GenreDeletePage {
        title: "Delete Genre".to_string(),
        genre,
        genre_books,
    }))
}

/// Handle genre delete submission, guarded by dependent books
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 303, description = "Deleted (or nothing to delete); redirect to the genre list"),
        (status = 200, description = "Blocked by dependent books", body = GenreDeletePage)
    )
)]
pub async fn genre_delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    match state.services.genres.delete(id).await? {
        GenreDeletion::Deleted | GenreDeletion::Missing => {
            Ok(Redirect::to("/catalog/genres").into_response())
        }
        GenreDeletion::Blocked { genre, books } => {
            let page = GenreDeletePage {
                title: "Delete Genre".to_string(),
                genre,
                genre_books: books,
            };
            Ok(Json(page).into_response())
        }
    }
}

/// Genre form prefilled for update
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre form page", body = GenreFormPage),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn genre_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenreFormPage>> {
    let (genre, _) = state
        .services
        .genres
        .detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

    Ok(Json(GenreFormPage {
        title: "Update Genre".to_string(),
        genre: Some(GenreForm { name: genre.name }),
        errors: Vec::new(),
    }))
}

/// Handle genre update form submission. When another genre already holds the
/// submitted name the rename is skipped and the redirect targets that record.
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 303, description = "Redirect to the resulting genre's page"),
        (status = 422, description = "Validation errors; form re-rendered", body = GenreFormPage),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn genre_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = FormData::from_pairs(pairs);
    let (parsed, errors) = GenreForm::from_form(&form);

    if !errors.is_empty() {
        let page = GenreFormPage {
            title: "Update Genre".to_string(),
            genre: Some(parsed),
            errors,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response());
    }

    let genre = state
        .services
        .genres
        .update(id, &parsed)
        .await?
        .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

    Ok(Redirect::to(&genre.url()).into_response())
}
