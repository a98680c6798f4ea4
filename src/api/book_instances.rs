//! Book instance (copy) pages and form endpoints

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
        book::BookWithAuthor,
        book_instance::{BookInstanceForm, BookInstanceWithBook},
    },
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct BookInstanceListEntry {
    #[serde(flatten)]
    pub instance: BookInstanceWithBook,
    pub url: String,
}

#[derive(Serialize, ToSchema)]
pub struct BookInstanceListPage {
    pub title: String,
    pub bookinstance_list: Vec<BookInstanceListEntry>,
}

#[derive(Serialize, ToSchema)]
pub struct BookInstanceDetailPage {
    pub title: String,
    pub bookinstance: BookInstanceWithBook,
}

#[derive(Serialize, ToSchema)]
pub struct BookInstanceFormPage {
    pub title: String,
    /// Books for the form's select
    pub book_list: Vec<BookWithAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookinstance: Option<BookInstanceForm>,
    pub errors: Vec<FieldError>,
}

#[derive(Serialize, ToSchema)]
pub struct BookInstanceDeletePage {
    pub title: String,
    pub bookinstance: BookInstanceWithBook,
}

/// List all copies with their book resolved
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Copy list page", body = BookInstanceListPage)
    )
)]
pub async fn bookinstance_list(
    State(state): State<AppState>,
) -> AppResult<Json<BookInstanceListPage>> {
    let instances = state.services.catalog.instance_list().await?;
    Ok(Json(BookInstanceListPage {
        title: "Book Instance List".to_string(),
        bookinstance_list: instances
            .into_iter()
            .map(|instance| BookInstanceListEntry {
                url: instance.instance.url(),
                instance,
            })
            .collect(),
    }))
}

/// Copy detail page. A copy whose book reference dangles still renders,
/// with the book reported as absent.
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy detail page", body = BookInstanceDetailPage),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn bookinstance_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookInstanceDetailPage>> {
    let bookinstance = state
        .services
        .catalog
        .instance_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;

    let title = match &bookinstance.book {
        Some(book) => format!("Copy: {}", book.title),
        None => "Copy".to_string(),
    };

    Ok(Json(BookInstanceDetailPage {
        title,
        bookinstance,
    }))
}

/// Blank copy form with the book options
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Copy form page", body = BookInstanceFormPage)
    )
)]
pub async fn bookinstance_create_get(
    State(state): State<AppState>,
) -> AppResult<Json<BookInstanceFormPage>> {
    let book_list = state.services.catalog.instance_form_options().await?;
    Ok(Json(BookInstanceFormPage {
        title: "Create BookInstance".to_string(),
        book_list,
        bookinstance: None,
        errors: Vec::new(),
    }))
}

/// Handle copy create form submission
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 303, description = "Created; redirect to the copy's page"),
        (status = 422, description = "Validation errors; form re-rendered", body = BookInstanceFormPage)
    )
)]
pub async fn bookinstance_create_post(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = FormData::from_pairs(pairs);
    let (parsed, errors) = BookInstanceForm::from_form(&form);

    if !errors.is_empty() {
        let book_list = state.services.catalog.instance_form_options().await?;
        let page = BookInstanceFormPage {
            title: "Create BookInstance".to_string(),
            book_list,
            bookinstance: Some(parsed),
            errors,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response());
    }

    let instance = state.services.catalog.create_instance(&parsed).await?;
    Ok(Redirect::to(&instance.url()).into_response())
}

/// Delete confirmation page for a copy (deletion is not guarded)
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Delete confirmation page", body = BookInstanceDeletePage),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn bookinstance_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookInstanceDeletePage>> {
    let bookinstance = state
        .services
        .catalog
        .instance_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;

    Ok(Json(BookInstanceDeletePage {
        title: "Delete BookInstance".to_string(),
        bookinstance,
    }))
}

/// Handle copy delete submission; redirects to the owning book's page
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 303, description = "Deleted; redirect to the owning book (or the copy list when nothing was deleted)")
    )
)]
pub async fn bookinstance_delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    match state.services.catalog.delete_instance(id).await? {
        Some(book_id) => Ok(Redirect::to(&format!("/catalog/book/{}", book_id))),
        None => Ok(Redirect::to("/catalog/bookinstances")),
    }
}

/// Copy form prefilled for update
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy form page", body = BookInstanceFormPage),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn bookinstance_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookInstanceFormPage>> {
    let (instance, book_list) = tokio::try_join!(
        async {
            state
                .services
                .catalog
                .instance_detail(id)
                .await?
                .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
        },
        state.services.catalog.instance_form_options(),
    )?;

    Ok(Json(BookInstanceFormPage {
        title: "Update BookInstance".to_string(),
        book_list,
        bookinstance: Some(BookInstanceForm::from(&instance.instance)),
        errors: Vec::new(),
    }))
}

/// Handle copy update form submission; the record keeps its id
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 303, description = "Updated; redirect to the copy's page"),
        (status = 422, description = "Validation errors; form re-rendered", body = BookInstanceFormPage),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn bookinstance_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let form = FormData::from_pairs(pairs);
    let (parsed, errors) = BookInstanceForm::from_form(&form);

    if !errors.is_empty() {
        let book_list = state.services.catalog.instance_form_options().await?;
        let page = BookInstanceFormPage {
            title: "Update BookInstance".to_string(),
            book_list,
            bookinstance: Some(parsed),
            errors,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response());
    }

    let instance = state
        .services
        .catalog
        .update_instance(id, &parsed)
        .await?
        .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;

    Ok(Redirect::to(&instance.url()).into_response())
}
