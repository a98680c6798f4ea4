//! Home page endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, services::catalog::CatalogCounts, AppState};

/// Home page model: the five entity counts
#[derive(Serialize, ToSchema)]
pub struct IndexPage {
    pub title: String,
    pub data: CatalogCounts,
}

/// Local Library home page
#[utoipa::path(
    get,
    path = "/catalog/",
    tag = "catalog",
    responses(
        (status = 200, description = "Home page counts", body = IndexPage)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Json<IndexPage>> {
    let data = state.services.catalog.counts().await?;
    Ok(Json(IndexPage {
        title: "Local Library Home".to_string(),
        data,
    }))
}
