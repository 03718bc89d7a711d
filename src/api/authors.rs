use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiError;
use crate::auth::CallerIdentity;
use crate::domain::{
    authorize, validation, Action, AuthorPatch, DomainError, NewAuthor, Resource,
};
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize)]
pub struct ListAuthorsQuery {
    /// Substring match over the author name
    pub search: Option<String>,
}

pub async fn list_authors(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Query(params): Query<ListAuthorsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Author, Action::Read)?;

    let authors = state.author_repo.find_all(params.search.as_deref()).await?;

    Ok(Json(json!({
        "authors": authors,
        "total": authors.len()
    })))
}

pub async fn get_author(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Author, Action::Read)?;

    let author = state
        .author_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    Ok(Json(author))
}

pub async fn create_author(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Json(payload): Json<NewAuthor>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Author, Action::Write)?;
    validation::validate_new_author(&payload)?;

    let author = state.author_repo.create(payload).await?;

    Ok((StatusCode::CREATED, Json(author)))
}

pub async fn update_author(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AuthorPatch>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Author, Action::Write)?;
    validation::validate_author_patch(&payload)?;

    let author = state.author_repo.update(id, payload).await?;

    Ok(Json(author))
}

pub async fn delete_author(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Author, Action::Write)?;

    state.author_repo.delete(id).await?;

    Ok(Json(json!({ "message": "Author deleted successfully" })))
}
