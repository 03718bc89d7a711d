use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::api::error::ApiError;
use crate::auth::CallerIdentity;
use crate::domain::{
    authorize, validation, Action, BookPatch, BookQuery, DomainError, NewBook, Resource,
};
use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "Paginated book list, 10 per page")
    )
)]
pub async fn list_books(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Book, Action::Read)?;

    let page = state.book_repo.find_all(query).await?;

    Ok(Json(json!({
        "books": page.books,
        "total": page.total,
        "page": page.page
    })))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book with nested authors"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Book, Action::Read)?;

    let book = state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    Ok(Json(book))
}

#[utoipa::path(
    post,
    path = "/api/books",
    responses(
        (status = 201, description = "Book created"),
        (status = 400, description = "Validation failure, field-keyed"),
        (status = 403, description = "Caller is not staff")
    )
)]
pub async fn create_book(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Json(payload): Json<NewBook>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Book, Action::Write)?;
    validation::validate_new_book(&payload)?;

    let book = state.book_repo.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Book created successfully",
            "book": book
        })),
    ))
}

pub async fn update_book(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BookPatch>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Book, Action::Write)?;
    validation::validate_book_patch(&payload)?;

    let book = state.book_repo.update(id, payload).await?;

    Ok(Json(book))
}

pub async fn delete_book(
    CallerIdentity(caller): CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Resource::Book, Action::Write)?;

    state.book_repo.delete(id).await?;

    Ok(Json(json!({ "message": "Book deleted successfully" })))
}
