use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiError;
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(("q" = Option<String>, Query, description = "Free-text query")),
    responses(
        (status = 200, description = "Books matching on title/ISBN and authors matching on name")
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.q.unwrap_or_default();
    let query = query.trim();

    // A blank query returns empty result sets without touching the store
    if query.is_empty() {
        return Ok(Json(json!({ "books": [], "authors": [] })));
    }

    let books = state.book_repo.search(query).await?;
    let authors = state.author_repo.find_all(Some(query)).await?;

    Ok(Json(json!({
        "books": books,
        "authors": authors
    })))
}
