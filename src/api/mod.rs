pub mod auth;
pub mod authors;
pub mod books;
pub mod error;
pub mod health;
pub mod orders;
pub mod search;

use axum::{
    routing::{get, post},
    Router,
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Accounts
        .route("/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        // Authors
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .patch(authors::update_author)
                .delete(authors::delete_author),
        )
        // Orders (PUT is structurally rejected)
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route(
            "/orders/:id",
            get(orders::get_order)
                .patch(orders::update_order_status)
                .put(orders::replace_order),
        )
        // Free-text search
        .route("/search", get(search::search))
        .with_state(state);

    // All routes are served under the `/api` prefix (teacher convention).
    Router::new().nest("/api", routes)
}
