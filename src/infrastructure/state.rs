//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AuthorRepository, BookRepository, OrderRepository};
use crate::infrastructure::{SeaOrmAuthorRepository, SeaOrmBookRepository, SeaOrmOrderRepository};
use crate::services::OrderService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Author repository
    pub author_repo: Arc<dyn AuthorRepository>,
    /// Order repository
    pub order_repo: Arc<dyn OrderRepository>,
    /// Order workflow, wired to the repositories above
    pub orders: OrderService,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let book_repo: Arc<dyn BookRepository> = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let author_repo: Arc<dyn AuthorRepository> =
            Arc::new(SeaOrmAuthorRepository::new(db.clone()));
        let order_repo: Arc<dyn OrderRepository> = Arc::new(SeaOrmOrderRepository::new(db.clone()));
        let orders = OrderService::new(book_repo.clone(), order_repo.clone());

        Self {
            db,
            book_repo,
            author_repo,
            order_repo,
            orders,
        }
    }

    /// Get the database connection (auth handlers query users directly)
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
