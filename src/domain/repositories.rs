//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer; the order workflow is
//! written against them so it can be exercised with in-memory fakes.

use async_trait::async_trait;
use serde::Deserialize;

use super::DomainError;
use crate::models::author::Author;
use crate::models::book::Book;
use crate::models::order::{Order, OrderStatus};
use crate::models::Genre;

/// Fixed page size for book listings
pub const BOOK_PAGE_SIZE: u64 = 10;

/// Filter criteria for book queries. Bounds are inclusive.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookQuery {
    pub genre: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    /// Substring match over title and ISBN
    pub search: Option<String>,
    pub page: Option<u64>,
}

/// Paginated result with total count
#[derive(Debug)]
pub struct PaginatedBooks {
    pub books: Vec<Book>,
    pub total: u64,
    pub page: u64,
}

/// Input for creating a book
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub genre: Genre,
    pub year: Option<i32>,
    pub quantity: i32,
    pub rating: f64,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(default)]
    pub author_ids: Vec<i32>,
}

/// Input for updating a book; absent fields are left untouched
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub genre: Option<Genre>,
    pub year: Option<i32>,
    pub quantity: Option<i32>,
    pub rating: Option<f64>,
    #[serde(rename = "ISBN")]
    pub isbn: Option<String>,
    pub author_ids: Option<Vec<i32>>,
}

/// Input for creating an author
#[derive(Debug, Clone, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<String>,
}

/// Input for updating an author; absent fields are left untouched
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub birth_date: Option<String>,
}

/// One requested line of a new order
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub book_id: i32,
    pub quantity: i32,
}

/// Request body for order creation; the caller identity is never part of it
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInput {
    pub address: String,
    pub items: Vec<OrderItemInput>,
}

/// One priced line of a validated order, unit price snapshotted
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub book_id: i32,
    pub quantity: i32,
    pub price: f64,
}

/// A validated, priced order ready to be persisted as one unit of work
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub user_id: i32,
    pub address: String,
    pub lines: Vec<OrderLine>,
}

/// Repository trait for Author entity
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Find all authors, optionally filtered by a name substring
    async fn find_all(&self, name: Option<&str>) -> Result<Vec<Author>, DomainError>;

    /// Find an author by ID, with their books
    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError>;

    /// Create a new author
    async fn create(&self, author: NewAuthor) -> Result<Author, DomainError>;

    /// Update an existing author
    async fn update(&self, id: i32, patch: AuthorPatch) -> Result<Author, DomainError>;

    /// Delete an author by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find books matching the filter criteria, paginated
    async fn find_all(&self, query: BookQuery) -> Result<PaginatedBooks, DomainError>;

    /// Find a single book by ID, with its authors
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Create a new book and its author links
    async fn create(&self, book: NewBook) -> Result<Book, DomainError>;

    /// Update an existing book
    async fn update(&self, id: i32, patch: BookPatch) -> Result<Book, DomainError>;

    /// Delete a book by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Case-insensitive substring search over title and ISBN
    async fn search(&self, query: &str) -> Result<Vec<Book>, DomainError>;
}

/// Repository trait for Order entity
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order draft atomically: the order row, its items and the
    /// stock decrements all land, or none of them do. Each decrement must be
    /// guarded so stock never goes negative, even under concurrent orders.
    async fn create(&self, draft: OrderDraft) -> Result<Order, DomainError>;

    /// Find an order by ID, with its items
    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError>;

    /// List a user's orders, newest first
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Order>, DomainError>;

    /// Set the order status; the only mutation permitted after creation
    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<Order, DomainError>;
}
