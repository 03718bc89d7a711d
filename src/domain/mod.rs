pub mod errors;
pub mod policy;
pub mod repositories;
pub mod validation;

pub use errors::{DomainError, FieldErrors};
pub use policy::{authorize, authorize_order_access, Action, Caller, Resource};
pub use repositories::{
    AuthorPatch, AuthorRepository, BookPatch, BookQuery, BookRepository, NewAuthor, NewBook,
    OrderDraft, OrderInput, OrderItemInput, OrderLine, OrderRepository, PaginatedBooks,
    BOOK_PAGE_SIZE,
};
