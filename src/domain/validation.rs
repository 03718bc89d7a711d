//! Validation pipeline
//!
//! Each check is a pure function `(candidate) -> Vec<FieldError>`; a pipeline
//! is an ordered slice of checks run before any mutation. All failures are
//! folded into one field-keyed report, never a partial write.

use chrono::{Datelike, NaiveDate, Utc};

use super::repositories::{AuthorPatch, BookPatch, NewAuthor, NewBook, OrderInput};
use super::{DomainError, FieldErrors};

const MIN_YEAR: i32 = 1800;

/// One failed check, attributed to a field
#[derive(Debug)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type Check<T> = fn(&T) -> Vec<FieldError>;

/// Run a pipeline of checks, collecting every failure into one report.
pub fn run<T>(candidate: &T, checks: &[Check<T>]) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();
    for check in checks {
        for e in check(candidate) {
            errors.entry(e.field.to_string()).or_default().push(e.message);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors))
    }
}

pub fn validate_new_book(book: &NewBook) -> Result<(), DomainError> {
    run(
        book,
        &[
            |b| title_present(&b.title),
            |b| price_positive(b.price),
            |b| year_in_range(b.year),
            |b| quantity_non_negative(b.quantity),
            |b| rating_in_range(b.rating),
            |b| isbn_format(&b.isbn),
            |b| {
                if b.author_ids.is_empty() {
                    vec![FieldError::new(
                        "authors",
                        "At least one author must be provided.",
                    )]
                } else {
                    vec![]
                }
            },
        ],
    )
}

pub fn validate_book_patch(patch: &BookPatch) -> Result<(), DomainError> {
    run(
        patch,
        &[
            |p| p.title.as_deref().map(title_present).unwrap_or_default(),
            |p| p.price.map(price_positive).unwrap_or_default(),
            |p| year_in_range(p.year),
            |p| p.quantity.map(quantity_non_negative).unwrap_or_default(),
            |p| p.rating.map(rating_in_range).unwrap_or_default(),
            |p| p.isbn.as_deref().map(isbn_format).unwrap_or_default(),
        ],
    )
}

pub fn validate_new_author(author: &NewAuthor) -> Result<(), DomainError> {
    run(
        author,
        &[
            |a| name_present(&a.name),
            |a| birth_date_valid(a.birth_date.as_deref()),
        ],
    )
}

pub fn validate_author_patch(patch: &AuthorPatch) -> Result<(), DomainError> {
    run(
        patch,
        &[
            |p| p.name.as_deref().map(name_present).unwrap_or_default(),
            |p| birth_date_valid(p.birth_date.as_deref()),
        ],
    )
}

pub fn validate_order_input(input: &OrderInput) -> Result<(), DomainError> {
    run(
        input,
        &[
            |o| {
                if o.address.trim().is_empty() {
                    vec![FieldError::new("address", "This field is required.")]
                } else {
                    vec![]
                }
            },
            |o| {
                if o.items.is_empty() {
                    vec![FieldError::new(
                        "items",
                        "Order must contain at least one item.",
                    )]
                } else {
                    vec![]
                }
            },
            |o| {
                o.items
                    .iter()
                    .filter(|item| item.quantity <= 0)
                    .map(|_| FieldError::new("items", "Quantity must be greater than 0."))
                    .collect()
            },
        ],
    )
}

fn title_present(title: &str) -> Vec<FieldError> {
    if title.trim().is_empty() {
        vec![FieldError::new("title", "This field is required.")]
    } else {
        vec![]
    }
}

fn name_present(name: &str) -> Vec<FieldError> {
    if name.trim().is_empty() {
        vec![FieldError::new("name", "This field is required.")]
    } else {
        vec![]
    }
}

fn price_positive(price: f64) -> Vec<FieldError> {
    if price <= 0.0 {
        vec![FieldError::new("price", "Price must be greater than 0.")]
    } else {
        vec![]
    }
}

fn quantity_non_negative(quantity: i32) -> Vec<FieldError> {
    if quantity < 0 {
        vec![FieldError::new("quantity", "Quantity cannot be negative.")]
    } else {
        vec![]
    }
}

fn rating_in_range(rating: f64) -> Vec<FieldError> {
    if !(0.0..=10.0).contains(&rating) {
        vec![FieldError::new("rating", "Rating must be between 0 and 10.")]
    } else {
        vec![]
    }
}

fn year_in_range(year: Option<i32>) -> Vec<FieldError> {
    let current_year = Utc::now().year();
    match year {
        Some(y) if y < MIN_YEAR || y > current_year => vec![FieldError::new(
            "year",
            format!("Year must be between {} and {}", MIN_YEAR, current_year),
        )],
        _ => vec![],
    }
}

/// ISBN-13: exactly 13 ASCII digits
fn isbn_format(isbn: &str) -> Vec<FieldError> {
    if isbn.len() == 13 && isbn.bytes().all(|b| b.is_ascii_digit()) {
        vec![]
    } else {
        vec![FieldError::new("ISBN", "Invalid ISBN format")]
    }
}

fn birth_date_valid(birth_date: Option<&str>) -> Vec<FieldError> {
    let Some(raw) = birth_date else {
        return vec![];
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) if date > Utc::now().date_naive() => vec![FieldError::new(
            "birth_date",
            "Birth date cannot be in the future.",
        )],
        Ok(_) => vec![],
        Err(_) => vec![FieldError::new(
            "birth_date",
            "Date has wrong format. Use YYYY-MM-DD.",
        )],
    }
}
