//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The api layer owns the mapping to HTTP status codes.

use std::collections::BTreeMap;
use std::fmt;

/// Field-keyed validation report: field name -> list of messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Client-correctable input error, keyed by field
    Validation(FieldErrors),
    /// No or invalid caller identity
    Authentication(String),
    /// Identity present but insufficient privilege
    Authorization(String),
    /// Structurally disallowed operation (e.g. full replace of an order)
    MethodNotSupported(String),
    /// Database/persistence error
    Storage(String),
}

impl DomainError {
    /// Single-field validation error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        DomainError::Validation(errors)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(errors) => {
                let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
                write!(f, "Validation error on: {}", fields.join(", "))
            }
            DomainError::Authentication(msg) => write!(f, "Authentication error: {}", msg),
            DomainError::Authorization(msg) => write!(f, "Authorization error: {}", msg),
            DomainError::MethodNotSupported(method) => {
                write!(f, "Method \"{}\" not allowed", method)
            }
            DomainError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}
