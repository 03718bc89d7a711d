use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub genre: String,
    pub year: Option<i32>,
    pub quantity: i32,
    pub rating: f64,
    pub isbn: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        super::book_authors::Relation::Author.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::book_authors::Relation::Book.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Book genres. Stored lowercase in the database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Fantasy,
    Detective,
    Romance,
    Drama,
    Mystery,
    #[default]
    Other,
}

impl Genre {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fantasy => "fantasy",
            Genre::Detective => "detective",
            Genre::Romance => "romance",
            Genre::Drama => "drama",
            Genre::Mystery => "mystery",
            Genre::Other => "other",
        }
    }

    /// Case-insensitive parse, used for the `genre` filter parameter.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fantasy" => Some(Genre::Fantasy),
            "detective" => Some(Genre::Detective),
            "romance" => Some(Genre::Romance),
            "drama" => Some(Genre::Drama),
            "mystery" => Some(Genre::Mystery),
            "other" => Some(Genre::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested author representation on book responses (id + name only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: i32,
    pub name: String,
}

/// Nested book representation (id + title only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
}

// DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub genre: Genre,
    pub year: Option<i32>,
    pub quantity: i32,
    pub rating: f64,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    /// Filled in by the repository from the book_authors relation
    pub authors: Vec<AuthorSummary>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            price: model.price,
            genre: Genre::parse(&model.genre).unwrap_or_default(),
            year: model.year,
            quantity: model.quantity,
            rating: model.rating,
            isbn: model.isbn,
            authors: Vec::new(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Model> for BookSummary {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
        }
    }
}
