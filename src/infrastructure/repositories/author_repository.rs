//! SeaORM implementation of AuthorRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{AuthorPatch, AuthorRepository, DomainError, NewAuthor};
use crate::models::author::{self, ActiveModel, Author, Column, Entity as AuthorEntity};
use crate::models::book::{self, BookSummary};

/// SeaORM-based implementation of AuthorRepository
pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach the related book summaries to an author model.
    async fn with_books(&self, model: author::Model) -> Result<Author, DomainError> {
        let books = model
            .find_related(book::Entity)
            .order_by_asc(book::Column::Id)
            .all(&self.db)
            .await?;

        let mut dto = Author::from(model);
        dto.books = books.into_iter().map(BookSummary::from).collect();
        Ok(dto)
    }
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn find_all(&self, name: Option<&str>) -> Result<Vec<Author>, DomainError> {
        let mut query = AuthorEntity::find().order_by_asc(Column::Name);

        if let Some(name) = name
            && !name.is_empty()
        {
            query = query.filter(Column::Name.contains(name));
        }

        let models = query.all(&self.db).await?;

        let mut authors = Vec::with_capacity(models.len());
        for model in models {
            authors.push(self.with_books(model).await?);
        }
        Ok(authors)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError> {
        match AuthorEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.with_books(model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, author: NewAuthor) -> Result<Author, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ActiveModel {
            name: Set(author.name),
            biography: Set(author.biography),
            birth_date: Set(author.birth_date),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(Author::from(model))
    }

    async fn update(&self, id: i32, patch: AuthorPatch) -> Result<Author, DomainError> {
        let existing = AuthorEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(biography) = patch.biography {
            active.biography = Set(Some(biography));
        }
        if let Some(birth_date) = patch.birth_date {
            active.birth_date = Set(Some(birth_date));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        self.with_books(model).await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = AuthorEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
