//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{
    BookPatch, BookQuery, BookRepository, DomainError, NewBook, PaginatedBooks, BOOK_PAGE_SIZE,
};
use crate::models::book::{self, ActiveModel, AuthorSummary, Book, Column, Entity as BookEntity};
use crate::models::{author, book_authors};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach the related author summaries to a book model.
    async fn with_authors(&self, model: book::Model) -> Result<Book, DomainError> {
        let authors = model
            .find_related(author::Entity)
            .order_by_asc(author::Column::Id)
            .all(&self.db)
            .await?;

        let mut dto = Book::from(model);
        dto.authors = authors
            .into_iter()
            .map(|a| AuthorSummary {
                id: a.id,
                name: a.name,
            })
            .collect();
        Ok(dto)
    }

    /// Every id in `author_ids` must reference an existing author.
    async fn check_authors_exist(&self, author_ids: &[i32]) -> Result<(), DomainError> {
        for author_id in author_ids {
            if author::Entity::find_by_id(*author_id)
                .one(&self.db)
                .await?
                .is_none()
            {
                return Err(DomainError::field(
                    "author_ids",
                    format!("Author {} does not exist.", author_id),
                ));
            }
        }
        Ok(())
    }

    /// ISBN uniqueness, optionally ignoring one book (for updates).
    async fn check_isbn_unique(
        &self,
        isbn: &str,
        exclude_id: Option<i32>,
    ) -> Result<(), DomainError> {
        let mut query = BookEntity::find().filter(Column::Isbn.eq(isbn));
        if let Some(id) = exclude_id {
            query = query.filter(Column::Id.ne(id));
        }
        if query.one(&self.db).await?.is_some() {
            return Err(DomainError::field(
                "ISBN",
                "Book with this ISBN already exists.",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, query: BookQuery) -> Result<PaginatedBooks, DomainError> {
        let mut condition = Condition::all();

        // Case-insensitive exact match; stored values are lowercase
        if let Some(genre) = &query.genre
            && !genre.is_empty()
        {
            condition = condition.add(Column::Genre.eq(genre.to_ascii_lowercase()));
        }

        if let Some(min_price) = query.min_price {
            condition = condition.add(Column::Price.gte(min_price));
        }

        if let Some(max_price) = query.max_price {
            condition = condition.add(Column::Price.lte(max_price));
        }

        if let Some(min_rating) = query.min_rating {
            condition = condition.add(Column::Rating.gte(min_rating));
        }

        if let Some(max_rating) = query.max_rating {
            condition = condition.add(Column::Rating.lte(max_rating));
        }

        if let Some(search) = &query.search
            && !search.is_empty()
        {
            condition = condition.add(
                Condition::any()
                    .add(Column::Title.contains(search))
                    .add(Column::Isbn.contains(search)),
            );
        }

        let paginator = BookEntity::find()
            .filter(condition)
            .order_by_asc(Column::Id)
            .paginate(&self.db, BOOK_PAGE_SIZE);

        let page = query.page.unwrap_or(0);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page).await?;

        let mut books = Vec::with_capacity(models.len());
        for model in models {
            books.push(self.with_authors(model).await?);
        }

        Ok(PaginatedBooks { books, total, page })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        match BookEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.with_authors(model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, book: NewBook) -> Result<Book, DomainError> {
        self.check_authors_exist(&book.author_ids).await?;
        self.check_isbn_unique(&book.isbn, None).await?;

        let now = chrono::Utc::now().to_rfc3339();

        let txn = self.db.begin().await?;

        let model = ActiveModel {
            title: Set(book.title),
            description: Set(book.description.unwrap_or_default()),
            price: Set(book.price),
            genre: Set(book.genre.as_str().to_string()),
            year: Set(book.year),
            quantity: Set(book.quantity),
            rating: Set(book.rating),
            isbn: Set(book.isbn),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for author_id in &book.author_ids {
            book_authors::ActiveModel {
                book_id: Set(model.id),
                author_id: Set(*author_id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        self.with_authors(model).await
    }

    async fn update(&self, id: i32, patch: BookPatch) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        if let Some(isbn) = &patch.isbn
            && *isbn != existing.isbn
        {
            self.check_isbn_unique(isbn, Some(id)).await?;
        }

        if let Some(author_ids) = &patch.author_ids {
            self.check_authors_exist(author_ids).await?;
        }

        let now = chrono::Utc::now().to_rfc3339();

        let txn = self.db.begin().await?;

        let mut active: ActiveModel = existing.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(genre) = patch.genre {
            active.genre = Set(genre.as_str().to_string());
        }
        if let Some(year) = patch.year {
            active.year = Set(Some(year));
        }
        if let Some(quantity) = patch.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(rating) = patch.rating {
            active.rating = Set(rating);
        }
        if let Some(isbn) = patch.isbn {
            active.isbn = Set(isbn);
        }
        active.updated_at = Set(now);

        let model = active.update(&txn).await?;

        // Replace the author links only when the patch carries them
        if let Some(author_ids) = patch.author_ids {
            book_authors::Entity::delete_many()
                .filter(book_authors::Column::BookId.eq(id))
                .exec(&txn)
                .await?;
            for author_id in author_ids {
                book_authors::ActiveModel {
                    book_id: Set(id),
                    author_id: Set(author_id),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;

        self.with_authors(model).await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Book>, DomainError> {
        let models = BookEntity::find()
            .filter(
                Condition::any()
                    .add(Column::Title.contains(query))
                    .add(Column::Isbn.contains(query)),
            )
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        let mut books = Vec::with_capacity(models.len());
        for model in models {
            books.push(self.with_authors(model).await?);
        }
        Ok(books)
    }
}
