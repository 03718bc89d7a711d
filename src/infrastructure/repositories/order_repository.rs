//! SeaORM implementation of OrderRepository
//!
//! Order creation is one transaction: the order row, its items and the
//! guarded stock decrements either all commit or all roll back.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::{DomainError, OrderDraft, OrderRepository};
use crate::models::book::{self, BookSummary};
use crate::models::order::{self, Order, OrderStatus};
use crate::models::order_item::{self, OrderItem};

/// SeaORM-based implementation of OrderRepository
pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach items (with book summaries) to an order model.
    async fn load(&self, model: order::Model) -> Result<Order, DomainError> {
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(model.id))
            .order_by_asc(order_item::Column::Id)
            .all(&self.db)
            .await?;

        let book_ids: Vec<i32> = items.iter().map(|i| i.book_id).collect();

        let mut titles: HashMap<i32, String> = HashMap::new();
        if !book_ids.is_empty() {
            let books = book::Entity::find()
                .filter(book::Column::Id.is_in(book_ids))
                .all(&self.db)
                .await?;
            for b in books {
                titles.insert(b.id, b.title);
            }
        }

        let mut dto = Order::from(model);
        dto.items = items
            .into_iter()
            .map(|item| OrderItem {
                book: BookSummary {
                    id: item.book_id,
                    title: titles
                        .get(&item.book_id)
                        .cloned()
                        .unwrap_or_else(|| "Unknown".to_string()),
                },
                quantity: item.quantity,
                price: item.price,
            })
            .collect();
        Ok(dto)
    }
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let txn = self.db.begin().await?;

        // Placeholder total until every line has been priced in
        let model = order::ActiveModel {
            user_id: Set(draft.user_id),
            status: Set(OrderStatus::Created.as_str().to_string()),
            total_price: Set(0.0),
            address: Set(draft.address),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut total = 0.0;
        for line in &draft.lines {
            order_item::ActiveModel {
                order_id: Set(model.id),
                book_id: Set(line.book_id),
                quantity: Set(line.quantity),
                price: Set(line.price),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            // Guarded decrement: the WHERE clause refuses to take stock below
            // zero, so a concurrent order cannot oversell between the
            // engine's validation read and this write.
            let result = book::Entity::update_many()
                .col_expr(
                    book::Column::Quantity,
                    Expr::col(book::Column::Quantity).sub(line.quantity),
                )
                .filter(book::Column::Id.eq(line.book_id))
                .filter(book::Column::Quantity.gte(line.quantity))
                .exec(&txn)
                .await?;

            if result.rows_affected == 0 {
                txn.rollback().await?;
                return Err(DomainError::field("items", "Not enough books in stock."));
            }

            total += line.price * line.quantity as f64;
        }

        let mut active: order::ActiveModel = model.into();
        active.total_price = Set(total);
        let model = active.update(&txn).await?;

        txn.commit().await?;

        self.load(model).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        match order::Entity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.load(model).await?)),
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Order>, DomainError> {
        let models = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut orders = Vec::with_capacity(models.len());
        for model in models {
            orders.push(self.load(model).await?);
        }
        Ok(orders)
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<Order, DomainError> {
        let existing = order::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());

        let model = active.update(&self.db).await?;
        self.load(model).await
    }
}
