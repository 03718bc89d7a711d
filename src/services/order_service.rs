//! Order workflow - converts a cart of requested items into a persisted
//! order: stock validation, line pricing, snapshot persistence, stock
//! decrement. Written against the repository traits so it can run on an
//! in-memory store in tests.

use std::sync::Arc;

use crate::domain::{
    validation, BookRepository, DomainError, OrderDraft, OrderInput, OrderLine, OrderRepository,
};
use crate::models::order::{Order, OrderStatus};

#[derive(Clone)]
pub struct OrderService {
    books: Arc<dyn BookRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(books: Arc<dyn BookRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { books, orders }
    }

    /// Create an order for `user_id`.
    ///
    /// Validates the request (non-empty items, positive quantities, address),
    /// checks stock per item against the current book record, snapshots the
    /// unit price of every line, then hands the priced draft to the order
    /// repository which persists order + items + stock decrements as one
    /// atomic unit.
    pub async fn create_order(
        &self,
        user_id: i32,
        input: OrderInput,
    ) -> Result<Order, DomainError> {
        validation::validate_order_input(&input)?;

        let mut lines = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let book = self
                .books
                .find_by_id(item.book_id)
                .await?
                .ok_or_else(|| {
                    DomainError::field(
                        "items",
                        format!("Book {} does not exist.", item.book_id),
                    )
                })?;

            if book.quantity < item.quantity {
                return Err(DomainError::field("items", "Not enough books in stock."));
            }

            // Unit price captured now; later book price changes must not
            // affect this order.
            lines.push(OrderLine {
                book_id: book.id,
                quantity: item.quantity,
                price: book.price,
            });
        }

        let order = self
            .orders
            .create(OrderDraft {
                user_id,
                address: input.address,
                lines,
            })
            .await?;

        tracing::info!(
            order_id = order.id,
            user_id,
            total = order.total_price,
            "order created"
        );

        Ok(order)
    }

    pub async fn get_order(&self, id: i32) -> Result<Option<Order>, DomainError> {
        self.orders.find_by_id(id).await
    }

    pub async fn list_orders(&self, user_id: i32) -> Result<Vec<Order>, DomainError> {
        self.orders.list_for_user(user_id).await
    }

    /// The only mutation permitted after creation.
    pub async fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<Order, DomainError> {
        let order = self.orders.update_status(id, status).await?;
        tracing::info!(order_id = order.id, status = %status, "order status updated");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{
        BookPatch, BookQuery, NewBook, OrderItemInput, PaginatedBooks,
    };
    use crate::models::book::Book;
    use crate::models::book::BookSummary;
    use crate::models::order_item::OrderItem;
    use crate::models::Genre;

    /// In-memory store implementing both repository traits with the same
    /// contract as the SeaORM implementations: order creation is atomic and
    /// the stock decrement is guarded.
    #[derive(Default)]
    struct InMemoryStore {
        books: Mutex<HashMap<i32, Book>>,
        orders: Mutex<Vec<Order>>,
    }

    impl InMemoryStore {
        fn with_books(books: Vec<Book>) -> Arc<Self> {
            let store = Self::default();
            let mut map = store.books.lock().unwrap();
            for book in books {
                map.insert(book.id, book);
            }
            drop(map);
            Arc::new(store)
        }

        fn stock_of(&self, book_id: i32) -> i32 {
            self.books.lock().unwrap()[&book_id].quantity
        }

        fn set_price(&self, book_id: i32, price: f64) {
            self.books.lock().unwrap().get_mut(&book_id).unwrap().price = price;
        }

        fn order_count(&self) -> usize {
            self.orders.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl BookRepository for InMemoryStore {
        async fn find_all(&self, _query: BookQuery) -> Result<PaginatedBooks, DomainError> {
            unimplemented!("not exercised by the order workflow")
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
            Ok(self.books.lock().unwrap().get(&id).cloned())
        }

        async fn create(&self, _book: NewBook) -> Result<Book, DomainError> {
            unimplemented!("not exercised by the order workflow")
        }

        async fn update(&self, _id: i32, _patch: BookPatch) -> Result<Book, DomainError> {
            unimplemented!("not exercised by the order workflow")
        }

        async fn delete(&self, _id: i32) -> Result<(), DomainError> {
            unimplemented!("not exercised by the order workflow")
        }

        async fn search(&self, _query: &str) -> Result<Vec<Book>, DomainError> {
            unimplemented!("not exercised by the order workflow")
        }
    }

    #[async_trait]
    impl OrderRepository for InMemoryStore {
        async fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
            let mut books = self.books.lock().unwrap();
            let mut orders = self.orders.lock().unwrap();

            // Guarded decrement over a snapshot; bail before touching anything
            for line in &draft.lines {
                let book = books
                    .get(&line.book_id)
                    .ok_or_else(|| DomainError::field("items", "Book does not exist."))?;
                if book.quantity < line.quantity {
                    return Err(DomainError::field("items", "Not enough books in stock."));
                }
            }

            let mut total = 0.0;
            let mut items = Vec::with_capacity(draft.lines.len());
            for line in &draft.lines {
                let book = books.get_mut(&line.book_id).unwrap();
                book.quantity -= line.quantity;
                total += line.price * line.quantity as f64;
                items.push(OrderItem {
                    book: BookSummary {
                        id: book.id,
                        title: book.title.clone(),
                    },
                    quantity: line.quantity,
                    price: line.price,
                });
            }

            let order = Order {
                id: orders.len() as i32 + 1,
                user_id: draft.user_id,
                status: OrderStatus::Created,
                total_price: total,
                address: draft.address,
                created_at: "2024-01-01T00:00:00Z".to_string(),
                items,
            };
            orders.push(order.clone());
            Ok(order)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.id == id)
                .cloned())
        }

        async fn list_for_user(&self, user_id: i32) -> Result<Vec<Order>, DomainError> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn update_status(
            &self,
            id: i32,
            status: OrderStatus,
        ) -> Result<Order, DomainError> {
            let mut orders = self.orders.lock().unwrap();
            let order = orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or(DomainError::NotFound)?;
            order.status = status;
            Ok(order.clone())
        }
    }

    fn book(id: i32, price: f64, quantity: i32) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            description: String::new(),
            price,
            genre: Genre::Other,
            year: Some(2001),
            quantity,
            rating: 8.0,
            isbn: format!("978000000{:04}", id),
            authors: Vec::new(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn service(store: &Arc<InMemoryStore>) -> OrderService {
        OrderService::new(store.clone(), store.clone())
    }

    fn order_input(items: Vec<(i32, i32)>) -> OrderInput {
        OrderInput {
            address: "1 Library Lane".to_string(),
            items: items
                .into_iter()
                .map(|(book_id, quantity)| OrderItemInput { book_id, quantity })
                .collect(),
        }
    }

    #[tokio::test]
    async fn total_is_sum_of_line_prices() {
        let store = InMemoryStore::with_books(vec![book(1, 10.0, 5), book(2, 12.5, 4)]);
        let order = service(&store)
            .create_order(1, order_input(vec![(1, 3), (2, 2)]))
            .await
            .unwrap();

        assert_eq!(order.total_price, 10.0 * 3.0 + 12.5 * 2.0);
        let computed: f64 = order
            .items
            .iter()
            .map(|i| i.price * i.quantity as f64)
            .sum();
        assert_eq!(order.total_price, computed);
        assert_eq!(store.stock_of(1), 2);
        assert_eq!(store.stock_of(2), 2);
    }

    #[tokio::test]
    async fn item_price_is_a_snapshot() {
        let store = InMemoryStore::with_books(vec![book(1, 10.0, 5)]);
        let svc = service(&store);
        let order = svc.create_order(1, order_input(vec![(1, 3)])).await.unwrap();

        store.set_price(1, 99.0);

        let reloaded = svc.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(reloaded.items[0].price, 10.0);
        assert_eq!(reloaded.total_price, 30.0);
    }

    #[tokio::test]
    async fn empty_items_are_rejected_without_persisting() {
        let store = InMemoryStore::with_books(vec![book(1, 10.0, 5)]);
        let err = service(&store)
            .create_order(1, order_input(vec![]))
            .await
            .unwrap_err();

        match err {
            DomainError::Validation(errors) => assert!(errors.contains_key("items")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn insufficient_stock_leaves_everything_untouched() {
        let store = InMemoryStore::with_books(vec![book(1, 10.0, 5), book(2, 5.0, 1)]);
        let err = service(&store)
            .create_order(1, order_input(vec![(1, 3), (2, 2)]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.stock_of(1), 5);
        assert_eq!(store.stock_of(2), 1);
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn stock_is_decremented_by_exactly_the_ordered_quantity() {
        let store = InMemoryStore::with_books(vec![book(1, 10.0, 5)]);
        service(&store)
            .create_order(1, order_input(vec![(1, 3)]))
            .await
            .unwrap();
        assert_eq!(store.stock_of(1), 2);
    }

    #[tokio::test]
    async fn unknown_book_is_a_validation_error() {
        let store = InMemoryStore::with_books(vec![book(1, 10.0, 5)]);
        let err = service(&store)
            .create_order(1, order_input(vec![(42, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected() {
        let store = InMemoryStore::with_books(vec![book(1, 10.0, 5)]);
        let err = service(&store)
            .create_order(1, order_input(vec![(1, 0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.stock_of(1), 5);
    }

    #[tokio::test]
    async fn status_can_be_updated_after_creation() {
        let store = InMemoryStore::with_books(vec![book(1, 10.0, 5)]);
        let svc = service(&store);
        let order = svc.create_order(1, order_input(vec![(1, 1)])).await.unwrap();
        assert_eq!(order.status, OrderStatus::Created);

        let updated = svc.update_status(order.id, OrderStatus::Paid).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Paid);
        assert_eq!(updated.total_price, order.total_price);
    }
}
