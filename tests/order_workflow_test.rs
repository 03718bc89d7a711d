use bookstore_api::db;
use bookstore_api::domain::{DomainError, OrderDraft, OrderItemInput, OrderInput, OrderLine};
use bookstore_api::infrastructure::AppState;
use bookstore_api::models::{book, order, order_item, user, OrderStatus};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

// Helper to create a test app state backed by an in-memory database
async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

// Helper to create a test user
async fn create_test_user(db: &DatabaseConnection, username: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let user = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(None),
        password_hash: Set("hash".to_string()),
        role: Set("user".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = user.insert(db).await.expect("Failed to create user");
    res.id
}

// Helper to create a test book
async fn create_test_book(
    db: &DatabaseConnection,
    title: &str,
    isbn: &str,
    price: f64,
    quantity: i32,
) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let book = book::ActiveModel {
        title: Set(title.to_string()),
        description: Set(String::new()),
        price: Set(price),
        genre: Set("other".to_string()),
        year: Set(Some(2001)),
        quantity: Set(quantity),
        rating: Set(8.0),
        isbn: Set(isbn.to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = book.insert(db).await.expect("Failed to create book");
    res.id
}

async fn stock_of(db: &DatabaseConnection, book_id: i32) -> i32 {
    book::Entity::find_by_id(book_id)
        .one(db)
        .await
        .expect("Failed to fetch book")
        .expect("Book missing")
        .quantity
}

async fn order_count(db: &DatabaseConnection) -> u64 {
    order::Entity::find().count(db).await.expect("count failed")
}

async fn order_item_count(db: &DatabaseConnection) -> u64 {
    order_item::Entity::find()
        .count(db)
        .await
        .expect("count failed")
}

fn input(address: &str, items: Vec<(i32, i32)>) -> OrderInput {
    OrderInput {
        address: address.to_string(),
        items: items
            .into_iter()
            .map(|(book_id, quantity)| OrderItemInput { book_id, quantity })
            .collect(),
    }
}

#[tokio::test]
async fn test_create_order_computes_total_and_decrements_stock() {
    let state = setup_test_state().await;
    let user_id = create_test_user(state.db(), "alice").await;
    let book_id = create_test_book(state.db(), "Dead Souls", "9780000000001", 10.0, 5).await;

    let order = state
        .orders
        .create_order(user_id, input("1 Library Lane", vec![(book_id, 3)]))
        .await
        .expect("order should be created");

    assert_eq!(order.user_id, user_id);
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.total_price, 30.0);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].book.id, book_id);
    assert_eq!(order.items[0].quantity, 3);
    assert_eq!(order.items[0].price, 10.0);

    assert_eq!(stock_of(state.db(), book_id).await, 2);
}

#[tokio::test]
async fn test_multi_line_order_preserves_input_order_and_sums_lines() {
    let state = setup_test_state().await;
    let user_id = create_test_user(state.db(), "alice").await;
    let first = create_test_book(state.db(), "Dead Souls", "9780000000001", 10.0, 5).await;
    let second = create_test_book(state.db(), "The Idiot", "9780000000002", 12.5, 4).await;

    let order = state
        .orders
        .create_order(user_id, input("1 Library Lane", vec![(second, 2), (first, 1)]))
        .await
        .expect("order should be created");

    assert_eq!(order.total_price, 12.5 * 2.0 + 10.0);
    assert_eq!(order.items[0].book.id, second);
    assert_eq!(order.items[1].book.id, first);
    assert_eq!(stock_of(state.db(), first).await, 4);
    assert_eq!(stock_of(state.db(), second).await, 2);
}

#[tokio::test]
async fn test_item_price_is_snapshotted_at_order_time() {
    let state = setup_test_state().await;
    let user_id = create_test_user(state.db(), "alice").await;
    let book_id = create_test_book(state.db(), "Dead Souls", "9780000000001", 10.0, 5).await;

    let order = state
        .orders
        .create_order(user_id, input("1 Library Lane", vec![(book_id, 3)]))
        .await
        .expect("order should be created");

    // Reprice the book after the order was placed
    let mut active: book::ActiveModel = book::Entity::find_by_id(book_id)
        .one(state.db())
        .await
        .unwrap()
        .unwrap()
        .into();
    active.price = Set(99.0);
    active.update(state.db()).await.unwrap();

    let reloaded = state
        .orders
        .get_order(order.id)
        .await
        .unwrap()
        .expect("order should exist");
    assert_eq!(reloaded.items[0].price, 10.0);
    assert_eq!(reloaded.total_price, 30.0);
}

#[tokio::test]
async fn test_empty_items_are_rejected_and_nothing_is_persisted() {
    let state = setup_test_state().await;
    let user_id = create_test_user(state.db(), "alice").await;
    create_test_book(state.db(), "Dead Souls", "9780000000001", 10.0, 5).await;

    let err = state
        .orders
        .create_order(user_id, input("1 Library Lane", vec![]))
        .await
        .unwrap_err();

    match err {
        DomainError::Validation(errors) => assert!(errors.contains_key("items")),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(order_count(state.db()).await, 0);
}

#[tokio::test]
async fn test_insufficient_stock_leaves_stock_unchanged() {
    let state = setup_test_state().await;
    let user_id = create_test_user(state.db(), "alice").await;
    let book_id = create_test_book(state.db(), "Dead Souls", "9780000000001", 10.0, 5).await;

    let err = state
        .orders
        .create_order(user_id, input("1 Library Lane", vec![(book_id, 10)]))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(stock_of(state.db(), book_id).await, 5);
    assert_eq!(order_count(state.db()).await, 0);
    assert_eq!(order_item_count(state.db()).await, 0);
}

#[tokio::test]
async fn test_guarded_decrement_rolls_the_whole_unit_back() {
    let state = setup_test_state().await;
    let user_id = create_test_user(state.db(), "alice").await;
    let in_stock = create_test_book(state.db(), "Dead Souls", "9780000000001", 10.0, 5).await;
    let scarce = create_test_book(state.db(), "The Idiot", "9780000000002", 12.5, 1).await;

    // Drive the repository directly with a draft whose second line exceeds
    // stock, as if stock had shrunk between validation and persistence. The
    // order row and the first line were already written inside the
    // transaction; all of it must be rolled back.
    let draft = OrderDraft {
        user_id,
        address: "1 Library Lane".to_string(),
        lines: vec![
            OrderLine {
                book_id: in_stock,
                quantity: 2,
                price: 10.0,
            },
            OrderLine {
                book_id: scarce,
                quantity: 3,
                price: 12.5,
            },
        ],
    };

    let err = state.order_repo.create(draft).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    assert_eq!(order_count(state.db()).await, 0);
    assert_eq!(order_item_count(state.db()).await, 0);
    assert_eq!(stock_of(state.db(), in_stock).await, 5);
    assert_eq!(stock_of(state.db(), scarce).await, 1);
}

#[tokio::test]
async fn test_status_update_is_the_only_permitted_mutation() {
    let state = setup_test_state().await;
    let user_id = create_test_user(state.db(), "alice").await;
    let book_id = create_test_book(state.db(), "Dead Souls", "9780000000001", 10.0, 5).await;

    let order = state
        .orders
        .create_order(user_id, input("1 Library Lane", vec![(book_id, 2)]))
        .await
        .unwrap();

    let updated = state
        .orders
        .update_status(order.id, OrderStatus::Sent)
        .await
        .unwrap();

    assert_eq!(updated.status, OrderStatus::Sent);
    assert_eq!(updated.total_price, order.total_price);
    assert_eq!(updated.items.len(), order.items.len());

    let missing = state
        .orders
        .update_status(order.id + 100, OrderStatus::Paid)
        .await
        .unwrap_err();
    assert!(matches!(missing, DomainError::NotFound));
}
