use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::get_book,
        api::books::create_book,
        api::orders::create_order,
        api::search::search,
    ),
    tags(
        (name = "bookstore-api", description = "Bookstore catalog and ordering API")
    )
)]
pub struct ApiDoc;
