pub mod repositories;
pub mod state;

pub use repositories::{SeaOrmAuthorRepository, SeaOrmBookRepository, SeaOrmOrderRepository};
pub use state::AppState;
