pub mod handlers;
pub mod media;
pub mod middleware;
pub mod polling;
pub mod routes;
pub mod watchlist;

pub use routes::create_router;
