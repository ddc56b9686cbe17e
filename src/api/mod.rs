//! HTTP surface: projection, batch CSV, share and context analysis routes

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
