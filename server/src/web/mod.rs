// server/src/web/mod.rs

pub mod extractors;
pub mod handlers;
pub mod pagination;
pub mod routes;

pub use routes::configure_app_routes;
