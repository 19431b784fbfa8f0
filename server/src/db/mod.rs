// server/src/db/mod.rs

mod postgres;
mod rows;

pub use postgres::PgStore;
