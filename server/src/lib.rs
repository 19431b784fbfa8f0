// server/src/lib.rs

//! HTTP surface of the recipe service: configuration, storage backends,
//! request workflows and the actix routes that drive them.

pub mod config;
pub mod db;
pub mod errors;
pub mod pipelines;
pub mod state;
pub mod web;
