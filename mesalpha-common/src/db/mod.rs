//! Database models

pub mod models;

pub use models::*;
