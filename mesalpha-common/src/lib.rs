//! # MESAlpha Common Library
//!
//! Shared code for the MESAlpha dashboard services including:
//! - Record models for production samples and maintenance events
//! - Configuration loading and root folder resolution
//! - Clock-string duration codec
//! - Lenient timestamp parsing for loosely-typed store columns

pub mod config;
pub mod db;
pub mod error;
pub mod human_time;
pub mod time;

pub use error::{Error, Result};
