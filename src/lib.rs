//! Coding tracker - record coding sessions in a local SQLite file
//!
//! This crate provides:
//! - A single-table SQLite store for coding sessions (start, end, duration)
//! - Range filtering and duration totals
//! - Demonstration data for empty databases
//! - A small CLI over the store
//!
//! # Usage
//!
//! ```ignore
//! use coding_tracker::{Config, Database, Filter, Session, SessionStore};
//!
//! let config = Config::from_file(Config::default_path())?;
//! let store = SessionStore::new(Database::new(config.db_path())?, &config.seed)?;
//! store.insert(&Session::new(start, end))?;
//! let stats = store.sum_duration(&Filter::between(from, to))?;
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use db::Database;
pub use error::{CoreError, Result};
pub use models::{Filter, Session, Stats};
pub use store::SessionStore;
