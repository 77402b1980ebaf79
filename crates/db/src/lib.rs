//! `db` crate — pure persistence layer.
//!
//! Talks to a SQLite datastore through the `sqlite3` command-line engine.
//! Provides the datastore configuration, the typed `Todo` model, statement
//! builders that quote every interpolated value, and the [`TodoRepository`].
//! No HTTP concerns live here.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod sql;

pub use config::DbConfig;
pub use error::RepositoryError;
pub use models::Todo;
pub use repository::TodoRepository;
