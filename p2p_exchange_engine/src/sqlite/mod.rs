//! SQLite database module for the P2P exchange engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
