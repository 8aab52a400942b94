//! SQLite-backed transient cache for rewritten content.
//!
//! This module provides a persistent, content-addressed cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Content-addressed keys using SHA-256 hashing
//! - Per-entry expiry
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod store;
pub mod transients;

pub use crate::Error;

pub use connection::CacheDb;
pub use store::TransientStore;
