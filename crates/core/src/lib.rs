//! Core types and shared functionality for redirect-uploads.
//!
//! This crate provides:
//! - The upload URL rewriter and its filesystem probe
//! - Transient cache and option storage with SQLite backend
//! - Admin settings and cache invalidation
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod invalidate;
pub mod rewrite;
pub mod settings;

pub use cache::{CacheDb, TransientStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use invalidate::{ClearReport, clear_cache};
pub use rewrite::{FileProbe, LocalFiles, Rewriter};
pub use settings::{OptionStore, Settings};
