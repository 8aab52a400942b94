//! Cache-related MCP tools.
//!
//! This module provides the admin actions for the rewrite cache.

pub mod clear;
pub mod purge;

pub use clear::clear_impl;
pub use purge::purge_expired_impl;
