//! # raflift Common Library
//!
//! Shared code for the raflift services:
//! - Database initialization, schema and seed data
//! - Users/items models and queries
//! - HCC coefficient reference store
//! - Write-once audit log
//! - Integrity hashing over structured (non-PHI) fields
//! - Configuration resolution

pub mod config;
pub mod db;
pub mod error;
pub mod integrity;

pub use error::{Error, Result};
pub use integrity::integrity_hash;
