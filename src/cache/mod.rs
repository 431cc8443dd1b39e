//! Cache module - Read-only access to a content-addressed module cache
//!
//! Provides:
//! - Cache root location (DENO_DIR or an explicit path)
//! - Per-origin manifest loading (hash ↔ URL path+query)
//! - CacheModule creation and specifier resolution
//! - Enumeration of cached origins and modules

pub mod index;
pub mod manifest;
pub mod module;
pub mod root;
pub mod specifier;

pub use module::{CacheModule, Resolver};
