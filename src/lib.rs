//! Member Console Library
//!
//! Core of the membership administration console: viewport-driven lazy
//! loading of large remote collections (members, payments) with chunked
//! fetching, in-flight deduplication and deletion-safe local caching.

pub mod components;
pub mod constants;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod services;
pub mod utils;
