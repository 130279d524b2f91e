//! Cache module - Metadata records for cached feature files
//!
//! Provides:
//! - Metadata entities (entries, caching pass outcomes, shard requests)
//! - Shard table codecs (csv, jsonl)
//! - Record / retrieve / discover operations over an object store
//! - Field extraction helpers

pub mod entry;
pub mod fields;
pub mod registry;
pub mod table;
