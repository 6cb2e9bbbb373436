//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB table for the KeyValueStore port (default)
//! - JSON files with file locks for the KeyValueStore port
//! - In-memory map for the KeyValueStore port (tests)
//! - Demo identity provider and seed data

pub mod demo;
pub mod duckdb;
pub mod file;
pub mod memory;
