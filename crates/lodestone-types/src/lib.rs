//! Shared domain types for Lodestone.
//!
//! This crate contains the domain types used across the Lodestone search
//! core: product views, scored results, raw catalog metadata, search
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod product;
