//! Catalog field logic and the embedder port for Lodestone.
//!
//! This crate defines the "port" (the [`embedder::Embedder`] trait) that the
//! infrastructure layer implements, plus the pure functions of the search
//! core: tolerant field coercion, composite embedding-text construction,
//! and metadata-to-product hydration. It depends only on `lodestone-types`
//! -- never on `lodestone-infra` or any IO crate.

pub mod coerce;
pub mod embedder;
pub mod hydrate;
pub mod text;
