//! Infrastructure implementations for the Lodestone search core.
//!
//! Provides the fastembed-backed [`embedder::FastembedEncoder`], the flat
//! inner-product index with on-disk persistence ([`flat::FlatIndex`]), the
//! CSV ingest pipeline ([`ingest`]), the query-time retriever service
//! ([`retriever::ProductRetriever`]), and the config loader ([`config`]).

pub mod config;
pub mod embedder;
pub mod flat;
pub mod ingest;
pub mod retriever;
