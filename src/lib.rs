//! Song recommendations from standardized audio features.
//!
//! A [`catalog::Catalog`] is loaded once from a feature snapshot and shared
//! read-only; [`services::recommend`] scores every catalog row against a set
//! of seed titles by mean cosine similarity.

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
