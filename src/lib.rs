//! Stale-while-revalidate HTTP response cache.
//!
//! The [`cache`] module holds the caching core; [`infra::http`] wires it in
//! front of the demo settings backend and the invalidation endpoints.

pub mod application;
pub mod cache;
pub mod config;
pub mod infra;
