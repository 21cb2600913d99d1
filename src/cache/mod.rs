//! Stale-while-revalidate response cache.
//!
//! Every cached entry moves through three states:
//!
//! - **Fresh** until `revalidate_at`: served as `HIT`, the backend is not called.
//! - **Stale** until `expires_at`: served as `STALE` while a detached task asks
//!   the backend for a new copy.
//! - **Expired** afterwards: deleted on lookup and handled as a miss.
//!
//! ## Configuration
//!
//! Windows are controlled via `swrcache.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! ttl_seconds = 600
//! revalidate_seconds = 300
//! ```

mod config;
pub mod counters;
mod entry;
mod keys;
mod middleware;
mod recorder;
mod revalidate;
mod store;

pub use config::CacheConfig;
pub use entry::{CacheEntry, Freshness};
pub use keys::{CACHE_STATUS_HEADER, CacheStatus, cache_key};
pub use middleware::{CacheState, response_cache_layer};
pub use recorder::{RecordMode, Recorded, RecorderError, Recording, ResponseRecorder};
pub use revalidate::{RevalidationOutcome, revalidate, spawn_revalidation};
pub use store::CacheStore;
