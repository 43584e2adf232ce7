//! # EsoxSolutions.ResourcePool
//!
//! Thread-safe pool of reusable, caller-supplied resources for Rust.
//!
//! ## Features
//!
//! - Resources are handed in already constructed; the pool never builds them
//! - Automatic return of resources via RAII (Drop trait)
//! - LIFO reuse: the most recently returned resource is handed out first
//! - Wait policy fixed by the pool's type: try-acquire or block with a timeout
//! - Safe teardown: resources on loan outlive the pool and are freed exactly once
//! - Async acquisition for tokio tasks
//! - Metrics with Prometheus export
//!
//! ## Quick Start
//!
//! ```rust
//! use esox_resourcepool::Pool;
//!
//! let pool: Pool<Vec<u8>> = Pool::new();
//! pool.add(Box::new(Vec::with_capacity(4096)));
//! {
//!     let buf = pool.acquire().unwrap();
//!     println!("Got buffer with capacity {}", buf.capacity());
//!     // Buffer automatically returned when `buf` goes out of scope
//! }
//! assert_eq!(pool.idle_count(), 1);
//! ```

mod pool;
mod pooled;
mod store;
mod config;
mod metrics;
mod errors;

pub use pool::Pool;
pub use pooled::PooledObject;
pub use config::{
    Hours, Microseconds, Milliseconds, Minutes, Nanoseconds, Seconds, TimeUnit, WaitPolicy,
};
pub use metrics::{PoolMetrics, MetricsExporter};
pub use errors::{PoolError, PoolResult};
