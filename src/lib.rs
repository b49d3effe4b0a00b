//! # respool
//!
//! Bounded, reusable resource pool: callers acquire an opaque closable
//! resource (a network connection, a session, a handle), use it, and return
//! it for reuse, subject to a cap on concurrently open resources and a cap
//! on idle resources retained between uses.
//!
//! ## Features
//!
//! - Lazy resource creation through a caller-supplied factory
//! - Blocking acquisition with optional deadline, plus async acquisition
//! - LIFO idle reuse, so warm resources are handed out first
//! - Idle-timeout and borrow-time health-check eviction
//! - Automatic return via RAII (Drop trait), with explicit put/release for
//!   manual control
//! - Idempotent shutdown that drains and closes all idle resources
//!
//! ## Quick Start
//!
//! ```rust
//! use respool::{Pool, PoolConfig, Resource};
//!
//! struct Conn;
//!
//! impl Resource for Conn {
//!     fn close(&mut self) -> Result<(), respool::BoxError> {
//!         Ok(())
//!     }
//! }
//!
//! let pool = Pool::new(|| Ok(Conn), PoolConfig::default());
//! {
//!     let _conn = pool.get().unwrap();
//!     // returned to the idle queue when the guard drops
//! }
//! assert_eq!(pool.idle_count(), 1);
//! ```

mod pool;
mod config;
mod resource;
mod errors;

pub use pool::{Pool, PoolStatus, PooledResource};
pub use config::{BorrowCheck, PoolConfig, DEFAULT_MAX_IDLE, DEFAULT_MAX_OPEN};
pub use resource::{Factory, Resource};
pub use errors::{BoxError, PoolError, PoolResult};
