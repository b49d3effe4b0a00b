//! Pool configuration options

use std::time::{Duration, Instant};

use crate::errors::BoxError;

/// Default cap on idle resources retained for reuse.
pub const DEFAULT_MAX_IDLE: usize = 2;

/// Default cap on concurrently open resources.
pub const DEFAULT_MAX_OPEN: usize = 4;

/// Health check run against an idle resource before it is handed back out.
///
/// Receives the resource and the instant it was returned to the pool. An
/// `Err` discards the resource; the error itself is never surfaced to the
/// caller of `get`.
pub type BorrowCheck<R> = fn(&R, Instant) -> Result<(), BoxError>;

/// Configuration for pool behavior
///
/// # Examples
///
/// ```
/// use respool::PoolConfig;
/// use std::time::Duration;
///
/// let config = PoolConfig::<i32>::new()
///     .with_max_idle(8)
///     .with_max_open(32)
///     .with_idle_timeout(Duration::from_secs(300));
///
/// assert_eq!(config.max_idle, 8);
/// assert_eq!(config.max_open, Some(32));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig<R> {
    /// Maximum number of idle resources kept around for reuse. Returning a
    /// resource beyond this cap evicts the oldest idle entry.
    pub max_idle: usize,

    /// Maximum number of concurrently open resources. `None` means
    /// unlimited.
    pub max_open: Option<usize>,

    /// Resources idle longer than this are discarded on the next `get`.
    /// `None` means idle resources never expire.
    pub idle_timeout: Option<Duration>,

    /// Optional health check run before reusing an idle resource.
    pub test_on_borrow: Option<BorrowCheck<R>>,

    /// Deadline applied to `get` when the pool is at capacity. `None` means
    /// `get` blocks until a resource is returned or the pool closes. Also
    /// bounds `get_async`.
    pub acquire_timeout: Option<Duration>,
}

impl<R> Default for PoolConfig<R> {
    fn default() -> Self {
        Self {
            max_idle: DEFAULT_MAX_IDLE,
            max_open: Some(DEFAULT_MAX_OPEN),
            idle_timeout: None,
            test_on_borrow: None,
            acquire_timeout: None,
        }
    }
}

impl<R> PoolConfig<R> {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle-queue cap
    ///
    /// # Examples
    ///
    /// ```
    /// use respool::PoolConfig;
    ///
    /// let config = PoolConfig::<i32>::new().with_max_idle(0);
    ///
    /// // A cap of zero disables reuse: every returned resource is closed.
    /// assert_eq!(config.max_idle, 0);
    /// ```
    pub fn with_max_idle(mut self, count: usize) -> Self {
        self.max_idle = count;
        self
    }

    /// Set the open-resource cap
    pub fn with_max_open(mut self, count: usize) -> Self {
        self.max_open = Some(count);
        self
    }

    /// Remove the open-resource cap entirely
    pub fn with_unbounded_open(mut self) -> Self {
        self.max_open = None;
        self
    }

    /// Set the idle timeout after which resources are discarded
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Install a borrow-time health check
    ///
    /// # Examples
    ///
    /// ```
    /// use respool::PoolConfig;
    ///
    /// let config = PoolConfig::<i32>::new()
    ///     .with_test_on_borrow(|value, _returned_at| {
    ///         if *value >= 0 { Ok(()) } else { Err("went negative".into()) }
    ///     });
    ///
    /// assert!(config.test_on_borrow.is_some());
    /// ```
    pub fn with_test_on_borrow(mut self, check: BorrowCheck<R>) -> Self {
        self.test_on_borrow = Some(check);
        self
    }

    /// Bound how long `get` may wait at capacity
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }
}
