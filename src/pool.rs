//! Core resource pool implementation

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::config::PoolConfig;
use crate::errors::{BoxError, PoolError, PoolResult};
use crate::resource::{Factory, Resource};

/// Poll interval of the async acquisition loop.
const ASYNC_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Deadline applied to `get_async` when the configuration sets none.
const DEFAULT_ASYNC_TIMEOUT: Duration = Duration::from_secs(30);

/// A resource checked out of the pool, returned on drop
///
/// Dereferences to the underlying resource. Dropping the guard hands the
/// resource back for reuse; [`discard`](PooledResource::discard) disposes of
/// it instead, and [`detach`](PooledResource::detach) extracts it for manual
/// handling via [`Pool::put`] / [`Pool::release`].
pub struct PooledResource<R: Resource> {
    resource: Option<R>,
    pool: Arc<PoolInner<R>>,
}

impl<R: Resource> PooledResource<R> {
    /// Extract the raw resource without returning it to the pool.
    ///
    /// The resource stays accounted against the open cap, exactly as if it
    /// were still checked out. Hand it back with [`Pool::put`] or
    /// [`Pool::release`]; a resource that never comes back keeps its
    /// capacity slot occupied until the pool is closed.
    pub fn detach(mut self) -> R {
        self.resource.take().expect("resource already taken")
    }

    /// Dispose of the resource instead of returning it for reuse.
    ///
    /// Use this when the resource is known to be unfit, e.g. after an I/O
    /// error.
    pub fn discard(mut self) {
        if let Some(resource) = self.resource.take() {
            self.pool.release(resource);
        }
    }
}

impl<R: Resource> std::fmt::Debug for PooledResource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledResource")
            .field("checked_out", &self.resource.is_some())
            .finish()
    }
}

impl<R: Resource> Deref for PooledResource<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        self.resource.as_ref().expect("resource already taken")
    }
}

impl<R: Resource> DerefMut for PooledResource<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.resource.as_mut().expect("resource already taken")
    }
}

impl<R: Resource> Drop for PooledResource<R> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.pool.put(resource);
        }
    }
}

/// Point-in-time snapshot of pool occupancy
#[derive(Debug, Clone, Copy)]
pub struct PoolStatus {
    /// Idle resources currently queued for reuse.
    pub idle: usize,
    /// Resources currently open (idle plus checked out).
    pub open: usize,
    /// Configured idle-queue cap.
    pub max_idle: usize,
    /// Configured open cap, `None` when unlimited.
    pub max_open: Option<usize>,
}

struct IdleEntry<R> {
    resource: R,
    returned_at: Instant,
}

struct PoolState<R> {
    open_count: usize,
    idle: VecDeque<IdleEntry<R>>,
    running: bool,
}

struct PoolInner<R: Resource> {
    factory: Factory<R>,
    config: PoolConfig<R>,
    state: Mutex<PoolState<R>>,
    cond: Condvar,
}

/// Bounded pool of reusable resources
///
/// Resources are created lazily through the supplied factory, bounded by
/// `max_open`, and retained for reuse in a LIFO idle queue bounded by
/// `max_idle`. Cloning the pool is cheap; all clones share the same state.
///
/// # Examples
///
/// ```
/// use respool::{Pool, PoolConfig, Resource};
///
/// struct Conn;
///
/// impl Resource for Conn {
///     fn close(&mut self) -> Result<(), respool::BoxError> {
///         Ok(())
///     }
/// }
///
/// let pool = Pool::new(|| Ok(Conn), PoolConfig::new().with_max_open(8));
/// {
///     let _conn = pool.get().unwrap();
/// }
/// assert_eq!(pool.idle_count(), 1);
/// ```
pub struct Pool<R: Resource> {
    inner: Arc<PoolInner<R>>,
}

impl<R: Resource> Clone for Pool<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource> Pool<R> {
    /// Create a new pool around a resource factory.
    ///
    /// The factory is invoked only when no reusable idle resource exists
    /// and the open cap permits another resource.
    pub fn new<F>(factory: F, config: PoolConfig<R>) -> Self
    where
        F: Fn() -> Result<R, BoxError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(PoolInner {
                factory: Arc::new(factory),
                config,
                state: Mutex::new(PoolState {
                    open_count: 0,
                    idle: VecDeque::new(),
                    running: true,
                }),
                cond: Condvar::new(),
            }),
        }
    }

    /// Acquire a resource, blocking while the pool is at capacity.
    ///
    /// Reuses the most recently returned idle resource when one is fit,
    /// creates a fresh one when under the open cap, and otherwise waits for
    /// a `put`, `release`, or `close`. A configured `acquire_timeout`
    /// bounds the wait.
    pub fn get(&self) -> PoolResult<PooledResource<R>> {
        self.inner
            .acquire(self.inner.config.acquire_timeout)
            .map(|resource| self.guard(resource))
    }

    /// Acquire with an explicit wait bound, overriding any configured
    /// `acquire_timeout`.
    pub fn get_timeout(&self, timeout: Duration) -> PoolResult<PooledResource<R>> {
        self.inner
            .acquire(Some(timeout))
            .map(|resource| self.guard(resource))
    }

    /// Acquire with an absolute deadline.
    pub fn get_deadline(&self, deadline: Instant) -> PoolResult<PooledResource<R>> {
        let timeout = deadline.saturating_duration_since(Instant::now());
        self.get_timeout(timeout)
    }

    /// Acquire without blocking.
    ///
    /// Returns `Ok(None)` when the pool is at capacity with nothing idle;
    /// closed-pool and creation errors surface as with [`get`](Pool::get).
    pub fn try_get(&self) -> PoolResult<Option<PooledResource<R>>> {
        Ok(self
            .inner
            .try_acquire()?
            .map(|resource| self.guard(resource)))
    }

    /// Acquire a resource asynchronously.
    ///
    /// Polls the pool without blocking the executor, bounded by the
    /// configured `acquire_timeout` (30 seconds when unset).
    pub async fn get_async(&self) -> PoolResult<PooledResource<R>> {
        let timeout = self
            .inner
            .config
            .acquire_timeout
            .unwrap_or(DEFAULT_ASYNC_TIMEOUT);

        tokio::time::timeout(timeout, async {
            loop {
                match self.try_get() {
                    Ok(Some(guard)) => return Ok(guard),
                    Ok(None) => tokio::time::sleep(ASYNC_RETRY_INTERVAL).await,
                    Err(err) => return Err(err),
                }
            }
        })
        .await
        .map_err(|_| PoolError::Timeout(timeout))?
    }

    /// Return a resource for reuse.
    ///
    /// The resource is queued at the front of the idle list; when the list
    /// overflows `max_idle`, the oldest idle entry is closed. On a closed
    /// pool the resource is closed immediately instead.
    pub fn put(&self, resource: R) {
        self.inner.put(resource);
    }

    /// Dispose of a resource without offering it for reuse.
    pub fn release(&self, resource: R) {
        self.inner.release(resource);
    }

    /// Shut the pool down, closing every idle resource.
    ///
    /// Idempotent. Waiters blocked in [`get`](Pool::get) observe the
    /// closure and fail with [`PoolError::Closed`]. Resources currently
    /// checked out are not tracked; returning one afterwards closes it
    /// without further bookkeeping. Failed resource closes are aggregated
    /// into [`PoolError::Shutdown`].
    pub fn close(&self) -> PoolResult<()> {
        self.inner.close()
    }

    /// Configured idle-queue cap.
    pub fn max_idle(&self) -> usize {
        self.inner.config.max_idle
    }

    /// Configured open cap, `None` when unlimited.
    pub fn max_open(&self) -> Option<usize> {
        self.inner.config.max_open
    }

    /// Resources currently queued for reuse.
    pub fn idle_count(&self) -> usize {
        self.inner.state.lock().idle.len()
    }

    /// Resources currently open, idle or checked out.
    pub fn open_count(&self) -> usize {
        self.inner.state.lock().open_count
    }

    /// Whether the pool has been shut down.
    pub fn is_closed(&self) -> bool {
        !self.inner.state.lock().running
    }

    /// Snapshot of current occupancy.
    pub fn status(&self) -> PoolStatus {
        let state = self.inner.state.lock();
        PoolStatus {
            idle: state.idle.len(),
            open: state.open_count,
            max_idle: self.inner.config.max_idle,
            max_open: self.inner.config.max_open,
        }
    }

    fn guard(&self, resource: R) -> PooledResource<R> {
        PooledResource {
            resource: Some(resource),
            pool: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource> PoolInner<R> {
    fn acquire(&self, timeout: Option<Duration>) -> PoolResult<R> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.state.lock();
        loop {
            if let Some(resource) = self.reuse_idle(&mut state) {
                tracing::trace!("reusing idle resource");
                return Ok(resource);
            }

            if !state.running {
                return Err(PoolError::Closed);
            }

            if self.has_capacity(&state) {
                return self.create(&mut state);
            }

            match deadline {
                Some(until) => {
                    if self.cond.wait_until(&mut state, until).timed_out() {
                        return Err(PoolError::Timeout(timeout.unwrap_or_default()));
                    }
                }
                None => self.cond.wait(&mut state),
            }
        }
    }

    fn try_acquire(&self) -> PoolResult<Option<R>> {
        let mut state = self.state.lock();
        if let Some(resource) = self.reuse_idle(&mut state) {
            tracing::trace!("reusing idle resource");
            return Ok(Some(resource));
        }

        if !state.running {
            return Err(PoolError::Closed);
        }

        if self.has_capacity(&state) {
            return self.create(&mut state).map(Some);
        }

        Ok(None)
    }

    /// Pop idle entries until one survives the staleness and borrow checks.
    /// Entries that fail either are closed and their capacity slot freed.
    fn reuse_idle(&self, state: &mut MutexGuard<'_, PoolState<R>>) -> Option<R> {
        while let Some(IdleEntry {
            mut resource,
            returned_at,
        }) = state.idle.pop_front()
        {
            let expired = self
                .config
                .idle_timeout
                .is_some_and(|limit| returned_at.elapsed() > limit);
            if expired {
                tracing::debug!("discarding stale idle resource");
                MutexGuard::unlocked(state, || close_quietly(&mut resource));
                self.free_slot(state);
                self.cond.notify_one();
                continue;
            }

            if let Some(check) = self.config.test_on_borrow {
                // the entry is already off the idle queue, so the check can
                // run unlocked without another caller seeing the resource
                let verdict = MutexGuard::unlocked(state, || check(&resource, returned_at));
                if let Err(err) = verdict {
                    tracing::debug!(error = %err, "idle resource failed borrow check, discarding");
                    MutexGuard::unlocked(state, || close_quietly(&mut resource));
                    self.free_slot(state);
                    self.cond.notify_one();
                    continue;
                }
            }

            return Some(resource);
        }
        None
    }

    fn has_capacity(&self, state: &PoolState<R>) -> bool {
        self.config
            .max_open
            .is_none_or(|cap| state.open_count < cap)
    }

    /// Create a fresh resource. The capacity slot is reserved before the
    /// factory runs unlocked, so the open cap holds even while a slow dial
    /// is in flight.
    fn create(&self, state: &mut MutexGuard<'_, PoolState<R>>) -> PoolResult<R> {
        state.open_count += 1;
        match MutexGuard::unlocked(state, || (self.factory)()) {
            Ok(resource) => {
                tracing::trace!(open = state.open_count, "created new resource");
                Ok(resource)
            }
            Err(err) => {
                tracing::debug!(error = %err, "resource creation failed, releasing slot");
                self.free_slot(state);
                self.cond.notify_one();
                Err(PoolError::Create(err))
            }
        }
    }

    fn put(&self, mut resource: R) {
        let mut state = self.state.lock();
        if !state.running {
            // terminal contract: close() already reset the count, the
            // returned resource is only torn down
            MutexGuard::unlocked(&mut state, || close_quietly(&mut resource));
            self.cond.notify_one();
            return;
        }

        state.idle.push_front(IdleEntry {
            resource,
            returned_at: Instant::now(),
        });
        if state.idle.len() > self.config.max_idle
            && let Some(IdleEntry { mut resource, .. }) = state.idle.pop_back()
        {
            tracing::debug!("idle queue full, evicting oldest entry");
            MutexGuard::unlocked(&mut state, || close_quietly(&mut resource));
            self.free_slot(&mut state);
        }
        self.cond.notify_one();
    }

    fn release(&self, mut resource: R) {
        let mut state = self.state.lock();
        MutexGuard::unlocked(&mut state, || close_quietly(&mut resource));
        self.free_slot(&mut state);
        self.cond.notify_one();
    }

    fn close(&self) -> PoolResult<()> {
        let mut state = self.state.lock();
        if !state.running {
            return Ok(());
        }
        state.running = false;
        state.open_count = 0;
        let drained: Vec<IdleEntry<R>> = state.idle.drain(..).collect();
        self.cond.notify_all();
        drop(state);

        let mut failed = 0;
        for mut entry in drained {
            if let Err(err) = entry.resource.close() {
                tracing::warn!(error = %err, "resource close failed during shutdown");
                failed += 1;
            }
        }
        tracing::info!("resource pool closed");

        if failed > 0 {
            return Err(PoolError::Shutdown { failed });
        }
        Ok(())
    }

    /// Give a capacity slot back. After shutdown the count is already
    /// zeroed, so post-close returns are close-only.
    fn free_slot(&self, state: &mut PoolState<R>) {
        if state.running {
            state.open_count -= 1;
        }
    }
}

fn close_quietly<R: Resource>(resource: &mut R) {
    if let Err(err) = resource.close() {
        tracing::warn!(error = %err, "resource close failed");
    }
}
