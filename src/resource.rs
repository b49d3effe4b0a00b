//! The capability contract for pooled items

use std::sync::Arc;

use crate::errors::BoxError;

/// A pooled item with a single required capability: close.
///
/// The pool never inspects a resource beyond this trait. `close` is invoked
/// exactly once per instance, at the moment the pool permanently discards
/// it: idle-queue overflow, staleness or a failed borrow check, an explicit
/// [`release`](crate::Pool::release), or pool shutdown.
///
/// # Examples
///
/// ```
/// use respool::{BoxError, Resource};
///
/// struct Conn {
///     stream: std::net::TcpStream,
/// }
///
/// impl Resource for Conn {
///     fn close(&mut self) -> Result<(), BoxError> {
///         self.stream.shutdown(std::net::Shutdown::Both)?;
///         Ok(())
///     }
/// }
/// ```
pub trait Resource: Send + 'static {
    /// Tear the resource down. Errors are logged by the pool and never
    /// surfaced through `put` or `release`; shutdown aggregates them.
    fn close(&mut self) -> Result<(), BoxError>;
}

/// Factory invoked to create a new resource when nothing idle is reusable
/// and the pool is below its open cap.
pub type Factory<R> = Arc<dyn Fn() -> Result<R, BoxError> + Send + Sync>;
