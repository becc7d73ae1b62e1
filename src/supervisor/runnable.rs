//! The capability contract a supervised worker must expose.

// Layer 1: Standard library imports
use std::any::Any;
use std::error::Error as StdError;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
// (none)

/// Boxed error type returned by a [`Runnable`]'s lifecycle methods.
pub type RunnableError = Box<dyn StdError + Send + Sync>;

/// Capability protocol a worker must expose to be supervised.
///
/// Any value implementing `start`, `stop`, and `alive` is accepted by
/// [`crate::Supervisor::add_worker`]. There is no marker trait or shared
/// base type: a `Runnable` is a capability, not an inheritance relationship.
/// A `Supervisor` itself implements `Runnable`, which is what makes
/// supervisor-of-supervisors composition possible (§4.1, §9
/// "Supervisor-inside-supervisor").
///
/// # Invariants
///
/// Concurrent calls to `start`/`stop` on the same worker are serialized by
/// the worker itself; the supervisor never calls `start` on a worker whose
/// previous execution has not yet completed.
///
/// # Examples
///
/// ```rust
/// use oversight::Runnable;
/// use async_trait::async_trait;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct Loop {
///     running: AtomicBool,
/// }
///
/// #[async_trait]
/// impl Runnable for Loop {
///     async fn start(&self) -> Result<(), oversight::RunnableError> {
///         self.running.store(true, Ordering::SeqCst);
///         while self.running.load(Ordering::SeqCst) {
///             tokio::time::sleep(std::time::Duration::from_millis(10)).await;
///         }
///         Ok(())
///     }
///
///     async fn stop(&self) -> Result<(), oversight::RunnableError> {
///         self.running.store(false, Ordering::SeqCst);
///         Ok(())
///     }
///
///     async fn alive(&self) -> bool {
///         self.running.load(Ordering::SeqCst)
///     }
/// }
/// ```
#[async_trait]
pub trait Runnable: Any + Send + Sync {
    /// Begins the worker's long-running activity.
    ///
    /// Must not return until the activity completes or has been signaled to
    /// stop via [`Runnable::stop`]. A panic inside this call is observed by
    /// the supervisor as a `JoinError` and folded into an abnormal exit the
    /// same as an `Err` return.
    async fn start(&self) -> Result<(), RunnableError>;

    /// Requests cooperative termination.
    ///
    /// Must eventually cause an ongoing [`Runnable::start`] to return. There
    /// is no timeout: the supervisor trusts workers to terminate
    /// cooperatively (§5).
    async fn stop(&self) -> Result<(), RunnableError>;

    /// Returns whether an activity is currently executing.
    async fn alive(&self) -> bool;

    /// Returns `self` as `&dyn Any` for the kind auto-detection downcast.
    ///
    /// Implementors should not need to override this; it exists so
    /// [`std::any::Any::downcast_ref`] can be used on a boxed `dyn Runnable`
    /// to detect whether a registered worker is itself a [`crate::Supervisor`].
    fn as_any(&self) -> &dyn Any;
}
