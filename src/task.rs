//! Running actions on their own tasks.
//!
//! Every `forwards`/`backwards` in this crate is an `async fn`, so a step
//! that waits on a pending result suspends the whole chain at that point and
//! the runtime thread stays free for other work. What remains of bridging is
//! the top level: [`spawn`] schedules an execution on its own task and hands
//! the caller an [`ExecutionHandle`], and [`lift`] turns a bare future into
//! a (non-reversible) action so chains can wait on it like any other step.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::action::Action;
use crate::execution::execute;

/// Execute an action on a freshly spawned task.
///
/// The task runs [`execute`] to completion, rollback included; the returned
/// handle resolves to the same result `execute` would have produced. Each
/// call occupies one task for the execution's whole lifetime, and
/// independent executions interleave on the runtime in no guaranteed order.
///
/// # Panics
///
/// Panics when called from outside a tokio runtime; executions cannot be
/// scheduled without one.
pub fn spawn<A>(action: A) -> ExecutionHandle<A::Output, A::Error>
where
    A: Action + 'static,
    A::Output: 'static,
    A::Error: 'static,
{
    ExecutionHandle {
        inner: tokio::spawn(execute(action)),
    }
}

/// A pending result produced by [`spawn`].
///
/// Awaiting the handle yields the execution's result. [`is_finished`]
/// answers synchronously whether the result is available yet. There is no
/// way to abort the execution through the handle; once started, a chain runs
/// to completion, rollback included.
///
/// [`is_finished`]: ExecutionHandle::is_finished
pub struct ExecutionHandle<T, E> {
    inner: tokio::task::JoinHandle<Result<T, E>>,
}

impl<T, E> ExecutionHandle<T, E> {
    /// Whether the execution has completed.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl<T, E> Future for ExecutionHandle<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(join_error)) => match join_error.try_into_panic() {
                // A panicking execution resumes the panic on the awaiting task.
                Ok(payload) => std::panic::resume_unwind(payload),
                Err(_) => unreachable!("execution tasks are never aborted"),
            },
            Poll::Pending => Poll::Pending,
        }
    }
}

/// A future in action form. See [`lift`].
pub struct Lift<F> {
    inner: Option<F>,
}

/// Wait on a bare future inside a chain.
///
/// The resulting action's `forwards` awaits the future and yields its
/// resolved value, or fails with its resolved error; the chain suspends
/// while the future is pending. Operations run through `lift` are
/// non-reversible: `backwards` is a no-op. If the operation is meant to be
/// undone on a later failure, implement [`Action`] for it instead.
pub fn lift<F, T, E>(future: F) -> Lift<F>
where
    F: Future<Output = Result<T, E>> + Send,
{
    Lift {
        inner: Some(future),
    }
}

#[async_trait::async_trait]
impl<F, T, E> Action for Lift<F>
where
    F: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send + Debug,
{
    type Output = T;
    type Error = E;

    async fn forwards(&mut self) -> Result<T, E> {
        self.inner
            .take()
            .expect("lifted futures resolve only once")
            .await
    }

    async fn backwards(&mut self) -> Result<(), E> {
        Ok(())
    }
}
