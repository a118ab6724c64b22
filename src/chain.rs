//! Sequential composition of actions with reverse-order rollback.
//!
//! [`compose`] turns a linear async procedure into a single [`Action`]. The
//! procedure receives a [`Chain`] handle and runs sub-actions through
//! [`Chain::run`]; each successful sub-action joins a completed-stack that
//! the composite's `backwards` later unwinds in reverse.
//!
//! Failures surface at the `run` call site, so a procedure can intercept one
//! step's failure with ordinary `match` and keep the chain alive:
//!
//! ```
//! use reversible::{compose, execute, ready};
//!
//! # async fn demo() -> Result<(), &'static str> {
//! let composite = compose(|chain| async move {
//!     let order_id = chain.run(ready::<_, &'static str>(7u64)).await?;
//!     match chain.run(ready(2u64)).await {
//!         Ok(_total) => {}
//!         Err(_insufficient_funds) => {
//!             // handled here: earlier steps are not rolled back
//!         }
//!     }
//!     Ok(order_id)
//! });
//! assert_eq!(execute(composite).await?, 7);
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::action::Action;

/// Object-safe view of a completed sub-action: only its undo direction.
#[async_trait::async_trait]
trait Undo<E>: Send {
    async fn undo(&mut self) -> Result<(), E>;
}

#[async_trait::async_trait]
impl<A> Undo<A::Error> for A
where
    A: Action + 'static,
{
    async fn undo(&mut self) -> Result<(), A::Error> {
        self.backwards().await
    }
}

type CompletedStack<E> = Arc<Mutex<Vec<Box<dyn Undo<E>>>>>;

/// Handle through which a composed procedure runs its sub-actions.
///
/// One chain execution owns one completed-stack; the handle is cheap to
/// clone and move into the procedure's future.
pub struct Chain<E> {
    completed: CompletedStack<E>,
}

impl<E> Clone for Chain<E> {
    fn clone(&self) -> Self {
        Self {
            completed: Arc::clone(&self.completed),
        }
    }
}

impl<E> Chain<E>
where
    E: Send + Debug + 'static,
{
    /// Run one sub-action's forward direction.
    ///
    /// On success the sub-action is pushed onto the completed-stack and its
    /// result is returned. On failure the error is returned here, at the
    /// suspension point, and the sub-action does not join the stack: the
    /// procedure decides whether to recover and continue the chain or to
    /// propagate the failure and trigger rollback.
    pub async fn run<A>(&self, mut action: A) -> Result<A::Output, A::Error>
    where
        A: Action<Error = E> + 'static,
    {
        let step = self.completed.lock().len();
        tracing::debug!(step, "chain.forwards");

        match action.forwards().await {
            Ok(value) => {
                self.completed.lock().push(Box::new(action));
                Ok(value)
            }
            Err(error) => {
                tracing::debug!(step, error = ?error, "chain.forwards failed");
                Err(error)
            }
        }
    }
}

/// Build a single action out of a linear procedure.
///
/// The procedure is not driven until the composite's `forwards` runs. Its
/// terminal `Ok` (whether reached by falling off the end or by an early
/// `return`) becomes the composite's result; an unhandled `Err` becomes the
/// composite's failure and makes [`execute`](crate::execute) roll the chain
/// back.
///
/// Each call produces a fresh, single-use composite.
pub fn compose<F, Fut, T, E>(procedure: F) -> Composite<T, E>
where
    F: FnOnce(Chain<E>) -> Fut,
    Fut: std::future::Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + Debug + 'static,
{
    let chain = Chain {
        completed: Arc::new(Mutex::new(Vec::new())),
    };
    let completed = Arc::clone(&chain.completed);
    let procedure = procedure(chain);

    Composite {
        procedure: Some(Box::pin(procedure)),
        completed,
    }
}

/// An action assembled from a procedure and its completed sub-actions.
///
/// Produced by [`compose`]. Composites implement [`Action`], so one chain
/// can run another composite as a sub-action and nest arbitrarily; the inner
/// chain's rollback then runs as one step of the outer chain's rollback.
pub struct Composite<T, E> {
    procedure: Option<BoxFuture<'static, Result<T, E>>>,
    completed: CompletedStack<E>,
}

#[async_trait::async_trait]
impl<T, E> Action for Composite<T, E>
where
    T: Send + 'static,
    E: Send + Debug + 'static,
{
    type Output = T;
    type Error = E;

    /// Drive the procedure to completion.
    ///
    /// # Panics
    ///
    /// Composites are single-use; a second `forwards` call panics.
    async fn forwards(&mut self) -> Result<T, E> {
        let procedure = self
            .procedure
            .take()
            .expect("composite actions are single-use");
        procedure.await
    }

    /// Undo completed sub-actions in reverse completion order.
    ///
    /// The sweep is fail-fast: the first sub-action whose `backwards` fails
    /// aborts the sweep and its error is propagated; older sub-actions are
    /// not attempted.
    async fn backwards(&mut self) -> Result<(), E> {
        loop {
            let (entry, step) = {
                let mut completed = self.completed.lock();
                let entry = completed.pop();
                (entry, completed.len())
            };
            let Some(mut entry) = entry else {
                return Ok(());
            };

            tracing::debug!(step, "chain.backwards");
            if let Err(error) = entry.undo().await {
                tracing::error!(step, error = ?error, "chain.backwards failed");
                return Err(error);
            }
        }
    }
}
