#![deny(missing_docs)]

//! Reversible — composable effect chains with automatic rollback.
//!
//! # Design Goals
//!
//! Reversible coordinates multi-step side effects (create, then charge, then
//! notify) without a transactional backend:
//!
//! - **All-or-undone**: if any step fails, every step that already succeeded
//!   is compensated in reverse order before the failure is reported
//! - **Linear procedures**: chains are written as straight-line async code
//!   with ordinary value flow and ordinary `match`/`?` error handling
//! - **Non-blocking waits**: a step that waits on an asynchronous operation
//!   suspends the whole chain instead of blocking the runtime thread
//!
//! # Core Concepts
//!
//! - [`Action`]: a unit of work with paired `forwards` and `backwards` effects
//! - [`execute`]: run one action, rolling back on failure
//! - [`compose`]: build a single [`Action`] out of a procedure that runs
//!   sub-actions through a [`Chain`] handle
//! - [`spawn`]: run an action on its own task and observe the result through
//!   an [`ExecutionHandle`]
//!
//! # Example
//!
//! ```no_run
//! use reversible::{compose, execute};
//! # use reversible::Action;
//! # struct CreateOrder;
//! # #[async_trait::async_trait]
//! # impl Action for CreateOrder {
//! #     type Output = u64;
//! #     type Error = std::io::Error;
//! #     async fn forwards(&mut self) -> Result<u64, Self::Error> { Ok(1) }
//! #     async fn backwards(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct ChargeOrder(u64);
//! # #[async_trait::async_trait]
//! # impl Action for ChargeOrder {
//! #     type Output = ();
//! #     type Error = std::io::Error;
//! #     async fn forwards(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     async fn backwards(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # async fn demo() -> Result<(), std::io::Error> {
//! let submit = compose(|chain| async move {
//!     let order_id = chain.run(CreateOrder).await?;
//!     chain.run(ChargeOrder(order_id)).await?;
//!     Ok(order_id)
//! });
//!
//! // If ChargeOrder fails, CreateOrder is rolled back before the error
//! // reaches the caller.
//! let order_id = execute(submit).await?;
//! # Ok(())
//! # }
//! ```

// Modules
pub mod action;
pub mod chain;
pub mod execution;
pub mod task;

// Re-exports for convenience
pub use action::{ready, Action, ActionBuilder, ActionFactory, FnAction, Ready};
pub use chain::{compose, Chain, Composite};
pub use execution::execute;
pub use task::{lift, spawn, ExecutionHandle, Lift};

#[cfg(test)]
mod tests;
