//! The action protocol and closure-based action constructors.
//!
//! An [`Action`] is an atomic unit of work with a forward effect and a
//! compensating effect. Anything implementing the trait can be executed by
//! [`execute`](crate::execute) and chained by [`compose`](crate::compose);
//! no further inheritance or registration is required.

use std::fmt::Debug;
use std::marker::PhantomData;

/// A unit of work that can be performed and undone.
///
/// `forwards` performs the effect and produces a result; `backwards`
/// best-effort undoes it. `backwards` is only ever invoked after `forwards`
/// has failed, or during rollback of a chain in which a later action failed.
///
/// `backwards` must be safe to call even if `forwards` failed partway
/// through: implementations guard on whatever state `forwards` recorded.
///
/// ```
/// use async_trait::async_trait;
/// use reversible::Action;
///
/// struct CreateUser {
///     name: String,
///     user_id: Option<u64>,
/// }
///
/// #[async_trait]
/// impl Action for CreateUser {
///     type Output = u64;
///     type Error = std::io::Error;
///
///     async fn forwards(&mut self) -> Result<u64, Self::Error> {
///         let id = 7; // store the user, remember the id for rollback
///         self.user_id = Some(id);
///         Ok(id)
///     }
///
///     async fn backwards(&mut self) -> Result<(), Self::Error> {
///         if let Some(_id) = self.user_id.take() {
///             // user_id is None if creation never got that far
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Action: Send {
    /// The value produced by a successful `forwards` call.
    type Output: Send;

    /// The failure type shared by both directions.
    type Error: Send + Debug;

    /// Perform the effect.
    async fn forwards(&mut self) -> Result<Self::Output, Self::Error>;

    /// Undo the effect of a previous `forwards` call.
    async fn backwards(&mut self) -> Result<(), Self::Error>;
}

// ============================================================================
// Closure-backed actions
// ============================================================================

/// An action backed by a pair of closures sharing a context.
///
/// The context is owned exclusively by one action invocation and is the
/// channel for passing information computed in the forward direction (an
/// order id, a resource handle) to the later `backwards` call of the same
/// invocation. It is handed mutably to both closures.
pub struct FnAction<C, F, B> {
    context: C,
    forwards: F,
    backwards: B,
}

impl<C, F, B> FnAction<C, F, B> {
    /// Create an action from a context and a closure pair.
    pub fn new(context: C, forwards: F, backwards: B) -> Self {
        Self {
            context,
            forwards,
            backwards,
        }
    }

    /// Get a reference to the context.
    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<C, F, B> FnAction<C, F, B>
where
    C: Default,
{
    /// Create an action with a freshly constructed default context.
    pub fn with_default(forwards: F, backwards: B) -> Self {
        Self::new(C::default(), forwards, backwards)
    }
}

#[async_trait::async_trait]
impl<C, F, B, T, E> Action for FnAction<C, F, B>
where
    C: Send,
    F: FnMut(&mut C) -> Result<T, E> + Send,
    B: FnMut(&mut C) -> Result<(), E> + Send,
    T: Send,
    E: Send + Debug,
{
    type Output = T;
    type Error = E;

    async fn forwards(&mut self) -> Result<T, E> {
        (self.forwards)(&mut self.context)
    }

    async fn backwards(&mut self) -> Result<(), E> {
        (self.backwards)(&mut self.context)
    }
}

// ============================================================================
// Two-step builder
// ============================================================================

/// Builds a closure-backed action in two steps.
///
/// The forward implementation is given first; [`backwards`] attaches the
/// compensating implementation and yields an [`ActionFactory`]. The factory
/// is the only type with a `build` method, so an action without a registered
/// backwards implementation cannot be constructed, and because `backwards`
/// consumes the builder it cannot be registered twice.
///
/// ```
/// use std::collections::HashMap;
/// use reversible::ActionBuilder;
///
/// let create_order = ActionBuilder::<HashMap<String, u64>, _>::new(
///     |ctx: &mut HashMap<String, u64>| {
///         ctx.insert("order_id".into(), 42);
///         Ok::<_, std::io::Error>(42u64)
///     },
/// )
/// .backwards(|ctx: &mut HashMap<String, u64>| {
///     // order_id is absent if the forward call failed before storing it
///     ctx.remove("order_id");
///     Ok::<_, std::io::Error>(())
/// });
///
/// let action = create_order.build();
/// ```
///
/// [`backwards`]: ActionBuilder::backwards
pub struct ActionBuilder<C, F> {
    forwards: F,
    _context: PhantomData<fn() -> C>,
}

impl<C, F> ActionBuilder<C, F> {
    /// Start building an action from its forward implementation.
    pub fn new(forwards: F) -> Self {
        Self {
            forwards,
            _context: PhantomData,
        }
    }

    /// Attach the compensating implementation.
    pub fn backwards<B>(self, backwards: B) -> ActionFactory<C, F, B> {
        ActionFactory {
            forwards: self.forwards,
            backwards,
            _context: PhantomData,
        }
    }
}

/// A completed builder that mints actions.
///
/// Every [`build`](ActionFactory::build) call produces a fresh [`FnAction`]
/// with its own newly constructed context, so separate invocations never
/// share state.
pub struct ActionFactory<C, F, B> {
    forwards: F,
    backwards: B,
    _context: PhantomData<fn() -> C>,
}

impl<C, F, B> ActionFactory<C, F, B>
where
    C: Default,
    F: Clone,
    B: Clone,
{
    /// Mint an action with a fresh context.
    pub fn build(&self) -> FnAction<C, F, B> {
        FnAction::new(C::default(), self.forwards.clone(), self.backwards.clone())
    }
}

// ============================================================================
// Ready values
// ============================================================================

/// An already-produced value in action form. See [`ready`].
pub struct Ready<T, E> {
    value: Option<T>,
    _error: PhantomData<fn() -> E>,
}

/// Treat a bare value as an action that has already succeeded.
///
/// `forwards` yields the value; `backwards` is a no-op, since there is
/// nothing to undo. Useful where a chain expects an action but a computation
/// produced its result synchronously.
pub fn ready<T, E>(value: T) -> Ready<T, E> {
    Ready {
        value: Some(value),
        _error: PhantomData,
    }
}

#[async_trait::async_trait]
impl<T, E> Action for Ready<T, E>
where
    T: Send,
    E: Send + Debug,
{
    type Output = T;
    type Error = E;

    async fn forwards(&mut self) -> Result<T, E> {
        Ok(self
            .value
            .take()
            .expect("ready action already produced its value"))
    }

    async fn backwards(&mut self) -> Result<(), E> {
        Ok(())
    }
}
