//! The execution engine: run one action, rolling back on failure.

use crate::action::Action;

/// Execute the given action.
///
/// Calls the action's `forwards`. If it succeeds, its value is returned and
/// `backwards` is never called. If it fails, `backwards` is called once:
///
/// - if rollback succeeds, the original forward error is returned, unwrapped;
/// - if rollback also fails, the rollback error supersedes the forward error
///   and is the one returned. This is the only path where the original cause
///   is not the one surfaced, so both errors are emitted in a single
///   diagnostic record first.
///
/// Exactly one of the two errors propagates; neither is ever swallowed.
/// Nothing is retried, and each direction runs at most once per call.
pub async fn execute<A>(mut action: A) -> Result<A::Output, A::Error>
where
    A: Action,
{
    match action.forwards().await {
        Ok(value) => Ok(value),
        Err(error) => {
            tracing::error!(
                action = std::any::type_name::<A>(),
                error = ?error,
                "failed to execute, rolling back"
            );
            match action.backwards().await {
                Ok(()) => Err(error),
                Err(rollback_error) => {
                    tracing::error!(
                        action = std::any::type_name::<A>(),
                        error = ?rollback_error,
                        original = ?error,
                        "failed to roll back"
                    );
                    Err(rollback_error)
                }
            }
        }
    }
}
