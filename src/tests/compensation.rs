//! Compensation and rollback tests.
//!
//! Reverse-order rollback, interception of injected failures, nesting, and
//! the precedence of rollback errors over forward errors.

use super::common::{CallLog, Probe, TestError};
use crate::{compose, execute};

/// The forward error reaches the caller unwrapped after a clean rollback.
#[tokio::test]
async fn forward_error_is_unwrapped() {
    let log = CallLog::new();
    let action = Probe::failing("a", "great sadness", &log);

    assert_eq!(execute(action).await, Err(TestError("great sadness")));
    assert_eq!(log.calls(), ["a.forwards", "a.backwards"]);
}

/// A rollback error supersedes the forward error that caused it.
#[tokio::test]
async fn rollback_error_takes_precedence() {
    let log = CallLog::new();
    let action = Probe::failing("a", "sadness", &log).failing_backwards("rollback failed");

    assert_eq!(execute(action).await, Err(TestError("rollback failed")));
    assert_eq!(log.calls(), ["a.forwards", "a.backwards"]);
}

/// A mid-chain failure rolls back completed steps in reverse order.
///
/// The failed step itself is never compensated (it was never pushed), and
/// steps after it run in neither direction.
#[tokio::test]
async fn failure_rolls_back_in_reverse() {
    let log = CallLog::new();
    let a = Probe::ok("a", 1, &log);
    let b = Probe::ok("b", 2, &log);
    let c = Probe::failing("c", "boom", &log);
    let d = Probe::ok("d", 4, &log);

    let composite = compose(|chain| async move {
        assert_eq!(chain.run(a).await?, 1);
        assert_eq!(chain.run(b).await?, 2);
        chain.run(c).await?;
        chain.run(d).await?;
        Ok(0u32)
    });

    assert_eq!(execute(composite).await, Err(TestError("boom")));
    assert_eq!(
        log.calls(),
        ["a.forwards", "b.forwards", "c.forwards", "b.backwards", "a.backwards"]
    );
}

/// A procedure that fails before running any step has nothing to undo.
#[tokio::test]
async fn failing_empty_procedure_rolls_back_nothing() {
    let log = CallLog::new();
    let never_run = Probe::ok("never", 9, &log);

    let composite = compose(|_chain| async move {
        drop(never_run);
        Err::<u32, _>(TestError("early exit"))
    });

    assert_eq!(execute(composite).await, Err(TestError("early exit")));
    assert!(log.calls().is_empty());
}

/// Catching an injected failure keeps the chain alive.
///
/// The caught step is skipped, later steps still run, and a subsequent
/// failure rolls back everything that completed, caught step excluded.
#[tokio::test]
async fn caught_failure_keeps_chain_alive() {
    let log = CallLog::new();
    let a = Probe::ok("a", 1, &log);
    let b = Probe::failing("b", "denied", &log);
    let c = Probe::ok("c", 3, &log);
    let d = Probe::failing("d", "later boom", &log);

    let composite = compose(|chain| async move {
        chain.run(a).await?;
        if let Err(denied) = chain.run(b).await {
            assert_eq!(denied, TestError("denied"));
        }
        chain.run(c).await?;
        chain.run(d).await?;
        Ok(())
    });

    assert_eq!(execute(composite).await, Err(TestError("later boom")));
    assert_eq!(
        log.calls(),
        [
            "a.forwards",
            "b.forwards",
            "c.forwards",
            "d.forwards",
            "c.backwards",
            "a.backwards"
        ]
    );
}

/// The first rollback failure aborts the sweep; older steps stay untouched.
#[tokio::test]
async fn rollback_failure_aborts_the_sweep() {
    let log = CallLog::new();
    let a = Probe::ok("a", 1, &log);
    let b = Probe::ok("b", 2, &log).failing_backwards("b rollback failed");
    let c = Probe::ok("c", 3, &log);
    let d = Probe::failing("d", "boom", &log);

    let composite = compose(|chain| async move {
        chain.run(a).await?;
        chain.run(b).await?;
        chain.run(c).await?;
        chain.run(d).await?;
        Ok(())
    });

    assert_eq!(execute(composite).await, Err(TestError("b rollback failed")));
    assert_eq!(
        log.calls(),
        [
            "a.forwards",
            "b.forwards",
            "c.forwards",
            "d.forwards",
            "c.backwards",
            "b.backwards"
        ]
    );
}

/// A nested composite rolls back its own steps as one step of the outer chain.
#[tokio::test]
async fn nested_composite_rolls_back() {
    let log = CallLog::new();
    let a = Probe::ok("a", 1, &log);
    let b = Probe::ok("b", 2, &log);
    let c = Probe::failing("c", "boom", &log);

    let inner = compose(|chain| async move {
        chain.run(a).await?;
        chain.run(b).await
    });

    let composite = compose(|chain| async move {
        chain.run(inner).await?;
        chain.run(c).await?;
        Ok(())
    });

    assert_eq!(execute(composite).await, Err(TestError("boom")));
    assert_eq!(
        log.calls(),
        ["a.forwards", "b.forwards", "c.forwards", "b.backwards", "a.backwards"]
    );
}
