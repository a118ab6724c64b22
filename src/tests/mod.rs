//! Tests for reversible action chains.
//!
//! ## Test Organization
//!
//! - `common`: shared error type and recording probe actions
//! - `basic`: success paths and value propagation
//! - `compensation`: rollback ordering and failure precedence
//! - `bridge`: pending results, lift, and scheduler liveness
//!
//! All tests use [`common::Probe`], a scripted action that appends
//! `"{name}.forwards"` / `"{name}.backwards"` to a shared [`common::CallLog`]
//! on every invocation, so ordering assertions read as literal call
//! sequences.

mod common;

mod compensation;
