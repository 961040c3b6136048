//! Project commit engine.
//!
//! Turns a completed wizard state and its uploaded files into a persisted
//! project inside a single database transaction, with bounded retry and
//! best-effort cleanup of written files.

pub mod project_commit;

pub use project_commit::{CommitEngine, CommitError, CommitReceipt};
