//! Domain types and rules for the Smoothie project tracker.
//!
//! Everything here is transport- and database-agnostic: the wizard state
//! machine, its validator, the session store contract, and the document
//! storage contract used when a project is committed.

pub mod documents;
pub mod error;
pub mod project_filter;
pub mod project_wizard;
pub mod types;
