//! Sitebook dashboard core.
//!
//! Project, user and recruitment collections held in memory, persisted to a
//! remote database or a local keyed store, with change notifications and
//! the roadmap phase workflow.

pub mod domain;
pub mod application;
pub mod infrastructure;
