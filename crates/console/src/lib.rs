//! Atende Console library.
//!
//! The state layer behind the agent console, kept free of any rendering so
//! it can be driven from the CLI, tests, or a future UI shell:
//!
//! - [`summary`] - Derives the one-line inbox summary of a conversation
//! - [`edit`] - Optimistic edit sessions with commit-or-revert semantics
//! - [`account`] - Profile and notification-settings sessions
//! - [`remote`] - Collaborator contracts and the HTTP implementation
//! - [`config`] - Environment-based configuration
//!
//! Remote failures are absorbed where they happen: a failed read falls back
//! to empty defaults, a failed write reverts to freshly fetched state. Only
//! programming errors (an edit in the wrong mode) surface as [`EditError`].
//!
//! [`EditError`]: edit::EditError

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod config;
pub mod edit;
pub mod error;
pub mod remote;
pub mod summary;

pub use error::ConsoleError;
