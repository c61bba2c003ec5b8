//! Atende Core - Shared domain types.
//!
//! This crate provides the types shared by every Atende component:
//! - `console` - Edit sessions, summary projection and the HTTP collaborator
//! - `cli` - Command-line front end for agents
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no clocks.
//! Every record here mirrors what the backend sends over the wire, plus the
//! editable views the console works on.
//!
//! # Modules
//!
//! - [`types`] - Ids, statuses, timestamps, profiles, settings, conversations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
