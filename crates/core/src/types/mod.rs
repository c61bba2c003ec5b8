//! Core types for Atende.
//!
//! This module provides type-safe wrappers and wire records for the agent
//! console's domain.

pub mod conversation;
pub mod id;
pub mod message;
pub mod profile;
pub mod settings;
pub mod status;
pub mod timestamp;

pub use conversation::{Company, Conversation, Customer};
pub use id::*;
pub use message::{Actor, Message};
pub use profile::{Profile, ProfileField, ProfileUpdate, UserProfile};
pub use settings::{SettingsField, SettingsUpdate, UserSettings};
pub use status::*;
pub use timestamp::Timestamp;
