//! Target resolution and range tracking for structural editing commands.
//!
//! A command names a mark (where to start) and a chain of modifiers (how to
//! widen, narrow or relate it). [`pipeline`] resolves that into targets,
//! [`actions`] edits the documents at them, and [`updater`] keeps every
//! live range (hats, the that-mark, cursors, targets still in flight)
//! correct across the edits. [`session::Session`] ties the pieces together.

/// Actions a command performs on its targets.
pub mod actions;
/// Command payloads and their version upgrades.
pub mod command;
/// Engine configuration loaded from TOML.
pub mod config;
/// Command errors.
pub mod error;
/// Hats: live addresses of visible tokens.
pub mod hats;
/// Host editor traits and the in-memory editor.
pub mod host;
/// Marks: where a command starts.
pub mod marks;
/// Descriptor to target resolution.
pub mod pipeline;
/// Scope ranges for visualization.
pub mod scope_ranges;
/// Scope types, handlers and enumeration.
pub mod scopes;
/// The engine session.
pub mod session;
/// Modifier stages.
pub mod stages;
/// Targets and their delimiters.
pub mod targets;
/// Line tokenizer behind token, word and identifier scopes.
pub mod tokenizer;
/// The range update engine.
pub mod updater;

pub use command::{Command, TargetDescriptor};
pub use error::{CommandError, Result};
pub use session::{CommandOutcome, Session};
