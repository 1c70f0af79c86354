//! Docgate Model - Shared wire data model
//!
//! Types exchanged between the dashboard, the proxy gateway, and the
//! external processing service:
//! - Spreadsheet existence/schema state
//! - Generated artifact roster
//! - Per-upload generation results
//! - Mutation acknowledgements
//!
//! Field names follow the processing service's wire contract exactly; the
//! gateway forwards these shapes rather than inventing its own.

#![warn(unreachable_pub)]

pub mod artifact;
pub mod generation;
pub mod spreadsheet;

pub use artifact::{Artifact, ArtifactRoster};
pub use generation::{GeneratedFile, GenerationResult, MutationAck};
pub use spreadsheet::SpreadsheetState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
