//! Split configuration editing library.
//!
//! A split config is a JSON document whose `splitIds` array lists the
//! autosplitter checkpoints of a run, in order. This crate keeps the
//! document's canonical text consistent while it is edited either as raw
//! text or row by row.
//!
//! ## Main Features
//! - Canonical text store with change notification and external reset
//! - Row edits (replace, remove, append) that always re-read the latest text
//! - Read-only split catalog with display labels and tooltips
//! - Non-blocking schema diagnostics for the text surface

pub mod catalog;
pub mod cli;
pub mod document;
pub mod editor;
pub mod schema;
pub mod session;
pub mod store;

pub use catalog::{CatalogEntry, SplitCatalog};
pub use document::{ParseError, SplitConfig};
pub use editor::{SplitLabel, SplitRow, StructuredEditor};
pub use schema::{BuiltinValidator, Diagnostic, SchemaValidator, Severity};
pub use session::{EditorSession, MemorySurface, TextSurface};
pub use store::{ChangeListener, DocumentStore, DropReason, EditOutcome};
