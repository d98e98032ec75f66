//! Canonical text store.
//!
//! The store owns the one authoritative copy of the document: its text.
//! Structured edits parse that text at the moment they run, mutate the
//! parsed copy, and write the re-serialized result back. No parsed copy
//! outlives a single edit.

use std::fmt;

use tracing::{debug, instrument, warn};

use crate::document::{ParseError, SplitConfig};

/// Receives the new canonical text after every accepted edit.
pub trait ChangeListener {
    fn on_change(&mut self, text: &str);
}

impl<F> ChangeListener for F
where
    F: FnMut(&str),
{
    fn on_change(&mut self, text: &str) {
        self(text)
    }
}

/// Why a structured edit was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Canonical text is not a valid split config.
    Malformed,
    /// No text surface was mounted to take the edit.
    NotMounted,
    /// The edited document could not be written back out.
    Serialization,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Malformed => write!(f, "current text is not valid JSON"),
            DropReason::NotMounted => write!(f, "text editor is not mounted"),
            DropReason::Serialization => write!(f, "edited document could not be serialized"),
        }
    }
}

/// Result of a structured edit. Edits never fail across the store boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// The edit was valid but did nothing (e.g. index out of range).
    Unchanged,
    Dropped(DropReason),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

pub struct DocumentStore {
    canonical: String,
    default_value: String,
    listener: Option<Box<dyn ChangeListener>>,
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("canonical", &self.canonical)
            .field("default_value", &self.default_value)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl DocumentStore {
    pub fn new(default_value: impl Into<String>) -> Self {
        let default_value = default_value.into();
        Self {
            canonical: default_value.clone(),
            default_value,
            listener: None,
        }
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: ChangeListener + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_listener<L>(&mut self, listener: L)
    where
        L: ChangeListener + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn text(&self) -> &str {
        &self.canonical
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Replace the canonical text. Empty input is ignored; anything else is
    /// accepted as-is, valid or not, since the user may be mid-edit.
    ///
    /// Returns `true` if the text was accepted.
    #[instrument(skip_all, fields(len = raw.len()))]
    pub fn set_text(&mut self, raw: &str) -> bool {
        if raw.is_empty() {
            debug!("Ignoring empty text update");
            return false;
        }
        self.canonical = raw.to_string();
        debug!("Canonical text replaced");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_change(&self.canonical);
        }
        true
    }

    /// Entry point for text widgets that report `None` when they have no value.
    pub fn on_widget_change(&mut self, value: Option<&str>) -> bool {
        match value {
            Some(raw) => self.set_text(raw),
            None => false,
        }
    }

    pub fn get_parsed(&self) -> Result<SplitConfig, ParseError> {
        SplitConfig::parse(&self.canonical)
    }

    /// Parse the latest canonical text, apply `edit`, and store the
    /// re-serialized result. `edit` returns whether it changed anything.
    #[instrument(skip(self, edit))]
    pub fn apply_structured_edit<F>(&mut self, edit: F) -> EditOutcome
    where
        F: FnOnce(&mut SplitConfig) -> bool,
    {
        let mut config = match self.get_parsed() {
            Ok(config) => config,
            Err(e) => {
                warn!("Dropping structured edit: {}", e);
                return EditOutcome::Dropped(DropReason::Malformed);
            }
        };

        if !edit(&mut config) {
            debug!("Structured edit left the document unchanged");
            return EditOutcome::Unchanged;
        }

        match config.to_canonical_text() {
            Ok(text) => {
                self.set_text(&text);
                EditOutcome::Applied
            }
            Err(e) => {
                warn!("Dropping structured edit: {}", e);
                EditOutcome::Dropped(DropReason::Serialization)
            }
        }
    }

    /// Adopt a new externally supplied default value. When it differs from
    /// the last one seen, the canonical text is reset to it and any local
    /// edits are discarded. The listener is not notified: the host already
    /// has this value.
    ///
    /// Returns `true` if the canonical text was reset.
    #[instrument(skip_all)]
    pub fn sync_default(&mut self, new_default: &str) -> bool {
        if new_default == self.default_value {
            return false;
        }
        debug!("External default changed, resetting canonical text");
        self.default_value = new_default.to_string();
        self.canonical = new_default.to_string();
        true
    }
}
