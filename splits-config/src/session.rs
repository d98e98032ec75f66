//! Editor session: one document shown through a text surface and a row list.
//!
//! The session wires a [`DocumentStore`] to a [`StructuredEditor`], a schema
//! validator and, once mounted, a text surface. Row edits are written back
//! into the surface so both views show the same canonical text.

use tracing::{debug, warn};

use crate::catalog::SplitCatalog;
use crate::editor::{SplitRow, StructuredEditor};
use crate::schema::{schema_id, splits_schema, BuiltinValidator, Diagnostic, SchemaValidator};
use crate::store::{ChangeListener, DocumentStore, DropReason, EditOutcome};

/// Handle to a mounted text editing widget.
pub trait TextSurface {
    /// Current widget text; `None` when the widget has no value.
    fn value(&self) -> Option<String>;
    fn set_value(&mut self, text: &str);
}

/// In-memory text surface.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    text: Option<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextSurface for MemorySurface {
    fn value(&self) -> Option<String> {
        self.text.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }
}

pub struct EditorSession<'c> {
    store: DocumentStore,
    editor: StructuredEditor<'c>,
    validator: Box<dyn SchemaValidator + 'c>,
    surface: Option<Box<dyn TextSurface>>,
    /// Last text written to or reported by the surface.
    surface_seen: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'c> EditorSession<'c> {
    /// New session over `default_value`, diagnosed with the embedded schema
    /// and warnings for ids missing from `catalog`.
    pub fn new(default_value: impl Into<String>, catalog: &'c SplitCatalog) -> Self {
        let mut session = Self {
            store: DocumentStore::new(default_value),
            editor: StructuredEditor::new(catalog),
            validator: Box::new(BuiltinValidator::with_catalog(catalog)),
            surface: None,
            surface_seen: None,
            diagnostics: Vec::new(),
        };
        session.register_schema();
        session
    }

    /// Swap in another validator. The schema is registered with it once here.
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: SchemaValidator + 'c,
    {
        self.validator = Box::new(validator);
        self.register_schema();
        self
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: ChangeListener + 'static,
    {
        self.store.set_listener(listener);
        self
    }

    fn register_schema(&mut self) {
        let schema = splits_schema();
        let id = schema_id(schema).unwrap_or("splits.schema.json");
        self.validator.register_schema(id, schema);
        self.refresh_diagnostics();
    }

    fn refresh_diagnostics(&mut self) {
        self.diagnostics = self.validator.diagnose(self.store.text());
    }

    fn push_to_surface(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_value(self.store.text());
            self.surface_seen = Some(self.store.text().to_string());
        }
    }

    /// Adopt widget text that changed without being reported. Text the
    /// session already exchanged with the widget is never re-adopted, so a
    /// stale widget cannot overwrite newer canonical text.
    fn sync_from_surface(&mut self) {
        let Some(current) = self.surface.as_ref().and_then(|s| s.value()) else {
            return;
        };
        if current.is_empty() || self.surface_seen.as_deref() == Some(current.as_str()) {
            return;
        }
        if current != self.store.text() {
            debug!("Adopting unreported widget text before row edit");
            self.store.set_text(&current);
            self.refresh_diagnostics();
        }
        self.surface_seen = Some(current);
    }

    /// Attach a text widget; it is loaded with the current canonical text.
    pub fn mount(&mut self, surface: Box<dyn TextSurface>) {
        self.surface = Some(surface);
        self.push_to_surface();
    }

    pub fn unmount(&mut self) -> Option<Box<dyn TextSurface>> {
        self.surface_seen = None;
        self.surface.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&dyn TextSurface> {
        self.surface.as_deref()
    }

    pub fn text(&self) -> &str {
        self.store.text()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn editor(&self) -> &StructuredEditor<'c> {
        &self.editor
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn rows(&self) -> Option<Vec<SplitRow>> {
        self.editor.rows(&self.store)
    }

    /// Text typed into the widget. Accepted text is echoed back to the
    /// mounted surface so later row edits start from it.
    pub fn on_text_change(&mut self, value: Option<&str>) -> bool {
        let accepted = self.store.on_widget_change(value);
        if accepted {
            self.push_to_surface();
            self.refresh_diagnostics();
        }
        accepted
    }

    /// The host supplied a (possibly) new default value.
    pub fn set_default(&mut self, default_value: &str) -> bool {
        let reset = self.store.sync_default(default_value);
        if reset {
            self.push_to_surface();
            self.refresh_diagnostics();
        }
        reset
    }

    fn after_edit(&mut self, outcome: EditOutcome) -> EditOutcome {
        if outcome.is_applied() {
            self.push_to_surface();
            self.refresh_diagnostics();
        }
        outcome
    }

    pub fn replace_at(&mut self, index: usize, new_id: &str) -> EditOutcome {
        self.sync_from_surface();
        let outcome = self.editor.replace_at(&mut self.store, index, new_id);
        self.after_edit(outcome)
    }

    pub fn remove_at(&mut self, index: usize) -> EditOutcome {
        self.sync_from_surface();
        let outcome = self.editor.remove_at(&mut self.store, index);
        self.after_edit(outcome)
    }

    /// Append from the catalog picker. The picker lives beside the text
    /// widget, so the widget must be mounted.
    pub fn append_from_catalog(&mut self, catalog_id: &str) -> EditOutcome {
        if self.surface.is_none() {
            warn!("Dropping append of '{}': text editor is not mounted", catalog_id);
            return EditOutcome::Dropped(DropReason::NotMounted);
        }

        self.sync_from_surface();
        let outcome = self.editor.append_from_catalog(&mut self.store, catalog_id);
        self.after_edit(outcome)
    }
}
