//! Row-level editing of `splitIds`.
//!
//! Each operation is one parse-mutate-serialize pass through the store, so
//! indices always refer to the text as it is when the operation runs.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::catalog::SplitCatalog;
use crate::store::{DocumentStore, EditOutcome};

/// Display text for a known split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLabel {
    pub label: String,
    pub tooltip: String,
}

/// One rendered row of the split list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRow {
    pub index: usize,
    /// Raw id, or the JSON text of a non-string element.
    pub id: String,
    pub label: String,
    pub tooltip: Option<String>,
    /// `false` when the id is not in the catalog; the row shows the raw id.
    pub known: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct StructuredEditor<'c> {
    catalog: &'c SplitCatalog,
}

impl<'c> StructuredEditor<'c> {
    pub fn new(catalog: &'c SplitCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c SplitCatalog {
        self.catalog
    }

    #[instrument(skip(self, store))]
    pub fn replace_at(
        &self,
        store: &mut DocumentStore,
        index: usize,
        new_id: &str,
    ) -> EditOutcome {
        store.apply_structured_edit(|config| config.replace_split(index, new_id))
    }

    #[instrument(skip(self, store))]
    pub fn remove_at(&self, store: &mut DocumentStore, index: usize) -> EditOutcome {
        store.apply_structured_edit(|config| config.remove_split(index))
    }

    /// Append `catalog_id` to the end of the list. Ids missing from the
    /// catalog are appended verbatim; the schema decides validity.
    #[instrument(skip(self, store))]
    pub fn append_from_catalog(
        &self,
        store: &mut DocumentStore,
        catalog_id: &str,
    ) -> EditOutcome {
        if !self.catalog.contains(catalog_id) {
            debug!("Appending split '{}' not found in catalog", catalog_id);
        }
        store.apply_structured_edit(|config| config.push_split(catalog_id))
    }

    pub fn describe(&self, id: &str) -> Option<SplitLabel> {
        self.catalog.lookup(id).map(|entry| SplitLabel {
            label: entry.description.clone(),
            tooltip: entry.tooltip.clone(),
        })
    }

    /// Rows for the current text, or `None` when there is no list to show.
    pub fn rows(&self, store: &DocumentStore) -> Option<Vec<SplitRow>> {
        let config = match store.get_parsed() {
            Ok(config) => config,
            Err(e) => {
                debug!("No structured view: {}", e);
                return None;
            }
        };
        let values = config.split_values()?;
        Some(
            values
                .iter()
                .enumerate()
                .map(|(index, value)| self.row(index, value))
                .collect(),
        )
    }

    fn row(&self, index: usize, value: &Value) -> SplitRow {
        let id = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match value.as_str().and_then(|s| self.describe(s)) {
            Some(SplitLabel { label, tooltip }) => SplitRow {
                index,
                id,
                label,
                tooltip: Some(tooltip),
                known: true,
            },
            None => SplitRow {
                index,
                label: id.clone(),
                id,
                tooltip: None,
                known: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::store::DropReason;
    use serde_json::json;

    fn catalog() -> SplitCatalog {
        SplitCatalog::from_entries(
            [("a", "Split A"), ("b", "Split B"), ("c", "Split C")]
                .into_iter()
                .map(|(id, description)| CatalogEntry {
                    id: id.to_string(),
                    description: description.to_string(),
                    tooltip: format!("Splits on {id}"),
                }),
        )
    }

    fn ids(store: &DocumentStore) -> Vec<String> {
        store
            .get_parsed()
            .unwrap()
            .split_ids()
            .unwrap()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_append_at_end() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let mut store = DocumentStore::new(r#"{"splitIds": ["a","b"]}"#);

        assert_eq!(editor.append_from_catalog(&mut store, "c"), EditOutcome::Applied);
        assert_eq!(
            store.get_parsed().unwrap().into_value(),
            json!({"splitIds": ["a", "b", "c"]})
        );
    }

    #[test]
    fn test_append_unknown_and_duplicate_ids() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let mut store = DocumentStore::new(r#"{"splitIds": ["a"]}"#);

        editor.append_from_catalog(&mut store, "not-in-catalog");
        editor.append_from_catalog(&mut store, "a");
        assert_eq!(ids(&store), vec!["a", "not-in-catalog", "a"]);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let mut store = DocumentStore::new(r#"{"splitIds": ["a","b","c"]}"#);

        assert_eq!(editor.replace_at(&mut store, 1, "c"), EditOutcome::Applied);
        let once = store.text().to_string();
        assert_eq!(editor.replace_at(&mut store, 1, "c"), EditOutcome::Unchanged);
        assert_eq!(store.text(), once);
        assert_eq!(ids(&store), vec!["a", "c", "c"]);
    }

    #[test]
    fn test_replace_out_of_range_is_no_op() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let original = r#"{"splitIds": ["a"]}"#;
        let mut store = DocumentStore::new(original);

        assert_eq!(editor.replace_at(&mut store, 1, "b"), EditOutcome::Unchanged);
        assert_eq!(store.text(), original);
    }

    #[test]
    fn test_remove_preserves_order() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let mut store = DocumentStore::new(r#"{"splitIds": ["a","b","c","a"]}"#);

        assert_eq!(editor.remove_at(&mut store, 2), EditOutcome::Applied);
        assert_eq!(ids(&store), vec!["a", "b", "a"]);
        assert_eq!(editor.remove_at(&mut store, 0), EditOutcome::Applied);
        assert_eq!(ids(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_out_of_bounds_leaves_document_unchanged() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let original = r#"{"splitIds": ["a","b"]}"#;
        let mut store = DocumentStore::new(original);

        for index in [2, 3, usize::MAX] {
            assert_eq!(editor.remove_at(&mut store, index), EditOutcome::Unchanged);
        }
        assert_eq!(store.text(), original);
    }

    #[test]
    fn test_edits_without_list_are_no_ops() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let mut store = DocumentStore::new(r#"{"gameName": "HK"}"#);

        assert_eq!(editor.replace_at(&mut store, 0, "a"), EditOutcome::Unchanged);
        assert_eq!(editor.remove_at(&mut store, 0), EditOutcome::Unchanged);
    }

    #[test]
    fn test_edits_preserve_unknown_fields() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let mut store = DocumentStore::new(
            r#"{"categoryName": "Any%", "splitIds": ["a","b"], "variables": {"x": [1, 2]}}"#,
        );

        editor.remove_at(&mut store, 0);
        assert_eq!(
            store.get_parsed().unwrap().into_value(),
            json!({"categoryName": "Any%", "splitIds": ["b"], "variables": {"x": [1, 2]}})
        );
        let keys: Vec<String> = store.get_parsed().unwrap().fields().keys().cloned().collect();
        assert_eq!(keys, vec!["categoryName", "splitIds", "variables"]);
    }

    #[test]
    fn test_malformed_text_drops_every_edit() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let mut store = DocumentStore::new("{not json");

        let dropped = EditOutcome::Dropped(DropReason::Malformed);
        assert_eq!(editor.append_from_catalog(&mut store, "a"), dropped);
        assert_eq!(editor.replace_at(&mut store, 0, "a"), dropped);
        assert_eq!(editor.remove_at(&mut store, 0), dropped);
        assert_eq!(store.text(), "{not json");
        assert!(editor.rows(&store).is_none());
    }

    #[test]
    fn test_describe_known_and_unknown() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);

        assert_eq!(
            editor.describe("a"),
            Some(SplitLabel {
                label: "Split A".to_string(),
                tooltip: "Splits on a".to_string(),
            })
        );
        assert_eq!(editor.describe("nonexistent"), None);
    }

    #[test]
    fn test_rows_degrade_for_unknown_ids() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let store = DocumentStore::new(r#"{"splitIds": ["a", "mystery", 4]}"#);

        let rows = editor.rows(&store).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].known);
        assert_eq!(rows[0].label, "Split A");
        assert_eq!(rows[1].label, "mystery");
        assert_eq!(rows[1].tooltip, None);
        assert!(!rows[1].known);
        assert_eq!(rows[2].id, "4");
        assert_eq!(rows[2].index, 2);
    }

    #[test]
    fn test_rows_absent_without_list() {
        let catalog = catalog();
        let editor = StructuredEditor::new(&catalog);
        let store = DocumentStore::new(r#"{"gameName": "HK"}"#);
        assert!(editor.rows(&store).is_none());
    }
}
