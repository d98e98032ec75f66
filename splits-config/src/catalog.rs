//! Read-only catalog of known splits.
//!
//! The catalog maps a split id to the label and tooltip shown next to it.
//! It is built once and never mutated; editors borrow it.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use splits_core::error::{Result, SplitsError};
use tracing::warn;

const BUILTIN_DEFINITIONS: &str = include_str!("../assets/split-definitions.txt");

/// Matches one annotated enum member:
/// `[Description("..."), ToolTip("...")] SplitId,`
static DEFINITION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\[Description\("(?P<description>(?:[^"\\]|\\.)*)"\),\s*ToolTip\("(?P<tooltip>(?:[^"\\]|\\.)*)"\)\]\s*(?P<id>\w+)"#,
    )
    .expect("Split definition regex should compile - this is a static pattern")
});

static BUILTIN_CATALOG: Lazy<SplitCatalog> =
    Lazy::new(|| SplitCatalog::parse_definitions(BUILTIN_DEFINITIONS));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub description: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, Default)]
pub struct SplitCatalog {
    entries: IndexMap<String, CatalogEntry>,
}

impl SplitCatalog {
    /// The catalog shipped with the crate, parsed on first use.
    pub fn builtin() -> &'static SplitCatalog {
        &BUILTIN_CATALOG
    }

    /// Build from entries; the first entry wins when ids repeat.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut map = IndexMap::new();
        for entry in entries {
            if map.contains_key(&entry.id) {
                warn!("Duplicate split definition '{}' ignored", entry.id);
                continue;
            }
            map.insert(entry.id.clone(), entry);
        }
        Self { entries: map }
    }

    /// Parse attribute-annotated split definitions. Lines that do not match
    /// are skipped.
    pub fn parse_definitions(source: &str) -> Self {
        Self::from_entries(DEFINITION_PATTERN.captures_iter(source).map(|caps| {
            CatalogEntry {
                id: caps["id"].to_string(),
                description: unescape(&caps["description"]),
                tooltip: unescape(&caps["tooltip"]),
            }
        }))
    }

    /// Parse a JSON array of entries.
    pub fn from_json(source: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(source)?;
        Ok(Self::from_entries(entries))
    }

    /// Accept either a JSON array or annotated definitions.
    pub fn from_source(source: &str) -> Result<Self> {
        let catalog = if source.trim_start().starts_with('[') {
            Self::from_json(source)?
        } else {
            Self::parse_definitions(source)
        };
        if catalog.is_empty() {
            return Err(SplitsError::Catalog(
                "no split definitions found".to_string(),
            ));
        }
        Ok(catalog)
    }

    pub fn lookup(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// All entries in definition order.
    pub fn list_all(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Case-insensitive substring match on id or description.
    pub fn search<'a>(&'a self, query: &str) -> Vec<&'a CatalogEntry> {
        let needle = query.to_lowercase();
        self.entries
            .values()
            .filter(|entry| {
                entry.id.to_lowercase().contains(&needle)
                    || entry.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITIONS: &str = r#"
    public enum SplitName {
        [Description("Mantis Claw (Skill)"), ToolTip("Splits when obtaining Mantis Claw")]
        MantisClaw,
        // not a split
        [Description("Lurien (Dreamer)"), ToolTip("Splits on the \"Lurien\" text")]
        Lurien,
    }
    "#;

    #[test]
    fn test_parse_definitions() {
        let catalog = SplitCatalog::parse_definitions(DEFINITIONS);
        assert_eq!(catalog.len(), 2);

        let claw = catalog.lookup("MantisClaw").unwrap();
        assert_eq!(claw.description, "Mantis Claw (Skill)");
        assert_eq!(claw.tooltip, "Splits when obtaining Mantis Claw");

        let lurien = catalog.lookup("Lurien").unwrap();
        assert_eq!(lurien.tooltip, r#"Splits on the "Lurien" text"#);
    }

    #[test]
    fn test_list_all_keeps_definition_order() {
        let catalog = SplitCatalog::parse_definitions(DEFINITIONS);
        let ids: Vec<&str> = catalog.list_all().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["MantisClaw", "Lurien"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = SplitCatalog::from_entries(vec![
            CatalogEntry {
                id: "a".to_string(),
                description: "first".to_string(),
                tooltip: String::new(),
            },
            CatalogEntry {
                id: "a".to_string(),
                description: "second".to_string(),
                tooltip: String::new(),
            },
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("a").unwrap().description, "first");
    }

    #[test]
    fn test_unknown_id_lookup() {
        let catalog = SplitCatalog::parse_definitions(DEFINITIONS);
        assert!(catalog.lookup("nonexistent").is_none());
        assert!(!catalog.contains("nonexistent"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = SplitCatalog::parse_definitions(DEFINITIONS);
        let hits = catalog.search("CLAW");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "MantisClaw");
        assert_eq!(catalog.search("dreamer").len(), 1);
        assert!(catalog.search("radiance").is_empty());
    }

    #[test]
    fn test_from_source_detects_json() {
        let json = r#"[{"id": "Custom", "description": "Custom split", "tooltip": "Manual"}]"#;
        let catalog = SplitCatalog::from_source(json).unwrap();
        assert!(catalog.contains("Custom"));

        let catalog = SplitCatalog::from_source(DEFINITIONS).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_from_source_rejects_empty_catalog() {
        let err = SplitCatalog::from_source("nothing here").unwrap_err();
        assert!(matches!(err, SplitsError::Catalog(_)));
        assert!(SplitCatalog::from_source("[").is_err());
    }

    #[test]
    fn test_builtin_catalog_is_loaded_once() {
        let first = SplitCatalog::builtin();
        let second = SplitCatalog::builtin();
        assert!(std::ptr::eq(first, second));
        assert!(first.contains("MothwingCloak"));
        assert!(first.contains("ManualSplit"));
        assert!(first
            .lookup("Hegemol")
            .is_some_and(|e| e.tooltip.contains("\"Herrah\"")));
    }
}
