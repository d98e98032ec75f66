//! Split config commands.
//!
//! Every editing command follows the same path a UI would: open a session
//! over the file, perform one row operation, and let the session's change
//! listener decide whether there is anything to write back.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use splits_core::{splits_println, splits_warning};

use super::host::FileHost;
use crate::catalog::SplitCatalog;
use crate::document::SplitConfig;
use crate::schema::Severity;
use crate::store::EditOutcome;

pub fn load_catalog(path: &Path) -> Result<SplitCatalog> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read split catalog: {}", path.display()))?;
    SplitCatalog::from_source(&source)
        .with_context(|| format!("Invalid split catalog: {}", path.display()))
}

pub fn show(file: &Path, catalog: &SplitCatalog) -> Result<()> {
    let host = FileHost::open(file, catalog)?;
    let session = host.session();

    if let Ok(config) = session.store().get_parsed() {
        match (config.category_name(), config.game_name()) {
            (Some(category), Some(game)) => splits_println!("{} ({})", category, game),
            (Some(category), None) => splits_println!("{}", category),
            (None, Some(game)) => splits_println!("{}", game),
            (None, None) => {}
        }
    }

    let Some(rows) = session.rows() else {
        bail!(
            "No split list to show in {}: fix the JSON or add a splitIds array",
            file.display()
        );
    };

    if rows.is_empty() {
        splits_println!("(no splits)");
    }
    for row in rows {
        if row.known {
            splits_println!("{:>3}. {} [{}]", row.index, row.label, row.id);
        } else {
            splits_println!("{:>3}. {} (not in catalog)", row.index, row.label);
        }
    }
    Ok(())
}

fn finish(host: &FileHost<'_>, outcome: EditOutcome, file: &Path) -> Result<()> {
    match outcome {
        EditOutcome::Applied => {
            host.commit()?;
            splits_println!("Updated {}", file.display());
            Ok(())
        }
        EditOutcome::Unchanged => {
            splits_println!("No change to {}", file.display());
            Ok(())
        }
        EditOutcome::Dropped(reason) => bail!("Edit to {} dropped: {}", file.display(), reason),
    }
}

pub fn add(file: &Path, id: &str, catalog: &SplitCatalog) -> Result<()> {
    let mut host = FileHost::open(file, catalog)?;
    if !catalog.contains(id) {
        splits_warning!("'{}' is not in the split catalog; adding it anyway", id);
    }
    let outcome = host.session_mut().append_from_catalog(id);
    finish(&host, outcome, file)
}

pub fn set(file: &Path, index: usize, id: &str, catalog: &SplitCatalog) -> Result<()> {
    let mut host = FileHost::open(file, catalog)?;
    let outcome = host.session_mut().replace_at(index, id);
    finish(&host, outcome, file)
}

pub fn remove(file: &Path, index: usize, catalog: &SplitCatalog) -> Result<()> {
    let mut host = FileHost::open(file, catalog)?;
    let outcome = host.session_mut().remove_at(index);
    finish(&host, outcome, file)
}

pub fn validate(file: &Path, strict: bool, catalog: &SplitCatalog) -> Result<()> {
    let host = FileHost::open(file, catalog)?;
    let diagnostics = host.session().diagnostics();

    for diagnostic in diagnostics {
        splits_println!("{}", diagnostic);
    }

    let failing = diagnostics
        .iter()
        .filter(|d| strict || d.severity == Severity::Error)
        .count();
    if failing > 0 {
        bail!("{} has {} problem(s)", file.display(), failing);
    }
    splits_println!("{} is valid", file.display());
    Ok(())
}

pub fn format(file: &Path, stdout: bool) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read split config: {}", file.display()))?;
    let config = SplitConfig::parse(&content)
        .with_context(|| format!("Cannot format {}", file.display()))?;
    let text = config.to_canonical_text()?;

    if stdout {
        splits_core::splits_print!("{}", text);
    } else {
        fs::write(file, text)
            .with_context(|| format!("Failed to write split config: {}", file.display()))?;
    }
    Ok(())
}

pub fn list_catalog(search: Option<&str>, catalog: &SplitCatalog) -> Result<()> {
    let entries: Vec<_> = match search {
        Some(query) => catalog.search(query),
        None => catalog.list_all().collect(),
    };
    for entry in &entries {
        splits_println!("{:<24} {}", entry.id, entry.description);
    }
    if entries.is_empty() {
        splits_println!("No matching splits");
    }
    Ok(())
}
