use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

use crate::catalog::SplitCatalog;
use crate::session::{EditorSession, MemorySurface};

/// File-backed host for an editing session.
///
/// The file content is the session's default value. Accepted edits are
/// collected through the change listener and written by [`FileHost::commit`].
pub struct FileHost<'c> {
    path: PathBuf,
    session: EditorSession<'c>,
    pending: Rc<RefCell<Option<String>>>,
}

impl<'c> FileHost<'c> {
    pub fn open(path: &Path, catalog: &'c SplitCatalog) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read split config: {}", path.display()))?;

        let pending = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&pending);
        let mut session = EditorSession::new(content, catalog)
            .with_listener(move |text: &str| *sink.borrow_mut() = Some(text.to_string()));
        session.mount(Box::new(MemorySurface::new()));

        Ok(Self {
            path: path.to_path_buf(),
            session,
            pending,
        })
    }

    pub fn session(&self) -> &EditorSession<'c> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession<'c> {
        &mut self.session
    }

    /// Write the latest accepted text, if any. Returns whether the file was written.
    pub fn commit(&self) -> Result<bool> {
        let Some(text) = self.pending.borrow_mut().take() else {
            debug!("No changes to write for {}", self.path.display());
            return Ok(false);
        };
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write split config: {}", self.path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EditOutcome;
    use tempfile::TempDir;

    #[test]
    fn test_commit_writes_only_after_accepted_edit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("splits.json");
        fs::write(&path, r#"{"splitIds": ["MantisClaw"]}"#).unwrap();

        let mut host = FileHost::open(&path, SplitCatalog::builtin()).unwrap();
        assert!(!host.commit().unwrap());

        assert_eq!(host.session_mut().remove_at(4), EditOutcome::Unchanged);
        assert!(!host.commit().unwrap());

        assert_eq!(
            host.session_mut().append_from_catalog("CrystalHeart"),
            EditOutcome::Applied
        );
        assert!(host.commit().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), host.session().text());
    }

    #[test]
    fn test_open_missing_file_fails_with_context() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");
        let err = FileHost::open(&path, SplitCatalog::builtin()).err().unwrap();
        assert!(err.to_string().contains("Failed to read split config"));
    }
}
