//! Versioned in-memory file system

use crate::error::{CoreError, Result};
use livecraft_types::{ArtifactDiffInfo, ParsedFile};

/// Path-keyed file snapshot.
///
/// Iteration follows insertion order: replacing a path keeps its position,
/// a new path is appended. Cloning yields a fully independent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArtifactStore {
    files: Vec<ParsedFile>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a file list. Repeated paths collapse, last wins.
    pub fn from_files(files: impl IntoIterator<Item = ParsedFile>) -> Self {
        let mut store = Self::new();
        for file in files {
            store.upsert(file);
        }
        store
    }

    pub fn get(&self, path: &str) -> Option<&ParsedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParsedFile> {
        self.files.iter()
    }

    pub fn files(&self) -> &[ParsedFile] {
        &self.files
    }

    pub fn into_files(self) -> Vec<ParsedFile> {
        self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn upsert(&mut self, file: ParsedFile) {
        match self.files.iter_mut().find(|f| f.path == file.path) {
            Some(slot) => *slot = file,
            None => self.files.push(file),
        }
    }

    /// Classify `incoming` against this snapshot without merging
    pub fn preview_diffs(&self, incoming: &[ParsedFile]) -> Vec<ArtifactDiffInfo> {
        incoming
            .iter()
            .map(|file| ArtifactDiffInfo::from_file(file, !self.contains(&file.path)))
            .collect()
    }

    /// Merge by path. Incoming paths are replaced or inserted, every other
    /// path is preserved. `self` is left untouched.
    pub fn merge(&self, incoming: &[ParsedFile]) -> (ArtifactStore, Vec<ArtifactDiffInfo>) {
        let diffs = self.preview_diffs(incoming);
        let mut next = self.clone();
        for file in incoming {
            next.upsert(file.clone());
        }
        tracing::debug!(
            files = incoming.len(),
            new = diffs.iter().filter(|d| d.is_new).count(),
            "Merged artifacts"
        );
        (next, diffs)
    }

    /// Remove the file at `path` and everything under the folder `path/`.
    /// Returns the removed files.
    pub fn remove(&mut self, path: &str) -> Vec<ParsedFile> {
        let prefix = format!("{}/", path);
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.path == path || f.path.starts_with(&prefix));
        self.files = kept;
        removed
    }

    /// Rename the last segment of a file or folder path, moving every
    /// descendant. Returns the number of files moved.
    pub fn rename(&mut self, path: &str, new_name: &str) -> Result<usize> {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name.contains('/') || new_name == "." || new_name == ".." {
            return Err(CoreError::InvalidPath(new_name.to_string()));
        }

        let prefix = format!("{}/", path);
        let affected: Vec<usize> = self
            .files
            .iter()
            .enumerate()
            .filter(|(_, f)| f.path == path || f.path.starts_with(&prefix))
            .map(|(i, _)| i)
            .collect();
        if affected.is_empty() {
            return Err(CoreError::FileNotFound(path.to_string()));
        }

        let target = match path.rsplit_once('/') {
            Some((parent, _)) => format!("{}/{}", parent, new_name),
            None => new_name.to_string(),
        };
        if target == path {
            return Ok(0);
        }

        let renamed: Vec<String> = affected
            .iter()
            .map(|&i| format!("{}{}", target, &self.files[i].path[path.len()..]))
            .collect();

        let target_prefix = format!("{}/", target);
        let conflict = self.files.iter().enumerate().any(|(i, f)| {
            !affected.contains(&i) && (f.path == target || f.path.starts_with(&target_prefix))
        });
        if conflict {
            return Err(CoreError::PathConflict(target));
        }

        for (&i, new_path) in affected.iter().zip(renamed) {
            let content = std::mem::take(&mut self.files[i].content);
            self.files[i] = ParsedFile::new(new_path, content);
        }

        tracing::debug!(from = path, to = %target, files = affected.len(), "Renamed");
        Ok(affected.len())
    }
}
