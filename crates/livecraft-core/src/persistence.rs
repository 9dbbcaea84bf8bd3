//! Project persistence

use crate::error::{CoreError, Result};
use async_trait::async_trait;
use livecraft_types::Project;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub const PROJECTS_FILE: &str = "projects.json";

/// Project store
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects, newest first
    async fn list(&self) -> Result<Vec<Project>>;
    async fn get(&self, id: &str) -> Result<Option<Project>>;
    /// Replace a project in place, or insert a new one at the front
    async fn upsert(&self, project: &Project) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Projects as one JSON list on disk
pub struct JsonProjectStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at `<dir>/projects.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(PROJECTS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Project>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, projects: &[Project]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(projects)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for JsonProjectStore {
    async fn list(&self) -> Result<Vec<Project>> {
        self.read_all().await
    }

    async fn get(&self, id: &str) -> Result<Option<Project>> {
        Ok(self.read_all().await?.into_iter().find(|p| p.id == id))
    }

    async fn upsert(&self, project: &Project) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.read_all().await?;
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(slot) => *slot = project.clone(),
            None => projects.insert(0, project.clone()),
        }
        self.write_all(&projects).await?;
        tracing::debug!(id = %project.id, files = project.files.len(), "Saved project");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.read_all().await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(CoreError::ProjectNotFound(id.to_string()));
        }
        self.write_all(&projects).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::starter::new_project;
    use livecraft_types::ParsedFile;

    #[tokio::test]
    async fn test_missing_file_is_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonProjectStore::in_dir(dir.path());
        assert!(store.list().await?.is_empty());
        assert!(store.get("nope").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_new_projects_go_first() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonProjectStore::in_dir(&dir.path().join("nested"));

        let first = new_project("first");
        let second = new_project("second");
        store.upsert(&first).await?;
        store.upsert(&second).await?;

        let names: Vec<_> = store.list().await?.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["second", "first"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonProjectStore::in_dir(dir.path());

        let mut project = new_project("demo");
        store.upsert(&project).await?;
        store.upsert(&new_project("other")).await?;

        project.files.push(ParsedFile::new("styles.css", "body{}"));
        store.upsert(&project).await?;

        let all = store.list().await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].id, project.id);
        let loaded = store.get(&project.id).await?.unwrap();
        assert_eq!(loaded.files.len(), 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonProjectStore::in_dir(dir.path());
        let project = new_project("demo");
        store.upsert(&project).await?;

        store.delete(&project.id).await?;
        assert!(store.list().await?.is_empty());
        assert!(matches!(
            store.delete(&project.id).await,
            Err(CoreError::ProjectNotFound(_))
        ));
        Ok(())
    }
}
