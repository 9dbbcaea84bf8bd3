//! Watches the project store for changes made by other processes

use crate::error::{CoreError, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Changed(PathBuf),
    Error(String),
}

/// Debounced watcher for a single file.
///
/// The parent directory is watched because the store replaces its file by
/// rename, which drops watches placed on the file itself.
pub struct Watcher {
    target: PathBuf,
    debounce_ms: u64,
    rx: Option<Receiver<WatchEvent>>,
    debouncer: Option<Debouncer<notify::RecommendedWatcher>>,
}

impl Watcher {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            debounce_ms: 300,
            rx: None,
            debouncer: None,
        }
    }

    /// Set debounce duration in milliseconds
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn start(&mut self) -> Result<()> {
        let dir = self
            .target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        std::fs::create_dir_all(&dir)?;

        let file_name = self.target.file_name().map(|n| n.to_os_string());
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |res: DebounceEventResult| match res {
                Ok(events) => {
                    for event in events {
                        if event.kind != DebouncedEventKind::Any {
                            continue;
                        }
                        if event.path.file_name().map(|n| n.to_os_string()) != file_name {
                            continue;
                        }
                        let _ = tx.send(WatchEvent::Changed(event.path));
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| CoreError::Watch(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| CoreError::Watch(e.to_string()))?;

        tracing::debug!(path = %self.target.display(), "Watching");
        self.rx = Some(rx);
        self.debouncer = Some(debouncer);
        Ok(())
    }

    /// Next event (blocking). `None` once the watcher is stopped.
    pub fn next_event(&self) -> Option<WatchEvent> {
        self.rx.as_ref().and_then(|rx| rx.recv().ok())
    }

    /// Next event without blocking
    pub fn try_next_event(&self) -> Option<WatchEvent> {
        self.rx.as_ref().and_then(|rx| rx.try_recv().ok())
    }

    /// Next event, waiting at most `timeout`
    pub fn next_event_timeout(&self, timeout: Duration) -> Option<WatchEvent> {
        self.rx.as_ref().and_then(|rx| rx.recv_timeout(timeout).ok())
    }

    pub fn stop(&mut self) {
        self.debouncer = None;
        self.rx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_events_before_start() {
        let watcher = Watcher::new("/tmp/livecraft-never/projects.json");
        assert!(watcher.try_next_event().is_none());
        assert!(watcher.next_event().is_none());
    }

    #[test]
    fn test_start_creates_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("home").join("projects.json");
        let mut watcher = Watcher::new(&target).with_debounce(50);
        watcher.start()?;
        assert!(dir.path().join("home").is_dir());
        assert_eq!(watcher.target(), target.as_path());
        watcher.stop();
        assert!(watcher.try_next_event().is_none());
        Ok(())
    }
}
