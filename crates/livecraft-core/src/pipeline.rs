//! Conversation pipeline: the single owner of project state.
//!
//! A turn runs `begin_turn` → `observe`* → `complete_turn` (or `fail_turn`).
//! Live observations never touch the store; the merge happens exactly once
//! when the stream has finished.

use crate::error::{CoreError, Result};
use crate::history::{ChangeKind, HistoryManager};
use crate::parser::{normalize_path, parse_file_blocks, strip_file_blocks};
use crate::preview::{PreviewCompiler, PreviewDocument};
use crate::store::ArtifactStore;
use crate::stream::{drive, RecordFormat};
use crate::tree::build_file_tree;
use futures::Stream;
use livecraft_types::{ArtifactDiffInfo, FileNode, Message, ParsedFile, Project};

/// Transcript entry appended when the response stream fails
pub const TRANSPORT_ERROR_MESSAGE: &str = "Error: Failed to get response.";

/// Result of a completed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub diffs: Vec<ArtifactDiffInfo>,
    /// First file written by the turn, for selection in a viewer
    pub first_file: Option<String>,
    /// Response text with the file blocks removed
    pub prose: String,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    store: ArtifactStore,
    history: HistoryManager,
    messages: Vec<Message>,
    streaming: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ArtifactStore::new(), HistoryManager::default())
    }
}

impl Pipeline {
    pub fn new(store: ArtifactStore, history: HistoryManager) -> Self {
        Self {
            store,
            history,
            messages: Vec::new(),
            streaming: false,
        }
    }

    /// Open a project. History starts empty.
    pub fn from_project(project: &Project, history_limit: usize) -> Self {
        let mut pipeline = Self::new(
            ArtifactStore::from_files(project.files.iter().cloned()),
            HistoryManager::new(history_limit),
        );
        pipeline.messages = project.messages.clone();
        pipeline
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.streaming {
            Err(CoreError::TurnInProgress)
        } else {
            Ok(())
        }
    }

    /// Record the user message and mark a response as streaming
    pub fn begin_turn(&mut self, user: Message) -> Result<()> {
        self.ensure_idle()?;
        self.messages.push(user);
        self.streaming = true;
        tracing::debug!(messages = self.messages.len(), "Turn started");
        Ok(())
    }

    /// Display-only diffs for the text received so far
    pub fn observe(&self, buffer: &str) -> Vec<ArtifactDiffInfo> {
        self.store.preview_diffs(&parse_file_blocks(buffer))
    }

    /// Apply the final response: one undoable merge, one assistant message
    pub fn complete_turn(&mut self, response: &str) -> Result<TurnOutcome> {
        if !self.streaming {
            return Err(CoreError::NoActiveTurn);
        }
        self.streaming = false;

        let files = parse_file_blocks(response);
        let diffs = if files.is_empty() {
            Vec::new()
        } else {
            self.history.push(self.store.clone(), ChangeKind::Merge);
            let (next, diffs) = self.store.merge(&files);
            self.store = next;
            diffs
        };

        self.messages
            .push(Message::assistant(response, diffs.clone()));

        tracing::info!(
            files = diffs.len(),
            new = diffs.iter().filter(|d| d.is_new).count(),
            total = self.store.len(),
            "Turn complete"
        );

        Ok(TurnOutcome {
            first_file: diffs.first().map(|d| d.path.clone()),
            prose: strip_file_blocks(response),
            diffs,
        })
    }

    /// Abandon the streaming turn. Store and history stay as they were.
    pub fn fail_turn(&mut self, error: &CoreError) -> Result<()> {
        if !self.streaming {
            return Err(CoreError::NoActiveTurn);
        }
        self.streaming = false;
        tracing::warn!(error = %error, "Turn failed");
        self.messages
            .push(Message::assistant(TRANSPORT_ERROR_MESSAGE, Vec::new()));
        Ok(())
    }

    /// Run a whole turn over a relay response stream.
    ///
    /// `on_progress` receives the accumulated text and its live diffs after
    /// every fragment.
    pub async fn run_turn<S, B, E, F>(
        &mut self,
        user: Message,
        stream: S,
        mut on_progress: F,
    ) -> Result<TurnOutcome>
    where
        S: Stream<Item = std::result::Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
        F: FnMut(&str, &[ArtifactDiffInfo]),
    {
        self.begin_turn(user)?;

        let result = {
            let this = &*self;
            drive(stream, RecordFormat::Relay, |text| {
                let live = this.observe(text);
                on_progress(text, &live);
            })
            .await
        };

        match result {
            Ok(outcome) => self.complete_turn(&outcome.content),
            Err(e) => {
                self.fail_turn(&e)?;
                Err(e)
            }
        }
    }

    /// Delete a file or a whole folder. Returns the removed files; an
    /// unmatched path is a no-op and records no history.
    pub fn delete_path(&mut self, path: &str) -> Result<Vec<ParsedFile>> {
        self.ensure_idle()?;
        let path = normalize_path(path);
        let mut next = self.store.clone();
        let removed = next.remove(&path);
        if !removed.is_empty() {
            let previous = std::mem::replace(&mut self.store, next);
            self.history.push(previous, ChangeKind::Delete);
            tracing::info!(path = %path, files = removed.len(), "Deleted");
        }
        Ok(removed)
    }

    /// Rename the last segment of a file or folder path
    pub fn rename_path(&mut self, path: &str, new_name: &str) -> Result<usize> {
        self.ensure_idle()?;
        let path = normalize_path(path);
        let mut next = self.store.clone();
        let moved = next.rename(&path, new_name)?;
        if moved > 0 {
            let previous = std::mem::replace(&mut self.store, next);
            self.history.push(previous, ChangeKind::Rename);
        }
        Ok(moved)
    }

    /// Restore the previous snapshot. `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        match self.history.undo() {
            Some(previous) => {
                self.store = previous;
                tracing::info!(remaining = self.history.len(), "Undo");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn file_tree(&self) -> Vec<FileNode> {
        build_file_tree(self.store.files())
    }

    pub fn synthesize(&self, compiler: &PreviewCompiler) -> Result<PreviewDocument> {
        Ok(compiler.compile(&self.store)?)
    }

    /// Write files and transcript back into `project`
    pub fn apply_to(&self, project: &mut Project) {
        project.files = self.store.files().to_vec();
        project.messages = self.messages.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::starter::starter_files;
    use crate::stream::{encode_content_record, DONE_RECORD};
    use futures::stream;
    use livecraft_types::Role;

    fn pipeline() -> Pipeline {
        Pipeline::new(ArtifactStore::from_files(starter_files()), HistoryManager::default())
    }

    fn relay_chunks(text: &str, chunk: usize) -> Vec<std::result::Result<Vec<u8>, String>> {
        let mut body = String::new();
        let chars: Vec<char> = text.chars().collect();
        for piece in chars.chunks(chunk) {
            body.push_str(&encode_content_record(&piece.iter().collect::<String>()));
        }
        body.push_str(DONE_RECORD);
        body.into_bytes().chunks(7).map(|c| Ok(c.to_vec())).collect()
    }

    const RESPONSE: &str = "Updated the app.\n---FILE: App.tsx---\nexport default function App() { return <p>hi</p>; }\n---END FILE---\n---FILE: src/styles.css---\np { color: red; }\n---END FILE---\nDone.";

    #[test]
    fn test_new_vs_modified_scenario() {
        let mut p = pipeline();
        p.begin_turn(Message::user("change it")).unwrap();
        let outcome = p.complete_turn(RESPONSE).unwrap();

        assert_eq!(outcome.diffs.len(), 2);
        assert!(!outcome.diffs[0].is_new);
        assert!(outcome.diffs[1].is_new);
        assert_eq!(outcome.first_file.as_deref(), Some("App.tsx"));
        assert_eq!(outcome.prose, "Updated the app.\n\n\nDone.");
        assert_eq!(p.store().len(), 5);
        assert_eq!(p.history().len(), 1);

        let last = p.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.artifacts, outcome.diffs);
    }

    #[test]
    fn test_undo_inverts_one_merge() {
        let mut p = pipeline();
        let before = p.store().clone();
        p.begin_turn(Message::user("x")).unwrap();
        p.complete_turn(RESPONSE).unwrap();
        assert_ne!(p.store(), &before);

        assert!(p.undo().unwrap());
        assert_eq!(p.store(), &before);
        assert!(!p.undo().unwrap());
    }

    #[test]
    fn test_turn_without_files_pushes_no_history() {
        let mut p = pipeline();
        p.begin_turn(Message::user("hello")).unwrap();
        let outcome = p.complete_turn("Just chatting.").unwrap();
        assert!(outcome.diffs.is_empty());
        assert!(p.history().is_empty());
        assert_eq!(p.messages().len(), 2);
    }

    #[test]
    fn test_mutations_rejected_while_streaming() {
        let mut p = pipeline();
        p.begin_turn(Message::user("a")).unwrap();
        assert!(matches!(p.begin_turn(Message::user("b")), Err(CoreError::TurnInProgress)));
        assert!(matches!(p.delete_path("App.tsx"), Err(CoreError::TurnInProgress)));
        assert!(matches!(p.rename_path("App.tsx", "Main.tsx"), Err(CoreError::TurnInProgress)));
        assert!(matches!(p.undo(), Err(CoreError::TurnInProgress)));
    }

    #[test]
    fn test_complete_without_turn_is_rejected() {
        let mut p = pipeline();
        assert!(matches!(p.complete_turn("x"), Err(CoreError::NoActiveTurn)));
        assert!(matches!(
            p.fail_turn(&CoreError::Transport("x".into())),
            Err(CoreError::NoActiveTurn)
        ));
    }

    #[test]
    fn test_observe_is_display_only() {
        let mut p = pipeline();
        p.begin_turn(Message::user("x")).unwrap();
        let live = p.observe(&RESPONSE[..RESPONSE.find("---FILE: src").unwrap()]);
        assert_eq!(live.len(), 1);
        assert_eq!(p.store(), &ArtifactStore::from_files(starter_files()));
        assert!(p.history().is_empty());
    }

    #[test]
    fn test_delete_and_rename_are_undoable() {
        let mut p = pipeline();
        assert!(p.delete_path("missing").unwrap().is_empty());
        assert!(p.history().is_empty());

        assert_eq!(p.delete_path("./App.tsx").unwrap().len(), 1);
        assert!(!p.store().contains("App.tsx"));
        assert_eq!(p.rename_path("index.html", "home.html").unwrap(), 1);
        assert!(p.store().contains("home.html"));
        assert_eq!(p.history().len(), 2);

        p.undo().unwrap();
        assert!(p.store().contains("index.html"));
        p.undo().unwrap();
        assert!(p.store().contains("App.tsx"));
    }

    #[tokio::test]
    async fn test_run_turn_streams_and_merges_once() {
        let mut p = pipeline();
        let mut progress = Vec::new();
        let outcome = p
            .run_turn(
                Message::user("go"),
                stream::iter(relay_chunks(RESPONSE, 5)),
                |text, live| progress.push((text.len(), live.len())),
            )
            .await
            .unwrap();

        assert_eq!(outcome.diffs.len(), 2);
        assert!(!p.is_streaming());
        assert_eq!(p.history().len(), 1);
        assert!(progress.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 <= w[1].1));
        assert_eq!(progress.last().map(|p| p.1), Some(2));
        assert_eq!(
            p.store().get("src/styles.css").map(|f| f.content.as_str()),
            Some("p { color: red; }")
        );
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_store_untouched() {
        let mut p = pipeline();
        let before = p.store().clone();
        let mut chunks = relay_chunks(RESPONSE, 40);
        chunks.truncate(chunks.len() / 2);
        chunks.push(Err("connection reset".to_string()));

        let err = p
            .run_turn(Message::user("go"), stream::iter(chunks), |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Transport(_)));
        assert!(!p.is_streaming());
        assert_eq!(p.store(), &before);
        assert!(p.history().is_empty());
        assert_eq!(p.messages().last().unwrap().content, TRANSPORT_ERROR_MESSAGE);
    }

    #[test]
    fn test_apply_to_project() {
        let mut p = pipeline();
        p.begin_turn(Message::user("x")).unwrap();
        p.complete_turn(RESPONSE).unwrap();

        let mut project = Project::new("demo", Vec::new());
        p.apply_to(&mut project);
        assert_eq!(project.files.len(), 5);
        assert_eq!(project.messages.len(), 2);

        let reopened = Pipeline::from_project(&project, 20);
        assert_eq!(reopened.store(), p.store());
        assert!(reopened.history().is_empty());
    }
}
