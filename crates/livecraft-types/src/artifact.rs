//! Artifact (file) types

use serde::{Deserialize, Serialize};

/// Source language of a file, derived from its extension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
    Css,
    Html,
    Json,
    Markdown,
    Python,
    Rust,
    Go,
    Sql,
    Text,
}

impl Language {
    /// Derive the language from a file path. Unknown or missing extensions map to `Text`.
    pub fn from_path(path: &str) -> Self {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Language::Text,
        }
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "ts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "js" => Language::JavaScript,
            "jsx" => Language::Jsx,
            "css" => Language::Css,
            "html" => Language::Html,
            "json" => Language::Json,
            "md" => Language::Markdown,
            "py" => Language::Python,
            "rs" => Language::Rust,
            "go" => Language::Go,
            "sql" => Language::Sql,
            _ => Language::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::JavaScript => "javascript",
            Language::Jsx => "jsx",
            Language::Css => "css",
            Language::Html => "html",
            Language::Json => "json",
            Language::Markdown => "markdown",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Sql => "sql",
            Language::Text => "text",
        }
    }

    /// JSX sources; their presence puts the preview in component mode
    pub fn is_component(&self) -> bool {
        matches!(self, Language::Tsx | Language::Jsx)
    }

    /// Sources that go through the preview transform once component mode
    /// is on
    pub fn is_transformable(&self) -> bool {
        self.is_component() || *self == Language::TypeScript
    }
}

impl From<String> for Language {
    fn from(name: String) -> Self {
        match name.as_str() {
            "typescript" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "javascript" => Language::JavaScript,
            "jsx" => Language::Jsx,
            "css" => Language::Css,
            "html" => Language::Html,
            "json" => Language::Json,
            "markdown" => Language::Markdown,
            "python" => Language::Python,
            "rust" => Language::Rust,
            "go" => Language::Go,
            "sql" => Language::Sql,
            _ => Language::Text,
        }
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.as_str().to_string()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A complete file extracted from model output or loaded from a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: String,
    pub content: String,
    pub language: Language,
}

impl ParsedFile {
    /// Create a file, deriving its language from the path
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let language = Language::from_path(&path);
        Self {
            path,
            content: content.into(),
            language,
        }
    }

    /// Last path segment
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }
}

/// Per-file change summary produced by a merge.
///
/// `lines_added` is the line count of the incoming content, not a diff
/// against the previous version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDiffInfo {
    pub path: String,
    pub lines_added: usize,
    pub is_new: bool,
    pub content: String,
}

impl ArtifactDiffInfo {
    pub fn from_file(file: &ParsedFile, is_new: bool) -> Self {
        Self {
            path: file.path.clone(),
            lines_added: file.line_count(),
            is_new,
            content: file.content.clone(),
        }
    }
}

/// Node kind in the navigation tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

/// Navigation tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl FileNode {
    pub fn folder(name: impl Into<String>, path: impl Into<String>, children: Vec<FileNode>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Folder,
            children: Some(children),
            content: None,
            language: None,
        }
    }

    pub fn file(name: impl Into<String>, source: &ParsedFile) -> Self {
        Self {
            name: name.into(),
            path: source.path.clone(),
            kind: NodeKind::File,
            children: None,
            content: Some(source.content.clone()),
            language: Some(source.language),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Children of a folder node, empty for files
    pub fn children(&self) -> &[FileNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// One decoded record of a response stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment to append to the assistant response
    Content(String),
    /// The termination sentinel
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_path() {
        assert_eq!(Language::from_path("src/App.tsx"), Language::Tsx);
        assert_eq!(Language::from_path("styles/Main.CSS"), Language::Css);
        assert_eq!(Language::from_path("lib/util.ts"), Language::TypeScript);
        assert_eq!(Language::from_path("Makefile"), Language::Text);
        assert_eq!(Language::from_path(".gitignore"), Language::Text);
        assert_eq!(Language::from_path("a.b/README"), Language::Text);
    }

    #[test]
    fn test_only_jsx_sources_are_components() {
        assert!(Language::Tsx.is_component());
        assert!(Language::Jsx.is_component());
        assert!(!Language::TypeScript.is_component());
        assert!(Language::TypeScript.is_transformable());
        assert!(!Language::JavaScript.is_transformable());
    }

    #[test]
    fn test_language_serializes_lowercase() {
        let file = ParsedFile::new("index.html", "<html></html>");
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["language"], "html");

        let parsed: ParsedFile =
            serde_json::from_str(r#"{"path":"x.vue","content":"","language":"vue"}"#).unwrap();
        assert_eq!(parsed.language, Language::Text);
    }

    #[test]
    fn test_diff_info_counts_lines() {
        let file = ParsedFile::new("a.ts", "one\ntwo\nthree");
        let info = ArtifactDiffInfo::from_file(&file, true);
        assert_eq!(info.lines_added, 3);
        assert!(info.is_new);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["linesAdded"], 3);
        assert_eq!(json["isNew"], true);
    }

    #[test]
    fn test_file_node_serializes_type_tag() {
        let node = FileNode::folder("src", "src", vec![]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "folder");
        assert!(json.get("content").is_none());
    }
}
