//! Files every new project starts with

use livecraft_types::{ParsedFile, Project};

const PACKAGE_JSON: &str = r#"{
  "name": "livecraft-project",
  "version": "1.0.0",
  "dependencies": {
    "react": "^18.0.0",
    "react-dom": "^18.0.0",
    "lucide-react": "latest",
    "framer-motion": "latest"
  }
}"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <script src="https://cdn.tailwindcss.com"></script>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap" rel="stylesheet">
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>"#;

const APP_TSX: &str = r#"import React from 'react';

export default function App() {
  return (
    <div className="flex items-center justify-center min-h-screen bg-black text-white">
      <h1 className="text-4xl font-bold">Hello Livecraft</h1>
    </div>
  );
}"#;

const GITIGNORE: &str = "node_modules\n.next\n.env\nbun.lock";

pub fn starter_files() -> Vec<ParsedFile> {
    vec![
        ParsedFile::new("package.json", PACKAGE_JSON),
        ParsedFile::new("index.html", INDEX_HTML),
        ParsedFile::new("App.tsx", APP_TSX),
        ParsedFile::new(".gitignore", GITIGNORE),
    ]
}

/// New project seeded with the starter files
pub fn new_project(name: impl Into<String>) -> Project {
    Project::new(name, starter_files())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::PreviewCompiler;
    use crate::store::ArtifactStore;
    use livecraft_types::Language;

    #[test]
    fn test_starter_set() {
        let files = starter_files();
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["package.json", "index.html", "App.tsx", ".gitignore"]);
        assert_eq!(files[0].language, Language::Json);
        assert_eq!(files[3].language, Language::Text);
        assert!(serde_json::from_str::<serde_json::Value>(&files[0].content).is_ok());
    }

    #[test]
    fn test_starter_project_previews() {
        let store = ArtifactStore::from_files(starter_files());
        let doc = PreviewCompiler::default().compile(&store).unwrap();
        assert_eq!(doc.entry.as_deref(), Some("App"));
        assert!(doc.diagnostics.is_empty());
        assert!(doc.html.contains("\"Hello Livecraft\""));
    }
}
