//! Live preview synthesis
//!
//! Turns a store snapshot into one self-contained HTML document: the host
//! page, every stylesheet inlined, and a single module script built from
//! the component files. Synthesis is a pure function of the snapshot.

pub mod document;
pub mod registry;
pub mod runtime;
pub mod transform;

pub use registry::SymbolRegistry;
pub use transform::{transform_source, ImportBinding, ImportSpec, TransformError, TransformOutput};

use crate::store::ArtifactStore;
use crate::types::PreviewConfig;
use livecraft_types::{Language, ParsedFile};
use std::collections::HashSet;
use thiserror::Error;

/// Whole-document synthesis failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("host document {0} is empty")]
    EmptyHostDocument(String),

    #[error("document is {size} bytes, limit is {limit}")]
    DocumentTooLarge { size: usize, limit: usize },
}

/// Per-file transform failure recorded during synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformDiagnostic {
    pub path: String,
    pub message: String,
}

/// How the document's script was produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptMode {
    /// Transformed component files with the runtime bootstrap
    Components,
    /// Plain `.js` files concatenated
    Scripts,
    /// No script injected
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub html: String,
    /// Component mounted on load, if any
    pub entry: Option<String>,
    pub diagnostics: Vec<TransformDiagnostic>,
    pub mode: ScriptMode,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewCompiler {
    config: PreviewConfig,
}

impl PreviewCompiler {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Synthesize the preview document for `store`
    pub fn compile(&self, store: &ArtifactStore) -> Result<PreviewDocument, SynthesisError> {
        let mut html = match host_document(store) {
            Some(host) if host.content.trim().is_empty() => {
                return Err(SynthesisError::EmptyHostDocument(host.path.clone()));
            }
            Some(host) => host.content.clone(),
            None => document::default_document(&self.config.mount_id),
        };

        let styles: Vec<String> = store
            .iter()
            .filter(|f| f.language == Language::Css)
            .map(|f| document::style_tag(&f.path, &f.content))
            .collect();
        if !styles.is_empty() {
            html = document::inject_styles(&html, &styles.join("\n"));
        }

        let components: Vec<&ParsedFile> = if store.iter().any(|f| f.language.is_component()) {
            store.iter().filter(|f| f.language.is_transformable()).collect()
        } else {
            Vec::new()
        };
        let mut diagnostics = Vec::new();
        let (script, entry, mode) = if !components.is_empty() {
            let (script, entry) = self.component_script(&components, &mut diagnostics);
            (Some(script), entry, ScriptMode::Components)
        } else {
            let scripts: Vec<&ParsedFile> = store
                .iter()
                .filter(|f| f.language == Language::JavaScript)
                .collect();
            if scripts.is_empty() {
                (None, None, ScriptMode::Static)
            } else {
                let body: String = scripts.iter().map(|f| file_section(&f.path, &f.content)).collect();
                (Some(body), None, ScriptMode::Scripts)
            }
        };

        if let Some(script) = script {
            html = document::inject_script(&html, &document::script_tag(&script));
        }

        if html.len() > self.config.max_document_bytes {
            return Err(SynthesisError::DocumentTooLarge {
                size: html.len(),
                limit: self.config.max_document_bytes,
            });
        }

        tracing::info!(
            files = store.len(),
            bytes = html.len(),
            entry = entry.as_deref().unwrap_or("-"),
            failed = diagnostics.len(),
            "Synthesized preview"
        );

        Ok(PreviewDocument {
            html,
            entry,
            diagnostics,
            mode,
        })
    }

    fn component_script(
        &self,
        files: &[&ParsedFile],
        diagnostics: &mut Vec<TransformDiagnostic>,
    ) -> (String, Option<String>) {
        let mut registry = SymbolRegistry::new();
        let mut imports = Vec::new();
        let mut bindings = HashSet::new();
        let mut bodies = String::new();

        for file in files {
            match transform_source(&file.path, &file.content) {
                Ok(output) => {
                    for name in &output.components {
                        registry.register(name);
                    }
                    bindings.extend(output.bindings);
                    imports.extend(output.imports);
                    bodies.push_str(&file_section(&file.path, &output.code));
                }
                Err(e) => {
                    tracing::warn!(path = %file.path, error = %e, "Transform failed, file left out of preview");
                    diagnostics.push(TransformDiagnostic {
                        path: file.path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let entry = registry
            .select_entry(&self.config.entry_candidates)
            .map(str::to_string);

        let mut script = runtime::bootstrap_preamble(&self.config.runtime, &imports, &bindings);
        script.push_str(&bodies);
        if let Some(entry) = &entry {
            script.push_str(&runtime::mount_snippet(entry, &self.config.mount_id));
        }
        (script, entry)
    }
}

/// `index.html` when present, else the first HTML file in store order
fn host_document(store: &ArtifactStore) -> Option<&ParsedFile> {
    store
        .get("index.html")
        .or_else(|| store.iter().find(|f| f.language == Language::Html))
}

fn file_section(path: &str, code: &str) -> String {
    format!("\n// File: {}\n{}\n", path, code)
}
