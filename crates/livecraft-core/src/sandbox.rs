//! Sandboxed execution of the synthesized document

use crate::preview::{document::escape_attr, PreviewCompiler, PreviewDocument};
use crate::store::ArtifactStore;
use crate::types::SandboxConfig;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Capabilities the sandbox may grant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SandboxCapability {
    Scripts,
    Modals,
    Popups,
    Forms,
    SameOrigin,
}

impl SandboxCapability {
    pub fn all() -> &'static [SandboxCapability] {
        &[
            SandboxCapability::Scripts,
            SandboxCapability::Modals,
            SandboxCapability::Popups,
            SandboxCapability::Forms,
            SandboxCapability::SameOrigin,
        ]
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            SandboxCapability::Scripts => "allow-scripts",
            SandboxCapability::Modals => "allow-modals",
            SandboxCapability::Popups => "allow-popups",
            SandboxCapability::Forms => "allow-forms",
            SandboxCapability::SameOrigin => "allow-same-origin",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_token() == token.trim())
    }
}

/// Tokens that would let the document navigate or reach its embedder
const DENIED_TOKENS: &[&str] = &[
    "allow-top-navigation",
    "allow-top-navigation-by-user-activation",
    "allow-top-navigation-to-custom-protocols",
    "allow-popups-to-escape-sandbox",
];

pub fn is_denied_token(token: &str) -> bool {
    DENIED_TOKENS.contains(&token.trim())
}

/// Granted capability set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPolicy {
    capabilities: Vec<SandboxCapability>,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            capabilities: SandboxCapability::all().to_vec(),
        }
    }
}

impl SandboxPolicy {
    /// Build from configured tokens. Anything outside the permitted set is
    /// dropped with a warning.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut capabilities = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            match SandboxCapability::from_token(token) {
                Some(cap) if !capabilities.contains(&cap) => capabilities.push(cap),
                Some(_) => {}
                None => tracing::warn!(token, "Dropping sandbox capability"),
            }
        }
        capabilities.sort();
        Self { capabilities }
    }

    pub fn from_config(config: &SandboxConfig) -> Self {
        Self::from_tokens(&config.capabilities)
    }

    pub fn allows(&self, capability: SandboxCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Value for the iframe `sandbox` attribute
    pub fn attribute(&self) -> String {
        self.capabilities
            .iter()
            .map(|c| c.as_token())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Current preview state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Idle,
    Ready {
        document: PreviewDocument,
        generation: u64,
    },
    Failed {
        message: String,
        generation: u64,
    },
}

/// Owns the preview lifecycle for one pipeline
#[derive(Debug, Clone)]
pub struct SandboxHost {
    compiler: PreviewCompiler,
    policy: SandboxPolicy,
    state: PreviewState,
    generation: u64,
    fingerprint: Option<u64>,
}

impl SandboxHost {
    pub fn new(compiler: PreviewCompiler, policy: SandboxPolicy) -> Self {
        Self {
            compiler,
            policy,
            state: PreviewState::Idle,
            generation: 0,
            fingerprint: None,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Synthesize `store` unless the same snapshot is already shown
    pub fn mount(&mut self, store: &ArtifactStore) -> &PreviewState {
        let fingerprint = fingerprint(store);
        if self.fingerprint == Some(fingerprint) && !matches!(self.state, PreviewState::Idle) {
            tracing::debug!(generation = self.generation, "Snapshot unchanged, keeping preview");
            return &self.state;
        }
        self.synthesize(store, fingerprint)
    }

    /// Discard the running document and synthesize from scratch
    pub fn reload(&mut self, store: &ArtifactStore) -> &PreviewState {
        let fingerprint = fingerprint(store);
        self.synthesize(store, fingerprint)
    }

    fn synthesize(&mut self, store: &ArtifactStore, fingerprint: u64) -> &PreviewState {
        self.generation += 1;
        self.fingerprint = Some(fingerprint);
        self.state = match self.compiler.compile(store) {
            Ok(document) => PreviewState::Ready {
                document,
                generation: self.generation,
            },
            Err(e) => {
                tracing::warn!(error = %e, generation = self.generation, "Preview synthesis failed");
                PreviewState::Failed {
                    message: e.to_string(),
                    generation: self.generation,
                }
            }
        };
        &self.state
    }

    /// Standalone host page embedding the current document in a sandboxed frame
    pub fn frame_html(&self) -> String {
        match &self.state {
            PreviewState::Ready { document, generation } => format!(
                "<!DOCTYPE html>\n<html>\n<head><meta charset=\"UTF-8\" /><title>Preview</title>\n<style>html,body{{margin:0;height:100%;background:#000}}iframe{{border:0;width:100%;height:100%}}</style></head>\n<body>\n<iframe title=\"preview\" data-generation=\"{}\" sandbox=\"{}\" srcdoc=\"{}\"></iframe>\n</body>\n</html>\n",
                generation,
                self.policy.attribute(),
                escape_attr(&document.html)
            ),
            PreviewState::Failed { message, .. } => format!(
                "<!DOCTYPE html>\n<html>\n<head><meta charset=\"UTF-8\" /><title>Preview</title></head>\n<body style=\"background:#000;color:#f87171;font-family:monospace;padding:2rem\">\n<h1>Synthesis failed</h1>\n<pre>{}</pre>\n</body>\n</html>\n",
                escape_attr(message)
            ),
            PreviewState::Idle => "<!DOCTYPE html>\n<html>\n<body style=\"background:#000;color:#666;font-family:sans-serif\">\n<p>Nothing to preview yet.</p>\n</body>\n</html>\n".to_string(),
        }
    }
}

fn fingerprint(store: &ArtifactStore) -> u64 {
    let mut hasher = DefaultHasher::new();
    store.hash(&mut hasher);
    hasher.finish()
}
