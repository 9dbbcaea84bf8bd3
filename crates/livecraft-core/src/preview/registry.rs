//! Entry-component registry

/// Capitalized top-level component names, in declaration order
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    symbols: Vec<String>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declared name. Lowercase names and repeats are ignored.
    pub fn register(&mut self, name: &str) {
        let capitalized = name.starts_with(|c: char| c.is_ascii_uppercase());
        if capitalized && !self.contains(name) {
            self.symbols.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.iter().any(|s| s == name)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// First candidate that was registered, else the first registered symbol
    pub fn select_entry(&self, candidates: &[String]) -> Option<&str> {
        candidates
            .iter()
            .find_map(|c| self.symbols.iter().find(|s| *s == c))
            .or_else(|| self.symbols.first())
            .map(String::as_str)
    }
}
