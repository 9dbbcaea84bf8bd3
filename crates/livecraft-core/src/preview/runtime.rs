//! Bootstrap and mount code for component previews

use super::transform::{ImportBinding, ImportSpec};
use crate::types::RuntimeConfig;
use std::collections::HashSet;

/// Hooks available without an import, as generated code tends to assume
const AMBIENT_HOOKS: &[&str] = &["useState", "useEffect", "useCallback", "useMemo", "useRef"];
const AMBIENT_MOTION: &[&str] = &["motion", "AnimatePresence"];

/// Runtime global backing an import source, for the modules the bootstrap loads
fn runtime_global(source: &str) -> Option<&'static str> {
    match source {
        "react" => Some("React"),
        "react-dom" | "react-dom/client" => Some("ReactDOM"),
        "lucide-react" => Some("Lucide"),
        "framer-motion" | "motion" | "motion/react" => Some("Motion"),
        _ => None,
    }
}

/// Module preamble: load the runtime from the configured URLs, expose it on
/// `window`, and bind the names the user files imported from it.
///
/// `user_bindings` are names the files declare themselves; they are never
/// shadowed.
pub fn bootstrap_preamble(
    runtime: &RuntimeConfig,
    imports: &[ImportSpec],
    user_bindings: &HashSet<String>,
) -> String {
    let mut out = String::new();
    out.push_str("window.process = { env: { NODE_ENV: 'development' } };\n");
    out.push_str(&format!("import React from '{}';\n", runtime.react));
    out.push_str(&format!("import ReactDOM from '{}';\n", runtime.react_dom));
    out.push_str(&format!("import * as Lucide from '{}';\n", runtime.icons));
    out.push_str(&format!("import * as Motion from '{}';\n", runtime.motion));

    let mut bound: HashSet<String> = ["React", "ReactDOM", "Lucide", "Motion"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut groups: Vec<(&'static str, Vec<String>)> = vec![
        ("React", Vec::new()),
        ("ReactDOM", Vec::new()),
        ("Lucide", Vec::new()),
        ("Motion", Vec::new()),
    ];
    let mut aliases: Vec<String> = Vec::new();

    for hook in AMBIENT_HOOKS {
        bind(&mut bound, user_bindings, &mut groups, "React", hook, hook);
    }
    for name in AMBIENT_MOTION {
        bind(&mut bound, user_bindings, &mut groups, "Motion", name, name);
    }

    for spec in imports {
        let Some(global) = runtime_global(&spec.source) else {
            tracing::trace!(source = %spec.source, local = %spec.local, "Import left to shared scope");
            continue;
        };
        match &spec.binding {
            ImportBinding::Named(imported) => bind(
                &mut bound,
                user_bindings,
                &mut groups,
                global,
                imported,
                &spec.local,
            ),
            ImportBinding::Default | ImportBinding::Namespace => {
                if spec.local != global
                    && !bound.contains(&spec.local)
                    && !user_bindings.contains(&spec.local)
                {
                    bound.insert(spec.local.clone());
                    aliases.push(format!("const {} = {};\n", spec.local, global));
                }
            }
        }
    }

    out.push_str("window.React = React;\n");
    out.push_str("window.ReactDOM = ReactDOM;\n");
    out.push_str("window.Lucide = Lucide;\n");
    out.push_str("window.Motion = Motion;\n");

    for (global, names) in &groups {
        if !names.is_empty() {
            out.push_str(&format!("const {{ {} }} = {};\n", names.join(", "), global));
        }
    }
    for alias in aliases {
        out.push_str(&alias);
    }
    for name in AMBIENT_MOTION {
        if !user_bindings.contains(*name) {
            out.push_str(&format!("window.{0} = {0};\n", name));
        }
    }

    out
}

fn bind(
    bound: &mut HashSet<String>,
    user_bindings: &HashSet<String>,
    groups: &mut [(&'static str, Vec<String>)],
    global: &str,
    imported: &str,
    local: &str,
) {
    if bound.contains(local) || user_bindings.contains(local) {
        return;
    }
    bound.insert(local.to_string());
    if let Some((_, names)) = groups.iter_mut().find(|(g, _)| *g == global) {
        if imported == local {
            names.push(local.to_string());
        } else {
            names.push(format!("{}: {}", imported, local));
        }
    }
}

/// Code that renders `entry` into the mount element
pub fn mount_snippet(entry: &str, mount_id: &str) -> String {
    let id = serde_json::Value::String(mount_id.to_string());
    format!(
        "\n{{\n  const rootEl = document.getElementById({});\n  if (rootEl) {{\n    ReactDOM.createRoot(rootEl).render(React.createElement({}));\n  }}\n}}\n",
        id, entry
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(source: &str, binding: ImportBinding, local: &str) -> ImportSpec {
        ImportSpec {
            source: source.to_string(),
            binding,
            local: local.to_string(),
        }
    }

    #[test]
    fn test_preamble_loads_configured_runtime() {
        let runtime = RuntimeConfig::default();
        let out = bootstrap_preamble(&runtime, &[], &HashSet::new());
        assert!(out.contains("import React from 'https://esm.sh/react@18';"));
        assert!(out.contains("import * as Lucide from 'https://esm.sh/lucide-react@0.454.0';"));
        assert!(out.contains("const { useState, useEffect, useCallback, useMemo, useRef } = React;"));
        assert!(out.contains("const { motion, AnimatePresence } = Motion;"));
        assert!(out.contains("NODE_ENV"));
    }

    #[test]
    fn test_hoists_runtime_imports() {
        let imports = vec![
            import("react", ImportBinding::Default, "React"),
            import("react", ImportBinding::Named("useState".into()), "useState"),
            import("react", ImportBinding::Named("createContext".into()), "createContext"),
            import("react", ImportBinding::Named("useRef".into()), "ref"),
            import("lucide-react", ImportBinding::Named("Sun".into()), "Sun"),
            import("lucide-react", ImportBinding::Namespace, "Icons"),
            import("./Button", ImportBinding::Default, "Button"),
        ];
        let out = bootstrap_preamble(&RuntimeConfig::default(), &imports, &HashSet::new());
        assert!(out.contains(
            "const { useState, useEffect, useCallback, useMemo, useRef, createContext, useRef: ref } = React;"
        ));
        assert!(out.contains("const { Sun } = Lucide;"));
        assert!(out.contains("const Icons = Lucide;"));
        assert!(!out.contains("Button"));
    }

    #[test]
    fn test_user_bindings_are_not_shadowed() {
        let user: HashSet<String> = ["useMemo".to_string(), "motion".to_string()].into_iter().collect();
        let out = bootstrap_preamble(&RuntimeConfig::default(), &[], &user);
        assert!(out.contains("const { useState, useEffect, useCallback, useRef } = React;"));
        assert!(out.contains("const { AnimatePresence } = Motion;"));
        assert!(!out.contains("window.motion"));
    }

    #[test]
    fn test_mount_snippet() {
        let out = mount_snippet("App", "root");
        assert!(out.contains("document.getElementById(\"root\")"));
        assert!(out.contains("React.createElement(App)"));
    }
}
