//! Source-to-source transform for typed component files.
//!
//! Parses with the tree-sitter TypeScript grammars and re-emits the source
//! with type syntax removed, JSX lowered to `React.createElement` calls and
//! module syntax dropped. Everything else is copied through byte for byte.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use tree_sitter::{Node, Parser};

/// Failure to transform a single file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("failed to load grammar: {0}")]
    Grammar(String),

    #[error("parser produced no syntax tree")]
    NoTree,

    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("unsupported construct `{construct}` at line {line}")]
    Unsupported { construct: String, line: usize },
}

/// How an import binds its local name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBinding {
    Default,
    Namespace,
    Named(String),
}

/// One binding introduced by an import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub source: String,
    pub binding: ImportBinding,
    pub local: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub code: String,
    /// Top-level function, class and component-valued declarations, in order
    pub components: Vec<String>,
    /// Every top-level name the file binds
    pub bindings: Vec<String>,
    pub imports: Vec<ImportSpec>,
}

/// Nodes dropped together with everything below them
const REMOVED: &[&str] = &[
    "import_statement",
    "interface_declaration",
    "type_alias_declaration",
    "ambient_declaration",
    "function_signature",
    "abstract_method_signature",
    "method_signature",
    "index_signature",
    "type_annotation",
    "type_arguments",
    "type_parameters",
    "implements_clause",
    "accessibility_modifier",
    "override_modifier",
    "type_predicate_annotation",
    "asserts_annotation",
];

/// Nodes whose type-only keyword tokens are dropped
const MODIFIER_HOSTS: &[&str] = &[
    "optional_parameter",
    "required_parameter",
    "public_field_definition",
    "abstract_class_declaration",
    "method_definition",
    "variable_declarator",
];

const MODIFIER_TOKENS: &[&str] = &["?", "!", "readonly", "declare", "abstract", "override"];

/// Call wrappers whose result is still a component
const COMPONENT_WRAPPERS: &[&str] = &["memo", "forwardRef", "lazy"];

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z][A-Za-z0-9]*);").expect("valid entity regex")
});

static NAMED_ENTITIES: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    [
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        ("nbsp", '\u{a0}'),
        ("copy", '©'),
        ("reg", '®'),
        ("trade", '™'),
        ("hellip", '…'),
        ("mdash", '—'),
        ("ndash", '–'),
        ("times", '×'),
        ("middot", '·'),
        ("bull", '•'),
        ("larr", '←'),
        ("rarr", '→'),
        ("uarr", '↑'),
        ("darr", '↓'),
        ("laquo", '«'),
        ("raquo", '»'),
        ("deg", '°'),
        ("euro", '€'),
    ]
    .into_iter()
    .collect()
});

/// Transform one file. `.ts` files use the TypeScript grammar, everything
/// else the TSX grammar.
pub fn transform_source(path: &str, source: &str) -> Result<TransformOutput, TransformError> {
    let language: tree_sitter::Language = if path.to_ascii_lowercase().ends_with(".ts") {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    } else {
        tree_sitter_typescript::LANGUAGE_TSX.into()
    };

    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| TransformError::Grammar(e.to_string()))?;
    let tree = parser.parse(source, None).ok_or(TransformError::NoTree)?;
    let root = tree.root_node();

    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(TransformError::Syntax {
            line: at.row + 1,
            column: at.column + 1,
        });
    }

    let mut output = TransformOutput::default();
    let default_name = collect_top_level(root, source, path, &mut output);

    let mut emitter = Emitter {
        src: source,
        out: String::with_capacity(source.len()),
        default_name,
    };
    emitter.emit(root)?;
    output.code = emitter.out;

    Ok(output)
}

fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    children(node).into_iter().find_map(first_error)
}

fn text<'s>(node: Node<'_>, src: &'s str) -> &'s str {
    &src[node.byte_range()]
}

fn unquote(literal: &str) -> &str {
    if literal.len() >= 2 {
        &literal[1..literal.len() - 1]
    } else {
        literal
    }
}

/// PascalCase name derived from the file stem, used for anonymous default exports
pub fn default_export_name(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    let stem = file.split('.').next().unwrap_or(file);
    let mut name: String = stem
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    if name.is_empty() {
        name = "Default".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Collect imports and top-level declarations. Returns the name to bind an
/// anonymous default export to, when the file has one.
fn collect_top_level(root: Node<'_>, src: &str, path: &str, out: &mut TransformOutput) -> Option<String> {
    let mut has_default_value = false;

    for node in named(root) {
        match node.kind() {
            "import_statement" => collect_imports(node, src, &mut out.imports),
            "export_statement" => {
                if let Some(decl) = node.child_by_field_name("declaration") {
                    collect_declaration(decl, src, out);
                } else if let Some(value) = node.child_by_field_name("value") {
                    has_default_value = value.kind() != "identifier";
                }
            }
            _ => collect_declaration(node, src, out),
        }
    }

    if !has_default_value {
        return None;
    }
    let name = default_export_name(path);
    if out.bindings.contains(&name) {
        tracing::debug!(path, name = %name, "Default export name already bound, dropping value");
        return None;
    }
    out.bindings.push(name.clone());
    out.components.push(name.clone());
    Some(name)
}

fn collect_declaration(node: Node<'_>, src: &str, out: &mut TransformOutput) {
    match node.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration"
        | "abstract_class_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                let name = text(name, src).to_string();
                out.bindings.push(name.clone());
                out.components.push(name);
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            for declarator in named(node) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let Some(name) = declarator.child_by_field_name("name") else {
                    continue;
                };
                if name.kind() != "identifier" {
                    continue;
                }
                let name = text(name, src).to_string();
                let component = declarator
                    .child_by_field_name("value")
                    .map(|value| is_component_value(value, src))
                    .unwrap_or(false);
                out.bindings.push(name.clone());
                if component {
                    out.components.push(name);
                }
            }
        }
        "enum_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.bindings.push(text(name, src).to_string());
            }
        }
        _ => {}
    }
}

fn is_component_value(value: Node<'_>, src: &str) -> bool {
    match value.kind() {
        "arrow_function" | "function_expression" | "function" | "class" => true,
        "call_expression" => value
            .child_by_field_name("function")
            .map(|callee| {
                let callee = text(callee, src);
                let last = callee.rsplit('.').next().unwrap_or(callee).trim();
                COMPONENT_WRAPPERS.contains(&last)
            })
            .unwrap_or(false),
        _ => false,
    }
}

fn has_type_keyword(node: Node<'_>) -> bool {
    children(node)
        .iter()
        .any(|c| !c.is_named() && (c.kind() == "type" || c.kind() == "typeof"))
}

fn collect_imports(node: Node<'_>, src: &str, imports: &mut Vec<ImportSpec>) {
    if has_type_keyword(node) {
        return;
    }
    let Some(source) = node.child_by_field_name("source") else {
        return;
    };
    let source = unquote(text(source, src)).to_string();

    let Some(clause) = named(node).into_iter().find(|c| c.kind() == "import_clause") else {
        return;
    };

    for part in named(clause) {
        match part.kind() {
            "identifier" => imports.push(ImportSpec {
                source: source.clone(),
                binding: ImportBinding::Default,
                local: text(part, src).to_string(),
            }),
            "namespace_import" => {
                if let Some(local) = named(part).into_iter().find(|c| c.kind() == "identifier") {
                    imports.push(ImportSpec {
                        source: source.clone(),
                        binding: ImportBinding::Namespace,
                        local: text(local, src).to_string(),
                    });
                }
            }
            "named_imports" => {
                for spec in named(part) {
                    if spec.kind() != "import_specifier" || has_type_keyword(spec) {
                        continue;
                    }
                    let Some(name) = spec.child_by_field_name("name") else {
                        continue;
                    };
                    let imported = unquote_if_string(name, src);
                    let local = spec
                        .child_by_field_name("alias")
                        .map(|alias| text(alias, src).to_string())
                        .unwrap_or_else(|| imported.clone());
                    imports.push(ImportSpec {
                        source: source.clone(),
                        binding: ImportBinding::Named(imported),
                        local,
                    });
                }
            }
            _ => {}
        }
    }
}

fn unquote_if_string(node: Node<'_>, src: &str) -> String {
    let raw = text(node, src);
    if node.kind() == "string" {
        unquote(raw).to_string()
    } else {
        raw.to_string()
    }
}

struct Emitter<'s> {
    src: &'s str,
    out: String,
    default_name: Option<String>,
}

impl<'s> Emitter<'s> {
    fn emit(&mut self, node: Node<'_>) -> Result<(), TransformError> {
        let kind = node.kind();
        if REMOVED.contains(&kind) {
            return Ok(());
        }

        match kind {
            "as_expression" | "satisfies_expression" | "non_null_expression" => {
                if let Some(inner) = named(node).into_iter().next() {
                    self.emit(inner)?;
                }
                Ok(())
            }
            "type_assertion" => {
                if let Some(inner) = named(node).into_iter().last() {
                    self.emit(inner)?;
                }
                Ok(())
            }
            "export_statement" => self.emit_export(node),
            "enum_declaration" => self.emit_enum(node),
            "internal_module" | "module" => Err(TransformError::Unsupported {
                construct: "namespace".to_string(),
                line: node.start_position().row + 1,
            }),
            "jsx_element" | "jsx_self_closing_element" | "jsx_fragment" => self.emit_jsx(node),
            _ => self.emit_children(node, MODIFIER_HOSTS.contains(&kind)),
        }
    }

    /// Copy `node`, recursing into children and keeping the text between them
    fn emit_children(&mut self, node: Node<'_>, drop_modifiers: bool) -> Result<(), TransformError> {
        let kids = children(node);
        if kids.is_empty() {
            self.out.push_str(text(node, self.src));
            return Ok(());
        }

        let mut pos = node.start_byte();
        for child in kids {
            self.out.push_str(&self.src[pos..child.start_byte()]);
            pos = child.end_byte();
            if drop_modifiers && !child.is_named() && MODIFIER_TOKENS.contains(&child.kind()) {
                continue;
            }
            self.emit(child)?;
        }
        self.out.push_str(&self.src[pos..node.end_byte()]);
        Ok(())
    }

    /// Emit `node` into a fresh string instead of the main buffer
    fn capture(&mut self, node: Node<'_>) -> Result<String, TransformError> {
        let start = self.out.len();
        self.emit(node)?;
        Ok(self.out.split_off(start))
    }

    fn emit_export(&mut self, node: Node<'_>) -> Result<(), TransformError> {
        if let Some(decl) = node.child_by_field_name("declaration") {
            return self.emit(decl);
        }
        if let Some(value) = node.child_by_field_name("value") {
            if value.kind() == "identifier" {
                return Ok(());
            }
            if let Some(name) = self.default_name.clone() {
                let expr = self.capture(value)?;
                self.out.push_str(&format!("const {} = {};", name, expr.trim()));
            }
        }
        Ok(())
    }

    fn emit_enum(&mut self, node: Node<'_>) -> Result<(), TransformError> {
        let Some(name) = node.child_by_field_name("name") else {
            return Ok(());
        };
        let name = text(name, self.src).to_string();

        let mut members = Vec::new();
        let mut next: Option<i64> = Some(0);
        if let Some(body) = node.child_by_field_name("body") {
            for member in named(body) {
                match member.kind() {
                    "comment" => continue,
                    "enum_assignment" => {
                        let Some(key) = member.child_by_field_name("name") else {
                            continue;
                        };
                        let key = text(key, self.src).to_string();
                        let value = match member.child_by_field_name("value") {
                            Some(value) => {
                                let expr = self.capture(value)?;
                                next = expr.trim().parse::<i64>().ok().and_then(|n| n.checked_add(1));
                                expr
                            }
                            None => "undefined".to_string(),
                        };
                        members.push(format!("{}: {}", key, value.trim()));
                    }
                    _ => {
                        let key = text(member, self.src).to_string();
                        let value = match next {
                            Some(n) => {
                                next = n.checked_add(1);
                                n.to_string()
                            }
                            None => "undefined".to_string(),
                        };
                        members.push(format!("{}: {}", key, value));
                    }
                }
            }
        }

        self.out.push_str(&format!(
            "const {} = Object.freeze({{ {} }});",
            name,
            members.join(", ")
        ));
        Ok(())
    }

    fn emit_jsx(&mut self, node: Node<'_>) -> Result<(), TransformError> {
        let (name, attributes, body) = match node.kind() {
            "jsx_self_closing_element" => {
                let name = node.child_by_field_name("name");
                (name, jsx_attributes(node, name), None)
            }
            "jsx_fragment" => (None, Vec::new(), Some((node, node.start_byte(), node.end_byte()))),
            _ => {
                let open = node.child_by_field_name("open_tag");
                let close = node.child_by_field_name("close_tag");
                let name = open.and_then(|o| o.child_by_field_name("name"));
                let attributes = open.map(|o| jsx_attributes(o, name)).unwrap_or_default();
                let start = open.map(|o| o.end_byte()).unwrap_or(node.start_byte());
                let end = close.map(|c| c.start_byte()).unwrap_or(node.end_byte());
                (name, attributes, Some((node, start, end)))
            }
        };

        let tag = self.jsx_tag(name);

        let mut props = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            if let Some(prop) = self.jsx_prop(attribute)? {
                props.push(prop);
            }
        }

        let mut args = Vec::new();
        if let Some((parent, start, end)) = body {
            self.jsx_children(parent, start, end, &mut args)?;
        }

        let props = if props.is_empty() {
            "null".to_string()
        } else {
            format!("{{ {} }}", props.join(", "))
        };

        self.out.push_str("React.createElement(");
        self.out.push_str(&tag);
        self.out.push_str(", ");
        self.out.push_str(&props);
        for arg in args {
            self.out.push_str(", ");
            self.out.push_str(&arg);
        }
        self.out.push(')');
        Ok(())
    }

    fn jsx_tag(&self, name: Option<Node<'_>>) -> String {
        let Some(name) = name else {
            return "React.Fragment".to_string();
        };
        let raw = text(name, self.src);
        let intrinsic = match name.kind() {
            "identifier" => raw.starts_with(|c: char| c.is_ascii_lowercase()) || raw.contains('-'),
            "jsx_namespace_name" => true,
            _ => false,
        };
        if intrinsic {
            json_string(raw)
        } else {
            raw.split_whitespace().collect()
        }
    }

    fn jsx_prop(&mut self, attribute: Node<'_>) -> Result<Option<String>, TransformError> {
        match attribute.kind() {
            "jsx_attribute" => {
                let parts = named(attribute);
                let Some(key) = parts.first() else {
                    return Ok(None);
                };
                let key = text(*key, self.src);
                let key = if IDENTIFIER.is_match(key) {
                    key.to_string()
                } else {
                    json_string(key)
                };
                let value = match parts.get(1) {
                    None => "true".to_string(),
                    Some(value) => match value.kind() {
                        "string" => json_string(&decode_entities(unquote(text(*value, self.src)))),
                        "jsx_expression" => self
                            .jsx_expression(*value)?
                            .unwrap_or_else(|| "undefined".to_string()),
                        _ => self.capture(*value)?,
                    },
                };
                Ok(Some(format!("{}: {}", key, value)))
            }
            // `{...props}`
            "jsx_expression" => self.jsx_expression(attribute),
            _ => Ok(None),
        }
    }

    /// Inner expression of `{...}`; `None` when empty or comment-only
    fn jsx_expression(&mut self, node: Node<'_>) -> Result<Option<String>, TransformError> {
        let inner: Vec<Node<'_>> = named(node)
            .into_iter()
            .filter(|n| n.kind() != "comment")
            .collect();
        if inner.is_empty() {
            return Ok(None);
        }
        let mut expr = String::new();
        for part in inner {
            expr.push_str(&self.capture(part)?);
        }
        Ok(Some(expr))
    }

    fn jsx_children(
        &mut self,
        parent: Node<'_>,
        start: usize,
        end: usize,
        args: &mut Vec<String>,
    ) -> Result<(), TransformError> {
        let mut pos = start;
        for child in children(parent) {
            if child.start_byte() < start || child.end_byte() > end {
                continue;
            }
            match child.kind() {
                "jsx_text" | "html_character_reference" => continue,
                "jsx_element" | "jsx_self_closing_element" | "jsx_fragment" => {
                    push_text(&self.src[pos..child.start_byte()], args);
                    args.push(self.capture(child)?);
                }
                "jsx_expression" => {
                    push_text(&self.src[pos..child.start_byte()], args);
                    if let Some(expr) = self.jsx_expression(child)? {
                        args.push(expr);
                    }
                }
                _ if !child.is_named() => {
                    // `<`, `>` and `/` of fragment delimiters
                    push_text(&self.src[pos..child.start_byte()], args);
                }
                _ => {
                    push_text(&self.src[pos..child.start_byte()], args);
                    args.push(self.capture(child)?);
                }
            }
            pos = child.end_byte();
        }
        if pos < end {
            push_text(&self.src[pos..end], args);
        }
        Ok(())
    }
}

fn jsx_attributes<'t>(tag: Node<'t>, name: Option<Node<'t>>) -> Vec<Node<'t>> {
    named(tag)
        .into_iter()
        .filter(|n| Some(n.id()) != name.map(|m| m.id()))
        .filter(|n| matches!(n.kind(), "jsx_attribute" | "jsx_expression"))
        .collect()
}

fn push_text(raw: &str, args: &mut Vec<String>) {
    let cleaned = clean_jsx_text(raw);
    if !cleaned.is_empty() {
        args.push(json_string(&decode_entities(&cleaned)));
    }
}

fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// JSX text whitespace rules: lines are trimmed where they meet a line
/// break, blank lines vanish, and remaining lines join with one space.
pub fn clean_jsx_text(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let last_non_empty = lines
        .iter()
        .rposition(|line| line.chars().any(|c| c != ' ' && c != '\t'))
        .unwrap_or(0);

    let mut result = String::new();
    for (i, line) in lines.iter().enumerate() {
        let mut trimmed = line.replace('\t', " ");
        if i != 0 {
            trimmed = trimmed.trim_start_matches(' ').to_string();
        }
        if i != lines.len() - 1 {
            trimmed = trimmed.trim_end_matches(' ').to_string();
        }
        if trimmed.is_empty() {
            continue;
        }
        result.push_str(&trimmed);
        if i != last_non_empty {
            result.push(' ');
        }
    }
    result
}

/// Decode HTML character references in JSX text and attribute strings
pub fn decode_entities(raw: &str) -> String {
    ENTITY
        .replace_all(raw, |caps: &regex::Captures<'_>| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                NAMED_ENTITIES.get(body).copied()
            };
            decoded
                .map(|c| c.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_strips_types_and_exports() {
        let src = r#"import React from "react";
interface Props { name: string }
type Mode = "a" | "b";
export default function App({ name }: Props): JSX.Element {
  return <div className="x">Hello {name}</div>;
}
"#;
        let out = transform_source("App.tsx", src).unwrap();
        let code = squash(&out.code);
        assert!(!out.code.contains("import"));
        assert!(!out.code.contains("interface"));
        assert!(!out.code.contains("export"));
        assert!(!out.code.contains("Mode"));
        assert!(code.contains(
            r#"functionApp({name}){returnReact.createElement("div",{className:"x"},"Hello",name);}"#
        ));
        assert!(out.code.contains(r#""Hello ""#));
        assert_eq!(out.components, vec!["App"]);
    }

    #[test]
    fn test_removes_generics_casts_and_assertions() {
        let src = "const [count, setCount] = useState<number>(0);\nconst el = document.getElementById(\"x\") as HTMLElement;\nconst v = maybe!;\nfunction id<T>(x: T): T { return x; }\n";
        let out = transform_source("util.ts", src).unwrap();
        let code = squash(&out.code);
        assert!(code.contains("const[count,setCount]=useState(0);"));
        assert!(code.contains(r#"constel=document.getElementById("x");"#));
        assert!(code.contains("constv=maybe;"));
        assert!(code.contains("functionid(x){returnx;}"));
    }

    #[test]
    fn test_class_modifiers_are_dropped() {
        let src = "class Store {\n  private readonly items: string[] = [];\n  constructor(public name?: string) {}\n  get count(): number { return this.items.length; }\n}\n";
        let out = transform_source("store.ts", src).unwrap();
        assert!(squash(&out.code)
            .contains("classStore{items=[];constructor(name){}getcount(){returnthis.items.length;}}"));
    }

    #[test]
    fn test_enum_becomes_frozen_object() {
        let out = transform_source("colors.ts", "enum Color { Red, Green = 5, Blue }\n").unwrap();
        assert!(squash(&out.code).contains("constColor=Object.freeze({Red:0,Green:5,Blue:6});"));
        assert!(out.bindings.contains(&"Color".to_string()));
        assert!(out.components.is_empty());
    }

    #[test]
    fn test_enum_increment_stops_at_i64_max() {
        let src = "enum Big { A = 9223372036854775807, B, C }\n";
        let out = transform_source("Big.tsx", src).unwrap();
        assert!(squash(&out.code).contains("constBig=Object.freeze({A:9223372036854775807,B:undefined,C:undefined});"));
    }

    #[test]
    fn test_jsx_props_and_children() {
        let src = r#"const view = <Card title="a &amp; b" onClick={() => go(1)} disabled {...rest}><span>x</span></Card>;"#;
        let out = transform_source("View.tsx", src).unwrap();
        assert!(out.code.contains(
            r#"React.createElement(Card, { title: "a & b", onClick: () => go(1), disabled: true, ...rest }, React.createElement("span", null, "x"))"#
        ));
    }

    #[test]
    fn test_jsx_multiline_text_and_fragments() {
        let src = "const a = <p>\n  Hello\n  world\n</p>;\nconst b = <><A /><B /></>;\n";
        let out = transform_source("Text.tsx", src).unwrap();
        assert!(out.code.contains(r#"React.createElement("p", null, "Hello world")"#));
        assert!(out.code.contains(
            "React.createElement(React.Fragment, null, React.createElement(A, null), React.createElement(B, null))"
        ));
    }

    #[test]
    fn test_jsx_comment_expression_is_skipped() {
        let src = "const a = <div>{/* note */}<b>k</b></div>;\n";
        let out = transform_source("C.tsx", src).unwrap();
        assert!(out
            .code
            .contains(r#"React.createElement("div", null, React.createElement("b", null, "k"))"#));
    }

    #[test]
    fn test_collects_imports() {
        let src = "import React, { useState as useS, useEffect } from \"react\";\nimport { Sun } from 'lucide-react';\nimport type { Foo } from './types';\nimport * as Icons from 'lucide-react';\nimport Button from \"./Button\";\n";
        let out = transform_source("App.tsx", src).unwrap();
        let locals: Vec<_> = out.imports.iter().map(|i| i.local.as_str()).collect();
        assert_eq!(locals, vec!["React", "useS", "useEffect", "Sun", "Icons", "Button"]);
        assert_eq!(out.imports[1].binding, ImportBinding::Named("useState".to_string()));
        assert_eq!(out.imports[4].binding, ImportBinding::Namespace);
        assert_eq!(out.imports[3].source, "lucide-react");
        assert!(!out.code.contains("import"));
    }

    #[test]
    fn test_collects_component_declarations() {
        let src = "function App() { return null; }\nconst Card = () => null;\nconst API = \"x\";\nconst Memo = memo(Card);\nclass Widget extends React.Component {}\n";
        let out = transform_source("App.tsx", src).unwrap();
        assert_eq!(out.components, vec!["App", "Card", "Memo", "Widget"]);
        assert!(out.bindings.contains(&"API".to_string()));
    }

    #[test]
    fn test_anonymous_default_export_is_named_after_file() {
        let out = transform_source("pages/landing-page.tsx", "export default () => <div />;\n").unwrap();
        assert!(out
            .code
            .contains(r#"const LandingPage = () => React.createElement("div", null);"#));
        assert_eq!(out.components, vec!["LandingPage"]);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = transform_source("Bad.tsx", "const x = ;\n").unwrap_err();
        assert!(matches!(err, TransformError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_namespace_is_unsupported() {
        let err = transform_source("ns.ts", "namespace Foo { export const x = 1; }\n").unwrap_err();
        assert!(matches!(err, TransformError::Unsupported { .. }));
    }

    #[test]
    fn test_clean_jsx_text() {
        assert_eq!(clean_jsx_text("  a  "), "  a  ");
        assert_eq!(clean_jsx_text("\n   \n"), "");
        assert_eq!(clean_jsx_text("a\n   b  \n  "), "a b");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &#65;&#x42; &bogus;"), "a <b> AB &bogus;");
    }

    #[test]
    fn test_default_export_name() {
        assert_eq!(default_export_name("src/my-page.tsx"), "MyPage");
        assert_eq!(default_export_name("404.tsx"), "_404");
        assert_eq!(default_export_name("index.tsx"), "Index");
    }
}
