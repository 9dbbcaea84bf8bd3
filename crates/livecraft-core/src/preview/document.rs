//! Host document assembly

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</script").expect("valid regex"));
static STYLE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</style").expect("valid regex"));

/// Document used when the project has no HTML file
pub fn default_document(mount_id: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <script src="https://cdn.tailwindcss.com"></script>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap" rel="stylesheet">
    <style>
      body {{ background: #000; color: #fff; font-family: 'Inter', sans-serif; margin: 0; min-height: 100vh; }}
      #{id} {{ min-height: 100vh; }}
    </style>
  </head>
  <body>
    <div id="{id}"></div>
  </body>
</html>
"#,
        id = escape_attr(mount_id)
    )
}

/// Escape text for a double-quoted HTML attribute
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_close(text: &str, pattern: &Regex) -> String {
    pattern
        .replace_all(text, |caps: &regex::Captures<'_>| format!("<\\/{}", &caps[0][2..]))
        .into_owned()
}

pub fn style_tag(path: &str, css: &str) -> String {
    format!(
        r#"<style id="{}">{}</style>"#,
        escape_attr(path),
        escape_close(css, &STYLE_CLOSE)
    )
}

pub fn script_tag(script: &str) -> String {
    format!(
        r#"<script type="module">{}</script>"#,
        escape_close(script, &SCRIPT_CLOSE)
    )
}

/// Insert `styles` before the first `</head>`, or prepend when there is none
pub fn inject_styles(html: &str, styles: &str) -> String {
    match html.to_ascii_lowercase().find("</head>") {
        Some(at) => format!("{}{}{}", &html[..at], styles, &html[at..]),
        None => format!("{}{}", styles, html),
    }
}

/// Insert `tag` before the last `</body>`, or append when there is none
pub fn inject_script(html: &str, tag: &str) -> String {
    match html.to_ascii_lowercase().rfind("</body>") {
        Some(at) => format!("{}{}{}", &html[..at], tag, &html[at..]),
        None => format!("{}{}", html, tag),
    }
}
