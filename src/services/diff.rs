//! Unified diff to HTML highlighting
//!
//! Emits the markup produced by the common `highlight` CSS themes: every
//! line that is not plain context is wrapped in a `<span>` whose class says
//! what kind of diff line it is.
//!
//! | class | lines                                          |
//! |-------|------------------------------------------------|
//! | `gh`  | `diff`, `index`, `Index` headers and `=` rules |
//! | `gu`  | `@@` hunk headers and ed-style ranges (`3c3`)  |
//! | `gd`  | removed lines (`-`, `< `)                      |
//! | `gi`  | added lines (`+`, `> `)                        |
//! | `gs`  | changed lines (`!`) and bare `---` separators  |

use once_cell::sync::Lazy;
use regex::Regex;

static ED_RANGE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d(?:,\d+)?[acd]\d+(?:,\d+)?$").unwrap());

fn line_class(line: &str) -> Option<&'static str> {
    if line.starts_with(' ') {
        None
    } else if line.starts_with('!') || line == "---" {
        Some("gs")
    } else if line.starts_with('-') || line.starts_with("< ") {
        Some("gd")
    } else if line.starts_with('+') || line.starts_with("> ") {
        Some("gi")
    } else if line.starts_with('@') || ED_RANGE_REGEX.is_match(line) {
        Some("gu")
    } else if line.starts_with("Index")
        || line.starts_with("index")
        || line.starts_with("diff")
        || line.starts_with('=')
    {
        Some("gh")
    } else {
        None
    }
}

fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Render a diff as highlighted HTML
pub fn highlight(diff: &str) -> String {
    let mut out = String::with_capacity(diff.len() * 2 + 64);
    out.push_str(r#"<div class="highlight"><pre><span></span>"#);

    for line in diff.lines() {
        match line_class(line) {
            Some(class) => {
                out.push_str(r#"<span class=""#);
                out.push_str(class);
                out.push_str(r#"">"#);
                escape_html(line, &mut out);
                out.push_str("</span>");
            }
            None => escape_html(line, &mut out),
        }
        out.push('\n');
    }

    out.push_str("</pre></div>\n");
    out
}
