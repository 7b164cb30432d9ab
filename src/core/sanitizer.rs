// src/core/sanitizer.rs
//! Escaping of untrusted form text before it is embedded in LaTeX markup,
//! plus the filename key derived from the submitter's name.

use serde_json::Value;

/// Escape every LaTeX-significant character in `input`.
///
/// `# $ % & _ { }` get a backslash prefix. `~`, `^` and `\` would turn into
/// accents or commands with a bare prefix, so they map to their text macros.
/// Line breaks and tabs become spaces (a blank line would end the paragraph
/// inside a macro argument); other control characters are dropped.
pub fn escape_latex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + input.len() / 8);
    for c in input.chars() {
        match c {
            '#' | '$' | '%' | '&' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            '\\' => escaped.push_str("\\textbackslash{}"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            c if c.is_control() => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a JSON value if it is text; any other value is returned unchanged.
pub fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(escape_latex(text)),
        other => other.clone(),
    }
}

/// Render a (possibly absent) scalar as text. `null`, arrays and objects
/// become empty text rather than a placeholder word like "undefined".
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Filesystem-safe stem for a submitter's name: spaces become `_`, anything
/// but ASCII alphanumerics, `-` and `_` is dropped.
pub fn artifact_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect();

    if stem.trim_matches('_').is_empty() {
        "resume".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_prefix_characters() {
        assert_eq!(escape_latex("R&D 100% #1"), "R\\&D 100\\% \\#1");
        assert_eq!(escape_latex("a_b {c} $5"), "a\\_b \\{c\\} \\$5");
    }

    #[test]
    fn test_escape_command_characters() {
        assert_eq!(escape_latex("~"), "\\textasciitilde{}");
        assert_eq!(escape_latex("x^2"), "x\\textasciicircum{}2");
        assert_eq!(
            escape_latex("\\input{/etc/passwd}"),
            "\\textbackslash{}input\\{/etc/passwd\\}"
        );
    }

    #[test]
    fn test_escape_flattens_line_breaks_and_drops_controls() {
        assert_eq!(escape_latex("Jane\u{1}Doe\n\nX"), "JaneDoe  X");
        assert_eq!(escape_latex("a\r\nb\tc"), "a  b c");
        assert_eq!(escape_latex("bell\u{7}\u{7f}"), "bell");
        assert_eq!(escape_latex("Zoë\u{a0}李"), "Zoë\u{a0}李");
    }

    #[test]
    fn test_escape_leaves_plain_text() {
        assert_eq!(escape_latex("Jane Doe, B.Tech"), "Jane Doe, B.Tech");
        assert_eq!(escape_latex(""), "");
    }

    #[test]
    fn test_sanitize_value_passes_non_text_through() {
        assert_eq!(sanitize_value(&json!("50%")), json!("50\\%"));
        assert_eq!(sanitize_value(&json!(2021)), json!(2021));
        assert_eq!(sanitize_value(&json!(true)), json!(true));
        assert_eq!(sanitize_value(&Value::Null), Value::Null);
        assert_eq!(sanitize_value(&json!(["a_b"])), json!(["a_b"]));
    }

    #[test]
    fn test_display_scalar_never_prints_undefined() {
        assert_eq!(display_scalar(&Value::Null), "");
        assert_eq!(display_scalar(&json!({"a": 1})), "");
        assert_eq!(display_scalar(&json!(9.5)), "9.5");
    }

    #[test]
    fn test_artifact_stem() {
        assert_eq!(artifact_stem("Jane Doe"), "Jane_Doe");
        assert_eq!(artifact_stem("  Ada  Lovelace "), "Ada__Lovelace");
        assert_eq!(artifact_stem("../etc/passwd"), "etcpasswd");
        assert_eq!(artifact_stem("R&D_team"), "RD_team");
        assert_eq!(artifact_stem(""), "resume");
        assert_eq!(artifact_stem("李雷"), "resume");
    }
}
