//! Template loading and placeholder substitution.
//!
//! Templates are plain HTML files containing `{{NAME}}` tokens. There is no
//! template language beyond global verbatim substitution: all repetition
//! (per-item HTML, per-link HTML) is generated by the callers before the
//! values are substituted. Caller-supplied values are inserted unescaped;
//! user-visible text must be escaped with [`crate::html::escape_html`] before
//! it reaches a placeholder.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Any placeholder left unsupplied after substitution.
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{[A-Z0-9_]+\}\}").unwrap());

/// Fallback substituted for placeholders with no supplied value.
const NO_CONTENT: &str = r#"<div class="small">暂无内容</div>"#;

/// A loaded HTML template.
#[derive(Debug, Clone)]
pub struct Template {
    body: String,
}

impl Template {
    /// Load a template file. A missing template is a configuration error,
    /// fatal to the invoking subcommand.
    pub async fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let body = fs::read_to_string(path)
            .await
            .map_err(|e| format!("cannot read template {}: {e}", path.display()))?;
        debug!(path = %path.display(), bytes = body.len(), "Loaded template");
        Ok(Self { body })
    }

    #[cfg(test)]
    fn from_str(body: &str) -> Self {
        Self { body: body.to_string() }
    }

    /// Substitute every occurrence of each named placeholder, then replace
    /// any placeholder with no supplied value by a "no content" fallback.
    pub fn render(&self, values: &[(&str, String)]) -> String {
        let mut out = self.body.clone();
        for (name, value) in values {
            out = out.replace(&format!("{{{{{name}}}}}"), value);
        }
        PLACEHOLDER_RE.replace_all(&out, NO_CONTENT).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_all_occurrences() {
        let tpl = Template::from_str("<title>{{TITLE}}</title><h1>{{TITLE}}</h1>");
        let out = tpl.render(&[("TITLE", "News".to_string())]);
        assert_eq!(out, "<title>News</title><h1>News</h1>");
    }

    #[test]
    fn test_unsupplied_placeholder_gets_fallback() {
        let tpl = Template::from_str("<body>{{ITEMS_HTML}}</body>");
        let out = tpl.render(&[]);
        assert_eq!(out, format!("<body>{NO_CONTENT}</body>"));
    }

    #[test]
    fn test_values_inserted_verbatim() {
        // Structural HTML supplied by the renderer must not be re-escaped.
        let tpl = Template::from_str("{{ITEMS_HTML}}");
        let html = r#"<div class="item">x</div>"#.to_string();
        assert_eq!(tpl.render(&[("ITEMS_HTML", html.clone())]), html);
    }

    #[test]
    fn test_non_placeholder_braces_untouched() {
        let tpl = Template::from_str("{{lowercase}} stays");
        assert_eq!(tpl.render(&[]), "{{lowercase}} stays");
    }
}
