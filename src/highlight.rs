//! Keyword highlighting for analysis text.
//!
//! Wraps every occurrence of each highlight term in `<mark>` tags. The input
//! is already HTML-escaped, and each term is escaped before matching, so a
//! term can never introduce markup. Matching is literal-substring, not
//! word-boundary aware; a term can match inside an unrelated word. That is a
//! deliberate simplicity trade-off, kept as-is.

use crate::html::escape_html;
use itertools::Itertools;

/// Cue keywords used both for highlighting analysis text and for picking
/// dashboard focus lines, overridable via `--keywords`/`BRIEFING_KEYWORDS`.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "关注", "重点看", "后续", "风险", "催化", "监管", "政策", "出口管制",
    "财报", "指引", "订单", "交付", "并购", "融资", "估值", "Capex",
];

/// Wrap every occurrence of each term in `<mark>…</mark>`.
///
/// `escaped` must already be HTML-escaped. Terms are de-duplicated and sorted
/// longest-first so a longer term is never partially shadowed by a shorter
/// substring term. The single left-to-right scan guarantees each character of
/// the input is wrapped at most once, with no overlap artifacts.
pub fn highlight_terms(escaped: &str, terms: &[String]) -> String {
    let mut terms: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(escape_html)
        .unique()
        .collect();
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    if terms.is_empty() {
        return escaped.to_string();
    }

    let mut out = String::with_capacity(escaped.len());
    let mut i = 0;
    while i < escaped.len() {
        let rest = &escaped[i..];
        if let Some(term) = terms.iter().find(|t| rest.starts_with(t.as_str())) {
            out.push_str("<mark>");
            out.push_str(term);
            out.push_str("</mark>");
            i += term.len();
        } else {
            let ch = rest.chars().next().unwrap();
            out.push(ch);
            i += ch.len_utf8();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(ts: &[&str]) -> Vec<String> {
        ts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_wraps_each_term_once() {
        let out = highlight_terms("policy risk is rising", &terms(&["risk", "policy"]));
        assert_eq!(out, "<mark>policy</mark> <mark>risk</mark> is rising");
    }

    #[test]
    fn test_term_order_does_not_matter() {
        let a = highlight_terms("policy risk is rising", &terms(&["risk", "policy"]));
        let b = highlight_terms("policy risk is rising", &terms(&["policy", "risk"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_longer_term_not_shadowed() {
        let out = highlight_terms("risk factor ahead", &terms(&["risk", "risk factor"]));
        assert_eq!(out, "<mark>risk factor</mark> ahead");
    }

    #[test]
    fn test_duplicate_terms_deduped() {
        let out = highlight_terms("risk", &terms(&["risk", "risk", " risk "]));
        assert_eq!(out, "<mark>risk</mark>");
    }

    #[test]
    fn test_terms_matched_in_escaped_form() {
        let escaped = escape_html("AT&T policy update");
        let out = highlight_terms(&escaped, &terms(&["AT&T"]));
        assert_eq!(out, "<mark>AT&amp;T</mark> policy update");
    }

    #[test]
    fn test_multibyte_terms() {
        let out = highlight_terms("监管收紧，政策落地", &terms(&["监管", "政策"]));
        assert_eq!(out, "<mark>监管</mark>收紧，<mark>政策</mark>落地");
    }

    #[test]
    fn test_no_terms_returns_input() {
        assert_eq!(highlight_terms("unchanged", &[]), "unchanged");
    }
}
