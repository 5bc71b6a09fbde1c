//! Line-scanning parser for briefing markdown documents.
//!
//! The briefing format is produced by an external digest generator and looks
//! like:
//!
//! ```text
//! # 2024-01-01 08:00 · 新闻摘要
//!
//! ## 1) Some headline
//! - 摘要：one-line summary
//! - 影响/评价（hotdog）：analysis text, possibly
//!   spanning multiple lines
//! - 来源：
//!   - https://example.com/story
//!
//! ---
//! 生成时间：2024-01-01T08:00:00Z
//! ```
//!
//! Parsing is a small explicit state machine rather than composed regular
//! expressions, so malformed input behaves deterministically: a field marker
//! is only recognized in the state where it is expected, anything
//! unrecognized is skipped, and missing fields degrade to empty strings.

use crate::models::{Briefing, BriefingItem};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

/// Item boundary: `## <integer>) <title>`.
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^##\s+\d+\)\s+(.+)$").unwrap());

/// Document stamp heading: `# 2024-01-01 08:00 …`.
static STAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s+(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2})").unwrap());

/// Trailing generation timestamp: `生成时间：<text>`.
static GENERATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"生成时间：(.+)").unwrap());

/// Summary marker: `- 摘要：<text>`.
static SUMMARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s*摘要：\s*(.*)$").unwrap());

/// Analysis marker family: `- 影响/评价：` or with a bracketed qualifier,
/// e.g. `- 影响/评价（hotdog）：`.
static ANALYSIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\s*影响/评价[^：]*：\s*(.*)$").unwrap());

/// Sources marker: `- 来源：` on a line of its own.
static SOURCES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s*来源：\s*$").unwrap());

/// What the scanner expects next within the current item.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    /// Looking for any field marker.
    Body,
    /// Accumulating analysis lines until a terminator.
    Analysis,
    /// Collecting nested source-list lines.
    Sources,
}

/// Parse a briefing markdown document into ordered items.
///
/// Text before the first item heading only contributes the document stamp;
/// a document with zero headings yields zero items, which the renderer turns
/// into a placeholder. Item text between consecutive headings belongs to the
/// preceding item.
pub fn parse_briefing(md: &str) -> Briefing {
    let mut briefing = Briefing {
        stamp: None,
        generated_at: GENERATED_RE
            .captures(md)
            .map(|c| c[1].trim().to_string()),
        items: Vec::new(),
    };

    let mut current: Option<BriefingItem> = None;
    let mut field = Field::Body;
    let mut analysis_lines: Vec<String> = Vec::new();

    for raw in md.lines() {
        let line = raw.trim();

        if let Some(caps) = HEADING_RE.captures(line) {
            finish_item(&mut briefing, &mut current, &mut analysis_lines);
            current = Some(BriefingItem {
                title: caps[1].trim().to_string(),
                ..Default::default()
            });
            field = Field::Body;
            continue;
        }

        if briefing.stamp.is_none() && current.is_none() {
            if let Some(caps) = STAMP_RE.captures(line) {
                briefing.stamp = Some(format!("{} {}", &caps[1], &caps[2]));
                continue;
            }
        }

        let Some(item) = current.as_mut() else {
            continue;
        };

        // A horizontal rule terminates whatever field was being captured.
        if line == "---" {
            field = Field::Body;
            continue;
        }

        match field {
            Field::Body => {
                if let Some(caps) = SUMMARY_RE.captures(line) {
                    if item.summary.is_empty() {
                        item.summary = caps[1].trim().to_string();
                    }
                } else if SOURCES_RE.is_match(line) {
                    field = Field::Sources;
                } else if let Some(caps) = ANALYSIS_RE.captures(line) {
                    analysis_lines.clear();
                    let first = caps[1].trim();
                    if !first.is_empty() {
                        analysis_lines.push(first.to_string());
                    }
                    field = Field::Analysis;
                }
            }
            Field::Analysis => {
                if SOURCES_RE.is_match(line) {
                    field = Field::Sources;
                } else {
                    analysis_lines.push(line.to_string());
                }
            }
            Field::Sources => {
                if let Some(rest) = line.strip_prefix("- ") {
                    let candidate = rest.trim();
                    if is_http_url(candidate) {
                        item.urls.push(candidate.to_string());
                    }
                    // Non-URL list lines are silently dropped.
                }
            }
        }
    }

    finish_item(&mut briefing, &mut current, &mut analysis_lines);
    debug!(items = briefing.items.len(), stamp = ?briefing.stamp, "Parsed briefing document");
    briefing
}

fn finish_item(
    briefing: &mut Briefing,
    current: &mut Option<BriefingItem>,
    analysis_lines: &mut Vec<String>,
) {
    if let Some(mut item) = current.take() {
        item.analysis = analysis_lines.join("\n").trim().to_string();
        analysis_lines.clear();
        briefing.items.push(item);
    }
}

/// True when `s` is a syntactically valid absolute `http`/`https` URL.
fn is_http_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
