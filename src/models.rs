//! Data models for briefing documents and extracted page text.
//!
//! This module defines the core data structures shared by the build
//! subcommands:
//! - [`Briefing`]: a parsed briefing markdown document
//! - [`BriefingItem`]: one numbered news entry within a briefing
//! - [`PageText`]: the structured result of the headless-browser text fetcher

use serde::{Deserialize, Serialize};

/// One numbered news entry parsed from a briefing document.
///
/// Items are produced by the markdown parser in document order. Missing
/// sections degrade to empty strings rather than errors, since the upstream
/// digest producer is not fully trusted to emit well-formed sections.
#[derive(Debug, Default, PartialEq)]
pub struct BriefingItem {
    /// The item headline, taken from the `## <n>) <title>` heading.
    pub title: String,
    /// The one-line summary, or empty if the item has none.
    pub summary: String,
    /// The analysis text, possibly spanning multiple lines.
    pub analysis: String,
    /// Source URLs listed under the sources marker, scheme-filtered.
    pub urls: Vec<String>,
}

/// A parsed briefing markdown document.
#[derive(Debug, Default)]
pub struct Briefing {
    /// Date/time stamp from the document's title line (`# 2024-01-01 08:00 …`).
    pub stamp: Option<String>,
    /// Value of the trailing generation-timestamp line, if present.
    pub generated_at: Option<String>,
    /// The numbered items in document order.
    pub items: Vec<BriefingItem>,
}

/// Readable text extracted from a web page by the headless browser.
///
/// Serialized as pretty JSON on stdout so it can be post-processed by the
/// external digest producer.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageText {
    /// The document title.
    pub title: String,
    /// The declared canonical URL, or the final navigated URL if none.
    pub canonical: String,
    /// Visible text with noise elements stripped and blank runs collapsed.
    pub text: String,
}
