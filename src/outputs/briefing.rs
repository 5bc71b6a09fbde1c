//! Briefing page rendering: markdown digest → item-card HTML.

use crate::config::SiteConfig;
use crate::highlight::highlight_terms;
use crate::html::escape_html;
use crate::models::BriefingItem;
use crate::parser::parse_briefing;
use crate::templates::Template;
use chrono::Utc;
use itertools::Itertools;
use std::error::Error;
use std::fmt::Write;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Display metadata for a rendered briefing page.
#[derive(Debug)]
pub struct PageMeta {
    pub title: String,
    pub h1: String,
    pub meta: String,
}

/// Render a briefing markdown file into a styled HTML page.
///
/// Reads `md_path`, parses it into items, substitutes the generated item HTML
/// into the briefing template, and writes `out_path`. A missing source file
/// or template is a fatal configuration error; malformed item sections
/// degrade to empty fields instead.
///
/// The `GENERATED_AT` placeholder prefers the document's own generation
/// timestamp; only when that line is absent does the current time leak into
/// the output, so re-rendering identical input is byte-identical.
#[instrument(level = "info", skip_all, fields(md = %md_path, out = %out_path))]
pub async fn render_briefing(
    site: &SiteConfig,
    md_path: &str,
    out_path: &str,
    meta: &PageMeta,
) -> Result<PathBuf, Box<dyn Error>> {
    let md_path = site.resolve(md_path);
    let out_path = site.resolve(out_path);

    let md = fs::read_to_string(&md_path)
        .await
        .map_err(|e| format!("cannot read briefing markdown {}: {e}", md_path.display()))?;
    let briefing = parse_briefing(&md);
    info!(items = briefing.items.len(), "Parsed briefing");

    let template = Template::load(&site.template_path("briefing.html")).await?;

    let generated_at = briefing
        .generated_at
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let mut values = vec![
        ("TITLE", escape_html(&meta.title)),
        ("H1", escape_html(&meta.h1)),
        ("META", escape_html(&meta.meta)),
        ("GENERATED_AT", escape_html(&generated_at)),
    ];
    let items = items_html(&briefing.items, &site.keywords);
    if !items.is_empty() {
        // An empty item list falls through to the template's no-content text.
        values.push(("ITEMS_HTML", items));
    }

    let html = template.render(&values);
    fs::write(&out_path, html)
        .await
        .map_err(|e| format!("cannot write {}: {e}", out_path.display()))?;
    info!(path = %out_path.display(), "Wrote briefing page");
    Ok(out_path)
}

/// Generate the per-item card HTML for all items, in document order.
pub fn items_html(items: &[BriefingItem], keywords: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| item_html(i + 1, item, keywords))
        .join("\n")
}

fn item_html(n: usize, item: &BriefingItem, keywords: &[String]) -> String {
    let mut html = String::new();
    write!(
        html,
        r#"<div class="item" id="item-{n}"><h2 class="item-title">{n}. {}</h2>"#,
        escape_html(&item.title)
    )
    .unwrap();

    if !item.summary.is_empty() {
        write!(
            html,
            r#"<div class="section summary"><div class="label">摘要</div><div>{}</div></div>"#,
            escape_html(&item.summary)
        )
        .unwrap();
    }

    if !item.analysis.is_empty() {
        let highlighted = highlight_terms(&escape_html(&item.analysis), keywords);
        write!(
            html,
            r#"<div class="section analysis"><div class="label">评价 / 影响分析</div><div>{highlighted}</div></div>"#,
        )
        .unwrap();
    }

    if !item.urls.is_empty() {
        html.push_str(r#"<div class="section sources"><div class="label">来源</div><ul>"#);
        for url in &item.urls {
            let esc = escape_html(url);
            write!(
                html,
                r#"<li><a href="{esc}" target="_blank" rel="noopener noreferrer">{esc}</a></li>"#,
            )
            .unwrap();
        }
        html.push_str("</ul></div>");
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, summary: &str, analysis: &str, urls: &[&str]) -> BriefingItem {
        BriefingItem {
            title: title.to_string(),
            summary: summary.to_string(),
            analysis: analysis.to_string(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
        }
    }

    #[test]
    fn test_one_block_per_item_in_order() {
        let items = vec![
            item("First", "s1", "", &[]),
            item("Second", "s2", "", &[]),
            item("Third", "s3", "", &[]),
        ];
        let html = items_html(&items, &[]);
        assert_eq!(html.matches(r#"<div class="item""#).count(), 3);
        let first = html.find("1. First").unwrap();
        let second = html.find("2. Second").unwrap();
        let third = html.find("3. Third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_titles_are_escaped() {
        let items = vec![item("<b>\"Bold\" & 'loud'</b>", "", "", &[])];
        let html = items_html(&items, &[]);
        assert!(html.contains("&lt;b&gt;&quot;Bold&quot; &amp; &#39;loud&#39;&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_item_anchor_ids() {
        let items = vec![item("A", "", "", &[]), item("B", "", "", &[])];
        let html = items_html(&items, &[]);
        assert!(html.contains(r#"id="item-1""#));
        assert!(html.contains(r#"id="item-2""#));
    }

    #[test]
    fn test_empty_sections_omitted() {
        let html = items_html(&[item("Bare", "", "", &[])], &[]);
        assert!(!html.contains("summary"));
        assert!(!html.contains("analysis"));
        assert!(!html.contains("sources"));
    }

    #[test]
    fn test_analysis_highlighted_after_escaping() {
        let items = vec![item("T", "", "policy <risk> rising", &[])];
        let html = items_html(&items, &["risk".to_string(), "policy".to_string()]);
        assert!(html.contains("<mark>policy</mark> &lt;<mark>risk</mark>&gt; rising"));
    }

    #[test]
    fn test_source_links_escaped_and_listed() {
        let items = vec![item("T", "", "", &["https://example.com/a?x=1&y=2"])];
        let html = items_html(&items, &[]);
        assert!(html.contains(r#"href="https://example.com/a?x=1&amp;y=2""#));
        assert!(html.contains("rel=\"noopener noreferrer\""));
    }

    #[tokio::test]
    async fn test_render_is_idempotent_with_generated_at() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path();
        std::fs::create_dir_all(public.join("templates")).unwrap();
        std::fs::write(
            public.join("templates/briefing.html"),
            "<title>{{TITLE}}</title>{{ITEMS_HTML}}<footer>{{GENERATED_AT}}</footer>",
        )
        .unwrap();
        std::fs::write(
            public.join("latest.md"),
            "## 1) Headline\n- 摘要：s\n\n生成时间：2024-03-05T08:00:00Z\n",
        )
        .unwrap();

        let site = SiteConfig::new(public.to_str().unwrap(), None, None);
        let meta = PageMeta {
            title: "t".into(),
            h1: "h".into(),
            meta: "m".into(),
        };
        render_briefing(&site, "latest.md", "latest.html", &meta)
            .await
            .unwrap();
        let first = std::fs::read(public.join("latest.html")).unwrap();
        render_briefing(&site, "latest.md", "latest.html", &meta)
            .await
            .unwrap();
        let second = std::fs::read(public.join("latest.html")).unwrap();
        assert_eq!(first, second);
        assert!(String::from_utf8(first).unwrap().contains("2024-03-05T08:00:00Z"));
    }

    #[tokio::test]
    async fn test_missing_markdown_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let site = SiteConfig::new(dir.path().to_str().unwrap(), None, None);
        let meta = PageMeta {
            title: "t".into(),
            h1: "h".into(),
            meta: "m".into(),
        };
        let result = render_briefing(&site, "missing.md", "out.html", &meta).await;
        assert!(result.is_err());
    }
}
