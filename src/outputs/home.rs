//! Home dashboard builder.
//!
//! Combines a preview of the latest briefing's titles, a short "today focus"
//! block picked from analysis lines, and the most recent archive entries.
//! The dashboard must never fail to build because the latest briefing is
//! absent; everything derived from it degrades to placeholder content.

use crate::config::SiteConfig;
use crate::html::escape_html;
use crate::models::BriefingItem;
use crate::outputs::archive;
use crate::parser::parse_briefing;
use crate::templates::Template;
use chrono::Utc;
use itertools::Itertools;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Maximum item titles in the latest-preview block.
const PREVIEW_LIMIT: usize = 8;
/// Maximum analysis lines picked for the focus block.
const FOCUS_LIMIT: usize = 4;
/// Maximum archive links on the dashboard.
const RECENT_LIMIT: usize = 10;

const NO_PREVIEW: &str = r#"<div class="note">暂无最新预览（等待下一次生成）。</div>"#;
const NO_ARCHIVE: &str = r#"<div class="note">暂无归档</div>"#;
const NO_STAMP: &str = "暂无";

/// Static focus text used when no analysis line matches a cue keyword.
const DEFAULT_FOCUS: &str = "建议：今天先从最新摘要里看“政策/监管”“财报/指引”“重大合作/并购”“异常波动的催化”，再判断是否需要加仓/减仓或跟踪。";

/// Build the dashboard `index.html` under the public root.
#[instrument(level = "info", skip_all)]
pub async fn build_home(site: &SiteConfig) -> Result<PathBuf, Box<dyn Error>> {
    // The latest briefing may not exist yet; degrade rather than fail.
    let md = fs::read_to_string(site.public_dir.join("latest.md"))
        .await
        .unwrap_or_default();
    let briefing = parse_briefing(&md);
    info!(items = briefing.items.len(), "Parsed latest briefing for dashboard");

    let preview = if briefing.items.is_empty() {
        NO_PREVIEW.to_string()
    } else {
        preview_html(&briefing.items)
    };

    let focus = pick_focus(&briefing.items, &site.keywords)
        .unwrap_or_else(|| DEFAULT_FOCUS.to_string());

    // Unlike the archive-index subcommand, a missing archive directory here
    // only downgrades the dashboard block.
    let recent = match archive::list_entries(&site.archive_dir()) {
        Ok(entries) if !entries.is_empty() => {
            archive::links_html(&entries[..entries.len().min(RECENT_LIMIT)])
        }
        Ok(_) => NO_ARCHIVE.to_string(),
        Err(e) => {
            warn!(error = %e, "Archive directory unavailable for dashboard");
            NO_ARCHIVE.to_string()
        }
    };

    let now = Utc::now().format("%Y-%m-%d %H:%MZ").to_string();
    let stamp = briefing.stamp.unwrap_or_else(|| NO_STAMP.to_string());

    let template = Template::load(&site.template_path("home.html")).await?;
    let html = template.render(&[
        ("NOW", escape_html(&now)),
        ("LATEST_STAMP", escape_html(&stamp)),
        ("LATEST_PREVIEW", preview),
        ("TODAY_FOCUS", escape_html(&focus)),
        ("RECENT_ARCHIVE", recent),
    ]);

    let out_path = site.public_dir.join("index.html");
    fs::write(&out_path, html)
        .await
        .map_err(|e| format!("cannot write {}: {e}", out_path.display()))?;
    info!(path = %out_path.display(), "Wrote dashboard");
    Ok(out_path)
}

/// Render up to [`PREVIEW_LIMIT`] item titles as anchors into `latest.html`.
fn preview_html(items: &[BriefingItem]) -> String {
    items
        .iter()
        .take(PREVIEW_LIMIT)
        .enumerate()
        .map(|(i, item)| {
            let n = i + 1;
            format!(
                r#"<a href="/latest.html#item-{n}"><b>{n}.</b> {}<div class="muted">点击查看该条详情</div></a>"#,
                escape_html(&item.title)
            )
        })
        .join("\n")
}

/// Pick up to [`FOCUS_LIMIT`] analysis lines containing a cue keyword.
///
/// Only the first line of each item's analysis is considered, numbered
/// `1) … 2) …` in item order. Returns `None` when nothing matches.
fn pick_focus(items: &[BriefingItem], keywords: &[String]) -> Option<String> {
    let picked: Vec<&str> = items
        .iter()
        .filter_map(|item| item.analysis.lines().next())
        .filter(|line| keywords.iter().any(|k| line.contains(k.as_str())))
        .take(FOCUS_LIMIT)
        .collect();

    if picked.is_empty() {
        None
    } else {
        Some(
            picked
                .iter()
                .enumerate()
                .map(|(i, line)| format!("{}) {line}", i + 1))
                .join("\n"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_analysis(analysis: &str) -> BriefingItem {
        BriefingItem {
            title: "t".into(),
            summary: String::new(),
            analysis: analysis.into(),
            urls: Vec::new(),
        }
    }

    #[test]
    fn test_pick_focus_matches_cues() {
        let items = vec![
            item_with_analysis("nothing notable"),
            item_with_analysis("政策 tightening expected"),
            item_with_analysis("财报 beat, watch guidance"),
        ];
        let keywords = vec!["政策".to_string(), "财报".to_string()];
        let focus = pick_focus(&items, &keywords).unwrap();
        assert_eq!(focus, "1) 政策 tightening expected\n2) 财报 beat, watch guidance");
    }

    #[test]
    fn test_pick_focus_caps_at_limit() {
        let items: Vec<_> = (0..10)
            .map(|i| item_with_analysis(&format!("风险 line {i}")))
            .collect();
        let focus = pick_focus(&items, &["风险".to_string()]).unwrap();
        assert_eq!(focus.lines().count(), FOCUS_LIMIT);
    }

    #[test]
    fn test_pick_focus_none_without_matches() {
        let items = vec![item_with_analysis("plain text")];
        assert!(pick_focus(&items, &["风险".to_string()]).is_none());
    }

    #[test]
    fn test_preview_caps_at_limit_and_links_anchors() {
        let items: Vec<_> = (0..12)
            .map(|i| item_with_analysis(&format!("a{i}")))
            .collect();
        let html = preview_html(&items);
        assert_eq!(html.matches("<a href=").count(), PREVIEW_LIMIT);
        assert!(html.contains("/latest.html#item-1"));
        assert!(html.contains(&format!("/latest.html#item-{PREVIEW_LIMIT}")));
    }

    #[tokio::test]
    async fn test_build_home_without_latest_md() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path();
        std::fs::create_dir_all(public.join("templates")).unwrap();
        std::fs::write(
            public.join("templates/home.html"),
            "{{NOW}}|{{LATEST_STAMP}}|{{LATEST_PREVIEW}}|{{TODAY_FOCUS}}|{{RECENT_ARCHIVE}}",
        )
        .unwrap();

        let site = SiteConfig::new(public.to_str().unwrap(), None, None);
        let out = build_home(&site).await.unwrap();
        let html = std::fs::read_to_string(out).unwrap();
        assert!(html.contains(NO_STAMP));
        assert!(html.contains("暂无最新预览"));
        assert!(html.contains("暂无归档"));
        assert!(html.contains("建议"));
    }

    #[tokio::test]
    async fn test_build_home_with_latest_and_archive() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path();
        std::fs::create_dir_all(public.join("templates")).unwrap();
        std::fs::create_dir_all(public.join("archive")).unwrap();
        std::fs::write(
            public.join("templates/home.html"),
            "{{LATEST_STAMP}}|{{LATEST_PREVIEW}}|{{RECENT_ARCHIVE}}",
        )
        .unwrap();
        std::fs::write(
            public.join("latest.md"),
            "# 2024-03-05 08:00\n\n## 1) Big story\n- 摘要：s\n",
        )
        .unwrap();
        std::fs::write(public.join("archive/2024-03-04.html"), "x").unwrap();

        let site = SiteConfig::new(public.to_str().unwrap(), None, None);
        let out = build_home(&site).await.unwrap();
        let html = std::fs::read_to_string(out).unwrap();
        assert!(html.contains("2024-03-05 08:00"));
        assert!(html.contains("Big story"));
        assert!(html.contains("/archive/2024-03-04.html"));
    }
}
