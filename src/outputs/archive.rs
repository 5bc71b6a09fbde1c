//! Archive index generation.
//!
//! Archive entries are immutable, date-stamped HTML snapshots; sorting their
//! filenames descending as opaque strings yields reverse-chronological order.

use crate::config::SiteConfig;
use crate::html::escape_html;
use crate::templates::Template;
use itertools::Itertools;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Shown when the archive holds no entries yet.
const NO_ENTRIES: &str = r#"<div class="small">暂无归档</div>"#;

/// Build `archive/index.html` from the existing archive entries.
///
/// A missing or unreadable archive directory is a fatal configuration error:
/// an empty index would be indistinguishable from a misconfigured path.
#[instrument(level = "info", skip_all)]
pub async fn build_archive_index(site: &SiteConfig) -> Result<PathBuf, Box<dyn Error>> {
    let archive_dir = site.archive_dir();
    let entries = list_entries(&archive_dir)?;
    info!(count = entries.len(), dir = %archive_dir.display(), "Listed archive entries");

    let template = Template::load(&site.template_path("archive_index.html")).await?;
    let links = if entries.is_empty() {
        NO_ENTRIES.to_string()
    } else {
        links_html(&entries)
    };
    let html = template.render(&[("ARCHIVE_LINKS", links)]);

    let out_path = archive_dir.join("index.html");
    fs::write(&out_path, html)
        .await
        .map_err(|e| format!("cannot write {}: {e}", out_path.display()))?;
    info!(path = %out_path.display(), "Wrote archive index");
    Ok(out_path)
}

/// List archive entry filenames, sorted descending.
///
/// Keeps `*.html` regular files, excluding the index itself. The error
/// distinguishes "archive directory misconfigured" from "no archive yet".
pub fn list_entries(archive_dir: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let read_dir = std::fs::read_dir(archive_dir)
        .map_err(|e| format!("archive directory {} unreadable: {e}", archive_dir.display()))?;

    let mut entries: Vec<String> = read_dir
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".html") && name != "index.html")
        .collect();
    entries.sort_by(|a, b| b.cmp(a));
    Ok(entries)
}

/// Render archive entries as link rows; labels are filenames with the
/// extension stripped, hrefs percent-encoded.
pub fn links_html(entries: &[String]) -> String {
    entries
        .iter()
        .map(|name| {
            let label = name.trim_end_matches(".html");
            format!(
                r#"<a href="/archive/{}"><span>{}</span><span class="stamp">HTML</span></a>"#,
                urlencoding::encode(name),
                escape_html(label)
            )
        })
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_archive(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            std::fs::write(dir.path().join(f), "<html></html>").unwrap();
        }
        dir
    }

    #[test]
    fn test_entries_sorted_descending() {
        let dir = make_archive(&["2024-01-01.html", "2024-02-15.html", "2023-12-31.html"]);
        let entries = list_entries(dir.path()).unwrap();
        assert_eq!(
            entries,
            vec!["2024-02-15.html", "2024-01-01.html", "2023-12-31.html"]
        );
    }

    #[test]
    fn test_index_and_non_html_excluded() {
        let dir = make_archive(&["index.html", "2024-01-01.html", "notes.txt", "raw.md"]);
        let entries = list_entries(dir.path()).unwrap();
        assert_eq!(entries, vec!["2024-01-01.html"]);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("archive");
        assert!(list_entries(&missing).is_err());
    }

    #[test]
    fn test_links_strip_extension_and_encode_href() {
        let html = links_html(&["2024 report.html".to_string()]);
        assert!(html.contains(r#"href="/archive/2024%20report.html""#));
        assert!(html.contains("<span>2024 report</span>"));
    }

    #[tokio::test]
    async fn test_build_archive_index_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path();
        std::fs::create_dir_all(public.join("templates")).unwrap();
        std::fs::create_dir_all(public.join("archive")).unwrap();
        std::fs::write(
            public.join("templates/archive_index.html"),
            "<main>{{ARCHIVE_LINKS}}</main>",
        )
        .unwrap();
        std::fs::write(public.join("archive/2024-01-01.html"), "x").unwrap();

        let site = SiteConfig::new(public.to_str().unwrap(), None, None);
        let out = build_archive_index(&site).await.unwrap();
        let html = std::fs::read_to_string(out).unwrap();
        assert!(html.contains("/archive/2024-01-01.html"));
    }
}
