//! Readable-page-text extraction via a headless browser.
//!
//! Many news pages are rendered client-side, so a plain HTTP fetch does not
//! capture their content. This module drives headless Chromium: navigate,
//! let the DOM settle briefly, strip noise elements in-page, and return the
//! title, canonical URL, and visible text as a [`PageText`].
//!
//! One browser and one tab per invocation, no pooling. The configured
//! timeout applies to the navigation step specifically; the tab is closed and
//! the browser process is killed on drop on every exit path.

use crate::config::FetchConfig;
use crate::models::PageText;
use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::time::Duration;
use tracing::{debug, info, instrument};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Bounded settle delay after `domcontentloaded`; not a full network-idle wait.
const IDLE_DELAY: Duration = Duration::from_millis(800);

/// In-page extraction: prefer `<article>` over the body, drop noise
/// elements, collapse runs of blank lines.
const EXTRACT_JS: &str = r#"
(() => {
  const title = document.title || '';
  const link = document.querySelector('link[rel="canonical"]');
  const canonical = (link && link.getAttribute('href')) || location.href;
  const root = document.querySelector('article') || document.body;
  for (const sel of ['script', 'style', 'noscript', 'header', 'footer', 'nav', 'aside']) {
    root.querySelectorAll(sel).forEach(n => n.remove());
  }
  const text = (root.innerText || '').replace(/\n{3,}/g, '\n\n').trim();
  return JSON.stringify({ title, canonical, text });
})()
"#;

/// Fetch the readable text of a page.
///
/// Browser automation is synchronous in `headless_chrome`, so the work runs
/// on a blocking thread.
#[instrument(level = "info", skip_all, fields(url = %config.url))]
pub async fn fetch_page_text(config: FetchConfig) -> Result<PageText> {
    tokio::task::spawn_blocking(move || fetch_blocking(&config)).await?
}

fn fetch_blocking(config: &FetchConfig) -> Result<PageText> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .path(config.browser_path.clone())
        .build()
        .map_err(|e| anyhow::anyhow!("invalid browser launch options: {e}"))?;

    let browser = Browser::new(options).context("failed to launch headless browser")?;
    let tab = browser.new_tab().context("failed to open browser tab")?;
    tab.set_default_timeout(config.timeout);
    tab.set_user_agent(USER_AGENT, None, None)
        .context("failed to set user agent")?;

    let result = extract(&tab, &config.url);

    // Release the page handle on every exit path; dropping `browser` then
    // kills the Chromium process.
    let _ = tab.close(true);
    result
}

fn extract(tab: &Tab, url: &str) -> Result<PageText> {
    tab.navigate_to(url)
        .with_context(|| format!("failed to navigate to {url}"))?;
    tab.wait_until_navigated()
        .with_context(|| format!("navigation to {url} timed out"))?;
    debug!("Navigation complete; letting client-side JS settle");
    std::thread::sleep(IDLE_DELAY);

    let remote = tab
        .evaluate(EXTRACT_JS, false)
        .context("page evaluation failed")?;
    let value = remote.value.context("page evaluation returned no value")?;
    let json = value
        .as_str()
        .context("page evaluation returned a non-string result")?;
    let mut page: PageText =
        serde_json::from_str(json).context("page evaluation returned malformed JSON")?;

    if page.canonical.is_empty() {
        page.canonical = tab.get_url();
    }
    info!(
        title = %page.title,
        canonical = %page.canonical,
        bytes = page.text.len(),
        "Extracted page text"
    );
    Ok(page)
}
