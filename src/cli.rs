//! Command-line interface definitions.
//!
//! One binary, five subcommands, mirroring the site's build-and-serve
//! lifecycle. Every option can also come from an environment variable, so
//! an external scheduler can configure the site without flags.

use crate::config::SiteConfig;
use clap::{Parser, Subcommand};

/// Command-line arguments for the news-briefing site.
///
/// # Examples
///
/// ```sh
/// # Render the latest digest and rebuild the navigation pages
/// news_briefing render --md latest.md --out latest.html
/// news_briefing archive-index
/// news_briefing home
///
/// # Serve the site (fails closed without credentials)
/// BASIC_AUTH_USER=u BASIC_AUTH_PASS=p news_briefing serve --port 8080
///
/// # Extract readable text from a page
/// news_briefing fetch-text --url https://example.com/story
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory for build outputs and served files
    #[arg(long, env = "PUBLIC_DIR", default_value = "./public", global = true)]
    pub public_dir: String,

    /// Template directory (defaults to <PUBLIC_DIR>/templates)
    #[arg(long, env = "TEMPLATES_DIR", global = true)]
    pub templates_dir: Option<String>,

    /// Comma-separated cue keyword override for highlighting and focus
    #[arg(long, env = "BRIEFING_KEYWORDS", global = true)]
    pub keywords: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig::new(
            &self.public_dir,
            self.templates_dir.as_deref(),
            self.keywords.as_deref(),
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a briefing markdown file into a styled HTML page
    Render {
        /// Input briefing markdown (relative paths resolve under the public dir)
        #[arg(long)]
        md: String,

        /// Output HTML path (relative paths resolve under the public dir)
        #[arg(long)]
        out: String,

        /// Page heading
        #[arg(long, default_value = "新闻摘要")]
        h1: String,

        /// Meta line shown under the heading
        #[arg(long, default_value = "")]
        meta: String,

        /// Browser tab title (defaults to the heading)
        #[arg(long)]
        title: Option<String>,
    },

    /// Rebuild archive/index.html from the archived snapshots
    ArchiveIndex,

    /// Rebuild the dashboard index.html
    Home,

    /// Serve the public directory over HTTP with Basic Auth
    Serve {
        /// Listen port
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Basic Auth username
        #[arg(long, env = "BASIC_AUTH_USER")]
        user: Option<String>,

        /// Basic Auth password
        #[arg(long, env = "BASIC_AUTH_PASS")]
        pass: Option<String>,

        /// Serve without authentication (otherwise credentials are required)
        #[arg(long, env = "DISABLE_AUTH")]
        no_auth: bool,
    },

    /// Extract readable page text via a headless browser, as JSON on stdout
    FetchText {
        /// Page URL to fetch
        #[arg(long)]
        url: String,

        /// Browser executable override
        #[arg(long, env = "CHROMIUM_PATH")]
        browser_path: Option<String>,

        /// Page navigation timeout in milliseconds
        #[arg(long, env = "BROWSER_TIMEOUT_MS", default_value_t = 30_000)]
        timeout_ms: u64,
    },
}
