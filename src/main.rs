//! # News Briefing Site
//!
//! Assembles a personal news-briefing site from markdown digests deposited
//! by an external generator, and serves the result.
//!
//! ## Subcommands
//!
//! - `render`: briefing markdown → styled HTML item cards
//! - `archive-index`: rebuild the archive navigation page
//! - `home`: rebuild the dashboard (latest preview, focus, recent archive)
//! - `serve`: static file server with HTTP Basic Auth (fail-closed)
//! - `fetch-text`: headless-browser extraction of a page's readable text
//!
//! ## Usage
//!
//! ```sh
//! news_briefing render --md latest.md --out latest.html
//! news_briefing serve --port 8080
//! ```
//!
//! Every build subcommand is a one-shot, single-threaded transformation:
//! read files, substitute, write files. Components only interact through the
//! shared public directory; re-running is always safe.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod fetcher;
mod highlight;
mod html;
mod models;
mod outputs;
mod parser;
mod server;
mod templates;

use cli::{Cli, Command};
use config::{FetchConfig, ServerConfig};
use outputs::{archive, briefing, home};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.public_dir, "Parsed CLI arguments");
    let site = args.site_config();

    match args.command {
        Command::Render {
            md,
            out,
            h1,
            meta,
            title,
        } => {
            let meta = briefing::PageMeta {
                title: title.unwrap_or_else(|| h1.clone()),
                h1,
                meta,
            };
            let path = briefing::render_briefing(&site, &md, &out, &meta).await?;
            println!("Wrote {}", path.display());
        }

        Command::ArchiveIndex => {
            let path = archive::build_archive_index(&site).await?;
            println!("Wrote {}", path.display());
        }

        Command::Home => {
            let path = home::build_home(&site).await?;
            println!("Wrote {}", path.display());
        }

        Command::Serve {
            port,
            user,
            pass,
            no_auth,
        } => {
            let config = ServerConfig::new(port, &args.public_dir, user, pass, no_auth)?;
            info!(port = config.port, auth = config.auth.is_some(), "Server configured");
            server::run(config).await?;
        }

        Command::FetchText {
            url,
            browser_path,
            timeout_ms,
        } => {
            let config = FetchConfig {
                url,
                browser_path: browser_path.map(PathBuf::from),
                timeout: Duration::from_millis(timeout_ms),
            };
            let page = fetcher::fetch_page_text(config).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }

    Ok(())
}
