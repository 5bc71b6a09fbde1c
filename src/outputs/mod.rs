//! Page builders for the static site.
//!
//! Each submodule is one build operation, run as a one-shot process:
//!
//! - [`briefing`]: briefing markdown → styled item-card HTML page
//! - [`archive`]: archive directory → `archive/index.html`
//! - [`home`]: dashboard `index.html` (latest preview, focus, recent archive)
//!
//! # Output Structure
//!
//! ```text
//! public/
//! ├── index.html        # dashboard
//! ├── latest.md         # current briefing source (hidden by the server)
//! ├── latest.html       # current briefing, rendered
//! ├── archive/
//! │   ├── 2024-03-05.html
//! │   └── index.html
//! └── templates/        # briefing.html, home.html, archive_index.html
//! ```

pub mod archive;
pub mod briefing;
pub mod home;
