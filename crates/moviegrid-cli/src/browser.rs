//! External navigation to movie and trailer pages.

use anyhow::{Context, Result};

/// Opens URLs outside the terminal.
pub trait Browser {
    /// Opens `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL could not be handed off.
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the desktop's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "opening in browser");
        open::that(url).with_context(|| format!("failed to open {url}"))
    }
}
