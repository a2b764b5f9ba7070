//! Signed-in session check and cookie import.

use crate::amazon::{AmazonClient, AmazonPages, Parser, SessionStore};
use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Loads the home page and reports whether the session is signed in.
///
/// A signed-in session is persisted right away so refreshed cookies survive
/// the run.
pub async fn check_signed_in(client: &impl AmazonPages) -> Result<bool> {
    let parser = Parser::new(client.region());
    let html = client.home().await.context("Failed to load home page")?;

    if !parser.is_signed_in(&html) {
        warn!("Not signed in to {}", client.region().domain());
        return Ok(false);
    }

    info!("Signed in to {}", client.region().domain());
    client.persist_session().context("Failed to save session cookies")?;
    Ok(true)
}

/// Session management: sign-in check and browser cookie import.
pub struct SessionCommand {
    config: Config,
}

impl SessionCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn check(&self) -> Result<String> {
        let client =
            AmazonClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.check_with_client(&client).await
    }

    /// Runs the sign-in check with a provided client (for testing).
    pub async fn check_with_client(&self, client: &impl AmazonPages) -> Result<String> {
        let domain = client.region().domain();

        if check_signed_in(client).await? {
            let saved_to = self
                .config
                .cookies_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "nowhere (no cookie file configured)".to_string());
            Ok(format!("Signed in to {}. Session saved to {}.", domain, saved_to))
        } else {
            Ok(format!(
                "Not signed in to {}. Export your browser cookies as JSON and run \
                 `amz-shopper session import <file>`.",
                domain
            ))
        }
    }

    /// Copies cookies from a browser export into the configured cookie file.
    pub fn import(&self, source: &Path) -> Result<String> {
        if !source.exists() {
            anyhow::bail!("Cookie file not found: {}", source.display());
        }

        let store = SessionStore::load(source)?;
        if store.is_empty() {
            anyhow::bail!("No cookies found in {}", source.display());
        }

        let dest = self
            .config
            .cookies_path
            .as_ref()
            .context("No cookie file location configured (use --cookies)")?;

        store.save(dest)?;
        Ok(format!("Imported {} cookies into {}", store.len(), dest.display()))
    }
}
