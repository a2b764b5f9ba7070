//! Cookie persistence for a signed-in Amazon session.
//!
//! Cookies are stored as a JSON array of `{name, value, domain, path}`
//! objects, the shape produced by common browser cookie exporters. The live
//! session is a `wreq` cookie jar; this module moves cookies between that jar
//! and the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use wreq::cookie::Jar;

/// A single stored cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub secure: bool,
    /// Expiry as Unix seconds; `None` for session cookies
    #[serde(
        default,
        alias = "expirationDate",
        alias = "expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<f64>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: false,
            expires: None,
        }
    }

    /// Renders the cookie as a `Set-Cookie` value for the jar.
    ///
    /// Expiry becomes a relative `Max-Age`, so an already expired cookie
    /// renders as `Max-Age=0` and is dropped by the jar.
    fn to_set_cookie(&self, now: f64) -> String {
        let mut header = format!("{}={}", self.name, self.value);
        if let Some(domain) = &self.domain {
            header.push_str(&format!("; Domain={}", domain));
        }
        if let Some(path) = &self.path {
            header.push_str(&format!("; Path={}", path));
        }
        if self.secure {
            header.push_str("; Secure");
        }
        if let Some(expires) = self.expires {
            let remaining = (expires - now).floor().max(0.0) as u64;
            header.push_str(&format!("; Max-Age={}", remaining));
        }
        header
    }

    /// URL the cookie is scoped to: its domain, or `default_url` when host-only.
    fn origin(&self, default_url: &str) -> String {
        match &self.domain {
            Some(domain) => format!("https://{}/", domain.trim_start_matches('.')),
            None => default_url.to_string(),
        }
    }
}

impl From<wreq::cookie::Cookie<'static>> for Cookie {
    fn from(cookie: wreq::cookie::Cookie<'static>) -> Self {
        Self {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            domain: cookie.domain().map(str::to_string),
            path: cookie.path().map(str::to_string),
            secure: cookie.secure(),
            expires: cookie
                .expires()
                .and_then(|at| at.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as f64),
        }
    }
}

/// Cookie snapshot that can be loaded from and saved to disk.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    cookies: Vec<Cookie>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads cookies from a JSON file. A missing file yields an empty session.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No cookie file at {}, starting a fresh session", path.display());
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cookie file: {}", path.display()))?;
        let cookies: Vec<Cookie> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cookie file: {}", path.display()))?;

        info!("Loaded {} cookies from {}", cookies.len(), path.display());

        let mut store = Self::new();
        for cookie in cookies {
            store.upsert(cookie);
        }
        Ok(store)
    }

    /// Writes cookies to a JSON file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.cookies)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write cookie file: {}", path.display()))?;

        info!("Saved {} cookies to {}", self.cookies.len(), path.display());
        Ok(())
    }

    /// Snapshots the unexpired cookies held by a jar.
    pub fn from_jar(jar: &Jar) -> Self {
        Self { cookies: jar.get_all().map(Cookie::from).collect() }
    }

    /// Builds a jar from the stored cookies.
    ///
    /// Host-only cookies are scoped to `default_url`. Expired cookies and
    /// cookies the jar rejects are left out.
    pub fn to_jar(&self, default_url: &str) -> Jar {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as f64)
            .unwrap_or_default();

        let jar = Jar::default();
        for cookie in &self.cookies {
            jar.add(cookie.to_set_cookie(now), cookie.origin(default_url));
        }

        debug!("Session jar holds {} of {} stored cookies", jar.len(), self.cookies.len());
        jar
    }

    /// Inserts or replaces a cookie with the same name, domain and path.
    pub fn upsert(&mut self, cookie: Cookie) {
        let existing = self.cookies.iter_mut().find(|c| {
            c.name == cookie.name && same_domain(&c.domain, &cookie.domain) && c.path == cookie.path
        });
        match existing {
            Some(existing) => *existing = cookie,
            None => self.cookies.push(cookie),
        }
    }

    /// First cookie with the given name.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

fn same_domain(a: &Option<String>, b: &Option<String>) -> bool {
    let canonical =
        |d: &Option<String>| d.as_deref().map(|d| d.trim_start_matches('.').to_ascii_lowercase());
    canonical(a) == canonical(b)
}

/// Default cookie file location under the user's data directory.
pub fn default_cookies_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("amz-shopper").join("cookies.json"))
}
