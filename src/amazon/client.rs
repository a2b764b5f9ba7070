//! HTTP client for Amazon pages using wreq for TLS fingerprint emulation.

use crate::amazon::regions::Region;
use crate::amazon::session::SessionStore;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::cookie::Jar;
use wreq::Client;
use wreq_util::Emulation;

/// Page fetching used by the commands - enables mocking for tests.
#[async_trait]
pub trait AmazonPages: Send + Sync {
    /// Fetches a search results page.
    async fn search(&self, query: &str, page: u32) -> Result<String>;

    /// Fetches a product detail page by ASIN.
    async fn product(&self, asin: &str) -> Result<String>;

    /// Fetches a customer review page (1-based) for an ASIN.
    async fn reviews(&self, asin: &str, page: u32) -> Result<String>;

    /// Fetches the storefront home page.
    async fn home(&self) -> Result<String>;

    /// Returns the configured region.
    fn region(&self) -> Region;

    /// Persists session cookies, if the client keeps any.
    fn persist_session(&self) -> Result<()> {
        Ok(())
    }
}

/// Amazon HTTP client with browser impersonation, delays and a cookie session.
pub struct AmazonClient {
    client: Client,
    region: Region,
    delay_ms: u64,
    delay_jitter_ms: u64,
    base_url: Option<String>,
    jar: Arc<Jar>,
    cookies_path: Option<PathBuf>,
}

impl AmazonClient {
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None).await
    }

    /// Creates a client with an optional custom base URL (for testing).
    pub async fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let session = match &config.cookies_path {
            Some(path) => SessionStore::load(path)?,
            None => SessionStore::new(),
        };
        let origin = format!("{}/", base_url.clone().unwrap_or_else(|| config.region.base_url()));
        let jar = Arc::new(session.to_jar(&origin));

        let mut builder = Client::builder()
            .cookie_provider(jar.clone())
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            region: config.region,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            base_url,
            jar,
            cookies_path: config.cookies_path.clone(),
        })
    }

    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| self.region.base_url())
    }

    /// Performs a GET request with delay and browser headers. Cookies go
    /// through the session jar.
    async fn get(&self, url: &str) -> Result<String> {
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", self.region.accept_language())
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Rate limited (503). Consider using a proxy or increasing delay.");
            anyhow::bail!("Rate limited by Amazon. Try increasing --delay or using a proxy.");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        let final_url = response.uri().to_string();
        if final_url.contains("/ap/signin") {
            warn!("Redirected to sign-in page. Import browser cookies with `amz-shopper session import`.");
        } else if !final_url.contains(self.region.domain()) && self.base_url.is_none() {
            warn!("Redirected to different domain: {}", final_url);
        }

        response.text().await.context("Failed to read response body")
    }

    /// Sleeps for the base delay plus random jitter.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }

    /// Number of cookies currently held by the session.
    pub fn cookie_count(&self) -> usize {
        self.jar.len()
    }
}

#[async_trait]
impl AmazonPages for AmazonClient {
    async fn search(&self, query: &str, page: u32) -> Result<String> {
        let url = format!("{}/s?k={}&page={}", self.base_url(), urlencoding::encode(query), page);

        info!("Searching: {} (page {})", query, page);
        self.get(&url).await
    }

    async fn product(&self, asin: &str) -> Result<String> {
        let url = format!("{}/dp/{}", self.base_url(), asin);

        info!("Fetching product: {}", asin);
        self.get(&url).await
    }

    async fn reviews(&self, asin: &str, page: u32) -> Result<String> {
        let url = format!(
            "{}/product-reviews/{}?reviewerType=all_reviews&pageNumber={}",
            self.base_url(),
            asin,
            page
        );

        info!("Fetching reviews: {} (page {})", asin, page);
        self.get(&url).await
    }

    async fn home(&self) -> Result<String> {
        let url = format!("{}/", self.base_url());
        self.get(&url).await
    }

    fn region(&self) -> Region {
        self.region
    }

    fn persist_session(&self) -> Result<()> {
        match &self.cookies_path {
            Some(path) => SessionStore::from_jar(&self.jar).save(path),
            None => {
                debug!("No cookie file configured, session not saved");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config { delay_ms: 0, delay_jitter_ms: 0, ..Config::default() }
    }

    async fn make_client(server: &MockServer, config: &Config) -> AmazonClient {
        AmazonClient::with_base_url(config, Some(server.uri())).await.unwrap()
    }

    #[tokio::test]
    async fn test_search_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/s"))
            .and(query_param("k", "usb hub"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server, &make_test_config()).await;
        let body = client.search("usb hub", 2).await.unwrap();
        assert!(body.contains("results"));
    }

    #[tokio::test]
    async fn test_reviews_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/product-reviews/B08N5WRWNW"))
            .and(query_param("pageNumber", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>reviews p3</html>"))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server, &make_test_config()).await;
        let body = client.reviews("B08N5WRWNW", 3).await.unwrap();
        assert!(body.contains("reviews p3"));
    }

    #[tokio::test]
    async fn test_product_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dp/B08N5WRWNW"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<span id=\"productTitle\">X</span>"))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server, &make_test_config()).await;
        assert!(client.product("B08N5WRWNW").await.unwrap().contains("productTitle"));
    }

    #[tokio::test]
    async fn test_rate_limited_503() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server, &make_test_config()).await;
        let err = client.search("test", 1).await.unwrap_err();
        assert!(err.to_string().contains("Rate limited"));
    }

    #[tokio::test]
    async fn test_http_error_404() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server, &make_test_config()).await;
        let err = client.product("INVALIDASN").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_set_cookie_is_sent_back() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session-id=abc123; Path=/")
                    .set_body_string("<html>home</html>"),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/dp/B001"))
            .and(header("cookie", "session-id=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("with cookie"))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server, &make_test_config()).await;
        client.home().await.unwrap();
        assert_eq!(client.cookie_count(), 1);

        let body = client.product("B001").await.unwrap();
        assert_eq!(body, "with cookie");
    }

    #[tokio::test]
    async fn test_loads_and_persists_cookie_file() {
        let dir = TempDir::new().unwrap();
        let cookies = dir.path().join("cookies.json");
        std::fs::write(&cookies, r#"[{"name":"at-main","value":"token"}]"#).unwrap();

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("cookie", "at-main=token"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "csm-hit=xyz; Path=/"),
            )
            .mount(&mock_server)
            .await;

        let mut config = make_test_config();
        config.cookies_path = Some(cookies.clone());

        let client = make_client(&mock_server, &config).await;
        client.home().await.unwrap();
        client.persist_session().unwrap();

        let saved = SessionStore::load(&cookies).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved.get("csm-hit").unwrap().value, "xyz");
    }

    #[tokio::test]
    async fn test_expired_set_cookie_is_forgotten() {
        let dir = TempDir::new().unwrap();
        let cookies = dir.path().join("cookies.json");

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "session-token=abc; Path=/"),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dp/B001"))
            .respond_with(ResponseTemplate::new(200).insert_header(
                "set-cookie",
                "session-token=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/",
            ))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/product-reviews/B001"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let mut config = make_test_config();
        config.cookies_path = Some(cookies.clone());

        let client = make_client(&mock_server, &config).await;
        client.home().await.unwrap();
        assert_eq!(client.cookie_count(), 1);

        client.product("B001").await.unwrap();
        client.reviews("B001", 1).await.unwrap();
        assert_eq!(client.cookie_count(), 0);

        let requests = mock_server.received_requests().await.unwrap();
        let last = requests.last().unwrap();
        assert!(last.headers.get("cookie").is_none());

        client.persist_session().unwrap();
        assert!(SessionStore::load(&cookies).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_domain_cookies_stay_on_their_storefront() {
        let dir = TempDir::new().unwrap();
        let cookies = dir.path().join("cookies.json");
        std::fs::write(
            &cookies,
            r#"[{"name":"x-main","value":"uk","domain":".amazon.co.uk","path":"/"},
                {"name":"at-main","value":"local","path":"/"}]"#,
        )
        .unwrap();

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let mut config = make_test_config();
        config.cookies_path = Some(cookies.clone());

        let client = make_client(&mock_server, &config).await;
        client.home().await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests[0].headers.get("cookie").unwrap(), "at-main=local");

        // The other storefront's cookie survives a save
        client.persist_session().unwrap();
        let saved = SessionStore::load(&cookies).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved.get("x-main").unwrap().domain.as_deref(), Some("amazon.co.uk"));
    }

    #[tokio::test]
    async fn test_persist_without_path_is_noop() {
        let client =
            AmazonClient::with_base_url(&make_test_config(), Some("http://localhost".to_string()))
                .await
                .unwrap();
        assert!(client.persist_session().is_ok());
        assert_eq!(client.region(), Region::Us);
    }

    #[tokio::test]
    async fn test_base_url_default() {
        let client = AmazonClient::new(&make_test_config()).await.unwrap();
        assert_eq!(client.base_url(), "https://www.amazon.com");
    }
}
