use crate::browser::{Browser, BrowserLauncher, BrowserPage};
use crate::config::{ScraperConfig, Viewport};
use crate::error::BrowserError;
use fantoccini::wd::{Capabilities, TimeoutConfiguration, WebDriverCompatibleCommand, WindowHandle};
use fantoccini::{Client, ClientBuilder};
use serde_json::{Value, json};
use std::time::Duration;

/// Extra time granted to the WebDriver server to report its own page-load timeout
const NAVIGATION_GRACE: Duration = Duration::from_secs(5);

/// Script timeout sent alongside the page-load timeout (the WebDriver default)
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Local endpoints tried when the configured WebDriver URL refuses the session
const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444",
];

/// Reads the HTTP status of the main document from the Navigation Timing API
const RESPONSE_STATUS_SCRIPT: &str = "\
    const entry = performance.getEntriesByType('navigation')[0];\
    return entry && entry.responseStatus ? entry.responseStatus : null;";

/// Starts headless Chrome sessions on a WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    webdriver_url: String,
    headless: bool,
    viewport: Viewport,
}

impl WebDriverLauncher {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless: true,
            viewport: Viewport::default(),
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
            viewport: config.viewport,
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Session capabilities: Chrome, eager page loads (DOM-ready), optional headless mode
    fn capabilities(&self) -> Capabilities {
        let mut args = vec![
            "--disable-gpu".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            format!("--window-size={},{}", self.viewport.width, self.viewport.height),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }

        let mut caps = Capabilities::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert("pageLoadStrategy".to_string(), json!("eager"));
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }
}

impl BrowserLauncher for WebDriverLauncher {
    type Browser = WebDriverBrowser;

    async fn launch(&self) -> Result<WebDriverBrowser, BrowserError> {
        let client = connect_to_webdriver(&self.webdriver_url, &self.capabilities()).await?;
        let main_window = client.window().await?;
        ::log::debug!("Browser session started via {}", self.webdriver_url);

        Ok(WebDriverBrowser {
            client,
            main_window,
        })
    }
}

/// Connects to the WebDriver instance, falling back to common local ports
async fn connect_to_webdriver(
    webdriver_url: &str,
    capabilities: &Capabilities,
) -> Result<Client, BrowserError> {
    let first_error = match new_session(webdriver_url, capabilities).await {
        Ok(client) => return Ok(client),
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = new_session(url, capabilities).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(BrowserError::Connect {
        url: webdriver_url.to_string(),
        reason: first_error.to_string(),
    })
}

async fn new_session(
    url: &str,
    capabilities: &Capabilities,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(url).await
}

/// One WebDriver session. Pages are tabs within it.
pub struct WebDriverBrowser {
    client: Client,
    main_window: WindowHandle,
}

impl Browser for WebDriverBrowser {
    type Page = WebDriverPage;

    async fn new_page(&self, user_agent: &str) -> Result<WebDriverPage, BrowserError> {
        let window = self.client.new_window(true).await?;

        // The tab exists from here on, so it is owned by a page before anything can fail
        let page = WebDriverPage {
            client: self.client.clone(),
            handle: window.handle,
            return_to: self.main_window.clone(),
        };

        if let Err(e) = page.client.switch_to_window(page.handle.clone()).await {
            page.discard().await;
            return Err(e.into());
        }

        // Chrome only; other drivers keep their default identity
        let command = SetUserAgentOverride {
            user_agent: user_agent.to_string(),
        };
        if let Err(e) = page.client.issue_cmd(command).await {
            ::log::warn!("Could not override user agent: {}", e);
        }

        Ok(page)
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.client.close().await?;
        Ok(())
    }
}

/// A tab in a [`WebDriverBrowser`]
pub struct WebDriverPage {
    client: Client,
    handle: WindowHandle,
    return_to: WindowHandle,
}

impl WebDriverPage {
    /// Best-effort teardown of a tab that never got focus: close it only if
    /// it can be focused, then return focus to the session's main window.
    async fn discard(self) {
        match self.client.switch_to_window(self.handle.clone()).await {
            Ok(()) => {
                if let Err(e) = self.client.close_window().await {
                    ::log::warn!("Failed to close abandoned tab: {}", e);
                }
            }
            Err(e) => ::log::warn!("Abandoned tab left open until the session ends: {}", e),
        }
        if let Err(e) = self.client.switch_to_window(self.return_to).await {
            ::log::warn!("Failed to return to the main window: {}", e);
        }
    }
}

impl BrowserPage for WebDriverPage {
    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), BrowserError> {
        self.client
            .set_window_size(viewport.width, viewport.height)
            .await?;
        Ok(())
    }

    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<Option<u16>, BrowserError> {
        self.client
            .update_timeouts(TimeoutConfiguration::new(
                Some(SCRIPT_TIMEOUT),
                Some(timeout),
                Some(Duration::ZERO),
            ))
            .await?;

        let deadline = timeout.saturating_add(NAVIGATION_GRACE);
        match tokio::time::timeout(deadline, self.client.goto(url)).await {
            Ok(navigation) => navigation?,
            Err(_) => return Err(BrowserError::Timeout(timeout)),
        }

        let status = self
            .client
            .execute(RESPONSE_STATUS_SCRIPT, Vec::new())
            .await?;
        Ok(status
            .as_u64()
            .filter(|code| *code > 0)
            .and_then(|code| u16::try_from(code).ok()))
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        Ok(self.client.source().await?)
    }

    async fn title(&mut self) -> Result<String, BrowserError> {
        Ok(self.client.title().await?)
    }

    async fn close(self) -> Result<(), BrowserError> {
        let closed = self.client.close_window().await;
        let switched = self.client.switch_to_window(self.return_to).await;
        closed?;
        switched?;
        Ok(())
    }
}

/// Chrome DevTools `Network.setUserAgentOverride`, issued through ChromeDriver's CDP bridge
#[derive(Debug)]
struct SetUserAgentOverride {
    user_agent: String,
}

impl WebDriverCompatibleCommand for SetUserAgentOverride {
    fn endpoint(
        &self,
        base_url: &url::Url,
        session_id: Option<&str>,
    ) -> Result<url::Url, url::ParseError> {
        let session_id = session_id.unwrap_or_default();
        base_url.join(&format!("session/{session_id}/goog/cdp/execute"))
    }

    fn method_and_body(&self, _request_url: &url::Url) -> (http::Method, Option<String>) {
        let body: Value = json!({
            "cmd": "Network.setUserAgentOverride",
            "params": { "userAgent": self.user_agent },
        });
        (http::Method::POST, Some(body.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_headless() {
        let launcher = WebDriverLauncher::new("http://localhost:4444");
        let caps = launcher.capabilities();

        assert_eq!(caps["pageLoadStrategy"], json!("eager"));
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--window-size=1920,1080")));
    }

    #[test]
    fn test_capabilities_headed() {
        let launcher = WebDriverLauncher::new("http://localhost:4444").with_headless(false);
        let caps = launcher.capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.contains(&json!("--headless=new")));
    }

    #[tokio::test]
    async fn test_failed_tab_switch_returns_to_main_window() {
        use mockito::Matcher;

        let mut server = mockito::Server::new_async().await;
        let _session = server
            .mock("POST", "/session")
            .with_header("content-type", "application/json")
            .with_body(json!({
                "value": { "sessionId": "s1", "capabilities": { "browserName": "chrome" } }
            }).to_string())
            .create_async()
            .await;
        let _current = server
            .mock("GET", "/session/s1/window")
            .with_header("content-type", "application/json")
            .with_body(json!({ "value": "main" }).to_string())
            .create_async()
            .await;
        let _new_tab = server
            .mock("POST", "/session/s1/window/new")
            .with_header("content-type", "application/json")
            .with_body(json!({
                "value": { "handle": "tab1", "type": "tab" }
            }).to_string())
            .create_async()
            .await;
        let _switch_to_tab = server
            .mock("POST", "/session/s1/window")
            .match_body(Matcher::PartialJson(json!({ "handle": "tab1" })))
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(json!({
                "value": { "error": "no such window", "message": "window gone", "stacktrace": "" }
            }).to_string())
            .create_async()
            .await;
        let switch_to_main = server
            .mock("POST", "/session/s1/window")
            .match_body(Matcher::PartialJson(json!({ "handle": "main" })))
            .with_header("content-type", "application/json")
            .with_body(json!({ "value": null }).to_string())
            .expect_at_least(1)
            .create_async()
            .await;
        let close_window = server
            .mock("DELETE", "/session/s1/window")
            .with_header("content-type", "application/json")
            .with_body(json!({ "value": ["main"] }).to_string())
            .expect(0)
            .create_async()
            .await;

        let browser = WebDriverLauncher::new(server.url()).launch().await.unwrap();
        let page = browser.new_page("Agent/1.0").await;

        assert!(page.is_err());
        switch_to_main.assert_async().await;
        // The focused window is still the main one, so nothing may be closed
        close_window.assert_async().await;
    }

    #[test]
    fn test_user_agent_command_endpoint() {
        let command = SetUserAgentOverride {
            user_agent: "Agent/1.0".to_string(),
        };
        let base = url::Url::parse("http://localhost:9515/").unwrap();
        let endpoint = command.endpoint(&base, Some("abc123")).unwrap();
        assert_eq!(
            endpoint.as_str(),
            "http://localhost:9515/session/abc123/goog/cdp/execute"
        );

        let (method, body) = command.method_and_body(&endpoint);
        assert_eq!(method, http::Method::POST);
        let body: Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(body["params"]["userAgent"], json!("Agent/1.0"));
    }
}
