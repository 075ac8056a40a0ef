//! In-memory browser with scripted per-URL responses.

use crate::browser::{Browser, BrowserLauncher, BrowserPage};
use crate::config::Viewport;
use crate::error::BrowserError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub enum FakeResponse {
    Page {
        status: u16,
        title: String,
        html: String,
    },
    NoResponse,
    Timeout,
    Error(String),
    Panic,
}

impl FakeResponse {
    pub fn ok(title: &str, body: &str) -> Self {
        FakeResponse::Page {
            status: 200,
            title: title.to_string(),
            html: format!(
                "<html><head><title>{title}</title></head><body><nav>Menu</nav><p>{body}</p></body></html>"
            ),
        }
    }

    pub fn status(status: u16) -> Self {
        FakeResponse::Page {
            status,
            title: "Error".to_string(),
            html: "<html><body><p>Not here</p></body></html>".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub launches: usize,
    pub browser_closed: usize,
    pub pages_opened: usize,
    pub pages_closed: usize,
    pub visited: Vec<String>,
    pub user_agents: Vec<String>,
    pub viewports: Vec<Viewport>,
}

#[derive(Clone, Default)]
struct Behaviour {
    responses: HashMap<String, FakeResponse>,
    fail_launch: bool,
    fail_new_page: bool,
    fail_page_close: bool,
    fail_browser_close: bool,
    cancel_on: Option<(String, CancellationToken)>,
}

#[derive(Clone, Default)]
pub struct FakeLauncher {
    behaviour: Arc<Behaviour>,
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    fn behaviour_mut(&mut self) -> &mut Behaviour {
        Arc::make_mut(&mut self.behaviour)
    }

    pub fn respond(mut self, url: &str, response: FakeResponse) -> Self {
        self.behaviour_mut()
            .responses
            .insert(url.to_string(), response);
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.behaviour_mut().fail_launch = true;
        self
    }

    pub fn failing_new_page(mut self) -> Self {
        self.behaviour_mut().fail_new_page = true;
        self
    }

    pub fn failing_page_close(mut self) -> Self {
        self.behaviour_mut().fail_page_close = true;
        self
    }

    pub fn failing_browser_close(mut self) -> Self {
        self.behaviour_mut().fail_browser_close = true;
        self
    }

    /// Cancel `token` while `url` is being fetched
    pub fn cancel_on(mut self, url: &str, token: CancellationToken) -> Self {
        self.behaviour_mut().cancel_on = Some((url.to_string(), token));
        self
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Open a browser directly, for fetcher tests
    pub fn browser(&self) -> FakeBrowser {
        self.state().launches += 1;
        FakeBrowser {
            behaviour: Arc::clone(&self.behaviour),
            state: Arc::clone(&self.state),
        }
    }
}

impl BrowserLauncher for FakeLauncher {
    type Browser = FakeBrowser;

    async fn launch(&self) -> Result<FakeBrowser, BrowserError> {
        if self.behaviour.fail_launch {
            return Err(BrowserError::Connect {
                url: "http://localhost:4444".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(self.browser())
    }
}

pub struct FakeBrowser {
    behaviour: Arc<Behaviour>,
    state: Arc<Mutex<FakeState>>,
}

impl Browser for FakeBrowser {
    type Page = FakePage;

    async fn new_page(&self, user_agent: &str) -> Result<FakePage, BrowserError> {
        if self.behaviour.fail_new_page {
            return Err(BrowserError::Other("session deleted".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.pages_opened += 1;
        state.user_agents.push(user_agent.to_string());
        Ok(FakePage {
            behaviour: Arc::clone(&self.behaviour),
            state: Arc::clone(&self.state),
            current: None,
        })
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.state.lock().unwrap().browser_closed += 1;
        if self.behaviour.fail_browser_close {
            return Err(BrowserError::Other("browser already gone".to_string()));
        }
        Ok(())
    }
}

pub struct FakePage {
    behaviour: Arc<Behaviour>,
    state: Arc<Mutex<FakeState>>,
    current: Option<(String, String)>,
}

impl BrowserPage for FakePage {
    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), BrowserError> {
        self.state.lock().unwrap().viewports.push(viewport);
        Ok(())
    }

    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<Option<u16>, BrowserError> {
        self.state.lock().unwrap().visited.push(url.to_string());

        if let Some((cancel_url, token)) = &self.behaviour.cancel_on {
            if cancel_url == url {
                token.cancel();
            }
        }

        let response = self
            .behaviour
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| FakeResponse::Error("net::ERR_NAME_NOT_RESOLVED".to_string()));

        match response {
            FakeResponse::Page { status, title, html } => {
                self.current = Some((title, html));
                Ok(Some(status))
            }
            FakeResponse::NoResponse => Ok(None),
            FakeResponse::Timeout => {
                tokio::time::sleep(timeout).await;
                Err(BrowserError::Timeout(timeout))
            }
            FakeResponse::Error(message) => Err(BrowserError::Other(message)),
            FakeResponse::Panic => panic!("renderer crashed"),
        }
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.current
            .as_ref()
            .map(|(_, html)| html.clone())
            .ok_or_else(|| BrowserError::Other("no document".to_string()))
    }

    async fn title(&mut self) -> Result<String, BrowserError> {
        self.current
            .as_ref()
            .map(|(title, _)| title.clone())
            .ok_or_else(|| BrowserError::Other("no document".to_string()))
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.state.lock().unwrap().pages_closed += 1;
        if self.behaviour.fail_page_close {
            return Err(BrowserError::Other("target closed".to_string()));
        }
        Ok(())
    }
}
