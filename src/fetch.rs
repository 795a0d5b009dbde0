use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::mode::ScrapeMode;
use crate::settings::Settings;

const USER_AGENT: &str = concat!("placement_tally/", env!("CARGO_PKG_VERSION"));
const SESSION_COOKIE: &str = "sessionid";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// Something that turns a URL into page HTML. One call per page, blocking.
pub trait PageSource: Send + Sync {
    fn fetch(&self, url: &str, mode: ScrapeMode) -> Result<String, FetchError>;
}

/// Forum client: plain GETs carrying the mode's session cookie.
pub struct ForumClient {
    client: Client,
    settings: Settings,
}

impl ForumClient {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;

        for mode in [ScrapeMode::Offers, ScrapeMode::Ppos] {
            if settings.session_for(mode).is_none() {
                warn!("No session id configured for {}; requests go out anonymously", mode);
            }
        }

        Ok(ForumClient {
            client,
            settings: settings.clone(),
        })
    }
}

impl PageSource for ForumClient {
    fn fetch(&self, url: &str, mode: ScrapeMode) -> Result<String, FetchError> {
        debug!(url, "GET");
        let mut request = self.client.get(url);
        if let Some(id) = self.settings.session_for(mode) {
            request = request.header(COOKIE, format!("{}={}", SESSION_COOKIE, id));
        }

        let request_err = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let response = request.send().map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().map_err(request_err)
    }
}


// ── Tests ──
