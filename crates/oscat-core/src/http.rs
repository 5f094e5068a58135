//! Blocking HTTP GET for listing pages and checksum manifests.
//!
//! Uses the curl crate (libcurl) with a connect timeout and a total timeout
//! so a stalled mirror cannot hang a crawl. Failures are reported once and
//! never retried.

use crate::config::HttpConfig;
use crate::error::FetchError;
use std::time::Duration;

/// Fetches a URL and returns its body as text.
///
/// The resolver, assembler and verifier only depend on this trait, which keeps
/// them testable without a network.
pub trait Fetch {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Production [`Fetch`] backed by a fresh libcurl easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: String,
}

impl CurlFetcher {
    pub fn new(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }

    /// Overrides the total timeout (connect timeout is capped to it).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = self.connect_timeout.min(timeout);
        self
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}

/// Stable request headers sent with every GET.
pub(crate) fn default_headers(user_agent: &str) -> Result<curl::easy::List, curl::Error> {
    let mut list = curl::easy::List::new();
    list.append(&format!("User-Agent: {}", user_agent))?;
    list.append("Accept: text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.8")?;
    Ok(list)
}

impl Fetch for CurlFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let curl_err = |source: curl::Error| FetchError::Curl {
            url: url.to_string(),
            source,
        };

        let mut body: Vec<u8> = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(10).map_err(curl_err)?;
        easy.accept_encoding("").map_err(curl_err)?;
        easy.connect_timeout(self.connect_timeout).map_err(curl_err)?;
        easy.timeout(self.timeout).map_err(curl_err)?;
        easy.http_headers(default_headers(&self.user_agent).map_err(curl_err)?)
            .map_err(curl_err)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            transfer.perform().map_err(curl_err)?;
        }

        let status = easy.response_code().map_err(curl_err)?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        tracing::debug!(url, bytes = body.len(), "fetched");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
