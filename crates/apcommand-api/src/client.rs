// AP web-admin HTTP client
//
// Wraps `reqwest::Client` with page-relative URL construction, HTTP basic
// auth, status mapping and the bounded retry of transient failures. The
// page to address is client state set through `FormTransport::set_path`.

use std::sync::RwLock;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::form::{FieldPayload, FormTransport};
use crate::transport::TransportConfig;

/// Raw HTTP client for a Broadcom AP's `.asp` admin pages.
///
/// Every request carries basic auth. Transient failures (timeouts,
/// refused connections, 502-504) are retried `retries` times before the
/// error reaches the caller.
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    path: RwLock<String>,
    config: TransportConfig,
}

impl HttpClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the AP root (e.g. `http://192.168.1.1`).
    pub fn new(
        base_url: Url,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            base_url,
            username,
            password,
            transport.clone(),
        ))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: String,
        password: SecretString,
        config: TransportConfig,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            password,
            path: RwLock::new(String::new()),
            config,
        }
    }

    /// The AP base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Full URL of the current page: `{base}/{path}`.
    pub(crate) fn page_url(&self) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = self.path();
        let full = format!("{base}/{}", path.trim_start_matches('/'));
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn send_once(&self, data: Option<&FieldPayload>) -> Result<String, Error> {
        let url = self.page_url()?;
        let builder = match data {
            Some(form) => {
                debug!(%url, %form, "POST");
                self.http.post(url).form(form)
            }
            None => {
                debug!(%url, "GET");
                self.http.get(url)
            }
        };

        let resp = builder
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        self.read_body(resp).await
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Map the status line, returning the body on success.
    async fn read_body(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "AP rejected the username/password".into(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;
        trace!(bytes = body.len(), "response body received");
        Ok(body)
    }
}

#[async_trait]
impl FormTransport for HttpClient {
    fn set_path(&self, path: &str) {
        debug!(path, "setting connection path");
        *self.path.write().expect("path lock poisoned") = path.to_owned();
    }

    fn path(&self) -> String {
        self.path.read().expect("path lock poisoned").clone()
    }

    async fn submit(&self, data: Option<&FieldPayload>) -> Result<String, Error> {
        let mut attempt = 0;
        loop {
            match self.send_once(data).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.config.retries => {
                    attempt += 1;
                    let pause = self.config.backoff(attempt);
                    warn!(error = %e, attempt, ?pause, "transient AP error, retrying");
                    tokio::time::sleep(pause).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
