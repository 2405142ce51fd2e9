//! Request dispatcher for the Motry site.
//!
//! This module provides:
//!
//! - `RequestSpec`: what to send (method, URL, query, body, busy flag)
//! - `Dispatcher`: sends one request and classifies it into an `Outcome`
//! - `BusyOverlay`: the shared, reference-counted busy indicator
//! - `CsrfSource`: anti-forgery token lookup (form field, then cookie)
//!
//! Every call makes a single attempt. Transport errors, non-2xx responses and
//! malformed bodies are all folded into `Outcome::Failure`, so callers never
//! handle an error from `send`.

mod csrf;
mod error;
mod outcome;
mod overlay;
mod request;

pub use csrf::CsrfSource;
pub use error::DispatchError;
pub use outcome::{Failure, Outcome, Payload};
pub use overlay::BusyOverlay;
pub use request::{FormData, RequestBody, RequestSpec};

use anyhow::{Context, Result};
use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderName};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::i18n::Messages;

/// User agent for site requests
const USER_AGENT: &str = concat!("Motry-Client/", env!("CARGO_PKG_VERSION"));

/// Sends requests on behalf of one page session
#[derive(Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    base_url: Url,
    csrf: CsrfSource,
    csrf_header: HeaderName,
    overlay: BusyOverlay,
    messages: &'static Messages,
}

impl Dispatcher {
    /// Create a dispatcher for the configured site.
    ///
    /// The session cookie from the configuration, if any, is seeded into the
    /// cookie jar so every request carries it.
    pub fn new(config: &Config, overlay: BusyOverlay) -> Result<Self> {
        let base_url = Url::parse(&config.site.base_url)
            .with_context(|| format!("Invalid site URL: {}", config.site.base_url))?;

        let jar = Arc::new(Jar::default());
        if let Some(cookies) = &config.site.session_cookie {
            for pair in cookies.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(&format!("{}; Path=/", pair), &base_url);
            }
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::clone(&jar));
        if config.client.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.client.request_timeout_secs));
        }
        let client = builder.build()?;

        let csrf = CsrfSource::new(&config.csrf.cookie_name, jar)?;
        let csrf_header = HeaderName::from_bytes(config.csrf.header_name.as_bytes())
            .with_context(|| format!("Invalid CSRF header name: {}", config.csrf.header_name))?;

        Ok(Self {
            client,
            base_url,
            csrf,
            csrf_header,
            overlay,
            messages: config.client.locale.messages(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn csrf(&self) -> &CsrfSource {
        &self.csrf
    }

    pub fn overlay(&self) -> &BusyOverlay {
        &self.overlay
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    /// Send one request and classify the result
    pub async fn send(&self, spec: &RequestSpec) -> Outcome {
        self.send_then(spec, || {}).await
    }

    /// Send one request, then run `on_complete` after the busy overlay has
    /// been released, whatever the outcome.
    pub async fn send_then<F: FnOnce()>(&self, spec: &RequestSpec, on_complete: F) -> Outcome {
        let outcome = {
            let _busy = spec.busy_indicator().then(|| self.overlay.acquire());
            match self.execute(spec).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    match &e {
                        DispatchError::Server { status, .. } => {
                            tracing::warn!("{} {} failed with {}", spec.method(), spec.url(), status)
                        }
                        other => tracing::error!("{} {} failed: {}", spec.method(), spec.url(), other),
                    }
                    Outcome::Failure(e.into_failure(self.messages))
                }
            }
        };
        on_complete();
        outcome
    }

    async fn execute(&self, spec: &RequestSpec) -> Result<Outcome, DispatchError> {
        let url = self.base_url.join(&spec.target())?;
        tracing::debug!("{} {}", spec.method(), url);

        let mut request = self
            .client
            .request(spec.method().clone(), url.clone())
            .header(ACCEPT, "application/json");

        if spec.requires_csrf() {
            match self.csrf.token(&url) {
                Some(token) => request = request.header(self.csrf_header.clone(), token),
                None => tracing::debug!("No CSRF token available for {}", url),
            }
        }

        request = match spec.body() {
            Some(RequestBody::Form(form)) => request.multipart(form.to_multipart()?),
            Some(RequestBody::Json(map)) => request.json(map),
            Some(RequestBody::Raw(body)) => request.body(body.clone()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        outcome::classify(
            status.as_u16(),
            status.canonical_reason(),
            &content_type,
            body,
            self.messages.request_failed,
        )
    }
}
