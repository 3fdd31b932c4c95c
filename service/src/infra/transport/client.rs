//! [`reqwest`]-based [`Transport`] implementation.

use std::{sync::Arc, time::Duration};

use reqwest::header::CONTENT_TYPE;
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use super::{Error, Request, Response, Transport};

/// [`Client`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL every endpoint path is appended to.
    #[default("http://localhost:8080/api".into())]
    pub base_url: String,

    /// Timeout of a single request.
    #[default(Duration::from_secs(30))]
    pub timeout: Duration,
}

/// HTTP [`Transport`] talking to the remote API.
#[derive(Clone, Debug)]
pub struct Client {
    /// Underlying [`reqwest::Client`].
    inner: reqwest::Client,

    /// Base URL every endpoint path is appended to.
    base_url: Arc<str>,
}

impl Client {
    /// Creates a new [`Client`] with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the underlying HTTP client cannot be initialized.
    pub fn new(config: &Config) -> Result<Self, Traced<Error>> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!())?;
        Ok(Self {
            inner,
            base_url: config.base_url.trim_end_matches('/').into(),
        })
    }

    /// Returns the base URL of this [`Client`].
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport<Request> for Client {
    type Ok = Response;
    type Err = Traced<Error>;

    async fn execute(&self, req: Request) -> Result<Self::Ok, Self::Err> {
        let Request {
            method,
            path,
            query,
            body,
            bearer,
        } = req;

        let mut builder = self
            .inner
            .request(method.clone(), format!("{}{path}", self.base_url));
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }
        if let Some(token) = &bearer {
            builder = builder.bearer_auth(token.as_ref());
        }

        let resp = builder.send().await.map_err(|e| {
            log::debug!(%method, %path, "request failed: {e}");
            tracerr::new!(Error::from(e))
        })?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(tracerr::from_and_wrap!())?
            .to_vec();

        log::debug!(%method, %path, %status, "remote API responded");

        Ok(Response { status, body })
    }
}
