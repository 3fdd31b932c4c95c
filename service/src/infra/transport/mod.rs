//! [`Transport`]-related implementations.

#[cfg(feature = "reqwest")]
pub mod client;
pub mod endpoints;
#[cfg(test)]
pub(crate) mod fake;

use derive_more::{Display, Error as StdError, From};
pub use http::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::domain::user::session::AccessToken;

#[cfg(feature = "reqwest")]
pub use self::client::Client;
pub use self::endpoints::Endpoints;

/// Remote HTTP JSON API operation.
pub use common::Handler as Transport;

/// Request to the remote API.
#[derive(Clone, Debug)]
pub struct Request {
    /// HTTP [`Method`] of this [`Request`].
    pub method: Method,

    /// Path of the endpoint relative to the API base URL.
    pub path: String,

    /// URL query parameters.
    pub query: Vec<(String, String)>,

    /// JSON body.
    pub body: Option<serde_json::Value>,

    /// [`AccessToken`] authorizing this [`Request`].
    pub bearer: Option<AccessToken>,
}

impl Request {
    /// Creates a new [`Request`] to the provided endpoint `path`.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: vec![],
            body: None,
            bearer: None,
        }
    }

    /// Creates a new `GET` [`Request`].
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a new `POST` [`Request`].
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a new `PUT` [`Request`].
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Adds the provided URL query parameters.
    #[must_use]
    pub fn query(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.query.extend(params);
        self
    }

    /// Sets the JSON body.
    ///
    /// # Errors
    ///
    /// If the provided `body` cannot be represented as JSON.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Sets the [`AccessToken`] authorizing this [`Request`].
    #[must_use]
    pub fn bearer(mut self, token: Option<AccessToken>) -> Self {
        self.bearer = token;
        self
    }
}

/// Response of the remote API.
#[derive(Clone, Debug)]
pub struct Response {
    /// HTTP [`StatusCode`] of this [`Response`].
    pub status: StatusCode,

    /// Raw body of this [`Response`].
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a new [`Response`] with a JSON body.
    #[must_use]
    pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    /// Indicates whether this [`Response`] has a successful status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decodes the body of this [`Response`] as JSON.
    ///
    /// # Errors
    ///
    /// If the body is not a valid JSON representation of `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Decodes the `data` of the [`Envelope`] this [`Response`] carries.
    ///
    /// # Errors
    ///
    /// If the body is not a valid [`Envelope`] of `T`.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        self.decode::<Envelope<T>>().map(|e| e.data)
    }
}

/// Wrapper of every successful payload of the remote API.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    /// Indicator whether the operation succeeded.
    #[serde(default)]
    pub success: bool,

    /// Payload.
    pub data: T,

    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,

    /// Detailed error messages.
    #[serde(default)]
    pub errors: Vec<String>,

    /// Time the payload was produced at.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Unsuccessful [`Response`] of the remote API.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
#[display("{status}{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Failure {
    /// HTTP [`StatusCode`] of the [`Response`].
    pub status: StatusCode,

    /// Human-readable message provided by the remote API.
    pub message: Option<String>,

    /// Detailed error messages provided by the remote API.
    pub errors: Vec<String>,
}

impl From<&Response> for Failure {
    fn from(resp: &Response) -> Self {
        /// Body of a failed [`Response`].
        #[derive(Default, Deserialize)]
        struct Body {
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            errors: Vec<String>,
        }

        let Body { message, errors } = resp.decode().unwrap_or_default();
        Self {
            status: resp.status,
            message,
            errors,
        }
    }
}

/// [`Transport`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`reqwest`] error.
    #[cfg(feature = "reqwest")]
    #[display("HTTP request failed: {_0}")]
    Reqwest(reqwest::Error),

    /// Remote API cannot be reached.
    #[display("Remote API is unreachable: {_0}")]
    #[from(ignore)]
    Unreachable(#[error(not(source))] String),
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use serde_json::json;

    use super::{Failure, Response};

    #[test]
    fn unwraps_envelope() {
        let resp = Response::json(
            StatusCode::OK,
            &json!({
                "success": true,
                "data": [1, 2, 3],
                "timestamp": "2024-01-01T00:00:00Z",
            }),
        );

        assert_eq!(resp.data::<Vec<u8>>().unwrap(), [1, 2, 3]);
    }

    #[test]
    fn extracts_failure_details() {
        let resp = Response::json(
            StatusCode::UNPROCESSABLE_ENTITY,
            &json!({
                "success": false,
                "message": "Validation failed",
                "errors": ["phone is required"],
            }),
        );
        let failure = Failure::from(&resp);

        assert_eq!(failure.message.as_deref(), Some("Validation failed"));
        assert_eq!(failure.errors, ["phone is required"]);
        assert_eq!(
            failure.to_string(),
            "422 Unprocessable Entity: Validation failed",
        );

        let failure = Failure::from(&Response {
            status: StatusCode::BAD_GATEWAY,
            body: b"<html>".to_vec(),
        });
        assert_eq!(failure.message, None);
    }
}
