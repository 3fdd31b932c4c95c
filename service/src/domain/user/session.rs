//! [`Session`] definitions.

use std::time::Duration;

use derive_more::{AsRef, Debug};
use serde::{Deserialize, Serialize};

use crate::domain::User;

/// Authenticated session of a [`User`] issued by the remote API.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// [`AccessToken`] authorizing requests of this [`Session`].
    #[serde(rename = "token")]
    pub access_token: AccessToken,

    /// [`RefreshToken`] renewing this [`Session`].
    pub refresh_token: RefreshToken,

    /// [`User`] this [`Session`] belongs to.
    pub user: User,

    /// Number of seconds the [`AccessToken`] stays valid for.
    #[serde(rename = "expiresIn", default)]
    pub expires_in_secs: u64,
}

impl Session {
    /// Returns the [`Duration`] the [`AccessToken`] stays valid for.
    #[must_use]
    pub const fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expires_in_secs)
    }
}

/// Bearer token authorizing requests of a [`Session`].
#[derive(AsRef, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[as_ref(str)]
#[debug("AccessToken(***)")]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new [`AccessToken`] out of its raw representation.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

/// Token renewing an expired [`Session`].
#[derive(AsRef, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[as_ref(str)]
#[debug("RefreshToken(***)")]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Creates a new [`RefreshToken`] out of its raw representation.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::user::tests::user_json;

    use super::{AccessToken, Session};

    #[test]
    fn decodes_auth_response() {
        let session: Session = serde_json::from_value(json!({
            "user": user_json(),
            "token": "access-1",
            "refreshToken": "refresh-1",
            "expiresIn": 3600,
        }))
        .unwrap();

        assert_eq!(session.access_token, AccessToken::new("access-1"));
        assert_eq!(session.refresh_token.as_ref(), "refresh-1");
        assert_eq!(session.expires_in().as_secs(), 3600);
    }

    #[test]
    fn tokens_are_redacted_in_debug() {
        let token = AccessToken::new("very-secret");

        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
