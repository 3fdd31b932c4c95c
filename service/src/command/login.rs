//! [`Command`] for logging in.

use derive_more::{Display, Error, From};
use http::StatusCode;
use secrecy::ExposeSecret as _;
use serde_json::json;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{user::Credentials, Session},
    infra::{
        storage,
        transport::{self, Failure, Request, Response},
        Storage, Transport,
    },
    Service,
};

use super::Command;

/// [`Command`] for establishing a new [`Session`] with the provided
/// [`Credentials`].
///
/// The established [`Session`] is persisted.
#[derive(Clone, Debug, From)]
pub struct Login(pub Credentials);

impl<St, Tr> Command<Login> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Login(credentials): Login,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let _busy = self.auth().busy();

        let Credentials {
            username,
            password,
            remember_me,
        } = credentials;
        let req = Request::post(&self.config().endpoints.auth.login)
            .json(&json!({
                "username": username,
                "password": password.expose_secret().as_ref(),
                "rememberMe": remember_me,
            }))
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let resp = self
            .transport()
            .execute(req)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        match resp.status {
            StatusCode::UNAUTHORIZED => {
                return Err(tracerr::new!(E::InvalidCredentials));
            }
            s if !s.is_success() => {
                return Err(tracerr::new!(E::Rejected(Failure::from(&resp))));
            }
            _ => {}
        }

        let session = resp
            .data::<Session>()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let batch = super::store_session(&session)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let _lock = self.persistence.lock().await;
        self.persist(batch)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        _ = self.auth().establish(session.clone());
        log::info!(user = %session.user.username, "logged in");

        Ok(session)
    }
}

/// Error of [`Login`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Remote API rejected the provided [`Credentials`].
    #[display("Invalid credentials")]
    #[from(ignore)]
    InvalidCredentials,

    /// Remote API refused to establish a [`Session`] for another reason.
    #[display("Login rejected: {_0}")]
    #[from(ignore)]
    Rejected(Failure),

    /// Remote API cannot be reached.
    #[display("`Transport` operation failed: {_0}")]
    Network(transport::Error),

    /// [`Session`] cannot be (de)serialized.
    #[display("Malformed `Session`: {_0}")]
    Json(serde_json::Error),

    /// [`Session`] cannot be persisted.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}

#[cfg(test)]
mod tests {
    use crate::{
        command::tests::{credentials, service},
        infra::{storage::Key, transport::fake::PASSWORD},
    };

    use super::{Command as _, ExecutionError, Login};

    #[tokio::test(start_paused = true)]
    async fn establishes_and_persists_session() {
        let svc = service();

        let session = svc.execute(Login(credentials(PASSWORD))).await.unwrap();

        assert_eq!(session.access_token.as_ref(), "access-1");
        assert!(svc.auth().is_authenticated());
        assert_eq!(svc.auth().full_name().as_deref(), Some("John Doe"));
        assert!(!svc.auth().is_busy());

        let stored = svc.storage().snapshot();
        assert_eq!(stored[&Key::AccessToken], "access-1");
        assert_eq!(stored[&Key::RefreshToken], "refresh-1");
        assert!(stored[&Key::User].contains("\"firstName\":\"John\""));

        let sent = &svc.transport().calls_to("/auth/login")[0];
        assert!(sent.bearer.is_none());
        assert_eq!(sent.body.as_ref().unwrap()["username"], "jdoe");
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_wrong_password() {
        let svc = service();

        let err = svc
            .execute(Login(credentials("wrong-password")))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::InvalidCredentials));
        assert!(!svc.auth().is_authenticated());
        assert!(!svc.auth().is_busy());
        assert!(svc.storage().snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reports_unreachable_api() {
        let svc = service();
        svc.transport().set_offline(true);

        let err = svc.execute(Login(credentials(PASSWORD))).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Network(_)));
        assert!(!svc.auth().is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn busy_while_in_flight() {
        let svc = service();

        let (res, busy) = tokio::join!(
            svc.execute(Login(credentials(PASSWORD))),
            async { svc.auth().is_busy() },
        );

        assert!(res.is_ok());
        assert!(busy);
        assert!(!svc.auth().is_busy());
    }
}
