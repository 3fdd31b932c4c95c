//! [`Command`] for renewing the current [`Session`].

use derive_more::{Display, Error, From};
use serde_json::json;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Session,
    infra::{
        storage,
        transport::{self, Failure, Request, Response},
        Storage, Transport,
    },
    Service,
};

use super::Command;

/// [`Command`] for renewing the current [`Session`] with its refresh token.
///
/// If the remote API rejects the refresh token, the [`Session`] is ended.
/// A [`Session`] ended while renewing is never renewed.
#[derive(Clone, Copy, Debug)]
pub struct RefreshSession;

impl<St, Tr> Command<RefreshSession> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: RefreshSession) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let epoch = self.auth().epoch();
        let token = self
            .auth()
            .refresh_token()
            .ok_or_else(|| tracerr::new!(E::NoRefreshToken))?;

        let req = Request::post(&self.config().endpoints.auth.refresh)
            .json(&json!({ "refreshToken": token.as_ref() }))
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let resp = self
            .transport()
            .execute(req)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if !resp.is_success() {
            let failure = Failure::from(&resp);
            let _lock = self.persistence.lock().await;
            if self.auth().clear_within(epoch) {
                log::info!("`Session` ended: refresh rejected with {failure}");
                if let Err(e) = self.persist(super::remove_session()).await {
                    log::error!("failed to remove persisted `Session`: {e}");
                }
            }
            return Err(tracerr::new!(E::Rejected(failure)));
        }

        let session = resp
            .data::<Session>()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let batch = super::store_session(&session)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let _lock = self.persistence.lock().await;
        if !self.auth().renew(epoch, session.clone()) {
            return Err(tracerr::new!(E::Superseded));
        }
        if let Err(e) = self.persist(batch).await {
            log::error!("failed to persist renewed `Session`: {e}");
        }
        log::debug!("`Session` renewed");

        Ok(session)
    }
}

/// Error of [`RefreshSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// There is no refresh token to renew a [`Session`] with.
    #[display("No refresh token")]
    #[from(ignore)]
    NoRefreshToken,

    /// Remote API rejected the refresh token.
    #[display("Refresh rejected: {_0}")]
    #[from(ignore)]
    Rejected(Failure),

    /// Remote API cannot be reached.
    #[display("`Transport` operation failed: {_0}")]
    Network(transport::Error),

    /// Remote API responded with a malformed [`Session`].
    #[display("Malformed `Session`: {_0}")]
    Json(serde_json::Error),

    /// [`Session`] has been ended while renewing.
    #[display("`Session` ended while renewing")]
    #[from(ignore)]
    Superseded,
}

#[cfg(test)]
mod tests {
    use crate::{
        command::{
            tests::{logged_in, service},
            Logout,
        },
        infra::{storage::Key, transport::fake::Refresh},
        store::auth::tests::session,
    };

    use super::{Command as _, ExecutionError, RefreshSession};

    #[tokio::test(start_paused = true)]
    async fn replaces_session_wholesale() {
        let svc = logged_in().await;

        let session = svc.execute(RefreshSession).await.unwrap();

        assert_eq!(session.refresh_token.as_ref(), "refresh-2");
        assert_eq!(svc.auth().refresh_token().unwrap().as_ref(), "refresh-2");
        let stored = svc.storage().snapshot();
        assert_eq!(stored[&Key::AccessToken], "access-2");
        assert_eq!(stored[&Key::RefreshToken], "refresh-2");
    }

    #[tokio::test(start_paused = true)]
    async fn fails_without_refresh_token() {
        let svc = service();
        let err = svc.execute(RefreshSession).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NoRefreshToken));

        _ = svc.auth().establish(session("access-1", ""));
        let err = svc.execute(RefreshSession).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NoRefreshToken));
        assert_eq!(svc.transport().refresh_calls(), 0);
        assert!(svc.auth().is_authenticated());
        assert_eq!(
            svc.auth().session().unwrap().access_token.as_ref(),
            "access-1",
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_ends_session() {
        let svc = logged_in().await;
        svc.transport().set_refresh(Refresh::Reject);

        let err = svc.execute(RefreshSession).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Rejected(_)));
        assert!(!svc.auth().is_authenticated());
        assert!(svc.storage().snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn logout_while_renewing_wins() {
        let svc = logged_in().await;

        let (refreshed, ()) = tokio::join!(svc.execute(RefreshSession), async {
            tokio::task::yield_now().await;
            _ = svc.execute(Logout::local()).await;
        });

        assert!(matches!(
            refreshed.unwrap_err().as_ref(),
            ExecutionError::Superseded,
        ));
        assert!(!svc.auth().is_authenticated());
        assert!(svc.storage().snapshot().is_empty());
    }
}
