//! [`Command`] for sending a [`Request`] on behalf of the current [`Session`].

use derive_more::{Display, Error, From};
use http::StatusCode;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Session;
use crate::{
    domain::user::session::AccessToken,
    infra::{
        storage,
        transport::{self, Failure, Request, Response},
        Storage, Transport,
    },
    Service,
};

use super::{refresh_session, Command, RefreshSession};

/// [`Command`] for sending a [`Request`] to the remote API on behalf of the
/// current [`Session`].
///
/// The [`AccessToken`] of the [`Session`] is attached to the [`Request`],
/// unless it targets an exempt endpoint. A rejected [`AccessToken`] is
/// renewed once with a [`RefreshSession`] shared by all the concurrently
/// rejected [`Request`]s, which are re-sent then. If renewing fails, the
/// [`Session`] is ended, unless it has been replaced meanwhile.
#[derive(Clone, Debug, From)]
pub struct SendRequest(pub Request);

impl<St, Tr> Command<SendRequest> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    type Ok = Response;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        SendRequest(req): SendRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        if self.config().endpoints.is_exempt(&req.path) {
            let resp = self
                .transport()
                .execute(req)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            return classify(resp).map_err(tracerr::wrap!());
        }

        let sent = self.auth().access_token();
        let resp = self
            .transport()
            .execute(req.clone().bearer(sent.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if resp.status != StatusCode::UNAUTHORIZED {
            return classify(resp).map_err(tracerr::wrap!());
        }

        let renewed = match self.auth().access_token() {
            // Renewed meanwhile by someone else.
            Some(current) if sent.as_ref() != Some(&current) => Some(current),
            Some(_) | None => {
                self.refresh.run(|| self.renew_or_logout()).await.flatten()
            }
        };
        let Some(token) = renewed else {
            log::debug!("`{} {}` stays unauthorized", req.method, req.path);
            return Err(tracerr::new!(E::Unauthorized(Failure::from(&resp))));
        };

        let resp = self
            .transport()
            .execute(req.bearer(Some(token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        classify(resp).map_err(tracerr::wrap!())
    }
}

impl<St, Tr> Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    /// Renews the current [`Session`], or ends it if renewing fails.
    ///
    /// A [`Session`] established while renewing is never ended.
    ///
    /// Returns the renewed [`AccessToken`], if any.
    async fn renew_or_logout(&self) -> Option<AccessToken> {
        let epoch = self.auth().epoch();
        let err = match self.execute(RefreshSession).await {
            Ok(session) => return Some(session.access_token),
            Err(e) => e,
        };
        if matches!(err.as_ref(), refresh_session::ExecutionError::Superseded) {
            log::debug!("`Session` changed while renewing: {err}");
            return None;
        }

        log::warn!("failed to renew `Session`: {err}");
        let _lock = self.persistence.lock().await;
        if self.auth().clear_within(epoch) {
            log::info!("`Session` ended");
            if let Err(e) = self.persist(super::remove_session()).await {
                log::error!("failed to remove persisted `Session`: {e}");
            }
        }
        None
    }
}

/// Classifies the provided [`Response`] by its status.
fn classify(resp: Response) -> Result<Response, ExecutionError> {
    use ExecutionError as E;

    if resp.is_success() {
        return Ok(resp);
    }
    let failure = Failure::from(&resp);
    Err(match resp.status {
        StatusCode::UNAUTHORIZED => E::Unauthorized(failure),
        StatusCode::FORBIDDEN => E::Forbidden(failure),
        StatusCode::NOT_FOUND => E::NotFound(failure),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            E::Validation(failure)
        }
        s if s.is_server_error() => E::Server(failure),
        _ => E::Unexpected(failure),
    })
}

/// Error of [`SendRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Remote API cannot be reached.
    #[display("`Transport` operation failed: {_0}")]
    Network(transport::Error),

    /// Remote API rejected the credentials of the [`Request`].
    #[display("Unauthorized: {_0}")]
    #[from(ignore)]
    Unauthorized(Failure),

    /// Current [`Session`] lacks rights for the [`Request`].
    #[display("Forbidden: {_0}")]
    #[from(ignore)]
    Forbidden(Failure),

    /// Requested resource does not exist.
    #[display("Not found: {_0}")]
    #[from(ignore)]
    NotFound(Failure),

    /// Remote API rejected the payload of the [`Request`].
    #[display("Validation failed: {_0}")]
    #[from(ignore)]
    Validation(Failure),

    /// Remote API failed to process the [`Request`].
    #[display("Server failed: {_0}")]
    #[from(ignore)]
    Server(Failure),

    /// Remote API responded with an unexpected status.
    #[display("Unexpected response: {_0}")]
    #[from(ignore)]
    Unexpected(Failure),
}

impl ExecutionError {
    /// Returns the [`Failure`] reported by the remote API, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Network(_) => None,
            Self::Unauthorized(f)
            | Self::Forbidden(f)
            | Self::NotFound(f)
            | Self::Validation(f)
            | Self::Server(f)
            | Self::Unexpected(f) => Some(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future;
    use http::{Method, StatusCode};
    use serde_json::json;

    use crate::{
        command::{
            tests::{credentials, logged_in},
            Login, Logout,
        },
        infra::{
            storage::Key,
            transport::{
                fake::{Refresh, PASSWORD},
                Request,
            },
        },
    };

    use super::{Command as _, ExecutionError, SendRequest};

    #[tokio::test(start_paused = true)]
    async fn attaches_access_token() {
        let svc = logged_in().await;
        svc.transport().respond(
            Method::GET,
            "/patients",
            StatusCode::OK,
            json!({ "success": true, "data": [] }),
        );

        let resp = svc
            .execute(SendRequest(Request::get("/patients")))
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        let sent = svc.transport().calls_to("/patients");
        assert_eq!(sent[0].bearer.as_ref().unwrap().as_ref(), "access-1");
        assert_eq!(svc.transport().refresh_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn exempt_endpoints_go_without_token() {
        let svc = logged_in().await;

        let resp = svc
            .execute(SendRequest(Request::post("/auth/refresh")))
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        let sent = svc.transport().calls_to("/auth/refresh");
        assert!(sent[0].bearer.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_rejections_share_single_refresh() {
        let svc = logged_in().await;
        svc.transport().respond(
            Method::GET,
            "/appointments",
            StatusCode::OK,
            json!({ "success": true, "data": [] }),
        );
        svc.transport().expire_token();

        let results = future::join_all((0..5).map(|_| {
            svc.execute(SendRequest(Request::get("/appointments")))
        }))
        .await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(svc.transport().refresh_calls(), 1);
        assert_eq!(svc.auth().access_token().unwrap().as_ref(), "access-2");
        assert_eq!(
            svc.storage().snapshot().get(&Key::AccessToken).unwrap(),
            "access-2",
        );

        let retried = svc
            .transport()
            .calls_to("/appointments")
            .into_iter()
            .filter(|r| r.bearer.as_ref().is_some_and(|t| t.as_ref() == "access-2"))
            .count();
        assert_eq!(retried, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_fails_all_and_ends_session() {
        let svc = logged_in().await;
        svc.transport().expire_token();
        svc.transport().set_refresh(Refresh::Reject);

        let results = future::join_all((0..5).map(|_| {
            svc.execute(SendRequest(Request::get("/patients")))
        }))
        .await;

        for res in results {
            let err = res.unwrap_err();
            assert!(
                matches!(err.as_ref(), ExecutionError::Unauthorized(_)),
                "unexpected error: {err}",
            );
        }
        assert_eq!(svc.transport().refresh_calls(), 1);
        assert!(!svc.auth().is_authenticated());
        assert!(svc.storage().snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn classifies_failures() {
        let svc = logged_in().await;
        for (status, path) in [
            (StatusCode::NOT_FOUND, "/patients/404"),
            (StatusCode::UNPROCESSABLE_ENTITY, "/patients/422"),
            (StatusCode::SERVICE_UNAVAILABLE, "/patients/503"),
            (StatusCode::FORBIDDEN, "/patients/403"),
        ] {
            svc.transport().respond(
                Method::GET,
                path,
                status,
                json!({ "success": false, "message": "nope", "errors": ["x"] }),
            );
        }

        let svc = &svc;
        let classify = |path: &'static str| async move {
            svc.execute(SendRequest(Request::get(path)))
                .await
                .unwrap_err()
                .into_inner()
        };
        assert!(matches!(
            classify("/patients/404").await,
            ExecutionError::NotFound(_),
        ));
        let validation = classify("/patients/422").await;
        assert!(matches!(validation, ExecutionError::Validation(_)));
        assert_eq!(validation.failure().unwrap().errors, ["x"]);
        assert!(matches!(
            classify("/patients/503").await,
            ExecutionError::Server(_),
        ));
        assert!(matches!(
            classify("/patients/403").await,
            ExecutionError::Forbidden(_),
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn network_failures_propagate() {
        let svc = logged_in().await;
        svc.transport().set_offline(true);

        let err = svc
            .execute(SendRequest(Request::get("/patients")))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Network(_)));
        assert!(svc.auth().is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_refresh_keeps_newer_session() {
        for outcome in [Refresh::Reject, Refresh::Succeed] {
            let svc = logged_in().await;
            svc.transport().expire_token();
            svc.transport().set_refresh(outcome);
            svc.transport().set_refresh_delay(Duration::from_millis(50));

            let (res, ()) = tokio::join!(
                svc.execute(SendRequest(Request::get("/patients"))),
                async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    svc.execute(Logout::local()).await.unwrap();
                    _ = svc.execute(Login(credentials(PASSWORD))).await.unwrap();
                },
            );

            assert!(
                matches!(res.unwrap_err().as_ref(), ExecutionError::Unauthorized(_)),
                "{outcome:?}",
            );
            assert_eq!(svc.transport().refresh_calls(), 1);
            assert!(svc.auth().is_authenticated(), "{outcome:?}");
            assert_eq!(
                svc.storage().snapshot().get(&Key::AccessToken).unwrap(),
                "access-2",
                "{outcome:?}",
            );
        }
    }
}
