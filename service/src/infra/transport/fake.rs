//! Scripted in-memory [`Transport`] imitating the remote API.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use http::{Method, StatusCode};
use serde_json::{json, Value};
use tracerr::Traced;

use crate::domain::user::tests::user_json;

use super::{Error, Request, Response, Transport};

/// Password the [`Fake`] API accepts.
pub(crate) const PASSWORD: &str = "secret123";

/// Outcome of a token refresh on the [`Fake`] API.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Refresh {
    /// New tokens are issued.
    Succeed,

    /// The refresh token is rejected.
    Reject,
}

/// State of the [`Fake`] API.
#[derive(Debug)]
struct State {
    /// Access token the API currently accepts.
    valid_token: Option<String>,

    /// Number of sessions issued so far.
    issued: usize,

    /// Outcome of the next token refresh.
    refresh: Refresh,

    /// Indicator whether the API is unreachable.
    offline: bool,

    /// Number of token refreshes requested.
    refresh_calls: usize,

    /// Additional delay before answering a token refresh.
    refresh_delay: Duration,

    /// All the received [`Request`]s.
    calls: Vec<Request>,

    /// Scripted responses of protected endpoints.
    routes: HashMap<(Method, String), (StatusCode, Value)>,
}

/// Scripted in-memory [`Transport`] imitating the remote API.
///
/// Every request is answered after the configured delay.
#[derive(Clone, Debug)]
pub(crate) struct Fake {
    /// Shared [`State`].
    state: Arc<Mutex<State>>,

    /// Delay before answering a request.
    delay: Duration,
}

impl Fake {
    /// Creates a new [`Fake`] API accepting the [`PASSWORD`].
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                valid_token: None,
                issued: 0,
                refresh: Refresh::Succeed,
                offline: false,
                refresh_calls: 0,
                refresh_delay: Duration::ZERO,
                calls: vec![],
                routes: HashMap::new(),
            })),
            delay: Duration::from_millis(10),
        }
    }

    /// Scripts the response of a protected endpoint.
    pub(crate) fn respond(
        &self,
        method: Method,
        path: &str,
        status: StatusCode,
        body: Value,
    ) {
        drop(
            self.state
                .lock()
                .unwrap()
                .routes
                .insert((method, path.into()), (status, body)),
        );
    }

    /// Invalidates the currently accepted access token.
    pub(crate) fn expire_token(&self) {
        self.state.lock().unwrap().valid_token = None;
    }

    /// Sets the outcome of the next token refreshes.
    pub(crate) fn set_refresh(&self, refresh: Refresh) {
        self.state.lock().unwrap().refresh = refresh;
    }

    /// Slows down answering token refreshes by the provided `delay`.
    pub(crate) fn set_refresh_delay(&self, delay: Duration) {
        self.state.lock().unwrap().refresh_delay = delay;
    }

    /// Makes the API (un)reachable.
    pub(crate) fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Returns the number of token refreshes requested so far.
    pub(crate) fn refresh_calls(&self) -> usize {
        self.state.lock().unwrap().refresh_calls
    }

    /// Returns all the received [`Request`]s to the provided `path`.
    pub(crate) fn calls_to(&self, path: &str) -> Vec<Request> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Returns a new session envelope, making its token the accepted one.
    fn issue_session(state: &mut State) -> Value {
        state.issued += 1;
        let n = state.issued;
        let token = format!("access-{n}");
        state.valid_token = Some(token.clone());
        json!({
            "success": true,
            "data": {
                "user": user_json(),
                "token": token,
                "refreshToken": format!("refresh-{n}"),
                "expiresIn": 3600,
            },
            "timestamp": "2024-01-01T00:00:00Z",
        })
    }
}

impl Transport<Request> for Fake {
    type Ok = Response;
    type Err = Traced<Error>;

    async fn execute(&self, req: Request) -> Result<Self::Ok, Self::Err> {
        tokio::time::sleep(self.delay).await;
        if req.path == "/auth/refresh" {
            let extra = self.state.lock().unwrap().refresh_delay;
            tokio::time::sleep(extra).await;
        }

        let mut state = self.state.lock().unwrap();
        state.calls.push(req.clone());
        if state.offline {
            return Err(tracerr::new!(Error::Unreachable(
                "connection refused".into()
            )));
        }

        let unauthorized = || {
            Response::json(
                StatusCode::UNAUTHORIZED,
                &json!({ "success": false, "message": "Unauthorized" }),
            )
        };

        let resp = match req.path.as_str() {
            "/auth/login" => {
                let password = req
                    .body
                    .as_ref()
                    .and_then(|b| b.get("password"))
                    .and_then(Value::as_str);
                if password == Some(PASSWORD) {
                    Response::json(StatusCode::OK, &Self::issue_session(&mut state))
                } else {
                    Response::json(
                        StatusCode::UNAUTHORIZED,
                        &json!({
                            "success": false,
                            "message": "Invalid credentials",
                        }),
                    )
                }
            }
            "/auth/refresh" => {
                state.refresh_calls += 1;
                match state.refresh {
                    Refresh::Succeed => Response::json(
                        StatusCode::OK,
                        &Self::issue_session(&mut state),
                    ),
                    Refresh::Reject => unauthorized(),
                }
            }
            "/auth/logout" => {
                Response::json(StatusCode::OK, &json!({ "success": true, "data": null }))
            }
            path => {
                let authorized = req
                    .bearer
                    .as_ref()
                    .zip(state.valid_token.as_ref())
                    .is_some_and(|(sent, valid)| sent.as_ref() == valid);
                if authorized {
                    state
                        .routes
                        .get(&(req.method.clone(), path.to_owned()))
                        .map_or_else(
                            || {
                                Response::json(
                                    StatusCode::NOT_FOUND,
                                    &json!({ "success": false, "message": "Not found" }),
                                )
                            },
                            |(status, body)| Response::json(*status, body),
                        )
                } else {
                    unauthorized()
                }
            }
        };
        Ok(resp)
    }
}
