//! [`Command`] for fetching the profile of the current [`User`].

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Session;
use crate::{
    domain::User,
    infra::{
        storage::{self, Batch, Key},
        transport::{self, Request, Response},
        Storage, Transport,
    },
    Service,
};

use super::{send_request, Command, SendRequest};

/// [`Command`] for fetching the profile of the current [`User`] from the
/// remote API, replacing the one of the current [`Session`].
#[derive(Clone, Copy, Debug)]
pub struct FetchProfile;

impl<St, Tr> Command<FetchProfile> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: FetchProfile) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let epoch = self.auth().epoch();
        let user = self
            .execute(SendRequest(Request::get(
                &self.config().endpoints.auth.profile,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .data::<User>()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let json =
            serde_json::to_string(&user).map_err(tracerr::from_and_wrap!(=> E))?;

        let _lock = self.persistence.lock().await;
        if self.auth().set_user(epoch, user.clone()) {
            self.persist(Batch::new().set(Key::User, json))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        } else {
            log::debug!("`Session` ended before its profile was fetched");
        }

        Ok(user)
    }
}

/// Error of [`FetchProfile`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`SendRequest`] failed.
    #[display("Failed to request profile: {_0}")]
    Request(send_request::ExecutionError),

    /// [`User`] cannot be (de)serialized.
    #[display("Malformed `User`: {_0}")]
    Json(serde_json::Error),

    /// [`User`] cannot be persisted.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}
