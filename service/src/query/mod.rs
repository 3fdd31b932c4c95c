//! [`Query`] definition.

pub mod appointments;
pub mod patient;
pub mod patients;

use common::{operations::By, pagination};
use derive_more::{Display, Error, From};
use serde::de::DeserializeOwned;
use tracerr::Traced;

use crate::{
    command::{send_request, SendRequest},
    infra::{
        storage,
        transport::{self, Endpoints, Request, Response},
        Storage, Transport,
    },
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// Resource of the remote API selected by this value.
pub trait Resource {
    /// Representation of the selected resource.
    type Output: DeserializeOwned;

    /// Builds the [`Request`] fetching the selected resource.
    fn request(self, endpoints: &Endpoints) -> Request;
}

/// [`Query`] fetching a `W` from the remote API by the provided [`Resource`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct RemoteQuery<T>(T);

impl<W, B> RemoteQuery<By<W, B>> {
    /// Creates a new [`RemoteQuery`] fetching a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<St, Tr, W, B> Query<RemoteQuery<By<W, B>>> for Service<St, Tr>
where
    B: Resource<Output = W>,
    W: DeserializeOwned,
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    type Ok = W;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RemoteQuery(by): RemoteQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let req = by.into_inner().request(&self.config().endpoints);
        self.execute(SendRequest(req))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .data()
            .map_err(tracerr::from_and_wrap!(=> E))
    }
}

/// Error of [`RemoteQuery`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`SendRequest`] failed.
    #[display("Failed to query remote API: {_0}")]
    Request(send_request::ExecutionError),

    /// Remote API responded with a malformed resource.
    #[display("Malformed resource: {_0}")]
    Json(serde_json::Error),
}

/// Converts the provided [`pagination::Arguments`] into URL query parameters.
fn page_params(args: pagination::Arguments) -> [(String, String); 2] {
    [
        ("page".into(), args.page().to_string()),
        ("limit".into(), args.limit().to_string()),
    ]
}
