//! [`Command`] for registering a new [`Patient`].

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{patient, Patient},
    infra::{
        storage,
        transport::{self, Request, Response},
        Storage, Transport,
    },
    Service,
};

use super::{send_request, Command, SendRequest};

/// [`Command`] for registering a new [`Patient`].
#[derive(Clone, Debug, From)]
pub struct CreatePatient(pub patient::New);

impl<St, Tr> Command<CreatePatient> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    type Ok = Patient;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CreatePatient(new): CreatePatient,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let req = Request::post(&self.config().endpoints.patients.list)
            .json(&new)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let patient = self
            .execute(SendRequest(req))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .data::<Patient>()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        log::info!(id = %patient.id, "`Patient` registered");
        Ok(patient)
    }
}

/// Error of [`CreatePatient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`SendRequest`] failed.
    #[display("Failed to register `Patient`: {_0}")]
    Request(send_request::ExecutionError),

    /// [`Patient`] cannot be (de)serialized.
    #[display("Malformed `Patient`: {_0}")]
    Json(serde_json::Error),
}
