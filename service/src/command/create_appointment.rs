//! [`Command`] for scheduling a new [`Appointment`].

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{appointment, Appointment},
    infra::{
        storage,
        transport::{self, Request, Response},
        Storage, Transport,
    },
    Service,
};

use super::{send_request, Command, SendRequest};

/// [`Command`] for scheduling a new [`Appointment`].
#[derive(Clone, Debug, From)]
pub struct CreateAppointment(pub appointment::New);

impl<St, Tr> Command<CreateAppointment> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    type Ok = Appointment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CreateAppointment(new): CreateAppointment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let req = Request::post(&self.config().endpoints.appointments.list)
            .json(&new)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let appointment = self
            .execute(SendRequest(req))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .data::<Appointment>()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        log::info!(id = %appointment.id, "`Appointment` scheduled");
        Ok(appointment)
    }
}

/// Error of [`CreateAppointment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`SendRequest`] failed.
    #[display("Failed to schedule `Appointment`: {_0}")]
    Request(send_request::ExecutionError),

    /// [`Appointment`] cannot be (de)serialized.
    #[display("Malformed `Appointment`: {_0}")]
    Json(serde_json::Error),
}
