//! [`Command`] for modifying an existing [`Appointment`].

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

/// [`Command`] for modifying an existing [`Appointment`].
#[derive(Clone, Debug, From)]
pub struct UpdateAppointment(pub appointment::Changes);

impl<St, Tr> Command<UpdateAppointment> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    type Ok = Appointment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        UpdateAppointment(changes): UpdateAppointment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        if changes.is_empty() {
            return Err(tracerr::new!(E::NoChanges));
        }

        let path = format!(
            "{}/{}",
            self.config().endpoints.appointments.list,
            changes.id,
        );
        let req = Request::put(path)
            .json(&changes)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let appointment = self
            .execute(SendRequest(req))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .data::<Appointment>()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        log::info!(id = %appointment.id, "`Appointment` updated");
        Ok(appointment)
    }
}

/// Error of [`UpdateAppointment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`appointment::Changes`] modify nothing.
    #[display("Nothing to update")]
    #[from(ignore)]
    NoChanges,

    /// [`SendRequest`] failed.
    #[display("Failed to update `Appointment`: {_0}")]
    Request(send_request::ExecutionError),

    /// [`Appointment`] cannot be (de)serialized.
    #[display("Malformed `Appointment`: {_0}")]
    Json(serde_json::Error),
}
