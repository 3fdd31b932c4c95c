//! [`Command`] for logging out.

use std::convert::Infallible;

use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Session;
use crate::{
    infra::{
        storage,
        transport::{self, Failure, Request, Response},
        Storage, Transport,
    },
    Service,
};

use super::Command;

/// [`Command`] for ending the current [`Session`].
///
/// The [`Session`] is always ended locally, even if notifying the remote API
/// fails.
#[derive(Clone, Copy, Debug)]
pub struct Logout {
    /// Indicator whether the remote API should be notified to revoke the
    /// [`Session`].
    pub notify_server: bool,
}

impl Logout {
    /// Creates a [`Logout`] notifying the remote API.
    #[must_use]
    pub const fn remote() -> Self {
        Self {
            notify_server: true,
        }
    }

    /// Creates a [`Logout`] ending the [`Session`] locally only.
    #[must_use]
    pub const fn local() -> Self {
        Self {
            notify_server: false,
        }
    }
}

impl<St, Tr> Command<Logout> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
    Tr: Transport<Request, Ok = Response, Err = Traced<transport::Error>>,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Logout { notify_server }: Logout,
    ) -> Result<Self::Ok, Self::Err> {
        let _busy = self.auth().busy();

        let token = self.auth().access_token();
        let ended = self.auth().clear();
        {
            let _lock = self.persistence.lock().await;
            if let Err(e) = self.persist(super::remove_session()).await {
                log::error!("failed to remove persisted `Session`: {e}");
            }
        }
        if ended {
            log::info!("logged out");
        }

        let Some(token) = token.filter(|_| notify_server) else {
            return Ok(());
        };
        let req = Request::post(&self.config().endpoints.auth.logout)
            .bearer(Some(token));
        match self.transport().execute(req).await {
            Ok(resp) if resp.is_success() => {}
            Ok(resp) => {
                log::warn!("remote logout failed: {}", Failure::from(&resp));
            }
            Err(e) => log::warn!("remote logout failed: {e}"),
        }
        Ok(())
    }
}
