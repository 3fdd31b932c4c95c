//! [`ExpireNotifications`] [`Task`].

use std::convert::Infallible;

use common::operations::Start;
use futures::future;
use tokio::time::{self, Instant};
use tracing as log;

#[cfg(doc)]
use crate::domain::Notification;
use crate::Service;

use super::Task;

/// [`Task`] removing [`Notification`]s once their duration elapses.
#[derive(Clone, Copy, Debug)]
pub struct ExpireNotifications;

impl<St, Tr> Task<Start<ExpireNotifications>> for Service<St, Tr> {
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        _: Start<ExpireNotifications>,
    ) -> Result<Self::Ok, Self::Err> {
        let store = self.notifications();
        let mut changes = store.subscribe();
        loop {
            let expired = store.expire(Instant::now());
            if expired > 0 {
                log::debug!("{expired} `Notification`s expired");
            }
            drop(changes.borrow_and_update());

            let deadline = store.next_deadline();
            tokio::select! {
                () = async {
                    match deadline {
                        Some(at) => time::sleep_until(at).await,
                        None => future::pending().await,
                    }
                } => {}
                res = changes.changed() => {
                    if res.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{future::IntoFuture as _, time::Duration};

    use tokio::time;

    use crate::{
        domain::notification::Kind,
        infra::{storage::Memory, transport::fake::Fake},
        Config, Service,
    };

    #[tokio::test(start_paused = true)]
    async fn removes_notifications_after_their_duration() {
        let (svc, bg) =
            Service::new(Config::default(), Memory::new(), Fake::new());
        let store = svc.notifications();

        let scenario = async {
            _ = store.info("Saved", "Patient saved");
            _ = store.error("Failed", "Server is down");
            _ = store.show(
                Kind::Warning,
                "Soon",
                "Appointment in 1 minute",
                Some(Duration::from_secs(1)),
            );
            assert_eq!(store.all().len(), 3);

            time::sleep(Duration::from_millis(1500)).await;
            assert_eq!(store.all().len(), 2);

            time::sleep(Duration::from_secs(4)).await;
            let left = store.all();
            assert_eq!(left.len(), 1);
            assert_eq!(left[0].title, "Failed");
        };

        tokio::select! {
            res = bg.into_future() => panic!("background stopped: {res:?}"),
            () = scenario => {}
        }
    }
}
