//! [`Command`] for restoring the persisted state.

use std::collections::BTreeMap;

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        locale::Code,
        theme::{self, Definition},
        user::session::{AccessToken, RefreshToken},
        Session, User,
    },
    infra::{
        storage::{self, Key},
        Storage,
    },
    store::auth::Status,
    Service,
};

use super::Command;

/// [`Command`] for restoring the [`Session`], the locale and the theme
/// persisted by a previous run.
///
/// Malformed persisted values are discarded.
#[derive(Clone, Copy, Debug)]
pub struct RestoreState;

/// Output of [`RestoreState`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Restored authentication [`Status`].
    pub status: Status,

    /// Restored locale [`Code`].
    pub locale: Code,

    /// Restored theme [`Name`].
    ///
    /// [`Name`]: theme::Name
    pub theme: theme::Name,
}

impl<St, Tr> Command<RestoreState> for Service<St, Tr>
where
    St: Storage<storage::Read, Ok = Option<String>, Err = Traced<storage::Error>>
        + Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: RestoreState) -> Result<Self::Ok, Self::Err> {
        if let Some(session) = self.restore_session().await? {
            log::debug!(user = %session.user.username, "`Session` restored");
            _ = self.auth().establish(session);
        }

        if let Some(code) = self.read(Key::Locale).await? {
            if self.locale().apply(&code).is_none() {
                log::warn!("ignoring persisted locale `{code}`");
            }
        }

        if let Some(json) = self.read(Key::CustomThemes).await? {
            match serde_json::from_str::<BTreeMap<String, Definition>>(&json) {
                Ok(custom) => self.theme().restore_custom(custom),
                Err(e) => log::warn!("ignoring malformed custom themes: {e}"),
            }
        }
        if let Some(name) = self.read(Key::Theme).await? {
            match name.parse::<theme::Name>() {
                Ok(name) => {
                    _ = self.theme().apply(name);
                }
                Err(e) => log::warn!("ignoring persisted theme: {e}"),
            }
        }

        Ok(Output {
            status: self.auth().status(),
            locale: self.locale().current(),
            theme: self.theme().current(),
        })
    }
}

impl<St, Tr> Service<St, Tr>
where
    St: Storage<storage::Read, Ok = Option<String>, Err = Traced<storage::Error>>
        + Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
{
    /// Reads the value under the provided [`Key`].
    async fn read(
        &self,
        key: Key,
    ) -> Result<Option<String>, Traced<ExecutionError>> {
        self.storage()
            .execute(Select(By::new(key)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
    }

    /// Restores the persisted [`Session`], if it is complete and well-formed.
    ///
    /// Incomplete or malformed [`Session`] leftovers are removed.
    async fn restore_session(
        &self,
    ) -> Result<Option<Session>, Traced<ExecutionError>> {
        let access = self.read(Key::AccessToken).await?;
        let refresh = self.read(Key::RefreshToken).await?;
        let user = self.read(Key::User).await?;

        let (access, refresh, user) = match (access, refresh, user) {
            (None, None, None) => return Ok(None),
            (Some(a), Some(r), Some(u)) => (a, r, u),
            _ => {
                log::warn!("discarding incomplete persisted `Session`");
                self.discard_session().await?;
                return Ok(None);
            }
        };
        let user = match serde_json::from_str::<User>(&user) {
            Ok(user) => user,
            Err(e) => {
                log::warn!("discarding persisted `Session` of malformed user: {e}");
                self.discard_session().await?;
                return Ok(None);
            }
        };

        Ok(Some(Session {
            access_token: AccessToken::new(access),
            refresh_token: RefreshToken::new(refresh),
            user,
            expires_in_secs: 0,
        }))
    }

    /// Removes the persisted [`Session`].
    async fn discard_session(&self) -> Result<(), Traced<ExecutionError>> {
        let _lock = self.persistence.lock().await;
        self.persist(super::remove_session())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
    }
}

/// Error of [`RestoreState`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Storage`] operation failed.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}

#[cfg(test)]
mod tests {
    use common::operations::Perform;
    use serde_json::json;

    use crate::{
        command::tests::service,
        domain::{locale::Code, theme::Name, user::tests::user_json},
        infra::storage::{Batch, Key},
        store::auth::Status,
    };

    use super::{Command as _, RestoreState};

    #[tokio::test]
    async fn restores_everything_persisted() {
        let svc = service();
        svc.storage()
            .execute(Perform(
                Batch::new()
                    .set(Key::AccessToken, "access-7")
                    .set(Key::RefreshToken, "refresh-7")
                    .set(Key::User, user_json().to_string())
                    .set(Key::Locale, "es")
                    .set(
                        Key::CustomThemes,
                        json!({
                            "ocean": {
                                "name": "ocean",
                                "displayName": "Ocean",
                                "colors": {
                                    "primary": "#006994",
                                    "secondary": "#4f97a3",
                                    "success": "#2e8b57",
                                    "warning": "#f4a460",
                                    "error": "#cd5c5c",
                                    "background": "#f0f8ff",
                                    "surface": "#ffffff",
                                    "text": "#002b36",
                                },
                            },
                        })
                        .to_string(),
                    )
                    .set(Key::Theme, "ocean"),
            ))
            .await
            .unwrap();

        let out = svc.execute(RestoreState).await.unwrap();

        assert_eq!(out.status, Status::Authenticated);
        assert_eq!(svc.auth().access_token().unwrap().as_ref(), "access-7");
        assert_eq!(svc.auth().full_name().as_deref(), Some("John Doe"));
        assert_eq!(out.locale, Code::Es);
        assert_eq!(out.theme, Name::Custom("ocean".into()));
        assert_eq!(svc.theme().definition().display_name, "Ocean");
    }

    #[tokio::test]
    async fn discards_malformed_session() {
        let svc = service();
        svc.storage()
            .execute(Perform(
                Batch::new()
                    .set(Key::AccessToken, "access-7")
                    .set(Key::RefreshToken, "refresh-7")
                    .set(Key::User, "{not json")
                    .set(Key::Locale, "xx"),
            ))
            .await
            .unwrap();

        let out = svc.execute(RestoreState).await.unwrap();

        assert_eq!(out.status, Status::Unauthenticated);
        assert_eq!(out.locale, Code::En);
        assert_eq!(out.theme, Name::Light);
        let stored = svc.storage().snapshot();
        assert!(Key::SESSION.iter().all(|k| !stored.contains_key(k)));
        assert_eq!(stored[&Key::Locale], "xx");
    }

    #[tokio::test]
    async fn discards_incomplete_session() {
        let svc = service();
        svc.storage()
            .execute(Perform(Batch::new().set(Key::AccessToken, "access-7")))
            .await
            .unwrap();

        let out = svc.execute(RestoreState).await.unwrap();

        assert_eq!(out.status, Status::Unauthenticated);
        assert!(svc.storage().snapshot().is_empty());
    }
}
