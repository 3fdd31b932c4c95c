//! [`Command`] for managing custom themes.

use std::collections::BTreeMap;

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::theme::{Changes, Definition},
    infra::{
        storage::{self, Batch, Key},
        Storage,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating, updating or deleting a custom theme.
///
/// All the custom themes are persisted after any change.
#[derive(Clone, Debug)]
pub enum SaveCustomTheme {
    /// Adds or replaces a custom theme.
    Create {
        /// Name of the custom theme.
        name: String,

        /// [`Definition`] of the custom theme.
        definition: Definition,
    },

    /// Modifies an existing custom theme.
    Update {
        /// Name of the custom theme.
        name: String,

        /// [`Changes`] to apply.
        changes: Changes,
    },

    /// Removes an existing custom theme.
    Delete {
        /// Name of the custom theme.
        name: String,
    },
}

impl<St, Tr> Command<SaveCustomTheme> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
{
    /// Indicator whether any custom theme has been changed.
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SaveCustomTheme) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;
        use SaveCustomTheme as Cmd;

        let custom: Option<BTreeMap<String, Definition>> = match cmd {
            Cmd::Create { name, definition } => {
                Some(self.theme().create_custom(name, definition))
            }
            Cmd::Update { name, changes } => {
                self.theme().update_custom(&name, changes)
            }
            Cmd::Delete { name } => self.theme().delete_custom(&name),
        };
        let Some(custom) = custom else {
            log::debug!("no such custom theme");
            return Ok(false);
        };

        let json = serde_json::to_string(&custom)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        self.persist(Batch::new().set(Key::CustomThemes, json))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        Ok(true)
    }
}

/// Error of [`SaveCustomTheme`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Custom themes cannot be serialized.
    #[display("Failed to serialize custom themes: {_0}")]
    Json(serde_json::Error),

    /// Custom themes cannot be persisted.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}

#[cfg(test)]
mod tests {
    use crate::{
        command::tests::service,
        domain::theme::{Changes, Definition},
        infra::storage::Key,
    };

    use super::{Command as _, SaveCustomTheme};

    #[tokio::test]
    async fn manages_custom_themes() {
        let svc = service();

        let created = svc
            .execute(SaveCustomTheme::Create {
                name: "ocean".into(),
                definition: Definition::dark(),
            })
            .await
            .unwrap();
        assert!(created);
        assert_eq!(svc.theme().available().len(), 3);
        assert!(svc.storage().snapshot()[&Key::CustomThemes].contains("ocean"));

        let updated = svc
            .execute(SaveCustomTheme::Update {
                name: "ocean".into(),
                changes: Changes {
                    display_name: Some("Ocean".into()),
                    colors: None,
                },
            })
            .await
            .unwrap();
        assert!(updated);
        assert_eq!(svc.theme().custom()["ocean"].display_name, "Ocean");

        let missing = svc
            .execute(SaveCustomTheme::Update {
                name: "forest".into(),
                changes: Changes::default(),
            })
            .await
            .unwrap();
        assert!(!missing);

        let deleted = svc
            .execute(SaveCustomTheme::Delete {
                name: "ocean".into(),
            })
            .await
            .unwrap();
        assert!(deleted);
        assert_eq!(svc.theme().available().len(), 2);
        assert_eq!(svc.storage().snapshot()[&Key::CustomThemes], "{}");
    }
}
