//! [`Command`] for toggling between the light and the dark themes.

use tracerr::Traced;

use crate::{
    domain::theme::Name,
    infra::{
        storage::{self, Batch, Key},
        Storage,
    },
    Service,
};

use super::Command;

/// [`Command`] for toggling between the light and the dark themes.
///
/// The applied theme is persisted.
#[derive(Clone, Copy, Debug)]
pub struct ToggleTheme;

impl<St, Tr> Command<ToggleTheme> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = Name;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: ToggleTheme) -> Result<Self::Ok, Self::Err> {
        let name = self.theme().toggle();
        self.persist(Batch::new().set(Key::Theme, name.as_str()))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(name)
    }
}

/// Error of [`ToggleTheme`] [`Command`] execution.
pub type ExecutionError = storage::Error;

#[cfg(test)]
mod tests {
    use crate::{command::tests::service, domain::theme::Name};

    use super::{Command as _, ToggleTheme};

    #[tokio::test]
    async fn toggles_back_and_forth() {
        let svc = service();

        assert_eq!(svc.execute(ToggleTheme).await.unwrap(), Name::Dark);
        assert!(svc.theme().is_dark());
        assert_eq!(svc.execute(ToggleTheme).await.unwrap(), Name::Light);
    }
}
