//! [`Command`] for switching the theme.

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

/// [`Command`] for switching to the theme with the provided [`Name`].
///
/// The applied theme is persisted.
#[derive(Clone, Debug)]
pub struct SetTheme(pub Name);

impl<St, Tr> Command<SetTheme> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
{
    /// Applied [`Name`], which differs from the requested one if dark mode
    /// is disabled.
    type Ok = Name;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        SetTheme(name): SetTheme,
    ) -> Result<Self::Ok, Self::Err> {
        let name = self.theme().apply(name);
        self.persist(Batch::new().set(Key::Theme, name.as_str()))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(name)
    }
}

/// Error of [`SetTheme`] [`Command`] execution.
pub type ExecutionError = storage::Error;

#[cfg(test)]
mod tests {
    use crate::{
        command::tests::service,
        domain::theme::{ColorScheme, Name},
        infra::{
            storage::{Key, Memory},
            transport::fake::Fake,
        },
        Config, Features, Service,
    };

    use super::{Command as _, SetTheme};

    #[tokio::test]
    async fn persists_applied_theme() {
        let svc = service();

        let applied = svc.execute(SetTheme(Name::Auto)).await.unwrap();
        assert_eq!(applied, Name::Auto);
        assert!(!svc.theme().is_dark());

        svc.theme().set_system_scheme(ColorScheme::Dark);
        assert!(svc.theme().is_dark());
        assert_eq!(svc.storage().snapshot()[&Key::Theme], "auto");
    }

    #[tokio::test]
    async fn stays_light_without_dark_mode() {
        let config = Config {
            features: Features {
                dark_mode: false,
                ..Features::default()
            },
            ..Config::default()
        };
        let (svc, _) = Service::new(config, Memory::new(), Fake::new());

        let applied = svc.execute(SetTheme(Name::Dark)).await.unwrap();

        assert_eq!(applied, Name::Light);
        assert!(!svc.theme().is_dark());
        assert_eq!(svc.storage().snapshot()[&Key::Theme], "light");
    }

    #[tokio::test]
    async fn auto_follows_configured_system_scheme() {
        let config = Config {
            system_scheme: ColorScheme::Dark,
            ..Config::default()
        };
        let (svc, _) = Service::new(config, Memory::new(), Fake::new());
        assert!(!svc.theme().is_dark());

        _ = svc.execute(SetTheme(Name::Auto)).await.unwrap();

        assert!(svc.theme().is_dark());
        assert_eq!(svc.theme().definition().name, "dark");
    }
}
