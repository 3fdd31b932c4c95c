//! [`Command`] for switching the locale.

use tracerr::Traced;
use tracing as log;

use crate::{
    domain::locale::Code,
    infra::{
        storage::{self, Batch, Key},
        Storage,
    },
    Service,
};

use super::Command;

/// [`Command`] for switching to the locale with the provided code.
///
/// Unknown codes are ignored. The applied locale is persisted.
#[derive(Clone, Debug)]
pub struct SetLocale(pub String);

impl<St, Tr> Command<SetLocale> for Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
{
    /// Applied [`Code`], if any.
    type Ok = Option<Code>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        SetLocale(code): SetLocale,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(code) = self.locale().apply(&code) else {
            log::debug!("locale `{code}` is not available");
            return Ok(None);
        };
        self.persist(Batch::new().set(Key::Locale, code.as_ref()))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(Some(code))
    }
}

/// Error of [`SetLocale`] [`Command`] execution.
pub type ExecutionError = storage::Error;

#[cfg(test)]
mod tests {
    use crate::{
        command::tests::service,
        domain::locale::{Code, Direction},
        infra::storage::Key,
    };

    use super::{Command as _, SetLocale};

    #[tokio::test]
    async fn switches_to_right_to_left_locale() {
        let svc = service();

        let applied = svc.execute(SetLocale("ar".into())).await.unwrap();

        assert_eq!(applied, Some(Code::Ar));
        assert!(svc.locale().is_rtl());
        assert_eq!(svc.locale().direction(), Direction::Rtl);
        assert_eq!(svc.storage().snapshot()[&Key::Locale], "ar");
    }

    #[tokio::test]
    async fn ignores_unknown_locale() {
        let svc = service();
        _ = svc.execute(SetLocale("es".into())).await.unwrap();

        let applied = svc.execute(SetLocale("xx".into())).await.unwrap();

        assert_eq!(applied, None);
        assert_eq!(svc.locale().current(), Code::Es);
        assert!(!svc.locale().is_rtl());
        assert_eq!(svc.storage().snapshot()[&Key::Locale], "es");
        assert_eq!(svc.locale().translate("patients.firstName"), "Nombre");
    }
}
