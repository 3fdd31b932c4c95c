//! [`Locale`] store.

use common::Signal;
use smart_default::SmartDefault;
use tokio::sync::watch;
use tracing as log;

use crate::domain::locale::{self, Code, Direction, Params};

/// Store of the [`locale::Locale`] the user interface is displayed in.
#[derive(Clone, Debug, SmartDefault)]
pub struct Locale {
    /// [`Code`] of the current [`locale::Locale`].
    current: Signal<Code>,

    /// Indicator whether switching [`locale::Locale`]s is enabled.
    #[default(true)]
    enabled: bool,
}

impl Locale {
    /// Creates a new [`Locale`] store set to the default [`locale::Locale`].
    ///
    /// If not `enabled`, it stays at the default [`locale::Locale`] forever.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            current: Signal::default(),
            enabled,
        }
    }

    /// Subscribes to changes of the current [`Code`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Code> {
        self.current.subscribe()
    }

    /// Returns the [`Code`] of the current [`locale::Locale`].
    #[must_use]
    pub fn current(&self) -> Code {
        self.current.get()
    }

    /// Returns the current [`locale::Locale`].
    #[must_use]
    pub fn info(&self) -> &'static locale::Locale {
        locale::Locale::of(self.current())
    }

    /// Returns the text [`Direction`] of the current [`locale::Locale`].
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.info().direction
    }

    /// Indicates whether the current [`locale::Locale`] is right-to-left.
    #[must_use]
    pub fn is_rtl(&self) -> bool {
        self.info().is_rtl()
    }

    /// Returns all the [`locale::Locale`]s available to switch to.
    #[must_use]
    pub fn available(&self) -> &'static [locale::Locale] {
        locale::Locale::ALL
    }

    /// Translates the provided dot-separated `key` into the current
    /// [`locale::Locale`].
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        self.translate_with(key, &Params::new())
    }

    /// Translates the provided dot-separated `key` into the current
    /// [`locale::Locale`], interpolating the provided [`Params`].
    #[must_use]
    pub fn translate_with(&self, key: &str, params: &Params) -> String {
        locale::translate(self.current(), key, params)
    }

    /// Switches to the [`locale::Locale`] with the provided `code`.
    ///
    /// Returns the applied [`Code`], or [`None`] if the `code` is unknown or
    /// switching is disabled.
    pub(crate) fn apply(&self, code: &str) -> Option<Code> {
        let Ok(code) = code.parse::<Code>() else {
            log::debug!("ignoring unknown locale `{code}`");
            return None;
        };
        if !self.enabled {
            log::debug!("i18n is disabled, ignoring locale `{code}`");
            return None;
        }
        self.current.set(code);
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::locale::{Code, Direction};

    use super::Locale;

    #[test]
    fn switches_direction() {
        let store = Locale::default();
        assert_eq!(store.direction(), Direction::Ltr);

        assert_eq!(store.apply("ar"), Some(Code::Ar));
        assert!(store.is_rtl());

        assert_eq!(store.apply("xx"), None);
        assert_eq!(store.current(), Code::Ar);
        assert!(store.is_rtl());
    }

    #[test]
    fn translates_into_current_locale() {
        let store = Locale::default();
        assert_eq!(store.translate("patients.firstName"), "First Name");

        _ = store.apply("es");
        assert_eq!(store.translate("patients.firstName"), "Nombre");

        _ = store.apply("de");
        assert_eq!(store.translate("patients.firstName"), "First Name");
        assert_eq!(store.translate("no.such.key"), "no.such.key");
    }

    #[test]
    fn disabled_store_keeps_default() {
        let store = Locale::new(false);

        assert_eq!(store.apply("es"), None);
        assert_eq!(store.current(), Code::En);
    }
}
