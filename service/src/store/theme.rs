//! [`Theme`] store.

use std::collections::BTreeMap;

use common::Signal;
use smart_default::SmartDefault;
use tokio::sync::watch;
use tracing as log;

use crate::domain::theme::{Changes, ColorScheme, Definition, Name};

/// Store of the theme the user interface is rendered with.
#[derive(Clone, Debug, SmartDefault)]
pub struct Theme {
    /// Current [`State`].
    state: Signal<State>,

    /// Indicator whether dark themes are enabled.
    #[default(true)]
    dark_mode: bool,
}

/// State of a [`Theme`] store.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// [`Name`] of the current theme.
    current: Name,

    /// Custom [`Definition`]s by their names.
    custom: BTreeMap<String, Definition>,

    /// [`ColorScheme`] preferred by the operating system.
    system: ColorScheme,
}

impl State {
    /// Returns the [`Name`] of the current theme.
    #[must_use]
    pub fn current(&self) -> &Name {
        &self.current
    }

    /// Indicates whether the current theme renders dark.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.current.is_dark(self.system)
    }

    /// Returns the [`Definition`]s of all the available themes, built-in ones
    /// first.
    ///
    /// A custom [`Definition`] overrides the built-in one of the same name.
    #[must_use]
    pub fn available(&self) -> Vec<Definition> {
        let mut custom = self.custom.clone();
        let mut all = [Definition::light(), Definition::dark()]
            .into_iter()
            .map(|def| custom.remove(&def.name).unwrap_or(def))
            .collect::<Vec<_>>();
        all.extend(custom.into_values());
        all
    }

    /// Returns the [`Definition`] of the current theme.
    ///
    /// [`Name::Auto`] resolves to the built-in theme matching the system
    /// [`ColorScheme`]. Unknown themes fall back to the light one.
    #[must_use]
    pub fn definition(&self) -> Definition {
        let name = match &self.current {
            Name::Auto => match self.system {
                ColorScheme::Light => "light",
                ColorScheme::Dark => "dark",
            },
            Name::Light | Name::Dark | Name::Custom(_) => self.current.as_str(),
        };
        self.available()
            .into_iter()
            .find(|def| def.name == name)
            .unwrap_or_else(Definition::light)
    }
}

impl Theme {
    /// Creates a new [`Theme`] store set to the light theme.
    ///
    /// If `dark_mode` is disabled, dark themes are replaced with the light
    /// one.
    #[must_use]
    pub fn new(dark_mode: bool) -> Self {
        Self {
            state: Signal::default(),
            dark_mode,
        }
    }

    /// Subscribes to changes of this [`Theme`] store.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<State> {
        self.state.subscribe()
    }

    /// Returns the [`Name`] of the current theme.
    #[must_use]
    pub fn current(&self) -> Name {
        self.state.with(|s| s.current.clone())
    }

    /// Indicates whether the current theme renders dark.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.state.with(State::is_dark)
    }

    /// Returns the [`ColorScheme`] preferred by the operating system.
    #[must_use]
    pub fn system_scheme(&self) -> ColorScheme {
        self.state.with(|s| s.system)
    }

    /// Returns the custom [`Definition`]s by their names.
    #[must_use]
    pub fn custom(&self) -> BTreeMap<String, Definition> {
        self.state.with(|s| s.custom.clone())
    }

    /// Returns the [`Definition`]s of all the available themes.
    #[must_use]
    pub fn available(&self) -> Vec<Definition> {
        self.state.with(State::available)
    }

    /// Returns the [`Definition`] of the current theme.
    #[must_use]
    pub fn definition(&self) -> Definition {
        self.state.with(State::definition)
    }

    /// Returns the `--color-<key>` CSS variables of the current theme.
    #[must_use]
    pub fn css_variables(&self) -> Vec<(String, String)> {
        self.definition().css_variables()
    }

    /// Records the [`ColorScheme`] preferred by the operating system.
    ///
    /// Affects the current theme if it is [`Name::Auto`].
    pub fn set_system_scheme(&self, scheme: ColorScheme) {
        _ = self.state.update_if(|s| {
            let changed = s.system != scheme;
            s.system = scheme;
            changed
        });
    }

    /// Switches to the theme with the provided [`Name`].
    ///
    /// Returns the [`Name`] actually applied.
    pub(crate) fn apply(&self, name: Name) -> Name {
        let name = match name {
            Name::Dark | Name::Auto if !self.dark_mode => {
                log::debug!("dark mode is disabled, applying light theme");
                Name::Light
            }
            Name::Light | Name::Dark | Name::Auto | Name::Custom(_) => name,
        };
        self.state.update(|s| s.current = name.clone());
        name
    }

    /// Switches between the light and the dark themes.
    ///
    /// Returns the [`Name`] actually applied.
    pub(crate) fn toggle(&self) -> Name {
        self.apply(if self.is_dark() { Name::Light } else { Name::Dark })
    }

    /// Adds or replaces the custom theme with the provided `name`.
    ///
    /// Returns all the custom [`Definition`]s.
    pub(crate) fn create_custom(
        &self,
        name: String,
        mut def: Definition,
    ) -> BTreeMap<String, Definition> {
        def.name.clone_from(&name);
        self.state.update(|s| {
            drop(s.custom.insert(name, def));
            s.custom.clone()
        })
    }

    /// Applies the provided [`Changes`] to the existing custom theme with the
    /// provided `name`.
    ///
    /// Returns all the custom [`Definition`]s, or [`None`] if there is no such
    /// custom theme.
    pub(crate) fn update_custom(
        &self,
        name: &str,
        changes: Changes,
    ) -> Option<BTreeMap<String, Definition>> {
        let mut out = None;
        _ = self.state.update_if(|s| {
            let Some(def) = s.custom.get_mut(name) else {
                return false;
            };
            changes.apply(def);
            out = Some(s.custom.clone());
            true
        });
        out
    }

    /// Removes the custom theme with the provided `name`.
    ///
    /// Returns all the remaining custom [`Definition`]s, or [`None`] if there
    /// was no such custom theme.
    pub(crate) fn delete_custom(
        &self,
        name: &str,
    ) -> Option<BTreeMap<String, Definition>> {
        let mut out = None;
        _ = self.state.update_if(|s| {
            if s.custom.remove(name).is_none() {
                return false;
            }
            out = Some(s.custom.clone());
            true
        });
        out
    }

    /// Replaces all the custom [`Definition`]s.
    pub(crate) fn restore_custom(&self, custom: BTreeMap<String, Definition>) {
        self.state.update(|s| s.custom = custom);
    }
}
