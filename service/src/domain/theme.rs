//! Theme definitions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Name of a theme.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(into = "String", try_from = "String")]
pub enum Name {
    /// Built-in light theme.
    #[default]
    Light,

    /// Built-in dark theme.
    Dark,

    /// Theme following the system [`ColorScheme`].
    Auto,

    /// User-defined theme.
    Custom(String),
}

impl Name {
    /// Returns the string representation of this [`Name`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
            Self::Custom(name) => name,
        }
    }

    /// Indicates whether this [`Name`] renders dark under the provided system
    /// [`ColorScheme`].
    #[must_use]
    pub fn is_dark(&self, system: ColorScheme) -> bool {
        match self {
            Self::Dark => true,
            Self::Auto => system == ColorScheme::Dark,
            Self::Light | Self::Custom(_) => false,
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" => return Err("empty theme `Name`"),
            "light" => Self::Light,
            "dark" => Self::Dark,
            "auto" => Self::Auto,
            custom => Self::Custom(custom.to_owned()),
        })
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        match name {
            Name::Custom(name) => name,
            Name::Light | Name::Dark | Name::Auto => name.as_str().to_owned(),
        }
    }
}

impl TryFrom<String> for Name {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Color scheme preferred by the operating system.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorScheme {
    /// Light colors are preferred.
    #[default]
    Light,

    /// Dark colors are preferred.
    Dark,
}

/// Definition of how a theme looks.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// Name of the theme.
    pub name: String,

    /// Human-readable name of the theme.
    pub display_name: String,

    /// [`Colors`] of the theme.
    pub colors: Colors,
}

impl Definition {
    /// Returns the built-in light [`Definition`].
    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light".into(),
            display_name: "Light".into(),
            colors: Colors {
                primary: "#3b82f6".into(),
                secondary: "#64748b".into(),
                success: "#22c55e".into(),
                warning: "#f59e0b".into(),
                error: "#ef4444".into(),
                background: "#ffffff".into(),
                surface: "#f8fafc".into(),
                text: "#1e293b".into(),
            },
        }
    }

    /// Returns the built-in dark [`Definition`].
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark".into(),
            display_name: "Dark".into(),
            colors: Colors {
                primary: "#60a5fa".into(),
                secondary: "#94a3b8".into(),
                success: "#4ade80".into(),
                warning: "#fbbf24".into(),
                error: "#f87171".into(),
                background: "#0f172a".into(),
                surface: "#1e293b".into(),
                text: "#f1f5f9".into(),
            },
        }
    }

    /// Returns the `--color-<key>` CSS variables of this [`Definition`].
    #[must_use]
    pub fn css_variables(&self) -> Vec<(String, String)> {
        self.colors
            .entries()
            .into_iter()
            .map(|(key, value)| (format!("--color-{key}"), value.to_owned()))
            .collect()
    }
}

/// Color palette of a theme.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Colors {
    /// Primary brand color.
    pub primary: String,

    /// Secondary color.
    pub secondary: String,

    /// Color of successful states.
    pub success: String,

    /// Color of warnings.
    pub warning: String,

    /// Color of errors.
    pub error: String,

    /// Page background color.
    pub background: String,

    /// Color of raised surfaces.
    pub surface: String,

    /// Text color.
    pub text: String,
}

impl Colors {
    /// Returns the named entries of these [`Colors`].
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("success", &self.success),
            ("warning", &self.warning),
            ("error", &self.error),
            ("background", &self.background),
            ("surface", &self.surface),
            ("text", &self.text),
        ]
    }
}

/// Partial modification of a custom [`Definition`].
#[derive(Clone, Debug, Default)]
pub struct Changes {
    /// New human-readable name.
    pub display_name: Option<String>,

    /// New [`Colors`].
    pub colors: Option<Colors>,
}

impl Changes {
    /// Applies these [`Changes`] to the provided [`Definition`].
    pub fn apply(self, def: &mut Definition) {
        if let Some(display_name) = self.display_name {
            def.display_name = display_name;
        }
        if let Some(colors) = self.colors {
            def.colors = colors;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorScheme, Definition, Name};

    #[test]
    fn parses_names() {
        assert_eq!("dark".parse(), Ok(Name::Dark));
        assert_eq!("ocean".parse(), Ok(Name::Custom("ocean".into())));
        assert!("  ".parse::<Name>().is_err());
        assert_eq!(Name::Auto.to_string(), "auto");
    }

    #[test]
    fn dark_mode_follows_system_for_auto() {
        assert!(Name::Dark.is_dark(ColorScheme::Light));
        assert!(!Name::Light.is_dark(ColorScheme::Dark));
        assert!(Name::Auto.is_dark(ColorScheme::Dark));
        assert!(!Name::Auto.is_dark(ColorScheme::Light));
        assert!(!Name::Custom("ocean".into()).is_dark(ColorScheme::Dark));
    }

    #[test]
    fn css_variables() {
        let vars = Definition::dark().css_variables();

        assert_eq!(vars.len(), 8);
        assert_eq!(vars[0], ("--color-primary".into(), "#60a5fa".into()));
    }
}
