//! [`Locale`] definitions and translation tables.

use std::{collections::HashMap, fmt, sync::LazyLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Language the user interface is displayed in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Locale {
    /// [`Code`] of this [`Locale`].
    pub code: Code,

    /// Name of this [`Locale`] in its own language.
    pub name: &'static str,

    /// Flag representing this [`Locale`].
    pub flag: &'static str,

    /// Text [`Direction`] of this [`Locale`].
    pub direction: Direction,
}

impl Locale {
    /// All the known [`Locale`]s.
    pub const ALL: &'static [Self] = &[
        Self {
            code: Code::En,
            name: "English",
            flag: "🇺🇸",
            direction: Direction::Ltr,
        },
        Self {
            code: Code::Es,
            name: "Español",
            flag: "🇪🇸",
            direction: Direction::Ltr,
        },
        Self {
            code: Code::Fr,
            name: "Français",
            flag: "🇫🇷",
            direction: Direction::Ltr,
        },
        Self {
            code: Code::De,
            name: "Deutsch",
            flag: "🇩🇪",
            direction: Direction::Ltr,
        },
        Self {
            code: Code::Ar,
            name: "العربية",
            flag: "🇸🇦",
            direction: Direction::Rtl,
        },
    ];

    /// Returns the [`Locale`] with the provided [`Code`].
    #[must_use]
    pub fn of(code: Code) -> &'static Self {
        Self::ALL
            .iter()
            .find(|l| l.code == code)
            .unwrap_or_else(|| unreachable!("every `Code` has a `Locale`"))
    }

    /// Indicates whether this [`Locale`] is written right-to-left.
    #[must_use]
    pub fn is_rtl(&self) -> bool {
        self.direction == Direction::Rtl
    }
}

/// Code of a [`Locale`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Code {
    /// English.
    #[default]
    En,

    /// Spanish.
    Es,

    /// French.
    Fr,

    /// German.
    De,

    /// Arabic.
    Ar,
}

/// Direction of a text.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Serialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Left-to-right.
    Ltr,

    /// Right-to-left.
    Rtl,
}

/// Node of a translation table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Node {
    /// Translated text.
    Text(String),

    /// Group of nested [`Node`]s.
    Group(HashMap<String, Node>),
}

/// Translation tables of the [`Locale`]s having them.
static TRANSLATIONS: LazyLock<HashMap<Code, Node>> = LazyLock::new(|| {
    [
        (Code::En, include_str!("../../locales/en.json")),
        (Code::Es, include_str!("../../locales/es.json")),
    ]
    .into_iter()
    .map(|(code, raw)| {
        let table = serde_json::from_str(raw).unwrap_or_else(|e| {
            panic!("invalid `{code}` translations table: {e}")
        });
        (code, table)
    })
    .collect()
});

/// Looks up the translation of the provided dot-separated `key` in the table
/// of the provided [`Code`] only.
#[must_use]
pub fn lookup(code: Code, key: &str) -> Option<&'static str> {
    let mut node = TRANSLATIONS.get(&code)?;
    for segment in key.split('.') {
        match node {
            Node::Group(group) => node = group.get(segment)?,
            Node::Text(_) => return None,
        }
    }
    match node {
        Node::Text(text) => Some(text),
        Node::Group(_) => None,
    }
}

/// Translates the provided dot-separated `key` into the [`Locale`] with the
/// provided [`Code`].
///
/// Missing translations fall back to the default [`Locale`], and then to the
/// `key` itself.
#[must_use]
pub fn translate(code: Code, key: &str, params: &Params) -> String {
    let text = lookup(code, key)
        .or_else(|| lookup(Code::default(), key))
        .unwrap_or(key);
    params.interpolate(text)
}

/// Named parameters interpolated into `{name}` placeholders of a translated
/// text.
#[derive(Clone, Debug, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Creates new empty [`Params`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter with the provided `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.0.push((name.into(), value.to_string()));
        self
    }

    /// Returns the value of the parameter with the provided `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find_map(|(n, v)| (n == name).then_some(v.as_str()))
    }

    /// Replaces `{name}` placeholders in the provided `text`.
    ///
    /// Placeholders without a matching parameter are left verbatim.
    #[must_use]
    pub fn interpolate(&self, text: &str) -> String {
        /// Regular expression matching a `{name}` placeholder.
        static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\{(\w+)\}").expect("valid regex")
        });

        if self.0.is_empty() {
            return text.to_owned();
        }
        PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| {
                self.get(&caps[1]).unwrap_or(&caps[0]).to_owned()
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::{lookup, translate, Code, Locale, Params};

    #[test]
    fn translates_with_current_locale() {
        assert_eq!(
            translate(Code::Es, "patients.firstName", &Params::new()),
            "Nombre",
        );
        assert_eq!(
            translate(Code::En, "patients.firstName", &Params::new()),
            "First Name",
        );
    }

    #[test]
    fn falls_back_to_default_locale() {
        assert_eq!(lookup(Code::Fr, "patients.firstName"), None);
        assert_eq!(
            translate(Code::Fr, "patients.firstName", &Params::new()),
            "First Name",
        );
    }

    #[test]
    fn falls_back_to_key() {
        assert_eq!(translate(Code::Es, "no.such.key", &Params::new()), "no.such.key");
        assert_eq!(translate(Code::En, "patients", &Params::new()), "patients");
        assert_eq!(
            translate(Code::En, "patients.title.deeper", &Params::new()),
            "patients.title.deeper",
        );
    }

    #[test]
    fn interpolates_params() {
        let params = Params::new().with("0", 6);
        assert_eq!(
            translate(Code::En, "errors.minLength", &params),
            "Minimum length is 6 characters",
        );

        let params = Params::new().with("name", "Ann");
        assert_eq!(
            params.interpolate("Hi {name}, {missing} here"),
            "Hi Ann, {missing} here",
        );
    }

    #[test]
    fn every_code_has_locale() {
        for locale in Locale::ALL {
            assert_eq!(Locale::of(locale.code), locale);
            assert_eq!(Code::from_str(locale.code.as_ref()), Ok(locale.code));
        }
        assert!(Locale::of(Code::Ar).is_rtl());
        assert!(Code::from_str("xx").is_err());
    }
}
