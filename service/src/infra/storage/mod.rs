//! [`Storage`]-related implementations.

mod file;
mod memory;

use std::io;

use common::operations::{By, Perform, Select};
use derive_more::{Display, Error as StdError, From};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::Session;

pub use self::{file::File, memory::Memory};

/// Local key/value persistence operation.
pub use common::Handler as Storage;

/// Key of a value in a [`Storage`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::AsRefStr,
    strum::Display,
)]
pub enum Key {
    /// Access token of the [`Session`].
    #[serde(rename = "auth_token")]
    #[strum(serialize = "auth_token")]
    AccessToken,

    /// Refresh token of the [`Session`].
    #[serde(rename = "refresh_token")]
    #[strum(serialize = "refresh_token")]
    RefreshToken,

    /// JSON-encoded user of the [`Session`].
    #[serde(rename = "user_data")]
    #[strum(serialize = "user_data")]
    User,

    /// Code of the chosen locale.
    #[serde(rename = "app_locale")]
    #[strum(serialize = "app_locale")]
    Locale,

    /// Name of the chosen theme.
    #[serde(rename = "app_theme")]
    #[strum(serialize = "app_theme")]
    Theme,

    /// JSON-encoded custom theme definitions.
    #[serde(rename = "theme_config")]
    #[strum(serialize = "theme_config")]
    CustomThemes,
}

impl Key {
    /// [`Key`]s of the [`Session`] parts, always written together.
    pub const SESSION: [Self; 3] = [Self::AccessToken, Self::RefreshToken, Self::User];
}

/// Set of writes applied to a [`Storage`] atomically.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Batch(Vec<(Key, Option<String>)>);

impl Batch {
    /// Creates a new empty [`Batch`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `value` under the provided [`Key`].
    #[must_use]
    pub fn set(mut self, key: Key, value: impl Into<String>) -> Self {
        self.0.push((key, Some(value.into())));
        self
    }

    /// Removes the value under the provided [`Key`].
    #[must_use]
    pub fn remove(mut self, key: Key) -> Self {
        self.0.push((key, None));
        self
    }

    /// Indicates whether this [`Batch`] writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Batch {
    type Item = (Key, Option<String>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// [`Storage`] operation reading the value under a [`Key`].
pub type Read = Select<By<Option<String>, Key>>;

/// [`Storage`] operation applying a [`Batch`].
pub type Write = Perform<Batch>;

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// I/O operation failed.
    #[display("I/O operation failed: {_0}")]
    Io(io::Error),

    /// Persisted contents are malformed.
    #[display("Malformed storage contents: {_0}")]
    Malformed(serde_json::Error),
}
