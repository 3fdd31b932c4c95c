//! [`User`] definitions.

pub mod session;

use std::{collections::HashSet, fmt};

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use secrecy::{zeroize::Zeroize, CloneableSecret, SecretBox};
use serde::{Deserialize, Serialize};

pub use self::session::Session;

/// Staff member operating the hospital information system.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Username`] of this [`User`].
    pub username: Username,

    /// Email address of this [`User`].
    pub email: String,

    /// First name of this [`User`].
    pub first_name: String,

    /// Last name of this [`User`].
    pub last_name: String,

    /// [`Role`] assigned to this [`User`].
    pub role: Role,

    /// [`Permission`]s granted to this [`User`] directly, in addition to the
    /// ones of its [`Role`].
    #[serde(default)]
    pub permissions: Vec<Permission>,

    /// Indicator whether this [`User`] account is active.
    pub is_active: bool,

    /// [`DateTime`] when this [`User`] logged in the last time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<LastLoginDateTime>,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`User`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

impl User {
    /// Returns the full name of this [`User`] in `<first> <last>` format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the effective [`Permission`]s of this [`User`].
    ///
    /// These are the [`Permission`]s of its [`Role`] followed by the directly
    /// granted ones, deduplicated by [`Permission::name`].
    #[must_use]
    pub fn effective_permissions(&self) -> Vec<&Permission> {
        let mut seen = HashSet::new();
        self.role
            .permissions
            .iter()
            .chain(&self.permissions)
            .filter(|p| seen.insert(p.name.as_str()))
            .collect()
    }

    /// Checks whether this [`User`] has the [`Permission`] with the provided
    /// `name`, either through its [`Role`] or directly.
    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.role
            .permissions
            .iter()
            .chain(&self.permissions)
            .any(|p| p.name == name)
    }

    /// Checks whether this [`User`] has the [`Role`] with the provided `name`.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.role.name == name
    }
}

/// ID of a [`User`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Id(String);

/// Username a [`User`] logs in with.
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a new [`Username`] if the given `username` is valid.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Option<Self> {
        let username = username.into();
        Self::check(&username).then_some(Self(username))
    }

    /// Checks whether the given `username` is a valid [`Username`].
    fn check(username: impl AsRef<str>) -> bool {
        let username = username.as_ref();
        username.trim() == username
            && !username.is_empty()
            && username.len() <= 128
    }
}

impl std::str::FromStr for Username {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Username`")
    }
}

/// Password of a [`User`].
#[derive(Clone, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Minimum number of characters in a [`Password`].
    pub const MIN_LENGTH: usize = 6;

    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let len = password.as_ref().chars().count();
        (Self::MIN_LENGTH..=128).contains(&len)
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Credentials a [`User`] logs in with.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// [`Username`] of the [`User`].
    pub username: Username,

    /// [`Password`] of the [`User`].
    pub password: SecretBox<Password>,

    /// Indicator whether the remote API should issue a long-living
    /// [`Session`].
    pub remember_me: bool,
}

/// Role of a [`User`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Role {
    /// ID of this [`Role`].
    pub id: String,

    /// Unique name of this [`Role`].
    pub name: String,

    /// Human-readable description of this [`Role`].
    #[serde(default)]
    pub description: String,

    /// [`Permission`]s granted by this [`Role`].
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Permission to perform an action on a resource.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Permission {
    /// ID of this [`Permission`].
    pub id: String,

    /// Unique name of this [`Permission`].
    pub name: String,

    /// Resource this [`Permission`] applies to.
    pub resource: String,

    /// Action this [`Permission`] allows.
    pub action: String,

    /// Human-readable description of this [`Permission`].
    #[serde(default)]
    pub description: String,
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

/// [`DateTime`] when a [`User`] was modified.
pub type ModificationDateTime = DateTimeOf<(User, unit::Modification)>;

/// [`DateTime`] when a [`User`] logged in.
pub type LastLoginDateTime = DateTimeOf<(User, unit::Login)>;
