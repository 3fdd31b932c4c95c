//! [`Route`] definitions.

use serde::Deserialize;

/// Screen of the application a user navigates to.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Route {
    /// Login form.
    Login,

    /// Dashboard with the summary of the day.
    Dashboard,

    /// List of patients.
    Patients,

    /// Registration form of a new patient.
    PatientRegistration,

    /// List of appointments.
    Appointments,

    /// Appointment calendar.
    Calendar,

    /// Notice about missing access rights.
    Unauthorized,
}

impl Route {
    /// All the [`Route`]s.
    pub const ALL: &'static [Self] = &[
        Self::Login,
        Self::Dashboard,
        Self::Patients,
        Self::PatientRegistration,
        Self::Appointments,
        Self::Calendar,
        Self::Unauthorized,
    ];

    /// [`Route`] unknown and empty paths lead to.
    pub const FALLBACK: Self = Self::Dashboard;

    /// Returns the URL path of this [`Route`].
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Dashboard => "/dashboard",
            Self::Patients => "/patients",
            Self::PatientRegistration => "/patients/register",
            Self::Appointments => "/appointments",
            Self::Calendar => "/appointments/calendar",
            Self::Unauthorized => "/unauthorized",
        }
    }

    /// Resolves the [`Route`] of the provided URL.
    ///
    /// Query string and trailing slashes are ignored. Unknown paths resolve to
    /// the [`Route::FALLBACK`].
    #[must_use]
    pub fn resolve(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.path() == path)
            .unwrap_or(Self::FALLBACK)
    }

    /// Indicates whether this [`Route`] is reachable without a session.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Unauthorized)
    }
}

/// Access requirements of a [`Route`].
///
/// A user satisfies them if it has any of the listed roles (when there are
/// some) and any of the listed permissions (when there are some).
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Requirements {
    /// Names of the roles allowed to access the [`Route`].
    #[serde(default)]
    pub roles: Vec<String>,

    /// Names of the permissions allowing to access the [`Route`].
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Requirements {
    /// Indicates whether these [`Requirements`] demand nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty()
    }
}
