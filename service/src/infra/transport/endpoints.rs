//! Paths of the remote API endpoints.

use serde::Deserialize;
use smart_default::SmartDefault;

/// Paths of the remote API endpoints, relative to its base URL.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Authentication endpoints.
    pub auth: Auth,

    /// Patient records endpoints.
    pub patients: Patients,

    /// Appointments endpoints.
    pub appointments: Appointments,
}

impl Endpoints {
    /// Indicates whether the provided `path` is sent without an access token
    /// and never triggers a token refresh.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        path == self.auth.login || path == self.auth.refresh
    }
}

/// Authentication endpoints.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Auth {
    /// Exchanging credentials for a session.
    #[default("/auth/login".into())]
    pub login: String,

    /// Revoking a session.
    #[default("/auth/logout".into())]
    pub logout: String,

    /// Renewing a session.
    #[default("/auth/refresh".into())]
    pub refresh: String,

    /// Fetching the profile of the current user.
    #[default("/auth/profile".into())]
    pub profile: String,
}

/// Patient records endpoints.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Patients {
    /// Listing and registering patients.
    ///
    /// A single patient is addressed as `<list>/<id>`.
    #[default("/patients".into())]
    pub list: String,

    /// Searching patients.
    #[default("/patients/search".into())]
    pub search: String,
}

/// Appointments endpoints.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Appointments {
    /// Listing and scheduling appointments.
    ///
    /// A single appointment is addressed as `<list>/<id>`.
    #[default("/appointments".into())]
    pub list: String,

    /// Appointments within a date range.
    #[default("/appointments/calendar".into())]
    pub calendar: String,
}
