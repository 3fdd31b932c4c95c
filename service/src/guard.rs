//! Route [`Guard`] definitions.

use std::{collections::HashMap, fmt};

use serde::Deserialize;
use smart_default::SmartDefault;

use crate::{
    domain::{route::Requirements, Route, Session},
    store,
};

#[cfg(doc)]
use crate::store::auth::Status;

/// Policy deciding whether navigation to a [`Route`] is allowed.
pub trait Policy: fmt::Debug {
    /// Decides whether the provided `target` may be visited within the
    /// provided [`Session`] (if any).
    fn decide(&self, target: &Target<'_>, session: Option<&Session>) -> Decision;
}

/// Navigation target being checked by a [`Policy`].
#[derive(Clone, Copy, Debug)]
pub struct Target<'a> {
    /// Requested location, as typed or linked.
    pub location: &'a str,

    /// [`Route`] the location resolves to.
    pub route: Route,

    /// [`Requirements`] of the [`Route`].
    pub requirements: &'a Requirements,
}

/// Outcome of a [`Policy`] decision.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Navigation may proceed.
    Allow,

    /// Navigation is denied in favor of another [`Route`].
    Redirect {
        /// [`Route`] to navigate to instead.
        to: Route,

        /// Location to resume once the redirect is resolved.
        return_url: Option<String>,
    },
}

/// [`Policy`] allowing everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl Policy for AllowAll {
    fn decide(&self, _: &Target<'_>, _: Option<&Session>) -> Decision {
        Decision::Allow
    }
}

/// [`Policy`] requiring a [`Session`] for non-public [`Route`]s, and any of
/// the required roles and permissions, if there are some.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequireSession;

impl Policy for RequireSession {
    fn decide(&self, target: &Target<'_>, session: Option<&Session>) -> Decision {
        if target.route.is_public() {
            return Decision::Allow;
        }
        let Some(session) = session else {
            return Decision::Redirect {
                to: Route::Login,
                return_url: Some(target.location.to_owned()),
            };
        };

        let Requirements { roles, permissions } = target.requirements;
        let user = &session.user;
        let has_role = roles.is_empty() || roles.iter().any(|r| user.has_role(r));
        let has_permission = permissions.is_empty()
            || permissions.iter().any(|p| user.has_permission(p));

        if has_role && has_permission {
            Decision::Allow
        } else {
            Decision::Redirect {
                to: Route::Unauthorized,
                return_url: None,
            }
        }
    }
}

/// Kind of a built-in [`Policy`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, SmartDefault)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// [`AllowAll`] policy.
    #[default]
    AllowAll,

    /// [`RequireSession`] policy.
    RequireSession,
}

/// [`Guard`] configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Built-in [`Policy`] to use.
    pub policy: PolicyKind,

    /// [`Requirements`] of [`Route`]s.
    ///
    /// [`Route`]s missing here require nothing.
    pub routes: HashMap<Route, Requirements>,
}

/// Guard of navigation between [`Route`]s.
///
/// Follows the [`Status`] of the [`store::Auth`] it checks against.
#[derive(Debug)]
pub struct Guard {
    /// [`Policy`] of this [`Guard`].
    policy: Box<dyn Policy>,

    /// [`Requirements`] of [`Route`]s.
    requirements: HashMap<Route, Requirements>,
}

impl Default for Guard {
    fn default() -> Self {
        Self::new(AllowAll)
    }
}

impl From<Config> for Guard {
    fn from(config: Config) -> Self {
        let Config { policy, routes } = config;
        let guard = match policy {
            PolicyKind::AllowAll => Self::new(AllowAll),
            PolicyKind::RequireSession => Self::new(RequireSession),
        };
        routes
            .into_iter()
            .fold(guard, |g, (route, req)| g.require(route, req))
    }
}

impl Guard {
    /// Creates a new [`Guard`] with the provided [`Policy`].
    #[must_use]
    pub fn new(policy: impl Policy + 'static) -> Self {
        Self {
            policy: Box::new(policy),
            requirements: HashMap::new(),
        }
    }

    /// Annotates the provided [`Route`] with [`Requirements`].
    #[must_use]
    pub fn require(mut self, route: Route, requirements: Requirements) -> Self {
        drop(self.requirements.insert(route, requirements));
        self
    }

    /// Checks whether the provided `location` may be visited with the current
    /// state of the provided [`store::Auth`].
    #[must_use]
    pub fn check(&self, location: &str, auth: &store::Auth) -> Decision {
        let route = Route::resolve(location);
        let none = Requirements::default();
        let target = Target {
            location,
            route,
            requirements: self.requirements.get(&route).unwrap_or(&none),
        };
        self.policy.decide(&target, auth.session().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{route::Requirements, Route},
        store::{auth::tests::session, Auth},
    };

    use super::{Decision, Guard, RequireSession};

    fn requirements(roles: &[&str], permissions: &[&str]) -> Requirements {
        Requirements {
            roles: roles.iter().map(|&r| r.into()).collect(),
            permissions: permissions.iter().map(|&p| p.into()).collect(),
        }
    }

    #[test]
    fn allows_everything_by_default() {
        let guard = Guard::default()
            .require(Route::Patients, requirements(&["ADMIN"], &[]));

        assert_eq!(guard.check("/patients", &Auth::new()), Decision::Allow);
        assert_eq!(guard.check("/dashboard", &Auth::new()), Decision::Allow);
    }

    #[test]
    fn redirects_to_login_without_session() {
        let guard = Guard::new(RequireSession);
        let auth = Auth::new();

        assert_eq!(
            guard.check("/appointments?date=2024-03-01", &auth),
            Decision::Redirect {
                to: Route::Login,
                return_url: Some("/appointments?date=2024-03-01".into()),
            },
        );
        assert_eq!(guard.check("/auth/login", &auth), Decision::Allow);
    }

    #[test]
    fn redirects_to_unauthorized_without_rights() {
        let guard = Guard::new(RequireSession)
            .require(Route::Patients, requirements(&["NURSE", "DOCTOR"], &[]))
            .require(
                Route::PatientRegistration,
                requirements(&[], &["patients.write"]),
            )
            .require(
                Route::Calendar,
                requirements(&["ADMIN"], &["appointments.write"]),
            );
        let auth = Auth::new();
        _ = auth.establish(session("a", "r"));

        assert_eq!(guard.check("/patients", &auth), Decision::Allow);
        assert_eq!(guard.check("/dashboard", &auth), Decision::Allow);
        for location in ["/patients/register", "/appointments/calendar"] {
            assert_eq!(
                guard.check(location, &auth),
                Decision::Redirect {
                    to: Route::Unauthorized,
                    return_url: None,
                },
            );
        }
    }
}
