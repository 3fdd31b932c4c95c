//! [`Auth`] session store.

use common::Signal;
use tokio::sync::watch;

use crate::domain::{
    user::{
        session::{AccessToken, RefreshToken},
        Permission,
    },
    Session, User,
};

/// Store of the authenticated [`Session`].
///
/// Reads are synchronous and always observe the latest write. Mutations are
/// performed by commands of the [`Service`] only.
///
/// [`Service`]: crate::Service
#[derive(Clone, Debug, Default)]
pub struct Auth {
    /// Current [`State`].
    state: Signal<State>,
}

/// State of an [`Auth`] store.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Current [`Session`], if any.
    session: Option<Session>,

    /// Current [`Epoch`].
    epoch: Epoch,

    /// Number of authentication operations in flight.
    busy: usize,
}

impl State {
    /// Returns the current [`Session`], if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns the [`Status`] of this [`State`].
    #[must_use]
    pub fn status(&self) -> Status {
        if self.session.is_some() {
            Status::Authenticated
        } else {
            Status::Unauthenticated
        }
    }

    /// Indicates whether an authentication operation is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy > 0
    }
}

/// Authentication status.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
pub enum Status {
    /// There is no [`Session`].
    Unauthenticated,

    /// There is an active [`Session`].
    Authenticated,
}

/// Generation of a [`Session`].
///
/// Changes whenever a [`Session`] is established or cleared, but not when it
/// is renewed, so an operation started within one [`Session`] may detect that
/// it has ended meanwhile.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Epoch(u64);

impl Epoch {
    /// Returns the next [`Epoch`].
    #[must_use]
    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl Auth {
    /// Creates a new unauthenticated [`Auth`] store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to changes of this [`Auth`] store.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<State> {
        self.state.subscribe()
    }

    /// Returns the current authentication [`Status`].
    #[must_use]
    pub fn status(&self) -> Status {
        self.state.with(State::status)
    }

    /// Indicates whether there is an active [`Session`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == Status::Authenticated
    }

    /// Returns the current [`Session`], if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.state.with(|s| s.session.clone())
    }

    /// Returns the [`User`] of the current [`Session`], if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.with_user(User::clone)
    }

    /// Returns the full name of the current [`User`], if any.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        self.with_user(User::full_name)
    }

    /// Returns the role name of the current [`User`], if any.
    #[must_use]
    pub fn role_name(&self) -> Option<String> {
        self.with_user(|u| u.role.name.clone())
    }

    /// Checks whether the current [`User`] has the [`Permission`] with the
    /// provided `name`.
    ///
    /// Always `false` without a [`Session`].
    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.with_user(|u| u.has_permission(name)).unwrap_or(false)
    }

    /// Checks whether the current [`User`] has the role with the provided
    /// `name`.
    ///
    /// Always `false` without a [`Session`].
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.with_user(|u| u.has_role(name)).unwrap_or(false)
    }

    /// Returns the effective [`Permission`]s of the current [`User`].
    #[must_use]
    pub fn permissions(&self) -> Vec<Permission> {
        self.with_user(|u| {
            u.effective_permissions().into_iter().cloned().collect()
        })
        .unwrap_or_default()
    }

    /// Returns the [`AccessToken`] of the current [`Session`], if any.
    #[must_use]
    pub fn access_token(&self) -> Option<AccessToken> {
        self.state
            .with(|s| s.session.as_ref().map(|s| s.access_token.clone()))
    }

    /// Returns the [`RefreshToken`] of the current [`Session`], if any.
    ///
    /// An empty [`RefreshToken`] is considered absent.
    #[must_use]
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.state.with(|s| {
            s.session
                .as_ref()
                .map(|s| s.refresh_token.clone())
                .filter(|t| !t.as_ref().is_empty())
        })
    }

    /// Indicates whether an authentication operation is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state.with(State::is_busy)
    }

    /// Returns the current [`Epoch`].
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.state.with(|s| s.epoch)
    }

    /// Inspects the current [`User`] with the provided function.
    fn with_user<R>(&self, f: impl FnOnce(&User) -> R) -> Option<R> {
        self.state.with(|s| s.session.as_ref().map(|s| f(&s.user)))
    }

    /// Marks an authentication operation in flight until the returned
    /// [`Busy`] guard is dropped.
    pub(crate) fn busy(&self) -> Busy {
        self.state.update(|s| s.busy += 1);
        Busy(self.state.clone())
    }

    /// Establishes a new [`Session`], starting a new [`Epoch`].
    pub(crate) fn establish(&self, session: Session) -> Epoch {
        self.state.update(|s| {
            s.session = Some(session);
            s.epoch = s.epoch.next();
            s.epoch
        })
    }

    /// Replaces the current [`Session`] with the renewed one, unless the
    /// provided [`Epoch`] has ended.
    ///
    /// Returns whether the [`Session`] has been replaced.
    pub(crate) fn renew(&self, epoch: Epoch, session: Session) -> bool {
        self.state.update_if(|s| {
            let alive = s.epoch == epoch && s.session.is_some();
            if alive {
                s.session = Some(session);
            }
            alive
        })
    }

    /// Replaces the [`User`] of the current [`Session`], unless the provided
    /// [`Epoch`] has ended.
    ///
    /// Returns whether the [`User`] has been replaced.
    pub(crate) fn set_user(&self, epoch: Epoch, user: User) -> bool {
        self.state.update_if(|s| match &mut s.session {
            Some(session) if s.epoch == epoch => {
                session.user = user;
                true
            }
            Some(_) | None => false,
        })
    }

    /// Clears the current [`Session`], starting a new [`Epoch`].
    ///
    /// Returns whether there was a [`Session`] to clear.
    pub(crate) fn clear(&self) -> bool {
        self.state.update(|s| {
            s.epoch = s.epoch.next();
            s.session.take().is_some()
        })
    }

    /// Clears the current [`Session`], unless the provided [`Epoch`] has
    /// ended.
    ///
    /// Returns whether there was a [`Session`] to clear.
    pub(crate) fn clear_within(&self, epoch: Epoch) -> bool {
        self.state.update_if(|s| {
            if s.epoch != epoch || s.session.is_none() {
                return false;
            }
            s.session = None;
            s.epoch = s.epoch.next();
            true
        })
    }
}

/// Guard marking an authentication operation in flight.
#[derive(Debug)]
pub(crate) struct Busy(Signal<State>);

impl Drop for Busy {
    fn drop(&mut self) {
        self.0.update(|s| s.busy = s.busy.saturating_sub(1));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;

    use crate::domain::{user::tests::user_json, Session};

    use super::{Auth, Status};

    /// Returns a [`Session`] with the provided tokens.
    pub(crate) fn session(access: &str, refresh: &str) -> Session {
        serde_json::from_value(json!({
            "user": user_json(),
            "token": access,
            "refreshToken": refresh,
            "expiresIn": 3600,
        }))
        .unwrap()
    }

    #[test]
    fn derived_reads_without_session() {
        let auth = Auth::new();

        assert_eq!(auth.status(), Status::Unauthenticated);
        assert_eq!(auth.full_name(), None);
        assert_eq!(auth.role_name(), None);
        assert!(!auth.has_permission("patients.read"));
        assert!(!auth.has_role("DOCTOR"));
        assert!(auth.permissions().is_empty());
        assert!(auth.access_token().is_none());
    }

    #[test]
    fn derived_reads_with_session() {
        let auth = Auth::new();
        _ = auth.establish(session("a", "r"));

        assert!(auth.is_authenticated());
        assert_eq!(auth.full_name().as_deref(), Some("John Doe"));
        assert_eq!(auth.role_name().as_deref(), Some("DOCTOR"));
        assert!(auth.has_permission("appointments.write"));
        assert!(auth.has_role("DOCTOR"));
        assert_eq!(auth.permissions().len(), 2);
        assert_eq!(auth.access_token().unwrap().as_ref(), "a");
    }

    #[test]
    fn renewal_is_discarded_after_clearing() {
        let auth = Auth::new();
        let epoch = auth.establish(session("a-1", "r-1"));

        assert!(auth.renew(epoch, session("a-2", "r-2")));
        assert_eq!(auth.access_token().unwrap().as_ref(), "a-2");

        assert!(auth.clear());
        assert!(!auth.renew(epoch, session("a-3", "r-3")));
        assert!(!auth.is_authenticated());

        let next = auth.establish(session("a-4", "r-4"));
        assert!(!auth.clear_within(epoch));
        assert!(auth.is_authenticated());
        assert!(auth.clear_within(next));
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn busy_while_guard_alive() {
        let auth = Auth::new();

        let first = auth.busy();
        let second = auth.busy();
        assert!(auth.is_busy());

        drop(first);
        assert!(auth.is_busy());
        drop(second);
        assert!(!auth.is_busy());
    }
}
