//! [`Notifications`] store.

use std::{collections::HashMap, time::Duration};

use common::Signal;
use smart_default::SmartDefault;
use tokio::{sync::watch, time::Instant};
use tracing as log;

use crate::domain::{
    notification::{self, Draft, Kind},
    Notification,
};

/// Store of the [`Notification`]s shown to a user, in display order.
///
/// Expired [`Notification`]s are removed by the [`ExpireNotifications`] task.
///
/// [`ExpireNotifications`]: crate::task::ExpireNotifications
#[derive(Clone, Debug, SmartDefault)]
pub struct Notifications {
    /// Current [`State`].
    state: Signal<State>,

    /// Indicator whether showing [`Notification`]s is enabled.
    #[default(true)]
    enabled: bool,
}

/// State of a [`Notifications`] store.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Shown [`Notification`]s in display order.
    items: Vec<Notification>,

    /// Moments the [`Notification`]s should be removed at.
    deadlines: HashMap<notification::Id, Instant>,
}

impl State {
    /// Returns the shown [`Notification`]s in display order.
    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Returns the number of unread [`Notification`]s.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }
}

impl Notifications {
    /// Creates a new empty [`Notifications`] store.
    ///
    /// If not `enabled`, nothing is ever shown.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            state: Signal::default(),
            enabled,
        }
    }

    /// Subscribes to changes of this [`Notifications`] store.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<State> {
        self.state.subscribe()
    }

    /// Shows a new [`Notification`] out of the provided [`Draft`].
    ///
    /// Returns the [`notification::Id`] of the shown [`Notification`].
    pub fn push(&self, draft: Draft) -> notification::Id {
        let id = notification::Id::new();
        if !self.enabled {
            log::debug!(
                kind = %draft.kind,
                title = %draft.title,
                "notifications are disabled, skipping",
            );
            return id;
        }

        let deadline = draft.duration.map(|d| Instant::now() + d);
        let notification = draft.into_notification(id);
        self.state.update(|s| {
            if let Some(at) = deadline {
                drop(s.deadlines.insert(id, at));
            }
            s.items.push(notification);
        });
        id
    }

    /// Shows a new [`Notification`].
    ///
    /// [`None`] or zero `duration` makes it persist until removed.
    pub fn show(
        &self,
        kind: Kind,
        title: impl Into<String>,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> notification::Id {
        let draft = Notification::draft(kind, title, message);
        self.push(match duration {
            Some(d) => draft.duration(d),
            None => draft.persistent(),
        })
    }

    /// Shows a [`Kind::Success`] [`Notification`] for the default duration.
    pub fn success(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> notification::Id {
        self.push(Notification::draft(Kind::Success, title, message))
    }

    /// Shows a persistent [`Kind::Error`] [`Notification`].
    pub fn error(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> notification::Id {
        self.push(Notification::draft(Kind::Error, title, message))
    }

    /// Shows a [`Kind::Warning`] [`Notification`] for the default duration.
    pub fn warning(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> notification::Id {
        self.push(Notification::draft(Kind::Warning, title, message))
    }

    /// Shows a [`Kind::Info`] [`Notification`] for the default duration.
    pub fn info(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> notification::Id {
        self.push(Notification::draft(Kind::Info, title, message))
    }

    /// Marks the [`Notification`] with the provided ID as read.
    ///
    /// Returns whether such [`Notification`] exists.
    pub fn mark_read(&self, id: notification::Id) -> bool {
        self.state.update_if(|s| {
            s.items
                .iter_mut()
                .find(|n| n.id == id)
                .map(|n| n.read = true)
                .is_some()
        })
    }

    /// Marks all the [`Notification`]s as read.
    pub fn mark_all_read(&self) {
        self.state.update(|s| {
            for n in &mut s.items {
                n.read = true;
            }
        });
    }

    /// Removes the [`Notification`] with the provided ID.
    ///
    /// Returns whether such [`Notification`] existed.
    pub fn remove(&self, id: notification::Id) -> bool {
        self.state.update_if(|s| {
            drop(s.deadlines.remove(&id));
            let before = s.items.len();
            s.items.retain(|n| n.id != id);
            s.items.len() != before
        })
    }

    /// Removes all the [`Notification`]s.
    pub fn clear_all(&self) {
        self.state.update(|s| {
            s.items.clear();
            s.deadlines.clear();
        });
    }

    /// Removes all the [`Notification`]s of the provided [`Kind`].
    pub fn clear_by_kind(&self, kind: Kind) {
        _ = self.state.update_if(|s| {
            let State { items, deadlines } = s;
            let before = items.len();
            items.retain(|n| n.kind != kind);
            deadlines.retain(|id, _| items.iter().any(|n| n.id == *id));
            items.len() != before
        });
    }

    /// Returns all the shown [`Notification`]s in display order.
    #[must_use]
    pub fn all(&self) -> Vec<Notification> {
        self.state.with(|s| s.items.clone())
    }

    /// Returns the shown [`Notification`]s of the provided [`Kind`].
    #[must_use]
    pub fn by_kind(&self, kind: Kind) -> Vec<Notification> {
        self.filtered(|n| n.kind == kind)
    }

    /// Returns the unread [`Notification`]s.
    #[must_use]
    pub fn unread(&self) -> Vec<Notification> {
        self.filtered(|n| !n.read)
    }

    /// Returns the number of unread [`Notification`]s.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.state.with(State::unread_count)
    }

    /// Returns the earliest moment a [`Notification`] should be removed at.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.with(|s| s.deadlines.values().min().copied())
    }

    /// Removes all the [`Notification`]s whose deadline is not after `now`.
    ///
    /// Returns the number of removed [`Notification`]s.
    pub fn expire(&self, now: Instant) -> usize {
        let mut expired = 0;
        _ = self.state.update_if(|s| {
            let State { items, deadlines } = s;
            deadlines.retain(|_, at| *at > now);
            let before = items.len();
            items.retain(|n| {
                n.duration.is_none() || deadlines.contains_key(&n.id)
            });
            expired = before - items.len();
            expired > 0
        });
        expired
    }

    /// Returns the shown [`Notification`]s matching the provided predicate.
    fn filtered(&self, f: impl Fn(&Notification) -> bool) -> Vec<Notification> {
        self.state
            .with(|s| s.items.iter().filter(|n| f(n)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use crate::domain::notification::Kind;

    use super::Notifications;

    #[test]
    fn list_transforms() {
        let store = Notifications::default();

        let first = store.success("Saved", "Patient saved");
        let second = store.error("Oops", "Something broke");
        let third = store.info("FYI", "New version");
        assert_eq!(store.unread_count(), 3);

        assert!(store.mark_read(first));
        assert_eq!(store.unread_count(), 2);
        assert_eq!(store.unread().len(), 2);

        store.clear_by_kind(Kind::Error);
        let ids = store.all().into_iter().map(|n| n.id).collect::<Vec<_>>();
        assert_eq!(ids, [first, third]);
        assert!(!store.mark_read(second));

        assert!(store.remove(third));
        assert!(!store.remove(third));

        store.mark_all_read();
        assert_eq!(store.unread_count(), 0);

        store.clear_all();
        assert!(store.all().is_empty());
        assert_eq!(store.next_deadline(), None);
    }

    #[test]
    fn disabled_store_shows_nothing() {
        let store = Notifications::new(false);

        let _ = store.warning("Careful", "Disk almost full");
        assert!(store.all().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expires_only_timed_notifications() {
        let store = Notifications::default();
        let start = Instant::now();

        let persistent = store.show(Kind::Info, "Sticky", "", None);
        let _zero = store.show(Kind::Info, "Zero", "", Some(Duration::ZERO));
        let short = store.show(Kind::Info, "Short", "", Some(Duration::from_secs(1)));
        let _long = store.info("Long", "");

        assert_eq!(store.next_deadline(), Some(start + Duration::from_secs(1)));

        assert_eq!(store.expire(start + Duration::from_millis(999)), 0);
        assert_eq!(store.expire(start + Duration::from_secs(1)), 1);
        assert!(!store.remove(short));

        assert_eq!(store.expire(start + Duration::from_secs(5)), 1);
        let left = store.all().into_iter().map(|n| n.title).collect::<Vec<_>>();
        assert_eq!(left, ["Sticky", "Zero"]);
        assert!(store.remove(persistent));
        assert_eq!(store.next_deadline(), None);
    }
}
