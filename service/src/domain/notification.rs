//! [`Notification`] definitions.

use std::time::Duration;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transient message displayed to a user.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// ID of this [`Notification`].
    pub id: Id,

    /// [`Kind`] of this [`Notification`].
    #[serde(rename = "type")]
    pub kind: Kind,

    /// Title of this [`Notification`].
    pub title: String,

    /// Message of this [`Notification`].
    pub message: String,

    /// [`Duration`] after which this [`Notification`] is removed
    /// automatically.
    ///
    /// [`None`] means that it persists until removed explicitly.
    pub duration: Option<Duration>,

    /// [`Action`]s offered by this [`Notification`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,

    /// [`DateTime`] when this [`Notification`] was created.
    pub created_at: CreationDateTime,

    /// Indicator whether this [`Notification`] has been read.
    pub read: bool,
}

impl Notification {
    /// Starts a [`Draft`] of a new [`Notification`].
    #[must_use]
    pub fn draft(
        kind: Kind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Draft {
        Draft {
            kind,
            title: title.into(),
            message: message.into(),
            duration: kind.default_duration(),
            actions: vec![],
        }
    }
}

/// ID of a [`Notification`].
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq, Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of a [`Notification`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    /// Operation succeeded.
    Success,

    /// Operation failed.
    Error,

    /// Something requires attention.
    Warning,

    /// Neutral information.
    Info,
}

impl Kind {
    /// Returns the [`Duration`] a [`Notification`] of this [`Kind`] is shown
    /// for by default.
    ///
    /// Errors persist until dismissed.
    #[must_use]
    pub const fn default_duration(self) -> Option<Duration> {
        match self {
            Self::Success | Self::Warning | Self::Info => {
                Some(Duration::from_millis(5000))
            }
            Self::Error => None,
        }
    }
}

/// Action offered by a [`Notification`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Action {
    /// Label of this [`Action`].
    pub label: String,

    /// Visual [`ActionStyle`] of this [`Action`].
    pub style: ActionStyle,
}

/// Visual style of an [`Action`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    /// Main action.
    #[default]
    Primary,

    /// Secondary action.
    Secondary,

    /// Destructive action.
    Danger,
}

/// Draft of a [`Notification`] not shown yet.
#[derive(Clone, Debug)]
pub struct Draft {
    /// [`Kind`] of the [`Notification`].
    pub kind: Kind,

    /// Title of the [`Notification`].
    pub title: String,

    /// Message of the [`Notification`].
    pub message: String,

    /// [`Duration`] of the [`Notification`].
    pub duration: Option<Duration>,

    /// [`Action`]s of the [`Notification`].
    pub actions: Vec<Action>,
}

impl Draft {
    /// Sets the [`Duration`] of the [`Notification`].
    ///
    /// A zero [`Duration`] makes it persistent.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = (!duration.is_zero()).then_some(duration);
        self
    }

    /// Makes the [`Notification`] persistent.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.duration = None;
        self
    }

    /// Adds an [`Action`] to the [`Notification`].
    #[must_use]
    pub fn action(mut self, label: impl Into<String>, style: ActionStyle) -> Self {
        self.actions.push(Action {
            label: label.into(),
            style,
        });
        self
    }

    /// Turns this [`Draft`] into a [`Notification`] with the provided [`Id`].
    #[must_use]
    pub fn into_notification(self, id: Id) -> Notification {
        let Self {
            kind,
            title,
            message,
            duration,
            actions,
        } = self;
        Notification {
            id,
            kind,
            title,
            message,
            duration,
            actions,
            created_at: CreationDateTime::now(),
            read: false,
        }
    }
}

/// [`DateTime`] when a [`Notification`] was created.
pub type CreationDateTime = DateTimeOf<(Notification, unit::Creation)>;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Kind, Notification};

    #[test]
    fn errors_persist_by_default() {
        assert_eq!(Kind::Error.default_duration(), None);
        assert_eq!(
            Kind::Info.default_duration(),
            Some(Duration::from_secs(5)),
        );
    }

    #[test]
    fn zero_duration_means_persistent() {
        let draft = Notification::draft(Kind::Success, "Saved", "")
            .duration(Duration::ZERO);

        assert_eq!(draft.duration, None);
    }
}
