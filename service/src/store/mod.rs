//! Reactive stores of the client state.
//!
//! Every store is a cheaply cloneable handle: clones observe and modify the
//! same state, and every read observes the latest write.

pub mod auth;
pub mod loading;
pub mod locale;
pub mod notifications;
pub mod theme;

pub use self::{
    auth::Auth, loading::Loading, locale::Locale,
    notifications::Notifications, theme::Theme,
};
