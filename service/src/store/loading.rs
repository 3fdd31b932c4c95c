//! [`Loading`] store.

use std::{collections::HashSet, future::Future};

use common::{Percent, Signal};
use tokio::sync::watch;

/// Store of the global busy indicator.
///
/// The indicator is on while at least one issued [`Token`] is outstanding.
#[derive(Clone, Debug, Default)]
pub struct Loading {
    /// Current [`State`].
    state: Signal<State>,
}

/// State of a [`Loading`] store.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Outstanding [`Token`]s.
    outstanding: HashSet<Token>,

    /// Number of [`Token`]s issued so far.
    issued: u64,

    /// Message describing the ongoing work.
    message: Option<String>,

    /// Progress of the ongoing work.
    progress: Option<Percent>,
}

impl State {
    /// Indicates whether any work is ongoing.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.outstanding.is_empty()
    }

    /// Returns the message describing the ongoing work.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the progress of the ongoing work.
    #[must_use]
    pub fn progress(&self) -> Option<Percent> {
        self.progress
    }

    /// Resets the description once no work is ongoing.
    fn settle(&mut self) {
        if self.outstanding.is_empty() {
            self.message = None;
            self.progress = None;
        }
    }
}

/// Opaque token of an ongoing work issued by a [`Loading`] store.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Token(u64);

impl Loading {
    /// Creates a new idle [`Loading`] store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to changes of this [`Loading`] store.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<State> {
        self.state.subscribe()
    }

    /// Starts a new ongoing work, optionally describing it.
    ///
    /// The work lasts until the returned [`Token`] is passed to
    /// [`Loading::hide()`].
    pub fn show(&self, message: Option<String>, progress: Option<f64>) -> Token {
        self.state.update(|s| {
            s.issued += 1;
            let token = Token(s.issued);
            _ = s.outstanding.insert(token);
            if message.is_some() {
                s.message = message;
            }
            if let Some(p) = progress {
                s.progress = Some(Percent::clamped(p));
            }
            token
        })
    }

    /// Finishes the ongoing work of the provided [`Token`].
    ///
    /// Unknown and already finished [`Token`]s are ignored.
    pub fn hide(&self, token: Token) {
        _ = self.state.update_if(|s| {
            let removed = s.outstanding.remove(&token);
            if removed {
                s.settle();
            }
            removed
        });
    }

    /// Finishes all the ongoing works.
    pub fn hide_all(&self) {
        _ = self.state.update_if(|s| {
            let had_any = !s.outstanding.is_empty();
            s.outstanding.clear();
            s.settle();
            had_any
        });
    }

    /// Replaces the message describing the ongoing work.
    pub fn update_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.update(|s| s.message = Some(message));
    }

    /// Replaces the progress of the ongoing work, clamping it into the
    /// `[0, 100]` range.
    pub fn update_progress(&self, progress: f64) {
        self.state
            .update(|s| s.progress = Some(Percent::clamped(progress)));
    }

    /// Replaces the progress and, optionally, the message of the ongoing
    /// work.
    pub fn set_progress(&self, progress: f64, message: Option<String>) {
        self.state.update(|s| {
            s.progress = Some(Percent::clamped(progress));
            if message.is_some() {
                s.message = message;
            }
        });
    }

    /// Indicates whether any work is ongoing.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.with(State::is_loading)
    }

    /// Returns the message describing the ongoing work.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.state.with(|s| s.message.clone())
    }

    /// Returns the progress of the ongoing work.
    #[must_use]
    pub fn progress(&self) -> Option<Percent> {
        self.state.with(State::progress)
    }

    /// Starts a new ongoing work lasting until the returned [`Scope`] is
    /// dropped.
    #[must_use]
    pub fn scope(&self, message: Option<String>) -> Scope {
        Scope {
            token: self.show(message, None),
            store: self.clone(),
        }
    }

    /// Awaits the provided [`Future`] as an ongoing work.
    ///
    /// The work finishes once the [`Future`] completes or is dropped.
    pub async fn wrap<F: Future>(&self, fut: F, message: Option<String>) -> F::Output {
        let _scope = self.scope(message);
        fut.await
    }
}

/// Guard of an ongoing work issued by a [`Loading`] store.
#[derive(Debug)]
pub struct Scope {
    /// [`Token`] of the ongoing work.
    token: Token,

    /// [`Loading`] store the [`Token`] was issued by.
    store: Loading,
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.store.hide(self.token);
    }
}

#[cfg(test)]
mod tests {
    use std::{future, pin::pin, task::Poll};

    use common::Percent;
    use futures::poll;

    use super::Loading;

    #[test]
    fn busy_while_tokens_outstanding() {
        let store = Loading::new();

        let a = store.show(Some("Saving".into()), Some(150.0));
        let b = store.show(None, None);
        assert!(store.is_loading());
        assert_eq!(store.message().as_deref(), Some("Saving"));
        assert_eq!(store.progress(), Some(Percent::HUNDRED));

        store.hide(a);
        assert!(store.is_loading());
        store.hide(a);
        assert!(store.is_loading());

        store.hide(b);
        assert!(!store.is_loading());
        assert_eq!(store.message(), None);
        assert_eq!(store.progress(), None);

        store.hide(b);
        assert!(!store.is_loading());
    }

    #[test]
    fn hide_without_token_finishes_everything() {
        let store = Loading::new();
        let _ = store.show(None, None);
        let _ = store.show(None, None);

        store.hide_all();
        assert!(!store.is_loading());
    }

    #[test]
    fn clamps_progress() {
        let store = Loading::new();
        let token = store.show(None, None);

        store.update_progress(-3.0);
        assert_eq!(store.progress(), Some(Percent::ZERO));

        store.set_progress(41.6, Some("Uploading".into()));
        assert_eq!(store.progress().map(Percent::get), Some(42));
        assert_eq!(store.message().as_deref(), Some("Uploading"));

        store.hide(token);
    }

    #[tokio::test]
    async fn wrap_finishes_on_drop() {
        let store = Loading::new();

        {
            let mut fut = pin!(store.wrap(future::pending::<()>(), None));
            assert_eq!(poll!(fut.as_mut()), Poll::Pending);
            assert!(store.is_loading());
        }
        assert!(!store.is_loading());

        let out = store.wrap(async { 7 }, Some("Computing".into())).await;
        assert_eq!(out, 7);
        assert!(!store.is_loading());
    }
}
