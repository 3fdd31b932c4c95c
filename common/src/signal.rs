//! [`Signal`] definitions.

use std::sync::Arc;

use tokio::sync::watch;

/// Observable value cell.
///
/// Reading right after a write always observes the written value, while
/// subscribers are notified about every change through a [`watch::Receiver`].
///
/// Clones of a [`Signal`] share the same underlying value.
#[derive(Debug)]
pub struct Signal<T>(Arc<watch::Sender<T>>);

impl<T> Signal<T> {
    /// Creates a new [`Signal`] holding the provided `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        let (tx, _) = watch::channel(value);
        Self(Arc::new(tx))
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().clone()
    }

    /// Inspects the current value with the provided function.
    ///
    /// The function must not access this [`Signal`] again.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Replaces the current value, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.0.send_replace(value)
    }

    /// Sets the current value, notifying subscribers.
    pub fn set(&self, value: T) {
        drop(self.replace(value));
    }

    /// Modifies the current value in place, notifying subscribers.
    ///
    /// The function must not access this [`Signal`] again.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut out = None;
        self.0.send_modify(|v| out = Some(f(v)));
        out.unwrap_or_else(|| unreachable!("`send_modify()` calls closure"))
    }

    /// Modifies the current value in place, notifying subscribers only if the
    /// provided function returns `true`.
    ///
    /// Returns the result of the provided function.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.0.send_if_modified(f)
    }

    /// Subscribes to changes of this [`Signal`].
    ///
    /// The returned [`watch::Receiver`] considers the current value as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.0.subscribe()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
