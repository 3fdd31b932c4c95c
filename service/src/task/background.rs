//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Error of a [`Task`] failed in the [`Background`].
type TaskError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s on the current thread.
///
/// Nothing runs until the [`Background`] is awaited.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set of tasks.
    set: task::LocalSet,

    /// Handles of spawned tasks.
    handles: Vec<task::JoinHandle<Result<(), TaskError>>>,
}

impl Background {
    /// Spawns a new [`Task`] inside the [`Background`] environment.
    ///
    /// The [`Task`] may be neither [`Send`] nor [`Sync`].
    pub fn spawn<F, E>(&mut self, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        self.handles.push(self.set.spawn_local(future.map_err(|e| {
            log::error!("background task failed: {e}");
            TaskError::from(e)
        })));
    }

    /// Returns the number of spawned [`Task`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Indicates whether no [`Task`]s have been spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl IntoFuture for Background {
    type Output = Result<(), TaskError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    /// Runs all the spawned [`Task`]s, resolving once all of them complete or
    /// any of them fails.
    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        future::try_join_all(iter::once(set.map(Ok).boxed_local()).chain(
            handles.into_iter().map(|h| {
                h.map(|r| r.unwrap_or_else(|e| Err(TaskError::from(e))))
                    .boxed_local()
            }),
        ))
        .map_ok(drop)
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, convert::Infallible, io, rc::Rc};

    use super::Background;

    #[tokio::test]
    async fn runs_spawned_tasks_on_await() {
        let runs = Rc::new(Cell::new(0));
        let mut bg = Background::default();
        for _ in 0..3 {
            let runs = Rc::clone(&runs);
            bg.spawn(async move {
                runs.set(runs.get() + 1);
                Ok::<_, Infallible>(())
            });
        }
        assert_eq!(bg.len(), 3);
        assert_eq!(runs.get(), 0);

        bg.await.unwrap();
        assert_eq!(runs.get(), 3);
    }

    #[tokio::test]
    async fn propagates_task_failure() {
        let mut bg = Background::default();
        bg.spawn(async { Err::<(), _>(io::Error::other("boom")) });

        let err = bg.await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
