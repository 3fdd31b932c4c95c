//! Single-flight coordination of concurrent operations.

use std::future::Future;

use common::Signal;
use tokio::sync::watch;

/// Gate letting at most one operation be in flight at a time, sharing its
/// outcome with everyone who asked for it meanwhile.
#[derive(Clone, Debug)]
pub(crate) struct SingleFlight<T> {
    /// Current [`State`] of this gate.
    state: Signal<State<T>>,
}

/// State of a [`SingleFlight`] gate.
#[derive(Debug)]
struct State<T> {
    /// Operation in flight, if any.
    current: Option<Flight<T>>,

    /// Number of operations started so far.
    started: u64,
}

/// Operation in flight.
#[derive(Debug)]
struct Flight<T> {
    /// Sequence number of this [`Flight`].
    id: u64,

    /// Receiver of this [`Flight`]'s outcome.
    outcome: watch::Receiver<Option<T>>,
}

/// Role of a caller of a [`SingleFlight`] gate.
enum Role<T> {
    /// Caller performs the operation.
    Leader(Leader<T>),

    /// Caller awaits the outcome of the operation in flight.
    Follower(watch::Receiver<Option<T>>),
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            state: Signal::new(State {
                current: None,
                started: 0,
            }),
        }
    }
}

impl<T: Clone> SingleFlight<T> {
    /// Performs the operation returned by the provided function, unless one
    /// is in flight already, in which case its outcome is awaited instead.
    ///
    /// [`None`] is returned if the operation in flight is abandoned before
    /// completing.
    pub(crate) async fn run<F, Fut>(&self, op: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        match self.enter() {
            Role::Leader(leader) => {
                let outcome = op().await;
                leader.publish(outcome.clone());
                Some(outcome)
            }
            Role::Follower(mut rx) => rx
                .wait_for(Option::is_some)
                .await
                .ok()
                .and_then(|outcome| Option::clone(&outcome)),
        }
    }

    /// Indicates whether an operation is in flight.
    pub(crate) fn is_in_flight(&self) -> bool {
        self.state.with(|s| s.current.is_some())
    }

    /// Joins the operation in flight, or starts a new one.
    fn enter(&self) -> Role<T> {
        self.state.update(|s| {
            if let Some(flight) = &s.current {
                return Role::Follower(flight.outcome.clone());
            }
            s.started += 1;
            let (tx, rx) = watch::channel(None);
            s.current = Some(Flight {
                id: s.started,
                outcome: rx,
            });
            Role::Leader(Leader {
                id: s.started,
                outcome: tx,
                state: self.state.clone(),
            })
        })
    }
}

/// Guard of the caller performing the operation in flight.
///
/// Dropping it without publishing the outcome abandons the operation.
struct Leader<T> {
    /// Sequence number of the led [`Flight`].
    id: u64,

    /// Sender of the [`Flight`]'s outcome.
    outcome: watch::Sender<Option<T>>,

    /// [`State`] of the [`SingleFlight`] gate.
    state: Signal<State<T>>,
}

impl<T> Leader<T> {
    /// Publishes the `outcome` of the operation to all the awaiting callers.
    fn publish(self, outcome: T) {
        self.land();
        drop(self.outcome.send_replace(Some(outcome)));
    }

    /// Releases the gate, if it is still held by this [`Leader`].
    fn land(&self) {
        _ = self.state.update_if(|s| {
            let ours = s.current.as_ref().is_some_and(|f| f.id == self.id);
            if ours {
                s.current = None;
            }
            ours
        });
    }
}

impl<T> Drop for Leader<T> {
    fn drop(&mut self) {
        self.land();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        pin::pin,
        task::Poll,
        time::Duration,
    };

    use futures::{future, poll};
    use tokio::time;

    use super::SingleFlight;

    #[tokio::test(start_paused = true)]
    async fn shares_outcome_of_single_operation() {
        let gate = SingleFlight::<u32>::default();
        let runs = &Cell::new(0);

        let op = move || async move {
            runs.set(runs.get() + 1);
            time::sleep(Duration::from_secs(1)).await;
            42
        };
        let outcomes = future::join_all((0..5).map(|_| gate.run(op))).await;

        assert_eq!(runs.get(), 1);
        assert_eq!(outcomes, [Some(42); 5]);
        assert!(!gate.is_in_flight());

        assert_eq!(gate.run(op).await, Some(42));
        assert_eq!(runs.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn followers_observe_abandoned_leader() {
        let gate = SingleFlight::<u32>::default();

        let mut leader = Box::pin(gate.run(|| future::pending()));
        assert_eq!(poll!(leader.as_mut()), Poll::Pending);
        assert!(gate.is_in_flight());

        let mut follower = pin!(gate.run(|| async { unreachable!() }));
        assert_eq!(poll!(follower.as_mut()), Poll::Pending);

        drop(leader);
        assert!(!gate.is_in_flight());
        assert_eq!(follower.await, None);
    }
}
