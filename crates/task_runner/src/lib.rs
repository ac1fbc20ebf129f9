//! Task Runner
//!
//! Collects long-running background jobs (servers, listeners, scheduled sweeps) and
//! runs them until a shared shutdown signal is flipped. Every task receives a
//! `watch::Receiver<bool>` that stays `true` while the runner is alive.

use std::future::Future;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, Stream, StreamExt};
use futures::TryStreamExt;
use tokio::task::JoinError;
use tokio::time::{Duration, Instant};
use tokio::{sync::watch, task::JoinHandle};

pub type Alive = watch::Receiver<bool>;

pub trait Task {
    fn start(self, alive: Alive) -> JoinHandle<()>;
}

#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct ShutdownSignal(Arc<watch::Sender<bool>>);

impl ShutdownSignal {
    fn new() -> Self {
        ShutdownSignal(Arc::new(watch::channel(true).0))
    }

    fn subscribe(&self) -> Alive {
        self.0.subscribe()
    }

    pub fn stop(&self) {
        self.0.send_replace(false);
    }

    pub fn is_alive(&self) -> bool {
        *self.0.borrow()
    }
}

pub struct TaskRunner {
    tasks: FuturesUnordered<JoinHandle<()>>,
    alive: ShutdownSignal,
}

impl Default for TaskRunner {
    fn default() -> Self {
        TaskRunner::new()
    }
}

impl TaskRunner {
    pub fn new() -> Self {
        TaskRunner {
            tasks: FuturesUnordered::new(),
            alive: ShutdownSignal::new(),
        }
    }

    pub fn add(&self, task: impl Task) {
        self.tasks.push(task.start(self.alive.subscribe()))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn stop(&self) {
        self.alive.stop();
    }

    pub fn signal(&self) -> ShutdownSignal {
        self.alive.clone()
    }

    /// Waits for every task to finish, returning the first panic/cancellation if any.
    pub async fn wait(self) -> Result<(), JoinError> {
        self.try_fold((), |_, _| futures::future::ok(())).await
    }
}

impl Stream for TaskRunner {
    type Item = Result<(), JoinError>;

    #[inline]
    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.tasks.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tasks.size_hint()
    }
}

pub fn fn_task<S, T, F>(state: S, f: T) -> impl Task
where
    T: FnOnce(Alive, S) -> F + Send + 'static,
    F: Future<Output = ()> + Send + 'static,
    S: Send + 'static,
{
    struct AsyncTask<S, T>(S, T);

    impl<S, T, F> Task for AsyncTask<S, T>
    where
        T: FnOnce(Alive, S) -> F + Send + 'static,
        F: Future<Output = ()> + Send + 'static,
        S: Send + 'static,
    {
        fn start(self, alive: Alive) -> JoinHandle<()> {
            tokio::task::spawn(async move {
                let AsyncTask(state, f) = self;
                f(alive, state).await
            })
        }
    }

    AsyncTask(state, f)
}

/// Runs `f` every `period`, with the first tick after `delay`.
///
/// Used for jobs pinned to a wall-clock time, where `delay` is the time until the first run.
pub fn delayed_interval_fn_task<S, T, F>(state: S, delay: Duration, period: Duration, f: T) -> impl Task
where
    T: Fn(Instant, &S) -> F + Send + Sync + 'static,
    F: Future<Output = ()> + Send + 'static,
    S: Send + Sync + 'static,
{
    fn_task(state, move |mut alive, state| async move {
        let mut interval = tokio::time::interval_at(Instant::now() + delay, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        while *alive.borrow_and_update() {
            tokio::select! {
                biased;
                _ = alive.changed() => break,
                t = interval.tick() => f(t, &state).await,
            }
        }
    })
}
