use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
};
use tracing::{debug, trace};

/// A unit of work running on its own thread that settles exactly once.
///
/// The executor passed to [`Promise::new`] starts immediately on a new thread
/// and settles the promise through its [`Resolver`]. Handles are cheap to
/// clone; every clone observes the same outcome.
///
/// # Examples
///
/// ```
/// use settle::Promise;
/// use std::thread;
///
/// let promise = Promise::<String, ()>::new(|r| {
///     r.resolve("Hi".into());
/// });
/// let other = promise.clone();
/// let task1 = thread::spawn(move || {
///     println!("Received on task 1 {:?}", other.wait());
/// });
/// assert_eq!(promise.wait(), Ok("Hi".to_string()));
/// task1.join().expect("The task1 thread has panicked.");
/// ```
pub struct Promise<T, E> {
    inner: Arc<Inner<T, E>>,
}

/// The settlement side of a [`Promise`], handed to its executor.
///
/// Only the first call to [`resolve`](Resolver::resolve) or
/// [`reject`](Resolver::reject), across all clones, has any effect.
pub struct Resolver<T, E> {
    inner: Arc<Inner<T, E>>,
}

struct Inner<T, E> {
    state: Mutex<State<T, E>>,
    settled: Condvar,
}

struct State<T, E> {
    outcome: Option<Arc<Result<T, E>>>,
    // Async waiters. Blocking waiters park on the condvar instead. A future
    // dropped before settlement leaves its waker here until settle drains it.
    wakers: Vec<Waker>,
}

impl<T, E> Inner<T, E> {
    fn new() -> Self {
        Self {
            state: Mutex::new(State {
                outcome: None,
                wakers: vec![],
            }),
            settled: Condvar::new(),
        }
    }

    fn settle(&self, outcome: Result<T, E>) -> bool {
        let ok = outcome.is_ok();
        let mut state = self.state.lock();
        if state.outcome.is_some() {
            debug!(ok, "promise already settled, ignoring");
            return false;
        }
        state.outcome = Some(Arc::new(outcome));
        let wakers = std::mem::take(&mut state.wakers);
        drop(state);

        trace!(ok, "promise settled");
        self.settled.notify_all();
        for waker in wakers {
            waker.wake();
        }
        true
    }
}

impl<T, E> Promise<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Creates a promise and runs `executor` on a new thread.
    ///
    /// Returns before the executor has necessarily started. The executor must
    /// eventually call [`Resolver::resolve`] or [`Resolver::reject`];
    /// otherwise every waiter blocks forever.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to create a thread; use
    /// [`Builder::spawn`](crate::Builder::spawn) to recover from such errors.
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) + Send + 'static,
    {
        let (promise, resolver) = Self::pending();
        std::thread::spawn(move || executor(resolver));
        debug!("spawned promise executor");
        promise
    }
}

impl<T, E> Promise<T, E> {
    /// A promise with no executor attached yet, plus its resolver.
    pub(crate) fn pending() -> (Self, Resolver<T, E>) {
        let inner = Arc::new(Inner::new());
        (
            Promise {
                inner: inner.clone(),
            },
            Resolver { inner },
        )
    }

    /// Blocks the calling thread until the promise settles and returns the
    /// shared outcome.
    ///
    /// Returns immediately if the promise has already settled. The outcome is
    /// never consumed: every caller gets the same `Arc`.
    pub fn wait_shared(&self) -> Arc<Result<T, E>> {
        let mut state = self.inner.state.lock();
        loop {
            if let Some(outcome) = &state.outcome {
                return outcome.clone();
            }
            self.inner.settled.wait(&mut state);
        }
    }

    /// Returns `true` once the promise has been resolved or rejected.
    pub fn is_settled(&self) -> bool {
        self.inner.state.lock().outcome.is_some()
    }
}

impl<T: Clone, E: Clone> Promise<T, E> {
    /// Blocks the calling thread until the promise settles.
    ///
    /// Returns the resolved value, or the error passed to
    /// [`Resolver::reject`].
    pub fn wait(&self) -> Result<T, E> {
        (*self.wait_shared()).clone()
    }

    /// Returns the outcome if the promise has settled, without blocking.
    pub fn try_wait(&self) -> Option<Result<T, E>> {
        let state = self.inner.state.lock();
        state.outcome.as_deref().cloned()
    }
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("settled", &self.is_settled())
            .finish()
    }
}

impl<T: Clone, E: Clone> Future for Promise<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.inner.state.lock();
        if let Some(outcome) = &state.outcome {
            return Poll::Ready((**outcome).clone());
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

impl<T, E> Resolver<T, E> {
    /// Settles the promise with `value`.
    ///
    /// Returns `false`, leaving the promise untouched, if it was already
    /// settled.
    pub fn resolve(&self, value: T) -> bool {
        self.inner.settle(Ok(value))
    }

    /// Settles the promise with `err`.
    ///
    /// Returns `false`, leaving the promise untouched, if it was already
    /// settled.
    pub fn reject(&self, err: E) -> bool {
        self.inner.settle(Err(err))
    }

    /// Returns `true` once the promise has been resolved or rejected.
    pub fn is_settled(&self) -> bool {
        self.inner.state.lock().outcome.is_some()
    }
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("settled", &self.is_settled())
            .finish()
    }
}
