use std::sync::mpsc::channel;
use std::thread;
use tracing::debug;

use crate::Promise;

/// Waits for the first promise to settle and returns its outcome.
///
/// A rejection wins the race just like a resolution does. The winner is
/// whichever waiter reports first; there is no priority by position.
///
/// The remaining promises are not waited for. Their waiter threads keep
/// running in the background and exit once their promise settles; the
/// executors themselves are never interrupted.
///
/// # Panics
///
/// Panics if `promises` is empty, as a race without entrants never ends.
///
/// # Examples
///
/// ```
/// use settle::{await_race, Promise};
/// use std::{thread, time::Duration};
///
/// let promises: Vec<Promise<&str, ()>> = [(30, "p4"), (60, "p5"), (10, "p6")]
///     .into_iter()
///     .map(|(ms, value)| {
///         Promise::new(move |r| {
///             thread::sleep(Duration::from_millis(ms));
///             r.resolve(value);
///         })
///     })
///     .collect();
/// assert_eq!(await_race(&promises), Ok("p6"));
/// ```
pub fn await_race<T, E>(promises: &[Promise<T, E>]) -> Result<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    assert!(!promises.is_empty(), "race only works on non-empty slices");

    let (tx, rx) = channel();
    for (idx, promise) in promises.iter().enumerate() {
        let tx = tx.clone();
        let promise = promise.clone();
        thread::spawn(move || {
            // The receiver is gone once the race is decided.
            let _ = tx.send((idx, promise.wait()));
        });
    }
    drop(tx);

    match rx.recv() {
        Ok((idx, outcome)) => {
            debug!(idx, ok = outcome.is_ok(), "await_race decided");
            outcome
        }
        // Every waiter sends before exiting and `wait` does not panic.
        Err(_) => unreachable!("all race waiters exited without reporting"),
    }
}

/// Wait for the first promise to settle.
///
/// Implemented for slices, and through them for arrays and `Vec`s, of
/// [`Promise`]s. See [`await_race`].
pub trait AwaitRace {
    /// The resolved value of each promise.
    type Output;
    /// The failure of a rejected promise.
    type Error;

    /// Waits for the first promise to settle; see [`await_race`].
    fn await_race(&self) -> Result<Self::Output, Self::Error>;
}

impl<T, E> AwaitRace for [Promise<T, E>]
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    type Output = T;
    type Error = E;

    fn await_race(&self) -> Result<T, E> {
        await_race(self)
    }
}

#[cfg(test)]
mod tests {
    use super::await_race;
    use crate::prelude::*;
    use crate::Promise;
    use std::thread;
    use std::time::{Duration, Instant};

    fn delayed(
        ms: u64,
        outcome: Result<&'static str, &'static str>,
    ) -> Promise<&'static str, &'static str> {
        Promise::new(move |r| {
            thread::sleep(Duration::from_millis(ms));
            match outcome {
                Ok(value) => r.resolve(value),
                Err(err) => r.reject(err),
            };
        })
    }

    #[test]
    fn test_race_fastest_wins() {
        let start = Instant::now();
        let promises = [
            delayed(200, Ok("p4")),
            delayed(300, Ok("p5")),
            delayed(100, Ok("p6")),
        ];
        assert_eq!(promises.await_race(), Ok("p6"));
        assert!(start.elapsed() < Duration::from_millis(250));
    }

    #[test]
    fn test_race_failure_wins_if_fastest() {
        let promises = vec![
            delayed(150, Ok("slow")),
            delayed(10, Err("fast failure")),
            delayed(150, Ok("slower")),
        ];
        assert_eq!(await_race(&promises), Err("fast failure"));
    }

    #[test]
    fn test_race_already_settled() {
        let promises = vec![delayed(0, Ok("done")), delayed(500, Ok("pending"))];
        promises[0].wait_shared();
        assert_eq!(promises.await_race(), Ok("done"));
    }

    #[test]
    fn test_race_tie_is_arbitrary() {
        let promises = vec![delayed(0, Ok("hello")), delayed(0, Ok("world"))];
        let res = promises.await_race().unwrap();
        assert!(matches!(res, "hello" | "world"));
    }

    #[test]
    #[should_panic(expected = "race only works on non-empty slices")]
    fn test_race_empty_panics() {
        let promises: Vec<Promise<u8, ()>> = vec![];
        let _ = await_race(&promises);
    }
}
