use parking_lot::Mutex;
use std::thread;
use tracing::debug;

use crate::Promise;

/// Waits for every promise to settle.
///
/// Returns the values in the same order as `promises`, regardless of the
/// order in which they settled. If any promise is rejected, returns the first
/// failure observed instead and discards every value. Which failure is
/// observed first is a race between the waiters when several promises fail.
///
/// Each promise is waited on by its own scoped thread, and this function
/// returns only after all of them are done, even once a failure is known.
///
/// # Examples
///
/// ```
/// use settle::{await_all, Promise};
///
/// let promises: Vec<Promise<u8, ()>> = (1..=3)
///     .map(|i| Promise::new(move |r| { r.resolve(i); }))
///     .collect();
/// assert_eq!(await_all(&promises), Ok(vec![1, 2, 3]));
/// ```
pub fn await_all<T, E>(promises: &[Promise<T, E>]) -> Result<Vec<T>, E>
where
    T: Clone + Send + Sync,
    E: Clone + Send + Sync,
{
    let values: Mutex<Vec<Option<T>>> = Mutex::new(vec![None; promises.len()]);
    let first_err: Mutex<Option<E>> = Mutex::new(None);

    thread::scope(|s| {
        for (idx, promise) in promises.iter().enumerate() {
            let values = &values;
            let first_err = &first_err;
            s.spawn(move || match promise.wait() {
                Ok(value) => values.lock()[idx] = Some(value),
                Err(err) => {
                    let mut slot = first_err.lock();
                    if slot.is_none() {
                        debug!(idx, "await_all observed first failure");
                        *slot = Some(err);
                    }
                }
            });
        }
    });

    if let Some(err) = first_err.into_inner() {
        return Err(err);
    }
    // With no failure recorded, every slot was filled.
    Ok(values.into_inner().into_iter().flatten().collect())
}

/// Wait for all promises to settle.
///
/// Implemented for slices, and through them for arrays and `Vec`s, of
/// [`Promise`]s. See [`await_all`].
pub trait AwaitAll {
    /// The resolved value of each promise.
    type Output;
    /// The failure of a rejected promise.
    type Error;

    /// Waits for every promise; see [`await_all`].
    fn await_all(&self) -> Result<Vec<Self::Output>, Self::Error>;
}

impl<T, E> AwaitAll for [Promise<T, E>]
where
    T: Clone + Send + Sync,
    E: Clone + Send + Sync,
{
    type Output = T;
    type Error = E;

    fn await_all(&self) -> Result<Vec<T>, E> {
        await_all(self)
    }
}
