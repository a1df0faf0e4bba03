//! Single-settlement promises backed by OS threads.
//!
//! A [`Promise`] runs its executor on a new thread as soon as it is created.
//! The executor receives a [`Resolver`] and settles the promise exactly once,
//! either with [`Resolver::resolve`] or [`Resolver::reject`]. Any number of
//! threads may then block on [`Promise::wait`] and all of them observe the same
//! outcome.
//!
//! Two aggregators compose promises:
//!
//! - [`await_all`]: wait for every promise, returning the values in input
//!   order or the first failure observed.
//! - [`await_race`]: return the outcome of whichever promise settles first.
//!
//! # Examples
//!
//! ```
//! use settle::{await_all, await_race, Promise};
//! use std::{thread, time::Duration};
//!
//! let slow = Promise::<&str, String>::new(|r| {
//!     thread::sleep(Duration::from_millis(300));
//!     r.resolve("slow");
//! });
//! let fast = Promise::new(|r| {
//!     r.resolve("fast");
//! });
//!
//! assert_eq!(await_race(&[slow.clone(), fast.clone()]), Ok("fast"));
//! assert_eq!(await_all(&[slow, fast]), Ok(vec!["slow", "fast"]));
//! ```

mod all;
mod builder;
mod promise;
mod race;

pub use all::{await_all, AwaitAll};
pub use builder::Builder;
pub use promise::{Promise, Resolver};
pub use race::{await_race, AwaitRace};

use thiserror::Error;

/// The promise prelude.
pub mod prelude {
    pub use super::AwaitAll as _;
    pub use super::AwaitRace as _;
}

/// Errors raised by the crate itself, as opposed to failures an executor
/// reports through [`Resolver::reject`].
#[derive(Debug, Error)]
pub enum Error {
    /// The operating system refused to start the executor thread.
    #[error("failed to spawn executor thread")]
    Spawn(#[from] std::io::Error),
}
