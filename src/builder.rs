use std::thread;
use tracing::debug;

use crate::{Error, Promise, Resolver};

/// Configures the thread a [`Promise`] executor runs on.
///
/// # Examples
///
/// ```
/// use settle::{Builder, Promise};
///
/// let promise: Promise<Option<String>, ()> = Builder::new()
///     .name("fetch")
///     .stack_size(64 * 1024)
///     .spawn(|r| {
///         r.resolve(std::thread::current().name().map(String::from));
///     })
///     .expect("failed to spawn executor");
/// assert_eq!(promise.wait(), Ok(Some("fetch".to_string())));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Builder {
    name: Option<String>,
    stack_size: Option<usize>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the executor thread. The name shows up in panic messages and in
    /// log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the stack size of the executor thread, in bytes.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// Creates a promise and runs `executor` on a thread configured by this
    /// builder.
    ///
    /// Unlike [`Promise::new`], a failure to create the thread is returned as
    /// [`Error::Spawn`].
    pub fn spawn<T, E, F>(self, executor: F) -> Result<Promise<T, E>, Error>
    where
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
        F: FnOnce(Resolver<T, E>) + Send + 'static,
    {
        let mut builder = thread::Builder::new();
        if let Some(name) = self.name.clone() {
            builder = builder.name(name);
        }
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }

        let (promise, resolver) = Promise::pending();
        builder.spawn(move || executor(resolver))?;
        debug!(name = ?self.name, "spawned promise executor");
        Ok(promise)
    }
}
