use std::future::Future;

use tokio::{runtime::Handle, task::JoinHandle};

/// Execution contexts handed to presenters.
///
/// Service calls run on the background (`io`) runtime. Whoever awaits the
/// returned handle is the UI context and receives the single result there.
#[derive(Clone, Debug)]
pub struct SchedulerProvider {
    io: Handle,
}

impl SchedulerProvider {
    pub fn new(io: Handle) -> Self {
        Self { io }
    }

    /// Uses the runtime the caller is running on for background work.
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn spawn_io<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.io.spawn(future)
    }
}
