/// Crossterm backend implementation.
pub mod crossterm;

use std::fmt::Debug;

use crate::core::{error::Result, event::Event};

/// A source of native input events plus the clock that drives update ticks.
pub trait EventSource {
    /// Return the next pending event without blocking, or `None` when the
    /// queue is drained.
    fn poll_event(&mut self) -> Result<Option<Event>>;

    /// Monotonic milliseconds since the source was created.
    fn ticks(&self) -> u64;
}

/// A handle for controlling the rendering back-end's session: taking over the
/// display on start and handing it back on stop.
pub trait BackendControl: Debug {
    /// Start the backend.
    fn start(&mut self) -> Result<()>;

    /// Stop the backend, releasing control of the display.
    fn stop(&mut self) -> Result<()>;
}

/// Guard that pairs backend start and stop for a session.
pub(crate) struct Session<'a> {
    /// Backend controller.
    backend: &'a mut dyn BackendControl,
    /// Whether the session has an active backend start.
    active: bool,
}

impl<'a> Session<'a> {
    /// Start the backend and create a new session guard.
    pub(crate) fn new(backend: &'a mut dyn BackendControl) -> Result<Self> {
        backend.start()?;
        Ok(Self {
            backend,
            active: true,
        })
    }

    /// Stop the backend if the session is active.
    pub(crate) fn stop(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            self.backend.stop()?;
        }
        Ok(())
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            if let Err(e) = self.backend.stop() {
                tracing::error!("failed to stop backend: {e}");
            }
        }
    }
}
