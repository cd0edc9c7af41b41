//! Coalescing redraw requests.
//!
//! Producers post request kinds from any thread; the render thread takes the
//! whole pending set at once. Posting a kind that is already pending is a no-op.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bitflags::bitflags;

bitflags! {
    /// Kinds of work the render thread can be asked to do
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Request: u8 {
        /// Repaint the query line
        const PROMPT = 1;
        /// Repaint the info line
        const INFO = 1 << 1;
        /// Repaint the result list
        const LIST = 1 << 2;
        /// Start flushing repaints to the terminal
        const REFRESH = 1 << 3;
        /// Clear and repaint everything
        const REDRAW = 1 << 4;
        /// End the session successfully
        const CLOSE = 1 << 5;
        /// End the session with failure
        const QUIT = 1 << 6;
    }
}

impl Request {
    /// Requests that end the session
    pub const TERMINAL: Request = Request::CLOSE.union(Request::QUIT);
}

/// Multi-producer single-consumer set of pending [`Request`]s
#[derive(Debug, Default)]
pub struct Mailbox {
    pending: Mutex<Request>,
    posted: Condvar,
}

impl Mailbox {
    /// Creates an empty mailbox
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Request> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `requests` to the pending set and wakes the consumer
    pub fn post(&self, requests: Request) {
        if requests.is_empty() {
            return;
        }
        let mut pending = self.lock();
        pending.insert(requests);
        self.posted.notify_all();
    }

    /// Blocks until something is pending, then takes the whole pending set
    pub fn wait(&self) -> Request {
        let mut pending = self.lock();
        while pending.is_empty() {
            pending = self.posted.wait(pending).unwrap_or_else(PoisonError::into_inner);
        }
        std::mem::take(&mut *pending)
    }

    /// Like [`Mailbox::wait`], but gives up after `timeout` and returns an empty set
    pub fn wait_timeout(&self, timeout: Duration) -> Request {
        let pending = self.lock();
        let (mut pending, _) = self
            .posted
            .wait_timeout_while(pending, timeout, |pending| pending.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *pending)
    }

    /// Takes whatever is pending without blocking
    pub fn take(&self) -> Request {
        std::mem::take(&mut *self.lock())
    }

    /// Currently pending requests, without consuming them
    pub fn peek(&self) -> Request {
        *self.lock()
    }
}
