// Host-side loop that feeds poller readiness into a session
use crate::common::error::Result;
use crate::core::event::event::ReadyEvent;
use crate::core::event::poller::Poller;
use crate::mux::notify::NotificationSink;
use crate::mux::session::Session;

pub struct EventLoop<S: NotificationSink> {
    session: Session<Poller, S>,
    ready: Vec<ReadyEvent>,
    timeout_ms: i32,
}

impl<S: NotificationSink> EventLoop<S> {
    pub fn new(session: Session<Poller, S>, timeout_ms: i32) -> Self {
        Self {
            session,
            ready: Vec::new(),
            timeout_ms,
        }
    }

    pub fn session(&self) -> &Session<Poller, S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<Poller, S> {
        &mut self.session
    }

    /// Wait once and dispatch everything that became ready.
    /// Returns the number of notifications dispatched.
    pub fn run_once(&mut self) -> Result<usize> {
        let n = self.session.backend_mut().wait(&mut self.ready, self.timeout_ms)?;
        for event in self.ready.drain(..) {
            self.session.ready(event);
        }
        Ok(n)
    }

    /// Keep dispatching until `done` holds for the session.
    pub fn run_until<F>(&mut self, mut done: F) -> Result<()>
    where
        F: FnMut(&mut Session<Poller, S>) -> bool,
    {
        while !done(&mut self.session) {
            self.run_once()?;
        }
        Ok(())
    }

    /// Stop the session, releasing whatever is still armed.
    pub fn stop(self) -> usize {
        self.session.stop()
    }
}
