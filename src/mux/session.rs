use crate::application::config::models::Config;
use crate::common::error::{MuxError, Result};
use crate::common::logger::Logger;
use crate::core::event::backend::ReadinessBackend;
use crate::core::event::event::{Interest, ReadyEvent};
use crate::core::event::poller::Poller;
use crate::core::net::limit;
use crate::mux::codec;
use crate::mux::dispatcher::Dispatcher;
use crate::mux::notify::{NotificationSink, Owner, SessionHandle};
use crate::mux::registrar::Registrar;
use crate::mux::request::{Operation, Request};
use crate::mux::sweeper::Sweeper;
use crate::mux::table::DescriptorTable;
use std::os::unix::io::RawFd;

/// One multiplexer lifetime: a descriptor table, the backend it mirrors, and
/// the channel notifications leave through.
///
/// Registrations still armed when the session stops (or is dropped) are
/// released from the backend.
pub struct Session<B: ReadinessBackend, S: NotificationSink> {
    handle: SessionHandle,
    table: DescriptorTable,
    backend: B,
    sink: S,
    stopped: bool,
}

impl<S: NotificationSink> Session<Poller, S> {
    /// Start a session on the platform poller with default configuration.
    pub fn start(sink: S) -> Result<Self> {
        Self::start_with(&Config::default(), sink)
    }

    /// Start a session as configured. A backend the platform lacks is refused.
    pub fn start_with(config: &Config, sink: S) -> Result<Self> {
        if !config.backend.is_supported() {
            return Err(MuxError::Config(format!(
                "Backend {:?} is not available on this platform",
                config.backend
            )));
        }
        Logger::debug(&format!("Using {:?} backend", config.backend.resolve()));

        let max_fd = limit::resolve_with_cap(config.max_descriptors)?;
        let poller = Poller::with_capacity(config.event_capacity)?;
        Self::with_backend(poller, max_fd, sink)
    }
}

impl<B: ReadinessBackend, S: NotificationSink> Session<B, S> {
    pub fn with_backend(backend: B, max_fd: u32, sink: S) -> Result<Self> {
        let table = DescriptorTable::new(max_fd)?;
        let handle = SessionHandle::next();
        Logger::info(&format!(
            "Started {} (maxfd {}, {:?} backend)",
            handle,
            max_fd,
            backend.arm_semantics()
        ));

        Ok(Self {
            handle,
            table,
            backend,
            sink,
            stopped: false,
        })
    }

    /// Register or clear interest in `mask` on `fd` for `requester`.
    pub fn apply(
        &mut self,
        fd: RawFd,
        mask: Interest,
        operation: Operation,
        requester: Owner,
    ) -> Result<()> {
        let request = Request::new(fd, mask, operation, requester);
        Registrar::apply(&mut self.table, &mut self.backend, &request)
    }

    /// Decode a raw request payload and apply it. Returns the empty reply on success.
    pub fn control(&mut self, selector: u32, payload: &[u8], requester: Owner) -> Result<Vec<u8>> {
        let request = Request::decode(selector, payload, requester)?;
        Registrar::apply(&mut self.table, &mut self.backend, &request)?;
        Ok(Vec::new())
    }

    /// Like [`control`](Self::control), but a rejected request becomes its
    /// encoded error tag, so the host always has exactly one reply to send.
    pub fn control_response(
        &mut self,
        selector: u32,
        payload: &[u8],
        requester: Owner,
    ) -> Result<Vec<u8>> {
        match self.control(selector, payload, requester) {
            Ok(reply) => Ok(reply),
            Err(e @ MuxError::EncodingOverflow(_)) => Err(e),
            Err(e) => codec::encode_error(&e),
        }
    }

    /// Entry point for the backend's readiness report of one armed mode.
    pub fn ready(&mut self, event: ReadyEvent) {
        Dispatcher::dispatch(
            &mut self.table,
            &mut self.backend,
            &mut self.sink,
            self.handle,
            event.fd,
            event.mode,
        );
    }

    /// Release every armed registration and end the session.
    /// Returns how many descriptors were still armed.
    pub fn stop(mut self) -> usize {
        self.teardown()
    }

    fn teardown(&mut self) -> usize {
        if self.stopped {
            return 0;
        }
        self.stopped = true;

        let released = Sweeper::sweep(&mut self.table, &mut self.backend);
        Logger::info(&format!(
            "Stopped {} ({} registrations released)",
            self.handle, released
        ));
        released
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle
    }

    pub fn max_fd(&self) -> u32 {
        self.table.max_fd()
    }

    /// Interest recorded for `fd`; empty for descriptors outside the table.
    pub fn interest(&self, fd: RawFd) -> Interest {
        if self.table.contains(fd) {
            self.table.get(fd).interest
        } else {
            Interest::empty()
        }
    }

    pub fn owner(&self, fd: RawFd) -> Option<Owner> {
        if self.table.contains(fd) {
            self.table.get(fd).owner
        } else {
            None
        }
    }

    pub fn armed_count(&self) -> usize {
        self.table.armed_count()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<B: ReadinessBackend, S: NotificationSink> Drop for Session<B, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
