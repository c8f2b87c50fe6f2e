use crate::common::logger::Logger;
use crate::core::event::backend::ReadinessBackend;
use crate::core::event::event::Interest;
use crate::mux::notify::{Notification, NotificationKind, NotificationSink, SessionHandle};
use crate::mux::table::DescriptorTable;
use std::os::unix::io::RawFd;

/// Turns one backend readiness report into one notification.
pub struct Dispatcher;

impl Dispatcher {
    /// Handle readiness of `mode` on `fd`.
    ///
    /// The mode is disarmed at the backend and dropped from the table before
    /// the notification reaches the sink, so an owner that rearms on receipt
    /// cannot observe its own earlier firing.
    pub fn dispatch<B, S>(
        table: &mut DescriptorTable,
        backend: &mut B,
        sink: &mut S,
        session: SessionHandle,
        fd: RawFd,
        mode: Interest,
    ) where
        B: ReadinessBackend + ?Sized,
        S: NotificationSink + ?Sized,
    {
        if !table.contains(fd) {
            Logger::warn(&format!("Readiness reported for untracked fd {}", fd));
            return;
        }

        if let Err(e) = backend.disarm(fd, mode) {
            Logger::debug(&format!("Disarm after firing failed for fd {}: {}", fd, e));
        }

        let entry = table.get_mut(fd);
        entry.interest -= mode;

        let notification = Notification {
            kind: NotificationKind::from_mode(mode),
            session,
            fd,
        };

        match entry.owner {
            Some(owner) => sink.deliver(owner, notification),
            None => Logger::warn(&format!("No owner recorded for {}", notification)),
        }
    }
}
