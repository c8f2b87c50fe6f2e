use crate::common::constants::{TAG_ERROR, TAG_READABLE, TAG_WRITABLE};
use crate::common::logger::Logger;
use crate::core::event::event::Interest;
use std::fmt;
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

/// Delivery address of a requester. Carries no claim on the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Owner(pub u64);

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}

/// Process-unique identity of a session, stamped on its notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub u64);

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

impl SessionHandle {
    pub fn next() -> Self {
        SessionHandle(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Readable,
    Writable,
    Error,
}

impl NotificationKind {
    pub fn from_mode(mode: Interest) -> Self {
        if mode == Interest::READABLE {
            NotificationKind::Readable
        } else if mode == Interest::WRITABLE {
            NotificationKind::Writable
        } else {
            NotificationKind::Error
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            NotificationKind::Readable => TAG_READABLE,
            NotificationKind::Writable => TAG_WRITABLE,
            NotificationKind::Error => TAG_ERROR,
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            TAG_READABLE => Some(NotificationKind::Readable),
            TAG_WRITABLE => Some(NotificationKind::Writable),
            TAG_ERROR => Some(NotificationKind::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub session: SessionHandle,
    pub fd: RawFd,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.kind.tag(), self.session, self.fd)
    }
}

/// A notification paired with the address it was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub owner: Owner,
    pub notification: Notification,
}

/// Outbound channel for notifications. Delivery is fire-and-forget.
pub trait NotificationSink {
    fn deliver(&mut self, owner: Owner, notification: Notification);
}

impl NotificationSink for Vec<Delivery> {
    fn deliver(&mut self, owner: Owner, notification: Notification) {
        self.push(Delivery {
            owner,
            notification,
        });
    }
}

impl NotificationSink for Sender<Delivery> {
    fn deliver(&mut self, owner: Owner, notification: Notification) {
        if self
            .send(Delivery {
                owner,
                notification,
            })
            .is_err()
        {
            Logger::debug(&format!(
                "Dropped notification {} for {}: receiver gone",
                notification, owner
            ));
        }
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn deliver(&mut self, owner: Owner, notification: Notification) {
        (**self).deliver(owner, notification);
    }
}
