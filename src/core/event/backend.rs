use crate::common::error::Result;
use crate::core::event::event::Interest;
use crate::core::net::fd;
use std::os::unix::io::RawFd;

/// How repeated `arm` calls for one descriptor combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmSemantics {
    /// Each `arm` adds to the modes already armed.
    Accumulate,
    /// Each `arm` establishes exactly the given modes.
    Replace,
}

/// OS-level registry of descriptor readiness interest.
pub trait ReadinessBackend {
    /// Start watching `fd` for the modes in `mask`.
    fn arm(&mut self, fd: RawFd, mask: Interest) -> Result<()>;

    /// Stop watching `fd` for the modes in `mask`. Modes not in `mask` stay armed.
    fn disarm(&mut self, fd: RawFd, mask: Interest) -> Result<()>;

    fn arm_semantics(&self) -> ArmSemantics {
        ArmSemantics::Accumulate
    }

    /// Whether `fd` currently names an open descriptor.
    fn is_open(&self, fd: RawFd) -> bool {
        fd::is_open(fd)
    }
}

impl<B: ReadinessBackend + ?Sized> ReadinessBackend for &mut B {
    fn arm(&mut self, fd: RawFd, mask: Interest) -> Result<()> {
        (**self).arm(fd, mask)
    }

    fn disarm(&mut self, fd: RawFd, mask: Interest) -> Result<()> {
        (**self).disarm(fd, mask)
    }

    fn arm_semantics(&self) -> ArmSemantics {
        (**self).arm_semantics()
    }

    fn is_open(&self, fd: RawFd) -> bool {
        (**self).is_open(fd)
    }
}
