use crate::common::constants::{MASK_READABLE, MASK_WRITABLE};
use bitflags::bitflags;
use std::os::unix::io::RawFd;

bitflags! {
    /// Readiness modes a descriptor can be armed for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Interest: u32 {
        const READABLE = MASK_READABLE;
        const WRITABLE = MASK_WRITABLE;
    }
}

impl Interest {
    /// Decode a wire mask, dropping bits that name no known mode.
    pub fn from_wire(mask: u32) -> Self {
        Interest::from_bits_truncate(mask)
    }

    /// Each single mode contained in this mask, readable first.
    pub fn modes(self) -> impl Iterator<Item = Interest> {
        [Interest::READABLE, Interest::WRITABLE]
            .into_iter()
            .filter(move |mode| self.contains(*mode))
    }
}

/// One armed mode of one descriptor reported ready by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyEvent {
    pub fd: RawFd,
    pub mode: Interest,
}

impl ReadyEvent {
    pub fn new(fd: RawFd, mode: Interest) -> Self {
        Self { fd, mode }
    }
}
