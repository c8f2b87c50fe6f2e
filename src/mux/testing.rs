use crate::common::error::{MuxError, Result};
use crate::core::event::backend::{ArmSemantics, ReadinessBackend};
use crate::core::event::event::Interest;
use std::collections::{HashMap, HashSet};
use std::os::unix::io::RawFd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Arm(RawFd, Interest),
    Disarm(RawFd, Interest),
}

/// In-memory backend that mimics an OS registry which ORs armed masks.
#[derive(Debug)]
pub struct RecordingBackend {
    pub armed: HashMap<RawFd, Interest>,
    pub calls: Vec<Call>,
    pub open: HashSet<RawFd>,
    pub semantics: ArmSemantics,
    pub fail_disarm: bool,
}

impl RecordingBackend {
    pub fn with_open(fds: &[RawFd]) -> Self {
        Self {
            armed: HashMap::new(),
            calls: Vec::new(),
            open: fds.iter().copied().collect(),
            semantics: ArmSemantics::Accumulate,
            fail_disarm: false,
        }
    }

    pub fn armed(&self, fd: RawFd) -> Interest {
        self.armed.get(&fd).copied().unwrap_or_default()
    }
}

impl ReadinessBackend for RecordingBackend {
    fn arm(&mut self, fd: RawFd, mask: Interest) -> Result<()> {
        self.calls.push(Call::Arm(fd, mask));
        let entry = self.armed.entry(fd).or_default();
        match self.semantics {
            ArmSemantics::Accumulate => *entry |= mask,
            ArmSemantics::Replace => *entry = mask,
        }
        Ok(())
    }

    fn disarm(&mut self, fd: RawFd, mask: Interest) -> Result<()> {
        self.calls.push(Call::Disarm(fd, mask));
        if self.fail_disarm {
            return Err(MuxError::Backend(format!("disarm failed for fd {}", fd)));
        }
        if let Some(entry) = self.armed.get_mut(&fd) {
            entry.remove(mask);
        }
        Ok(())
    }

    fn arm_semantics(&self) -> ArmSemantics {
        self.semantics
    }

    fn is_open(&self, fd: RawFd) -> bool {
        self.open.contains(&fd)
    }
}
