use crate::common::error::{MuxError, Result};
use crate::core::event::event::Interest;
use crate::mux::notify::Owner;
use std::os::unix::io::RawFd;

/// Interest and delivery address recorded for one descriptor number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescriptorEntry {
    pub interest: Interest,
    pub owner: Option<Owner>,
}

impl DescriptorEntry {
    pub fn is_armed(&self) -> bool {
        !self.interest.is_empty()
    }
}

/// Fixed table indexed by descriptor number, sized once to the process limit.
///
/// Index access outside `0..max_fd` panics; callers check `contains` first.
#[derive(Debug)]
pub struct DescriptorTable {
    entries: Vec<DescriptorEntry>,
}

impl DescriptorTable {
    pub fn new(max_fd: u32) -> Result<Self> {
        let len = max_fd as usize;
        let mut entries = Vec::new();
        entries.try_reserve_exact(len).map_err(|e| {
            MuxError::ResourceExhaustion(format!(
                "Failed to allocate descriptor table of {} entries: {}",
                len, e
            ))
        })?;
        entries.resize(len, DescriptorEntry::default());
        Ok(Self { entries })
    }

    pub fn max_fd(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn contains(&self, fd: RawFd) -> bool {
        fd >= 0 && (fd as usize) < self.entries.len()
    }

    pub fn get(&self, fd: RawFd) -> DescriptorEntry {
        self.entries[fd as usize]
    }

    pub fn get_mut(&mut self, fd: RawFd) -> &mut DescriptorEntry {
        &mut self.entries[fd as usize]
    }

    pub fn set(&mut self, fd: RawFd, entry: DescriptorEntry) {
        self.entries[fd as usize] = entry;
    }

    /// Descriptors with a non-empty interest mask, in ascending order.
    pub fn armed(&self) -> impl Iterator<Item = (RawFd, DescriptorEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_armed())
            .map(|(fd, entry)| (fd as RawFd, *entry))
    }

    pub fn armed_count(&self) -> usize {
        self.armed().count()
    }
}
