use crate::common::constants::{REQUEST_LEN, SELECTOR_CLEAR, SELECTOR_SET};
use crate::common::error::{MuxError, Result};
use crate::core::event::event::Interest;
use crate::mux::notify::Owner;
use std::os::unix::io::RawFd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Set,
    Clear,
    /// Selector value with no known meaning; rejected by the registrar.
    Unknown(u32),
}

impl From<u32> for Operation {
    fn from(selector: u32) -> Self {
        match selector {
            SELECTOR_SET => Operation::Set,
            SELECTOR_CLEAR => Operation::Clear,
            other => Operation::Unknown(other),
        }
    }
}

impl Operation {
    pub fn selector(&self) -> u32 {
        match self {
            Operation::Set => SELECTOR_SET,
            Operation::Clear => SELECTOR_CLEAR,
            Operation::Unknown(other) => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub fd: RawFd,
    pub mask: Interest,
    pub operation: Operation,
    pub requester: Owner,
}

impl Request {
    pub fn new(fd: RawFd, mask: Interest, operation: Operation, requester: Owner) -> Self {
        Self {
            fd,
            mask,
            operation,
            requester,
        }
    }

    /// Decode the 8-byte payload: big-endian descriptor, then big-endian mask.
    pub fn decode(selector: u32, payload: &[u8], requester: Owner) -> Result<Self> {
        if payload.len() != REQUEST_LEN {
            return Err(MuxError::MalformedRequest(payload.len()));
        }

        let fd = i32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
        let mask = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]);

        Ok(Self::new(
            fd,
            Interest::from_wire(mask),
            Operation::from(selector),
            requester,
        ))
    }

    /// Payload bytes for this request; the selector travels separately.
    pub fn encode(&self) -> [u8; REQUEST_LEN] {
        let mut buf = [0u8; REQUEST_LEN];
        buf[..4].copy_from_slice(&self.fd.to_be_bytes());
        buf[4..].copy_from_slice(&self.mask.bits().to_be_bytes());
        buf
    }
}
