//! Wire encoding for notifications and error replies.
//!
//! A notification is encoded as a length-prefixed tag followed by the
//! session handle (u64) and the descriptor (i32), both big-endian. An error
//! reply is the bare tag. Tags never exceed [`MAX_TAG_LEN`] bytes.

use crate::common::constants::MAX_TAG_LEN;
use crate::common::error::{MuxError, Result};
use crate::mux::notify::{Notification, NotificationKind, SessionHandle};

pub fn encode_tag(tag: &str) -> Result<Vec<u8>> {
    if tag.len() > MAX_TAG_LEN {
        return Err(MuxError::EncodingOverflow(tag.len()));
    }
    Ok(tag.as_bytes().to_vec())
}

/// Reply bytes for a rejected request.
pub fn encode_error(err: &MuxError) -> Result<Vec<u8>> {
    encode_tag(err.tag())
}

pub fn encode_notification(notification: &Notification) -> Result<Vec<u8>> {
    let tag = encode_tag(notification.kind.tag())?;
    let mut buf = Vec::with_capacity(1 + tag.len() + 8 + 4);
    buf.push(tag.len() as u8);
    buf.extend_from_slice(&tag);
    buf.extend_from_slice(&notification.session.0.to_be_bytes());
    buf.extend_from_slice(&notification.fd.to_be_bytes());
    Ok(buf)
}

/// Decode a notification produced by [`encode_notification`].
pub fn decode_notification(buf: &[u8]) -> Result<Notification> {
    let malformed = || MuxError::MalformedRequest(buf.len());

    let tag_len = *buf.first().ok_or_else(malformed)? as usize;
    if buf.len() != 1 + tag_len + 12 {
        return Err(malformed());
    }

    let tag = std::str::from_utf8(&buf[1..1 + tag_len]).map_err(|_| malformed())?;
    let kind = NotificationKind::from_tag(tag).ok_or_else(malformed)?;

    let rest = &buf[1 + tag_len..];
    let mut session = [0u8; 8];
    session.copy_from_slice(&rest[..8]);
    let mut fd = [0u8; 4];
    fd.copy_from_slice(&rest[8..]);

    Ok(Notification {
        kind,
        session: SessionHandle(u64::from_be_bytes(session)),
        fd: i32::from_be_bytes(fd),
    })
}
