pub const REQUEST_LEN: usize = 8;

pub const SELECTOR_SET: u32 = 1;
pub const SELECTOR_CLEAR: u32 = 2;

pub const MASK_READABLE: u32 = 1 << 0;
pub const MASK_WRITABLE: u32 = 1 << 1;

/// Longest symbolic tag the wire format can carry.
pub const MAX_TAG_LEN: usize = 255;

pub const TAG_READABLE: &str = "readable";
pub const TAG_WRITABLE: &str = "writable";
pub const TAG_ERROR: &str = "error";

pub const DEFAULT_POLL_TIMEOUT_MS: i32 = 100;
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;
