use std::fmt;

#[derive(Debug)]
pub enum MuxError {
    MalformedRequest(usize),
    InvalidDescriptor(i32),
    InvalidOperation(u32),
    EncodingOverflow(usize),
    ResourceExhaustion(String),
    Backend(String),
    Config(String),
    Io(std::io::Error),
}

impl MuxError {
    /// Symbolic tag returned to the requester in place of an empty response.
    pub fn tag(&self) -> &'static str {
        match self {
            MuxError::MalformedRequest(_) => "badarg",
            MuxError::InvalidDescriptor(_) => "ebadfd",
            MuxError::InvalidOperation(_) => "einval",
            MuxError::EncodingOverflow(_) => "overflow",
            MuxError::ResourceExhaustion(_) => "emfile",
            MuxError::Backend(_) | MuxError::Io(_) => "eio",
            MuxError::Config(_) => "config",
        }
    }
}

impl fmt::Display for MuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuxError::MalformedRequest(len) => {
                write!(f, "Malformed request: expected 8 bytes, got {}", len)
            }
            MuxError::InvalidDescriptor(fd) => write!(f, "Invalid descriptor: {}", fd),
            MuxError::InvalidOperation(op) => write!(f, "Invalid operation: {}", op),
            MuxError::EncodingOverflow(len) => {
                write!(f, "Encoding overflow: {} bytes exceeds tag limit", len)
            }
            MuxError::ResourceExhaustion(msg) => write!(f, "Resource exhaustion: {}", msg),
            MuxError::Backend(msg) => write!(f, "Backend error: {}", msg),
            MuxError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MuxError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for MuxError {}

impl From<std::io::Error> for MuxError {
    fn from(err: std::io::Error) -> Self {
        MuxError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, MuxError>;
