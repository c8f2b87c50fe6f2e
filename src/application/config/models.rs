use crate::common::constants::{DEFAULT_EVENT_CAPACITY, DEFAULT_POLL_TIMEOUT_MS};
use crate::common::logger::Level;
use serde::{Deserialize, Serialize};

/// Session and host-loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Minimum log level: debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional cap on the descriptor table size, below the process soft limit
    #[serde(default)]
    pub max_descriptors: Option<u32>,

    /// Host loop wait timeout in milliseconds (-1 waits forever)
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_ms: i32,

    /// Readiness events fetched per wait
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// OS readiness backend
    #[serde(default)]
    pub backend: BackendKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Auto,
    Epoll,
    Kqueue,
}

impl BackendKind {
    /// Whether this backend can run on the current platform.
    pub fn is_supported(&self) -> bool {
        match self {
            BackendKind::Auto => cfg!(any(target_os = "linux", target_os = "macos")),
            BackendKind::Epoll => cfg!(target_os = "linux"),
            BackendKind::Kqueue => cfg!(target_os = "macos"),
        }
    }
}

impl BackendKind {
    /// The concrete backend `Auto` stands for on this platform.
    pub fn resolve(&self) -> BackendKind {
        match self {
            BackendKind::Auto if cfg!(target_os = "macos") => BackendKind::Kqueue,
            BackendKind::Auto => BackendKind::Epoll,
            other => *other,
        }
    }
}

impl Config {
    pub fn level(&self) -> Option<Level> {
        Level::parse(&self.log_level)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            max_descriptors: None,
            poll_timeout_ms: default_poll_timeout(),
            event_capacity: default_event_capacity(),
            backend: BackendKind::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_timeout() -> i32 {
    DEFAULT_POLL_TIMEOUT_MS
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}
