use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

pub struct Logger;

impl Logger {
    pub fn set_level(level: Level) {
        MIN_LEVEL.store(level as u8, Ordering::Relaxed);
    }

    fn enabled(level: Level) -> bool {
        level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
    }

    pub fn info(msg: &str) {
        if Self::enabled(Level::Info) {
            println!("[INFO] {}", msg);
        }
    }

    pub fn error(msg: &str) {
        if Self::enabled(Level::Error) {
            eprintln!("[ERROR] {}", msg);
        }
    }

    pub fn warn(msg: &str) {
        if Self::enabled(Level::Warn) {
            eprintln!("[WARN] {}", msg);
        }
    }

    pub fn debug(msg: &str) {
        if cfg!(debug_assertions) && Self::enabled(Level::Debug) {
            println!("[DEBUG] {}", msg);
        }
    }
}
