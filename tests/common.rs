// Shared helpers for integration tests

use fdready::application::config::models::Config;
use fdready::core::event::event_loop::EventLoop;
use fdready::core::net::fd::FileDescriptor;
use fdready::mux::{Delivery, Session};

/// Config with a short wait so tests that expect silence finish quickly.
pub fn test_config() -> Config {
    Config {
        poll_timeout_ms: 50,
        ..Config::default()
    }
}

#[allow(dead_code)] // Used in readiness_tests.rs
pub fn start_loop() -> EventLoop<Vec<Delivery>> {
    let config = test_config();
    let session = Session::start_with(&config, Vec::new()).unwrap();
    EventLoop::new(session, config.poll_timeout_ms)
}

/// Non-blocking pipe, returned as (read, write) ends
pub fn pipe() -> (FileDescriptor, FileDescriptor) {
    let (rd, wr) = FileDescriptor::pipe().unwrap();
    rd.set_non_blocking().unwrap();
    wr.set_non_blocking().unwrap();
    (rd, wr)
}

/// Run the loop a few times, collecting whatever was delivered.
#[allow(dead_code)] // Used in readiness_tests.rs
pub fn pump(event_loop: &mut EventLoop<Vec<Delivery>>, rounds: usize) -> Vec<Delivery> {
    for _ in 0..rounds {
        event_loop.run_once().unwrap();
    }
    event_loop.session_mut().sink_mut().drain(..).collect()
}
