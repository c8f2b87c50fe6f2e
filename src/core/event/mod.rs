pub mod backend;
pub mod event;
pub mod event_loop;
pub mod poller;

pub use backend::{ArmSemantics, ReadinessBackend};
pub use event::{Interest, ReadyEvent};
pub use event_loop::EventLoop;
pub use poller::Poller;
