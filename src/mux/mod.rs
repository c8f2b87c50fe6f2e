pub mod codec;
pub mod dispatcher;
pub mod notify;
pub mod registrar;
pub mod request;
pub mod session;
pub mod sweeper;
pub mod table;

pub use crate::core::event::event::Interest;
pub use notify::{Delivery, Notification, NotificationKind, NotificationSink, Owner, SessionHandle};
pub use request::{Operation, Request};
pub use session::Session;
pub use table::{DescriptorEntry, DescriptorTable};

#[cfg(test)]
pub(crate) mod testing;
