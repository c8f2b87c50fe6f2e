//! One-shot file-descriptor readiness multiplexer.
//!
//! A [`Session`](mux::Session) keeps a fixed table of per-descriptor interest,
//! arms the OS readiness backend on request, and turns every readiness event
//! into a single addressed [`Notification`](mux::Notification). Interest in a
//! mode is dropped as soon as it fires and must be armed again explicitly.

pub mod application;
pub mod common;
pub mod core;
pub mod mux;

pub use common::error::{MuxError, Result};
pub use mux::{
    Delivery, DescriptorEntry, DescriptorTable, Interest, Notification, NotificationKind,
    NotificationSink, Operation, Owner, Request, Session, SessionHandle,
};
