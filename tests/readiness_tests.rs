// Readiness tests - real poller, real pipes

use fdready::common::constants::{MASK_READABLE, SELECTOR_SET};
use fdready::core::event::poller::Poller;
use fdready::mux::{Delivery, Interest, NotificationKind, Operation, Owner, Session};
use fdready::MuxError;
use pretty_assertions::assert_eq;
use std::sync::mpsc;
use std::thread;

mod common;
use common::{pipe, pump, start_loop, test_config};

fn payload(fd: i32, mask: u32) -> Vec<u8> {
    let mut buf = fd.to_be_bytes().to_vec();
    buf.extend_from_slice(&mask.to_be_bytes());
    buf
}

#[test]
fn test_readable_pipe_notifies_requester() {
    let mut event_loop = start_loop();
    let (rd, wr) = pipe();
    let fd = rd.as_raw_fd();

    let reply = event_loop
        .session_mut()
        .control(SELECTOR_SET, &payload(fd, MASK_READABLE), Owner(7))
        .unwrap();
    assert!(reply.is_empty());

    wr.write(b"hello").unwrap();
    let delivered = pump(&mut event_loop, 1);

    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].owner, Owner(7));
    assert_eq!(delivered[0].notification.kind, NotificationKind::Readable);
    assert_eq!(delivered[0].notification.fd, fd);
    assert_eq!(
        delivered[0].notification.session,
        event_loop.session().handle()
    );
    assert!(!event_loop.session().interest(fd).contains(Interest::READABLE));
}

#[test]
fn test_firing_is_one_shot_until_rearmed() {
    let mut event_loop = start_loop();
    let (rd, wr) = pipe();
    let fd = rd.as_raw_fd();
    wr.write(b"data stays unread").unwrap();

    event_loop
        .session_mut()
        .apply(fd, Interest::READABLE, Operation::Set, Owner(1))
        .unwrap();

    assert_eq!(pump(&mut event_loop, 3).len(), 1);
    assert!(pump(&mut event_loop, 3).is_empty());

    event_loop
        .session_mut()
        .apply(fd, Interest::READABLE, Operation::Set, Owner(1))
        .unwrap();
    assert_eq!(pump(&mut event_loop, 1).len(), 1);
}

#[test]
fn test_writable_and_readable_fire_independently() {
    let mut event_loop = start_loop();
    let (rd, wr) = pipe();

    event_loop
        .session_mut()
        .apply(wr.as_raw_fd(), Interest::WRITABLE, Operation::Set, Owner(2))
        .unwrap();
    event_loop
        .session_mut()
        .apply(rd.as_raw_fd(), Interest::READABLE, Operation::Set, Owner(3))
        .unwrap();

    let delivered = pump(&mut event_loop, 1);
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].owner, Owner(2));
    assert_eq!(delivered[0].notification.kind, NotificationKind::Writable);

    wr.write(b"x").unwrap();
    let delivered = pump(&mut event_loop, 1);
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].owner, Owner(3));
}

#[test]
fn test_set_replaces_previous_mask() {
    let mut poller = Poller::new().unwrap();
    let (_rd, wr) = pipe();
    let fd = wr.as_raw_fd();

    {
        let mut session = Session::with_backend(&mut poller, 1024, Vec::<Delivery>::new()).unwrap();
        session.apply(fd, Interest::all(), Operation::Set, Owner(1)).unwrap();
        session.apply(fd, Interest::READABLE, Operation::Set, Owner(1)).unwrap();
        assert_eq!(session.backend().armed(fd), Interest::READABLE);

        // The write end never reads, and writable interest is gone.
        let mut ready = Vec::new();
        assert_eq!(session.backend_mut().wait(&mut ready, 20).unwrap(), 0);
    }
    assert_eq!(poller.armed_count(), 0);
}

#[test]
fn test_stop_leaves_nothing_armed() {
    let mut poller = Poller::new().unwrap();
    let (rd, wr) = pipe();

    let mut session = Session::with_backend(&mut poller, 1024, Vec::<Delivery>::new()).unwrap();
    session.apply(rd.as_raw_fd(), Interest::READABLE, Operation::Set, Owner(1)).unwrap();
    session.apply(wr.as_raw_fd(), Interest::WRITABLE, Operation::Set, Owner(1)).unwrap();
    assert_eq!(session.stop(), 2);

    assert_eq!(poller.armed_count(), 0);
    assert_eq!(poller.armed(rd.as_raw_fd()), Interest::empty());
}

#[test]
fn test_out_of_range_descriptor_rejected() {
    let config = fdready::application::config::models::Config {
        max_descriptors: Some(1024),
        ..test_config()
    };
    let mut session = Session::start_with(&config, Vec::<Delivery>::new()).unwrap();

    let err = session
        .apply(99999, Interest::READABLE, Operation::Set, Owner(1))
        .unwrap_err();
    assert!(matches!(err, MuxError::InvalidDescriptor(99999)));

    let reply = session
        .control_response(SELECTOR_SET, &payload(99999, MASK_READABLE), Owner(1))
        .unwrap();
    assert_eq!(reply, b"ebadfd".to_vec());
    assert_eq!(session.armed_count(), 0);
}

#[test]
fn test_unopened_descriptor_rejected() {
    let mut session = Session::start_with(&test_config(), Vec::<Delivery>::new()).unwrap();
    let fd = session.max_fd() as i32 - 1;

    let err = session
        .apply(fd, Interest::READABLE, Operation::Set, Owner(1))
        .unwrap_err();
    assert!(matches!(err, MuxError::InvalidDescriptor(_)));
    assert!(session.interest(fd).is_empty());
}

#[test]
fn test_malformed_payload_lengths() {
    let mut session = Session::start_with(&test_config(), Vec::<Delivery>::new()).unwrap();
    for len in [7usize, 9] {
        let err = session.control(SELECTOR_SET, &vec![0u8; len], Owner(1)).unwrap_err();
        assert!(matches!(err, MuxError::MalformedRequest(_)));
    }
}

#[test]
fn test_channel_sink_delivers_across_threads() {
    let (tx, rx) = mpsc::channel::<Delivery>();
    let (rd, wr) = pipe();
    let fd = rd.as_raw_fd();

    let worker = thread::spawn(move || {
        let mut poller = Poller::new().unwrap();
        let mut session = Session::with_backend(&mut poller, 1024, tx).unwrap();
        session.apply(fd, Interest::READABLE, Operation::Set, Owner(11)).unwrap();

        let mut ready = Vec::new();
        session.backend_mut().wait(&mut ready, 1000).unwrap();
        for event in ready {
            session.ready(event);
        }
        session.stop();
    });

    wr.write(b"!").unwrap();
    worker.join().unwrap();

    let delivery = rx.recv().unwrap();
    assert_eq!(delivery.owner, Owner(11));
    assert_eq!(delivery.notification.fd, fd);
    drop(rd);
}

#[test]
fn test_run_until_first_delivery() {
    let mut event_loop = start_loop();
    let (rd, wr) = pipe();

    event_loop
        .session_mut()
        .apply(rd.as_raw_fd(), Interest::READABLE, Operation::Set, Owner(5))
        .unwrap();
    wr.write(b"go").unwrap();

    event_loop.run_until(|s| !s.sink().is_empty()).unwrap();
    assert_eq!(event_loop.session().sink()[0].owner, Owner(5));
    assert_eq!(event_loop.stop(), 0);
}

#[test]
fn test_clear_after_descriptor_number_reused() {
    let mut poller = Poller::new().unwrap();
    let (rd, _wr) = pipe();
    let fd = rd.as_raw_fd();

    let mut session = Session::with_backend(&mut poller, 1024, Vec::<Delivery>::new()).unwrap();
    session.apply(fd, Interest::all(), Operation::Set, Owner(1)).unwrap();

    // Close the watched pipe out-of-band by installing another pipe under the same number.
    let (other_rd, _other_wr) = pipe();
    assert!(unsafe { libc::dup2(other_rd.as_raw_fd(), fd) } >= 0);

    session.apply(fd, Interest::WRITABLE, Operation::Clear, Owner(1)).unwrap();
    assert_eq!(session.interest(fd), Interest::READABLE);
    assert_eq!(session.backend().armed(fd), Interest::READABLE);

    assert_eq!(session.stop(), 1);
    assert_eq!(poller.armed_count(), 0);
    assert_eq!(poller.armed(fd), Interest::empty());
}
