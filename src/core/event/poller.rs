use crate::common::constants::DEFAULT_EVENT_CAPACITY;
use crate::common::error::{MuxError, Result};
use crate::core::event::backend::{ArmSemantics, ReadinessBackend};
use crate::core::event::event::{Interest, ReadyEvent};
use std::collections::HashMap;
use std::os::unix::io::RawFd;

#[cfg(target_os = "macos")]
use libc::{kevent, kqueue, EVFILT_READ, EVFILT_WRITE, EV_ADD, EV_DELETE, EV_ENABLE};

#[cfg(target_os = "linux")]
use libc::{
    epoll_create1, epoll_ctl, epoll_event, epoll_wait, EPOLLERR, EPOLLHUP, EPOLLIN, EPOLLOUT,
    EPOLL_CLOEXEC, EPOLL_CTL_ADD, EPOLL_CTL_DEL, EPOLL_CTL_MOD,
};

/// Readiness backend over epoll (Linux) or kqueue (macOS).
///
/// The armed mask of every descriptor is tracked here, so `arm` adds modes
/// to whatever is already armed and `disarm` removes only the named modes.
pub struct Poller {
    #[cfg(target_os = "macos")]
    kq: RawFd,
    #[cfg(target_os = "macos")]
    raw_events: Vec<libc::kevent>,

    #[cfg(target_os = "linux")]
    epfd: RawFd,
    #[cfg(target_os = "linux")]
    raw_events: Vec<epoll_event>,

    armed: HashMap<RawFd, Interest>,
}

impl Poller {
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);
        unsafe {
            #[cfg(target_os = "macos")]
            {
                let kq = kqueue();
                if kq < 0 {
                    return Err(MuxError::ResourceExhaustion(format!(
                        "Failed to create kqueue: {}",
                        std::io::Error::last_os_error()
                    )));
                }
                Ok(Self {
                    kq,
                    raw_events: vec![std::mem::zeroed(); capacity],
                    armed: HashMap::new(),
                })
            }

            #[cfg(target_os = "linux")]
            {
                let epfd = epoll_create1(EPOLL_CLOEXEC);
                if epfd < 0 {
                    return Err(MuxError::ResourceExhaustion(format!(
                        "Failed to create epoll instance: {}",
                        std::io::Error::last_os_error()
                    )));
                }
                Ok(Self {
                    epfd,
                    raw_events: vec![epoll_event { events: 0, u64: 0 }; capacity],
                    armed: HashMap::new(),
                })
            }

            #[cfg(not(any(target_os = "macos", target_os = "linux")))]
            {
                let _ = capacity;
                Err(MuxError::Backend("Unsupported platform".to_string()))
            }
        }
    }

    /// Modes currently armed for `fd` at the OS level.
    pub fn armed(&self, fd: RawFd) -> Interest {
        self.armed.get(&fd).copied().unwrap_or_default()
    }

    /// Number of descriptors with at least one armed mode.
    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Block until readiness or timeout; a negative timeout waits forever.
    ///
    /// `ready` is cleared and refilled with one entry per ready armed mode.
    pub fn wait(&mut self, ready: &mut Vec<ReadyEvent>, timeout_ms: i32) -> Result<usize> {
        ready.clear();

        #[cfg(target_os = "macos")]
        {
            let timeout = libc::timespec {
                tv_sec: (timeout_ms.max(0) / 1000) as libc::time_t,
                tv_nsec: ((timeout_ms.max(0) % 1000) * 1_000_000) as libc::c_long,
            };
            let timeout_ptr = if timeout_ms >= 0 {
                &timeout as *const libc::timespec
            } else {
                std::ptr::null()
            };

            let n = unsafe {
                kevent(
                    self.kq,
                    std::ptr::null(),
                    0,
                    self.raw_events.as_mut_ptr(),
                    self.raw_events.len() as libc::c_int,
                    timeout_ptr,
                )
            };
            if n < 0 {
                return self.wait_failed();
            }

            for kev in &self.raw_events[..n as usize] {
                let fd = kev.ident as RawFd;
                let mode = match kev.filter {
                    EVFILT_READ => Interest::READABLE,
                    EVFILT_WRITE => Interest::WRITABLE,
                    _ => continue,
                };
                if self.armed(fd).contains(mode) {
                    ready.push(ReadyEvent::new(fd, mode));
                }
            }
        }

        #[cfg(target_os = "linux")]
        {
            let timeout = if timeout_ms >= 0 { timeout_ms } else { -1 };
            let n = unsafe {
                epoll_wait(
                    self.epfd,
                    self.raw_events.as_mut_ptr(),
                    self.raw_events.len() as libc::c_int,
                    timeout,
                )
            };
            if n < 0 {
                return self.wait_failed();
            }

            for ep_ev in &self.raw_events[..n as usize] {
                let fd = ep_ev.u64 as RawFd;
                let armed = self.armed(fd);
                let flags = ep_ev.events;

                // Hangup and error wake every armed mode: neither read nor write would block.
                let fired = if flags & (EPOLLERR as u32 | EPOLLHUP as u32) != 0 {
                    armed
                } else {
                    let mut fired = Interest::empty();
                    if flags & EPOLLIN as u32 != 0 {
                        fired |= Interest::READABLE;
                    }
                    if flags & EPOLLOUT as u32 != 0 {
                        fired |= Interest::WRITABLE;
                    }
                    fired & armed
                };

                for mode in fired.modes() {
                    ready.push(ReadyEvent::new(fd, mode));
                }
            }
        }

        Ok(ready.len())
    }

    fn wait_failed(&self) -> Result<usize> {
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            return Ok(0);
        }
        Err(MuxError::Backend(format!("Failed to wait for events: {}", err)))
    }

    #[cfg(target_os = "linux")]
    fn epoll_flags(mask: Interest) -> u32 {
        let mut events = 0u32;
        if mask.contains(Interest::READABLE) {
            events |= EPOLLIN as u32;
        }
        if mask.contains(Interest::WRITABLE) {
            events |= EPOLLOUT as u32;
        }
        events
    }

    #[cfg(target_os = "linux")]
    fn apply(&mut self, fd: RawFd, old: Interest, new: Interest) -> Result<()> {
        unsafe {
            if new.is_empty() {
                let _ = epoll_ctl(self.epfd, EPOLL_CTL_DEL, fd, std::ptr::null_mut());
                return Ok(());
            }

            let mut ev: epoll_event = std::mem::zeroed();
            ev.events = Self::epoll_flags(new);
            ev.u64 = fd as u64;

            let op = if old.is_empty() { EPOLL_CTL_ADD } else { EPOLL_CTL_MOD };
            if epoll_ctl(self.epfd, op, fd, &mut ev) < 0 {
                // The kernel drops a registration when its descriptor closes, and a
                // number can be registered from outside our bookkeeping.
                let errno = std::io::Error::last_os_error().raw_os_error();
                let fallback = match (op, errno) {
                    (EPOLL_CTL_ADD, Some(libc::EEXIST)) => Some(EPOLL_CTL_MOD),
                    (EPOLL_CTL_MOD, Some(libc::ENOENT)) => Some(EPOLL_CTL_ADD),
                    _ => None,
                };
                if let Some(fallback) = fallback {
                    if epoll_ctl(self.epfd, fallback, fd, &mut ev) == 0 {
                        return Ok(());
                    }
                }
                return Err(MuxError::Backend(format!(
                    "Failed to register epoll event for fd {}: {}",
                    fd,
                    std::io::Error::last_os_error()
                )));
            }
        }
        Ok(())
    }

    #[cfg(target_os = "macos")]
    fn apply(&mut self, fd: RawFd, old: Interest, new: Interest) -> Result<()> {
        let mut added = Interest::empty();
        for mode in (new - old).modes() {
            if let Err(e) = self.change_filter(fd, mode, (EV_ADD | EV_ENABLE) as u16) {
                for mode in added.modes() {
                    let _ = self.change_filter(fd, mode, EV_DELETE as u16);
                }
                return Err(e);
            }
            added |= mode;
        }
        for mode in (old - new).modes() {
            let _ = self.change_filter(fd, mode, EV_DELETE as u16);
        }
        Ok(())
    }

    #[cfg(target_os = "macos")]
    fn change_filter(&self, fd: RawFd, mode: Interest, flags: u16) -> Result<()> {
        let filter = if mode == Interest::READABLE { EVFILT_READ } else { EVFILT_WRITE };
        let kev = libc::kevent {
            ident: fd as usize,
            filter,
            flags,
            fflags: 0,
            data: 0,
            udata: std::ptr::null_mut(),
        };

        let rc = unsafe {
            kevent(
                self.kq,
                &kev as *const libc::kevent,
                1,
                std::ptr::null_mut(),
                0,
                std::ptr::null(),
            )
        };
        if rc < 0 {
            return Err(MuxError::Backend(format!(
                "Failed to change kevent filter for fd {}: {}",
                fd,
                std::io::Error::last_os_error()
            )));
        }
        Ok(())
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    fn apply(&mut self, _fd: RawFd, _old: Interest, _new: Interest) -> Result<()> {
        Err(MuxError::Backend("Unsupported platform".to_string()))
    }

    fn update(&mut self, fd: RawFd, new: Interest) -> Result<()> {
        let old = self.armed(fd);
        if old == new {
            return Ok(());
        }
        let result = self.apply(fd, old, new);
        if new.is_empty() {
            // Nothing is left to watch whether or not the OS call succeeded.
            self.armed.remove(&fd);
            return result;
        }
        result?;
        self.armed.insert(fd, new);
        Ok(())
    }

    pub fn as_raw_fd(&self) -> RawFd {
        #[cfg(target_os = "macos")]
        {
            self.kq
        }

        #[cfg(target_os = "linux")]
        {
            self.epfd
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            -1
        }
    }
}

impl ReadinessBackend for Poller {
    fn arm(&mut self, fd: RawFd, mask: Interest) -> Result<()> {
        let new = self.armed(fd) | mask;
        self.update(fd, new)
    }

    fn disarm(&mut self, fd: RawFd, mask: Interest) -> Result<()> {
        let new = self.armed(fd) - mask;
        self.update(fd, new)
    }

    fn arm_semantics(&self) -> ArmSemantics {
        ArmSemantics::Accumulate
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        let fd = self.as_raw_fd();
        if fd >= 0 {
            unsafe {
                libc::close(fd);
            }
        }
    }
}
