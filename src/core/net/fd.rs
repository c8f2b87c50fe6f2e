use crate::common::error::{MuxError, Result};
use std::os::unix::io::{AsRawFd, RawFd};

/// Probe whether `fd` refers to an open descriptor in this process.
pub fn is_open(fd: RawFd) -> bool {
    if fd < 0 {
        return false;
    }
    unsafe { libc::fcntl(fd, libc::F_GETFD) >= 0 }
}

pub struct FileDescriptor {
    fd: RawFd,
    owned: bool,
}

impl FileDescriptor {
    pub fn new(fd: RawFd) -> Self {
        Self { fd, owned: false }
    }

    pub fn from_raw(fd: RawFd) -> Self {
        Self { fd, owned: true }
    }

    /// Create a pipe, returning its (read, write) ends.
    pub fn pipe() -> Result<(Self, Self)> {
        let mut fds = [0 as RawFd; 2];
        if unsafe { libc::pipe(fds.as_mut_ptr()) } < 0 {
            return Err(MuxError::Io(std::io::Error::last_os_error()));
        }
        Ok((Self::from_raw(fds[0]), Self::from_raw(fds[1])))
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd
    }

    pub fn is_open(&self) -> bool {
        is_open(self.fd)
    }

    pub fn set_non_blocking(&self) -> Result<()> {
        unsafe {
            let flags = libc::fcntl(self.fd, libc::F_GETFL);
            if flags < 0 {
                return Err(MuxError::Io(std::io::Error::last_os_error()));
            }

            if libc::fcntl(self.fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
                return Err(MuxError::Io(std::io::Error::last_os_error()));
            }
        }
        Ok(())
    }

    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        let n = unsafe { libc::write(self.fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
        if n < 0 {
            return Err(MuxError::Io(std::io::Error::last_os_error()));
        }
        Ok(n as usize)
    }

    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if n < 0 {
            return Err(MuxError::Io(std::io::Error::last_os_error()));
        }
        Ok(n as usize)
    }

    /// Close now instead of on drop.
    pub fn close(mut self) {
        if self.owned && self.fd >= 0 {
            unsafe {
                libc::close(self.fd);
            }
        }
        self.owned = false;
    }
}

impl AsRawFd for FileDescriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for FileDescriptor {
    fn drop(&mut self) {
        if self.owned && self.fd >= 0 {
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_ends_are_open_until_closed() {
        let (rd, wr) = FileDescriptor::pipe().unwrap();
        let raw = rd.as_raw_fd();
        assert!(rd.is_open());
        assert!(wr.is_open());
        rd.close();
        assert!(!is_open(raw));
    }

    #[test]
    fn test_negative_fd_is_not_open() {
        assert!(!is_open(-1));
    }

    #[test]
    fn test_pipe_transfers_bytes() {
        let (rd, wr) = FileDescriptor::pipe().unwrap();
        assert_eq!(wr.write(b"ping").unwrap(), 4);
        let mut buf = [0u8; 8];
        assert_eq!(rd.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], b"ping");
    }
}
