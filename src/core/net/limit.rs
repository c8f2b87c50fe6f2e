use crate::common::error::{MuxError, Result};

/// Resolve the process's soft limit on open descriptors.
///
/// Descriptor numbers are `i32`, so an unlimited or oversized limit is
/// clamped to `i32::MAX`.
pub fn resolve_max_fd() -> Result<u32> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };

    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut rlim) } < 0 {
        return Err(MuxError::ResourceExhaustion(format!(
            "getrlimit(RLIMIT_NOFILE) failed: {}",
            std::io::Error::last_os_error()
        )));
    }

    let cur = rlim.rlim_cur as u64;
    Ok(cur.min(i32::MAX as u64) as u32)
}

/// Resolve the limit, then apply an optional configured cap.
pub fn resolve_with_cap(cap: Option<u32>) -> Result<u32> {
    let limit = resolve_max_fd()?;
    Ok(match cap {
        Some(cap) => limit.min(cap),
        None => limit,
    })
}
