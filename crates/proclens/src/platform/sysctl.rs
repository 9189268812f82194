//! Shared sysctl plumbing for the BSD-family resolvers (macOS, FreeBSD).
//!
//! These kernel interfaces do not report the exact size of an answer in
//! advance, so every data query is preceded by a sizing query: read
//! `KERN_ARGMAX` (the kernel's maximum argument size), allocate exactly
//! that capacity, then fetch. The buffer is owned by the single call that
//! allocated it and dropped on every exit path.

use proclens_common::{ProcError, ProcResult};

/// Reads `kern.argmax`, the capacity the kernel may return for an
/// argument buffer.
pub(crate) fn argmax() -> ProcResult<usize> {
    let mut mib = [libc::CTL_KERN, libc::KERN_ARGMAX];
    let mut value: libc::c_int = 0;
    let mut size = std::mem::size_of::<libc::c_int>();

    // SAFETY: mib is a valid 2-element KERN_ARGMAX query; value/size
    // describe a properly sized output buffer.
    let rc = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            &mut value as *mut _ as *mut libc::c_void,
            &mut size,
            std::ptr::null_mut(),
            0,
        )
    };

    if rc != 0 {
        let e = std::io::Error::last_os_error();
        return Err(ProcError::os_query(
            e.raw_os_error(),
            format!("sysctl KERN_ARGMAX failed: {}", e),
        ));
    }
    if value <= 0 {
        return Err(ProcError::os_query(
            None,
            format!("sysctl KERN_ARGMAX returned nonsense capacity: {}", value),
        ));
    }

    Ok(value as usize)
}

/// Issues the data query for `mib`, filling a buffer of `capacity` bytes.
/// Returns the buffer truncated to the length the kernel actually wrote,
/// or the raw OS error on nonzero status.
pub(crate) fn fetch(mib: &mut [libc::c_int], capacity: usize) -> Result<Vec<u8>, std::io::Error> {
    let mut buf = vec![0u8; capacity];
    let mut size = capacity;

    // SAFETY: buf is allocated to `capacity` as learned from the sizing
    // query; size tracks the same capacity.
    let rc = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            buf.as_mut_ptr() as *mut libc::c_void,
            &mut size,
            std::ptr::null_mut(),
            0,
        )
    };

    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }

    buf.truncate(size);
    Ok(buf)
}
