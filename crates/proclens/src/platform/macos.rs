//! macOS resolver.
//!
//! Argument recovery goes through `sysctl {CTL_KERN, KERN_PROCARGS2,
//! pid}`. The buffer layout is macOS-private: an `i32` argc header, the
//! executable path (which is *not* argv[0]), padding NUL runs, then
//! exactly argc NUL-terminated argument strings - see
//! [`args::parse_procargs2`].
//!
//! The kernel refuses the data query with EPERM or EINVAL for processes
//! the caller may not inspect (another user's, SIP-protected); on a pid that
//! liveness says is running, that is a capability restriction, not a
//! query error.

use proclens_common::{ProcError, ProcResult};
use tracing::{debug, warn};

use crate::info::Info;
use crate::platform::{args, sysctl, unix_is_alive, unix_terminate, Provider};

pub struct MacosProvider;

impl Provider for MacosProvider {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn is_supported(&self) -> bool {
        cfg!(target_os = "macos")
    }

    fn is_alive(&self, pid: u32) -> ProcResult<bool> {
        unix_is_alive(pid)
    }

    fn terminate(&self, pid: u32, force: bool) -> ProcResult<()> {
        unix_terminate(pid, force)
    }

    fn info(&self, pid: u32) -> ProcResult<Info> {
        let capacity = sysctl::argmax()?;

        let mut mib = [libc::CTL_KERN, libc::KERN_PROCARGS2, pid as libc::c_int];

        let buf = match sysctl::fetch(&mut mib, capacity) {
            Ok(buf) => buf,
            Err(e) => {
                let errno = e.raw_os_error();
                if matches!(errno, Some(libc::EPERM) | Some(libc::EINVAL))
                    && unix_is_alive(pid).unwrap_or(false)
                {
                    warn!(pid, "KERN_PROCARGS2 denied for live process");
                    return Err(ProcError::unsupported(
                        "info",
                        format!("no permission to read argument vector of pid {}", pid),
                    ));
                }
                return Err(ProcError::os_query(
                    errno,
                    format!("sysctl KERN_PROCARGS2 failed for pid {}: {}", pid, e),
                ));
            }
        };

        let argv = args::parse_procargs2(&buf)?;
        debug!(pid, tokens = argv.len(), "parsed KERN_PROCARGS2 buffer");

        Info::from_argv(argv).ok_or_else(|| {
            ProcError::unsupported(
                "info",
                format!("pid {} reports argc 0", pid),
            )
        })
    }
}
