//! FreeBSD resolver.
//!
//! Argument recovery goes through `sysctl {CTL_KERN, KERN_PROC,
//! KERN_PROC_ARGS, pid}`. The returned buffer holds NUL-terminated
//! strings back-to-back with no length header; the first string is the
//! executable.

use proclens_common::{ProcError, ProcResult};
use tracing::debug;

use crate::info::Info;
use crate::platform::{args, sysctl, unix_is_alive, unix_terminate, Provider};

pub struct FreebsdProvider;

impl Provider for FreebsdProvider {
    fn name(&self) -> &'static str {
        "freebsd"
    }

    fn is_supported(&self) -> bool {
        cfg!(target_os = "freebsd")
    }

    fn is_alive(&self, pid: u32) -> ProcResult<bool> {
        unix_is_alive(pid)
    }

    fn terminate(&self, pid: u32, force: bool) -> ProcResult<()> {
        unix_terminate(pid, force)
    }

    fn info(&self, pid: u32) -> ProcResult<Info> {
        let capacity = sysctl::argmax()?;

        let mut mib = [
            libc::CTL_KERN,
            libc::KERN_PROC,
            libc::KERN_PROC_ARGS,
            pid as libc::c_int,
        ];

        let buf = sysctl::fetch(&mut mib, capacity).map_err(|e| {
            ProcError::os_query(
                e.raw_os_error(),
                format!("sysctl KERN_PROC_ARGS failed for pid {}: {}", pid, e),
            )
        })?;

        let argv = args::parse_nul_delimited(&buf);
        debug!(pid, tokens = argv.len(), "read KERN_PROC_ARGS buffer");

        Info::from_argv(argv).ok_or_else(|| {
            ProcError::unsupported(
                "info",
                format!("pid {} returned an empty argument buffer", pid),
            )
        })
    }
}
