//! Procfs resolver: Linux, Solaris/illumos and generic Unix.
//!
//! These kernels expose a process's argument bytes through the
//! `/proc/<pid>/cmdline` pseudo-file as NUL-separated tokens - the same
//! token contract as the FreeBSD `KERN_PROC_ARGS` buffer (token 0 is the
//! executable). Solaris/illumos have shipped the same pseudo-file since
//! 11.3.

use std::io::ErrorKind;
use std::path::Path;

use proclens_common::{ProcError, ProcResult};
use tracing::debug;

use crate::info::Info;
use crate::platform::{args, unix_is_alive, unix_terminate, Provider};

pub struct ProcfsProvider;

impl Provider for ProcfsProvider {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn is_supported(&self) -> bool {
        Path::new("/proc").is_dir()
    }

    fn is_alive(&self, pid: u32) -> ProcResult<bool> {
        unix_is_alive(pid)
    }

    fn terminate(&self, pid: u32, force: bool) -> ProcResult<()> {
        unix_terminate(pid, force)
    }

    fn info(&self, pid: u32) -> ProcResult<Info> {
        let path = format!("/proc/{}/cmdline", pid);

        let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ProcError::unsupported(
                "info",
                format!("{} not present (process gone, or no procfs)", path),
            ),
            ErrorKind::PermissionDenied => {
                ProcError::unsupported("info", format!("no permission to read {}", path))
            }
            _ => ProcError::os_query(
                e.raw_os_error(),
                format!("failed to read {}: {}", path, e),
            ),
        })?;

        let argv = args::parse_nul_delimited(&bytes);
        debug!(pid, tokens = argv.len(), "read procfs cmdline");

        // Zombies and kernel threads expose an empty cmdline.
        Info::from_argv(argv).ok_or_else(|| {
            ProcError::unsupported(
                "info",
                format!("pid {} has an empty argument vector (zombie or kernel thread)", pid),
            )
        })
    }
}
