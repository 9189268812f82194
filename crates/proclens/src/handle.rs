//! Public process handle.
//!
//! A `ProcessHandle` is pid identity plus an optional *weak* association
//! with a `std::process::Child` the host program owns. It holds no native
//! resources and no mutable state: any number of threads may call any
//! operation concurrently. Every operation delegates to the resolver the
//! [`crate::registry`] bound for this process.

use std::process::Child;
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

use proclens_common::{ProcError, ProcResult};
use tracing::debug;

use crate::info::Info;
use crate::registry;

/// Default bound on waiting for a termination request to be confirmed.
pub const DEFAULT_KILL_TIMEOUT: Duration = Duration::from_secs(5);

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Handle to one OS process: identity, liveness, termination, info.
///
/// Immutable after construction. Killing or dropping a handle never
/// affects the child object it was created from - the handle does not own
/// that object's lifecycle.
pub struct ProcessHandle {
    pid: u32,
    child: Option<Weak<Mutex<Child>>>,
}

/// Handle to this program's own process.
pub fn current() -> ProcessHandle {
    ProcessHandle {
        pid: std::process::id(),
        child: None,
    }
}

/// Handle to an arbitrary pid. Rejects pid 0.
pub fn of_pid(pid: u32) -> ProcResult<ProcessHandle> {
    if pid == 0 {
        return Err(ProcError::invalid_state("pid 0 is not a valid target"));
    }
    Ok(ProcessHandle { pid, child: None })
}

/// Handle to a child process the host program spawned.
///
/// The handle keeps only a weak reference; if the host drops the child,
/// operations fall back to the plain pid path. While the child is live,
/// [`ProcessHandle::kill`] prefers its own kill+wait so the host can reap
/// the exit status.
pub fn of_child(child: &Arc<Mutex<Child>>) -> ProcResult<ProcessHandle> {
    let pid = child
        .lock()
        .map_err(|_| ProcError::invalid_state("child process lock is poisoned"))?
        .id();
    Ok(ProcessHandle {
        pid,
        child: Some(Arc::downgrade(child)),
    })
}

impl ProcessHandle {
    /// Handle to this program's own process.
    pub fn current() -> Self {
        current()
    }

    /// Handle to an arbitrary pid. Rejects pid 0.
    pub fn of_pid(pid: u32) -> ProcResult<Self> {
        of_pid(pid)
    }

    /// Handle to a child process the host program spawned.
    pub fn of_child(child: &Arc<Mutex<Child>>) -> ProcResult<Self> {
        of_child(child)
    }

    /// The OS process identifier.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Whether the process is currently alive.
    ///
    /// A query failure (e.g. permission to even ask) is an error - never
    /// silently reported as "not alive".
    pub fn is_alive(&self) -> ProcResult<bool> {
        registry::global().provider()?.is_alive(self.pid)
    }

    /// Requests graceful termination and waits up to
    /// [`DEFAULT_KILL_TIMEOUT`] for it to be confirmed.
    pub fn kill(&self) -> ProcResult<bool> {
        self.terminate(false, DEFAULT_KILL_TIMEOUT)
    }

    /// Requests graceful termination with an explicit confirmation bound.
    pub fn kill_with_timeout(&self, timeout: Duration) -> ProcResult<bool> {
        self.terminate(false, timeout)
    }

    /// Unconditional termination (SIGKILL on Unix). On Windows there is
    /// no graceful/forced gradation and this is identical to [`kill`].
    ///
    /// [`kill`]: ProcessHandle::kill
    pub fn kill_forcibly(&self) -> ProcResult<bool> {
        self.terminate(true, DEFAULT_KILL_TIMEOUT)
    }

    /// Queries the executable and argument vector the process was
    /// launched with. Re-queries the OS on every call; nothing is cached.
    pub fn info(&self) -> ProcResult<Info> {
        registry::global().provider()?.info(self.pid)
    }

    /// Returns whether termination was *confirmed* (exit observed within
    /// `timeout`), not merely whether the request was sent.
    fn terminate(&self, force: bool, timeout: Duration) -> ProcResult<bool> {
        if let Some(child) = self.child.as_ref().and_then(Weak::upgrade) {
            return self.terminate_child(&child, force, timeout);
        }

        registry::global().provider()?.terminate(self.pid, force)?;
        self.confirm_exit(timeout)
    }

    /// Cooperative path: use the child object's own kill+wait so the host
    /// program can still reap the exit status afterwards
    /// (`std::process::Child` caches the status once waited).
    fn terminate_child(
        &self,
        child: &Arc<Mutex<Child>>,
        force: bool,
        timeout: Duration,
    ) -> ProcResult<bool> {
        let mut child = child
            .lock()
            .map_err(|_| ProcError::invalid_state("child process lock is poisoned"))?;

        // On Unix a graceful request is SIGTERM; Child::kill is SIGKILL,
        // so reserve it for the forced flavor. Windows only has
        // TerminateProcess either way.
        if force || cfg!(windows) {
            match child.kill() {
                Ok(()) => {}
                // Already exited: confirming below is all that's left.
                Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
                Err(e) => {
                    return Err(ProcError::os_query(
                        e.raw_os_error(),
                        format!("failed to kill child pid {}: {}", self.pid, e),
                    ))
                }
            }
        } else {
            #[cfg(unix)]
            crate::platform::unix_terminate(self.pid, false)?;
        }

        let deadline = Instant::now() + timeout;
        loop {
            let status = child.try_wait().map_err(|e| {
                ProcError::os_query(
                    e.raw_os_error(),
                    format!("failed to wait for child pid {}: {}", self.pid, e),
                )
            })?;
            if let Some(status) = status {
                debug!(pid = self.pid, %status, "child termination confirmed");
                return Ok(true);
            }
            if Instant::now() >= deadline {
                debug!(pid = self.pid, "child did not exit within the confirmation bound");
                return Ok(false);
            }
            std::thread::sleep(CONFIRM_POLL_INTERVAL);
        }
    }

    /// Polls liveness until the process is observed gone or the bound
    /// expires.
    fn confirm_exit(&self, timeout: Duration) -> ProcResult<bool> {
        let provider = registry::global().provider()?;
        let deadline = Instant::now() + timeout;
        loop {
            if !provider.is_alive(self.pid)? {
                debug!(pid = self.pid, "termination confirmed");
                return Ok(true);
            }
            if Instant::now() >= deadline {
                debug!(pid = self.pid, "process still alive at confirmation bound");
                return Ok(false);
            }
            std::thread::sleep(CONFIRM_POLL_INTERVAL);
        }
    }
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("has_child", &self.child.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_pid_matches_runtime() {
        assert_eq!(current().pid(), std::process::id());
    }

    #[test]
    fn test_of_pid_rejects_zero() {
        let err = of_pid(0).unwrap_err();
        assert!(matches!(err, ProcError::InvalidState { .. }));
    }

    #[test]
    fn test_current_process_is_alive() {
        assert!(current().is_alive().unwrap());
    }

    #[test]
    fn test_of_child_recovers_pid() {
        let mut command = if cfg!(windows) {
            let mut c = std::process::Command::new("ping");
            c.args(["-n", "60", "127.0.0.1"]);
            c
        } else {
            let mut c = std::process::Command::new("sleep");
            c.arg("60");
            c
        };
        let child = command.spawn().unwrap();
        let pid = child.id();
        let shared = Arc::new(Mutex::new(child));

        let handle = ProcessHandle::of_child(&shared).unwrap();
        assert_eq!(handle.pid(), pid);

        assert!(handle.kill_forcibly().unwrap());
        let _ = shared.lock().unwrap().wait();
    }
}
