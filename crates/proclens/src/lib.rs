//! # proclens
//!
//! Cross-platform process handle abstraction.
//!
//! Given a pid or a `std::process::Child` the host program already owns,
//! this crate answers three questions uniformly across Linux, macOS,
//! FreeBSD, Solaris/illumos and Windows:
//!
//! - Is this process alive?
//! - Terminate it (gracefully or forcibly).
//! - What executable and arguments was it launched with?
//!
//! The last one is the interesting part: POSIX has no portable call for
//! "get another process's argv", so each OS family gets its own resolver
//! that issues the native query and parses the OS-private buffer layout
//! (procfs `cmdline`, FreeBSD `KERN_PROC_ARGS`, macOS `KERN_PROCARGS2`,
//! the Windows PEB). Exactly one resolver is bound per process, lazily,
//! on first use.
//!
//! ```rust,no_run
//! let me = proclens::current();
//! assert_eq!(me.pid(), std::process::id());
//!
//! let other = proclens::of_pid(1234).unwrap();
//! if other.is_alive().unwrap() {
//!     let info = other.info().unwrap();
//!     println!("{} {:?}", info.executable, info.arguments);
//! }
//! ```

pub mod handle;
pub mod info;
pub mod platform;
pub mod registry;

// Re-export main types
pub use handle::{current, of_child, of_pid, ProcessHandle};
pub use info::Info;
pub use proclens_common::{ProcError, ProcResult};
