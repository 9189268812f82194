//! Windows resolver.
//!
//! Liveness is `OpenProcess` + `GetExitCodeProcess` against the
//! `STILL_ACTIVE` sentinel (0x103). Termination is `TerminateProcess`
//! with exit code 0 - Windows has no graceful/forced gradation, so both
//! kill flavors are the same operation here.
//!
//! Command-line recovery walks the NT process structures: query the
//! `PROCESS_BASIC_INFORMATION` for the PEB address, read the PEB and its
//! `RTL_USER_PROCESS_PARAMETERS` out of the target's address space, then
//! read the raw UTF-16 command line the OS recorded at process creation.
//! Tokenization is delegated to `CommandLineToArgvW` - the same splitter
//! the OS uses when constructing argv for a new process - never a
//! hand-rolled quoting parser.

use proclens_common::{ProcError, ProcResult};
use tracing::{debug, warn};

use windows::core::{PCWSTR, PWSTR};
use windows::Wdk::System::Threading::{NtQueryInformationProcess, ProcessBasicInformation};
use windows::Win32::Foundation::{CloseHandle, LocalFree, HANDLE, HLOCAL, STILL_ACTIVE};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Threading::{
    GetExitCodeProcess, OpenProcess, TerminateProcess, PEB, PROCESS_BASIC_INFORMATION,
    PROCESS_QUERY_INFORMATION, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE,
    PROCESS_VM_READ, RTL_USER_PROCESS_PARAMETERS,
};
use windows::Win32::UI::Shell::CommandLineToArgvW;

use crate::info::Info;
use crate::platform::Provider;

// HRESULT-wrapped Win32 error codes, as windows::core::Error reports them.
const E_INVALID_PARAMETER: i32 = 0x8007_0057u32 as i32;
const E_ACCESS_DENIED: i32 = 0x8007_0005u32 as i32;

/// Process handle closed on every exit path.
struct OwnedHandle(HANDLE);

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        // SAFETY: handle was obtained from a successful OpenProcess.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Argv array from CommandLineToArgvW, released with LocalFree on every
/// exit path after the strings are copied out.
struct ArgvBuffer(*mut PWSTR);

impl Drop for ArgvBuffer {
    fn drop(&mut self) {
        // SAFETY: pointer came from a successful CommandLineToArgvW and
        // must be released with LocalFree.
        unsafe {
            let _ = LocalFree(HLOCAL(self.0 as *mut core::ffi::c_void));
        }
    }
}

fn open(pid: u32, access: windows::Win32::System::Threading::PROCESS_ACCESS_RIGHTS) -> Result<OwnedHandle, windows::core::Error> {
    // SAFETY: plain OpenProcess call; ownership of a valid handle moves
    // into the guard.
    unsafe { OpenProcess(access, false, pid) }.map(OwnedHandle)
}

pub struct WindowsProvider;

impl Provider for WindowsProvider {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn is_supported(&self) -> bool {
        cfg!(windows)
    }

    fn is_alive(&self, pid: u32) -> ProcResult<bool> {
        let handle = match open(pid, PROCESS_QUERY_LIMITED_INFORMATION) {
            Ok(h) => h,
            Err(e) => {
                // No such pid reports ERROR_INVALID_PARAMETER. Anything
                // else (access denied included) is a query failure, not
                // process death.
                if e.code().0 == E_INVALID_PARAMETER {
                    return Ok(false);
                }
                return Err(ProcError::os_query(
                    Some(e.code().0),
                    format!("OpenProcess failed for pid {}: {}", pid, e),
                ));
            }
        };

        let mut exit_code = 0u32;
        // SAFETY: handle is open with query rights; exit_code is a valid
        // output location.
        unsafe { GetExitCodeProcess(handle.0, &mut exit_code) }.map_err(|e| {
            ProcError::os_query(
                Some(e.code().0),
                format!("GetExitCodeProcess failed for pid {}: {}", pid, e),
            )
        })?;

        Ok(exit_code == STILL_ACTIVE.0 as u32)
    }

    fn terminate(&self, pid: u32, _force: bool) -> ProcResult<()> {
        let handle = open(pid, PROCESS_TERMINATE).map_err(|e| {
            ProcError::os_query(
                Some(e.code().0),
                format!("OpenProcess(PROCESS_TERMINATE) failed for pid {}: {}", pid, e),
            )
        })?;

        // Exit code 0: a terminated process is indistinguishable from a
        // normal exit on this path.
        // SAFETY: handle is open with terminate rights.
        unsafe { TerminateProcess(handle.0, 0) }.map_err(|e| {
            ProcError::os_query(
                Some(e.code().0),
                format!("TerminateProcess failed for pid {}: {}", pid, e),
            )
        })
    }

    fn info(&self, pid: u32) -> ProcResult<Info> {
        let raw = read_command_line(pid)?;
        let argv = split_command_line(&raw)?;
        debug!(pid, tokens = argv.len(), "tokenized recorded command line");

        let command_line = String::from_utf16_lossy(&raw);
        Info::from_argv(argv)
            .map(|info| info.with_command_line(command_line))
            .ok_or_else(|| {
                ProcError::unsupported(
                    "info",
                    format!("pid {} has an empty recorded command line", pid),
                )
            })
    }
}

/// Reads `size_of::<T>()` bytes of the target process at `addr`.
unsafe fn read_remote<T>(handle: HANDLE, addr: *const core::ffi::c_void) -> Result<T, windows::core::Error> {
    let mut value: T = std::mem::zeroed();
    ReadProcessMemory(
        handle,
        addr,
        &mut value as *mut T as *mut core::ffi::c_void,
        std::mem::size_of::<T>(),
        None,
    )?;
    Ok(value)
}

/// Maps a failure while inspecting another process: access denied is a
/// documented permission restriction ("no info available"), everything
/// else is a hard query error.
fn map_inspect_err(pid: u32, stage: &str, e: windows::core::Error) -> ProcError {
    if e.code().0 == E_ACCESS_DENIED {
        warn!(pid, stage, "command-line query denied");
        ProcError::unsupported("info", format!("no permission to inspect process {}", pid))
    } else {
        ProcError::os_query(
            Some(e.code().0),
            format!("{} failed for pid {}: {}", stage, pid, e),
        )
    }
}

/// Recovers the raw UTF-16 command line the OS recorded for `pid`.
fn read_command_line(pid: u32) -> ProcResult<Vec<u16>> {
    let handle = open(pid, PROCESS_QUERY_INFORMATION | PROCESS_VM_READ)
        .map_err(|e| map_inspect_err(pid, "OpenProcess", e))?;

    // SAFETY: handle has query rights; basic is a properly sized output
    // buffer for the ProcessBasicInformation class.
    let mut basic: PROCESS_BASIC_INFORMATION = unsafe { std::mem::zeroed() };
    let status = unsafe {
        NtQueryInformationProcess(
            handle.0,
            ProcessBasicInformation,
            &mut basic as *mut _ as *mut core::ffi::c_void,
            std::mem::size_of::<PROCESS_BASIC_INFORMATION>() as u32,
            std::ptr::null_mut(),
        )
    };
    if status.is_err() {
        return Err(ProcError::os_query(
            Some(status.0),
            format!("NtQueryInformationProcess failed for pid {}", pid),
        ));
    }
    if basic.PebBaseAddress.is_null() {
        return Err(ProcError::unsupported(
            "info",
            format!("pid {} exposes no PEB (minimal or system process)", pid),
        ));
    }

    // SAFETY: PebBaseAddress/ProcessParameters point into the target's
    // address space; read_remote copies fixed-size structs out of it.
    let peb: PEB = unsafe {
        read_remote(handle.0, basic.PebBaseAddress as *const core::ffi::c_void)
    }
    .map_err(|e| map_inspect_err(pid, "ReadProcessMemory(PEB)", e))?;

    let params: RTL_USER_PROCESS_PARAMETERS = unsafe {
        read_remote(handle.0, peb.ProcessParameters as *const core::ffi::c_void)
    }
    .map_err(|e| map_inspect_err(pid, "ReadProcessMemory(ProcessParameters)", e))?;

    let len_chars = (params.CommandLine.Length as usize) / 2;
    let mut wide = vec![0u16; len_chars];
    if len_chars > 0 {
        // SAFETY: Buffer/Length describe the command-line string inside
        // the target; wide is sized to exactly Length bytes.
        unsafe {
            ReadProcessMemory(
                handle.0,
                params.CommandLine.Buffer.as_ptr() as *const core::ffi::c_void,
                wide.as_mut_ptr() as *mut core::ffi::c_void,
                params.CommandLine.Length as usize,
                None,
            )
        }
        .map_err(|e| map_inspect_err(pid, "ReadProcessMemory(CommandLine)", e))?;
    }

    Ok(wide)
}

/// Splits a raw command line into argv with the OS's own canonical
/// splitting algorithm.
fn split_command_line(raw: &[u16]) -> ProcResult<Vec<String>> {
    if raw.is_empty() {
        // CommandLineToArgvW on an empty string substitutes the *current*
        // process's path, which would be a lie here.
        return Ok(Vec::new());
    }

    let mut wide = raw.to_vec();
    wide.push(0);

    let mut argc = 0i32;
    // SAFETY: wide is NUL-terminated and outlives the call.
    let argv_ptr = unsafe { CommandLineToArgvW(PCWSTR(wide.as_ptr()), &mut argc) };
    if argv_ptr.is_null() {
        let e = std::io::Error::last_os_error();
        return Err(ProcError::os_query(
            e.raw_os_error(),
            format!("CommandLineToArgvW failed: {}", e),
        ));
    }
    let argv = ArgvBuffer(argv_ptr);

    let mut out = Vec::with_capacity(argc as usize);
    for i in 0..argc as usize {
        // SAFETY: argv holds argc NUL-terminated wide strings.
        let token = unsafe { (*argv.0.add(i)).to_string() }.map_err(|e| {
            ProcError::os_query(None, format!("argv[{}] is not valid UTF-16: {}", i, e))
        })?;
        out.push(token);
    }

    Ok(out)
}
