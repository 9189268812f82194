//! Pure parsers for the OS-private argument buffer layouts.
//!
//! These operate on plain byte slices so the layouts can be unit-tested on
//! any host. The buffers themselves come from the platform resolvers.

use proclens_common::{ProcError, ProcResult};

/// Parses the FreeBSD `KERN_PROC_ARGS` / procfs `cmdline` layout:
/// NUL-terminated strings concatenated back-to-back with no length header.
///
/// Strings are read sequentially until the buffer is exhausted. Trailing
/// NUL padding (runs of NULs with nothing after them) is tolerated and
/// produces no tokens; an empty string *between* other strings is a real
/// empty argument and is preserved.
pub fn parse_nul_delimited(buf: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = 0;

    while pos < buf.len() {
        if buf[pos] == 0 && buf[pos..].iter().all(|b| *b == 0) {
            break; // trailing padding
        }
        let end = buf[pos..]
            .iter()
            .position(|b| *b == 0)
            .map(|i| pos + i)
            .unwrap_or(buf.len());
        out.push(String::from_utf8_lossy(&buf[pos..end]).into_owned());
        pos = end + 1;
    }

    out
}

/// Parses the macOS `KERN_PROCARGS2` layout:
///
/// ```text
/// [argc: i32, native byte order]
/// [executable path][NUL]          <- NOT argv[0]; skipped
/// [NUL padding, variable length]
/// [argv[0]][NUL] [padding?] [argv[1]][NUL] ... [argv[argc-1]][NUL]
/// ```
///
/// The kernel inserts variable runs of padding NULs between strings for
/// alignment, so the parser skips every consecutive NUL before reading
/// each of the `argc` argument strings.
pub fn parse_procargs2(buf: &[u8]) -> ProcResult<Vec<String>> {
    if buf.len() < 4 {
        return Err(ProcError::os_query(
            None,
            format!("PROCARGS2 buffer too short for argc header: {} bytes", buf.len()),
        ));
    }

    let argc = i32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if argc < 0 {
        return Err(ProcError::os_query(
            None,
            format!("PROCARGS2 buffer reports negative argc: {}", argc),
        ));
    }
    let argc = argc as usize;
    let mut pos = 4;

    // Skip the executable path; it precedes argv[0] and is not part of it.
    while pos < buf.len() && buf[pos] != 0 {
        pos += 1;
    }

    let mut argv = Vec::with_capacity(argc);
    for i in 0..argc {
        // Skip the padding run before the next string.
        while pos < buf.len() && buf[pos] == 0 {
            pos += 1;
        }
        if pos >= buf.len() {
            return Err(ProcError::os_query(
                None,
                format!("PROCARGS2 buffer truncated: argc is {} but only {} strings present", argc, i),
            ));
        }
        let start = pos;
        while pos < buf.len() && buf[pos] != 0 {
            pos += 1;
        }
        argv.push(String::from_utf8_lossy(&buf[start..pos]).into_owned());
    }

    Ok(argv)
}
