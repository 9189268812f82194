//! Minimal spawn target for integration tests.
//!
//! Writes its own pid to `--ready-file <path>` once started, then sleeps
//! until killed. Every other argument is accepted and ignored, so tests
//! can spawn it with an arbitrary argv and assert that argument recovery
//! reports that argv back verbatim.

use std::env;
use std::fs;
use std::thread;
use std::time::Duration;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Argument-recovery tests spawn this with arbitrary unknown flags
    // that must be accepted and ignored; a strict CLI parser would
    // reject them, so the scan stays a plain loop.
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--ready-file" && i + 1 < args.len() {
            i += 1;
            fs::write(&args[i], format!("{}\n", std::process::id()))
                .expect("failed to write ready file");
        }
        i += 1;
    }

    loop {
        thread::sleep(Duration::from_millis(100));
    }
}
