//! Shared helpers for integration tests.

use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Locates the `testexe` helper binary built alongside the tests.
pub fn testexe_path() -> PathBuf {
    let mut path = env::current_exe()
        .expect("failed to get current exe path")
        .parent()
        .expect("failed to get parent dir")
        .to_path_buf();

    // Test binaries live in deps/; the helper sits one level up.
    if path.ends_with("deps") {
        path.pop();
    }

    #[cfg(windows)]
    path.push("testexe.exe");

    #[cfg(not(windows))]
    path.push("testexe");

    // On a clean tree cargo may run these tests before the helper bin of
    // the sibling package has been built; build it on demand. Concurrent
    // test binaries serialize on cargo's own target-dir lock.
    if !path.exists() {
        let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
        let mut args = vec!["build", "-p", "testexe"];
        if path.parent().is_some_and(|p| p.ends_with("release")) {
            args.push("--release");
        }
        let status = std::process::Command::new(cargo)
            .args(&args)
            .status()
            .expect("failed to invoke cargo build for testexe");
        assert!(status.success(), "cargo build -p testexe failed");
    }

    if !path.exists() {
        panic!("testexe binary not found at: {}", path.display());
    }

    path
}

/// Fresh scratch directory for one test.
pub fn create_test_dir(test_name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("proclens-test-{}-{}", test_name, std::process::id()));

    if dir.exists() {
        std::fs::remove_dir_all(&dir).ok();
    }
    std::fs::create_dir_all(&dir).expect("failed to create test directory");
    dir
}

/// Polls until `pred` holds or the deadline passes.
pub fn wait_until(pred: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if pred() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
}

/// Waits for the testexe ready file to appear.
pub fn wait_for_ready(path: &Path) {
    assert!(
        wait_until(|| path.exists(), Duration::from_secs(10)),
        "testexe never wrote its ready file: {}",
        path.display()
    );
}
