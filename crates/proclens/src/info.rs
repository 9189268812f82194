//! Immutable process information snapshot.

/// Point-in-time snapshot of what a process was launched with.
///
/// Construction is owned entirely by the platform resolvers; `Info` itself
/// carries no behavior beyond equality and inspection. A snapshot is never
/// cached - every [`ProcessHandle::info`](crate::ProcessHandle::info) call
/// re-queries the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    /// Executable path, as recorded at process creation (argv\[0\]).
    pub executable: String,

    /// Ordered argument list, excluding the executable itself.
    pub arguments: Vec<String>,

    /// Raw pre-split command line. Only Windows records one; `None`
    /// everywhere else.
    pub command_line: Option<String>,
}

impl Info {
    /// Creates a snapshot from an executable and its arguments.
    pub fn new(executable: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            arguments,
            command_line: None,
        }
    }

    /// Attaches the raw command-line string (Windows resolver only).
    pub fn with_command_line(mut self, command_line: impl Into<String>) -> Self {
        self.command_line = Some(command_line.into());
        self
    }

    /// Splits a full argv into a snapshot: token 0 becomes the executable,
    /// the rest become the arguments. Returns `None` for an empty argv.
    pub fn from_argv(mut argv: Vec<String>) -> Option<Self> {
        if argv.is_empty() {
            return None;
        }
        let executable = argv.remove(0);
        Some(Self::new(executable, argv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argv_splits_off_executable() {
        let info = Info::from_argv(vec![
            "/usr/bin/tail".to_string(),
            "-f".to_string(),
            "log.txt".to_string(),
        ])
        .unwrap();

        assert_eq!(info.executable, "/usr/bin/tail");
        assert_eq!(info.arguments, vec!["-f", "log.txt"]);
        assert_eq!(info.command_line, None);
    }

    #[test]
    fn test_from_argv_empty() {
        assert_eq!(Info::from_argv(Vec::new()), None);
    }

    #[test]
    fn test_with_command_line() {
        let info = Info::new("app.exe", vec!["--flag".to_string()])
            .with_command_line("\"app.exe\" --flag");
        assert_eq!(info.command_line.as_deref(), Some("\"app.exe\" --flag"));
    }
}
