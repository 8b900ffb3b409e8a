//! Crash-log redirection
//!
//! Redirects the process's low-level error stream (fd 2) to a named
//! file so panic output and aborts survive the process. One-time,
//! process-lifetime setup performed before any logging; a failure here
//! is fatal since logging cannot be trusted without its crash channel.

use crate::core::error::{LoggerError, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Redirect stderr to the given file, creating parent directories as
/// needed.
#[cfg(unix)]
pub fn redirect_crash_log<P: AsRef<Path>>(path: P) -> Result<()> {
    use std::os::unix::io::AsRawFd;

    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::crash_log(
                    path.display().to_string(),
                    format!("Failed to create directory '{}': {}", parent.display(), e),
                )
            })?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::crash_log(path.display().to_string(), format!("Failed to open: {}", e))
        })?;

    // After dup2, fd 2 holds its own reference to the open file, so the
    // original handle can be dropped.
    let rc = unsafe { libc::dup2(file.as_raw_fd(), libc::STDERR_FILENO) };
    if rc == -1 {
        return Err(LoggerError::crash_log(
            path.display().to_string(),
            format!("dup2 failed: {}", std::io::Error::last_os_error()),
        ));
    }

    Ok(())
}

/// No-op on platforms without POSIX file descriptors.
#[cfg(not(unix))]
pub fn redirect_crash_log<P: AsRef<Path>>(_path: P) -> Result<()> {
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    // Redirecting the real stderr would break the test harness, so only
    // the directory-creation error path is exercised here; the happy
    // path runs in its own process in tests/crash_redirect.rs.

    #[test]
    fn test_open_failure_is_crash_log_error() {
        let err = redirect_crash_log("/proc/definitely/not/writable/crash.log").unwrap_err();
        assert!(matches!(err, LoggerError::CrashLogError { .. }));
    }
}
