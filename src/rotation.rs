//! Daily rotation trigger
//!
//! A background thread that fires once per local midnight and asks a
//! shared rotating writer to roll over. Fire-and-forget: rotation
//! failures are reported on stderr and swallowed, never surfaced to
//! log-call sites, and the timer never blocks event encoding.

use crate::sinks::rotating_file::RotatingFileSink;
use chrono::{Duration as ChronoDuration, Local};
use crossbeam_channel::{bounded, select, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct RotationScheduler {
    shutdown: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl RotationScheduler {
    /// Spawn the timer thread against a shared rotating sink handle.
    pub fn start(sink: Arc<Mutex<RotatingFileSink>>) -> Self {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("log-rotation".to_string())
            .spawn(move || loop {
                let wait = duration_until_next_midnight();
                select! {
                    recv(shutdown_rx) -> _ => break,
                    default(wait) => {
                        let mut sink = sink.lock();
                        let path = sink.path().display().to_string();
                        if let Err(e) = sink.rotate() {
                            eprintln!("[WARN] Daily rotation of '{}' failed: {}", path, e);
                        }
                    }
                }
            })
            .expect("failed to spawn rotation scheduler thread");

        Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Stop the timer and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RotationScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Time remaining until the next local midnight.
fn duration_until_next_midnight() -> Duration {
    let now = Local::now();
    let tomorrow = (now + ChronoDuration::days(1)).date_naive();
    let next_midnight = tomorrow
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time of day");
    let remaining = next_midnight - now.naive_local();
    remaining.to_std().unwrap_or(Duration::from_secs(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::Sink;
    use tempfile::TempDir;

    #[test]
    fn test_duration_until_next_midnight_bounds() {
        let wait = duration_until_next_midnight();
        assert!(wait <= Duration::from_secs(24 * 3600));
        assert!(wait > Duration::ZERO);
    }

    #[test]
    fn test_scheduler_shutdown_is_prompt() {
        let dir = TempDir::new().unwrap();
        let sink = RotatingFileSink::new(dir.path().join("app.log")).unwrap();
        let shared = Arc::new(Mutex::new(sink));

        let scheduler = RotationScheduler::start(Arc::clone(&shared));
        // Writer stays usable while the scheduler idles.
        shared
            .lock()
            .write_line(crate::core::level::LogLevel::Info, b"line\n")
            .unwrap();
        scheduler.shutdown();
    }
}
