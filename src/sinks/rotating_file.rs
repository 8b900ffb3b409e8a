//! Rotating file sink
//!
//! Size-triggered rotation on the write path plus a public [`rotate`]
//! operation the daily scheduler calls to force a roll. Rotated files
//! get a timestamped backup name and are optionally gzip-compressed;
//! old backups are pruned by count and by age.
//!
//! [`rotate`]: RotatingFileSink::rotate

use super::Sink;
use crate::core::error::{LoggerError, Result};
use crate::core::level::LogLevel;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Rotation knobs, carried by the sink rather than the encoder.
#[derive(Debug, Clone)]
pub struct RotationPolicy {
    /// Rotate once the current file reaches this many megabytes.
    /// Zero disables the size trigger.
    pub max_size_mb: u64,
    /// Delete backups older than this many days. Zero keeps them.
    pub max_age_days: u32,
    /// Keep at most this many backups. Zero keeps all.
    pub max_backups: usize,
    /// Gzip-compress rotated files.
    pub compress: bool,
    /// strftime pattern for the backup name timestamp.
    pub backup_time_format: String,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size_mb: 200,
            max_age_days: 0,
            max_backups: 30,
            compress: false,
            backup_time_format: "%Y-%m-%d-%H%M%S".to_string(),
        }
    }
}

pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "create log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&base_path)
            .map_err(|e| {
                LoggerError::sink(
                    base_path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        let current_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    fn should_rotate(&self) -> bool {
        self.policy.max_size_mb > 0
            && self.current_size >= self.policy.max_size_mb * 1024 * 1024
    }

    /// Roll the current file over to a timestamped backup and reopen.
    ///
    /// Called from the write path when the size trigger fires and from
    /// the daily rotation scheduler. Rotating an empty file is a no-op.
    pub fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let has_content = fs::metadata(&self.base_path)
            .map(|m| m.len() > 0)
            .unwrap_or(false);

        if has_content {
            let backup = self.backup_path();
            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rename current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                self.compress_file(&backup)?;
            }

            self.prune_backups();
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;

        Ok(())
    }

    /// Backup name: `<stem>-<timestamp>.<ext>` next to the base file.
    fn backup_path(&self) -> PathBuf {
        let stem = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("log");
        let ext = self
            .base_path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("log");
        let timestamp = Local::now().format(&self.policy.backup_time_format);
        self.base_path
            .with_file_name(format!("{}-{}.{}", stem, timestamp, ext))
    }

    /// Delete backups beyond the count limit and older than the age
    /// limit. Failures are reported on stderr and ignored; pruning must
    /// never fail a rotation that already succeeded.
    fn prune_backups(&self) {
        let mut backups = self.list_backups();

        if self.policy.max_age_days > 0 {
            let cutoff = SystemTime::now()
                - Duration::from_secs(u64::from(self.policy.max_age_days) * 24 * 3600);
            backups.retain(|(path, modified)| {
                if *modified < cutoff {
                    if let Err(e) = fs::remove_file(path) {
                        eprintln!(
                            "[WARN] Failed to remove expired backup {}: {}",
                            path.display(),
                            e
                        );
                    }
                    false
                } else {
                    true
                }
            });
        }

        if self.policy.max_backups > 0 && backups.len() > self.policy.max_backups {
            // Newest first; everything past the limit goes.
            backups.sort_by(|a, b| b.1.cmp(&a.1));
            for (path, _) in backups.iter().skip(self.policy.max_backups) {
                if let Err(e) = fs::remove_file(path) {
                    eprintln!(
                        "[WARN] Failed to remove old backup {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    /// Sibling files whose name starts with `<stem>-`, with their
    /// modification times.
    fn list_backups(&self) -> Vec<(PathBuf, SystemTime)> {
        let stem = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("log");
        let prefix = format!("{}-", stem);
        let dir = match self.base_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        entries
            .flatten()
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .filter_map(|entry| {
                let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
                Some((entry.path(), modified))
            })
            .collect()
    }

    /// Stream-compress a rotated file, deleting the original only after
    /// the compressed copy is fully written.
    fn compress_file(&self, path: &Path) -> Result<()> {
        let gz_path = {
            let mut name = path.as_os_str().to_os_string();
            name.push(".gz");
            PathBuf::from(name)
        };

        let input = File::open(path).map_err(|e| {
            LoggerError::io_operation(
                "compress rotated file",
                format!("Failed to open '{}'", path.display()),
                e,
            )
        })?;
        let mut reader = BufReader::with_capacity(64 * 1024, input);

        let output = File::create(&gz_path).map_err(|e| {
            LoggerError::io_operation(
                "compress rotated file",
                format!("Failed to create '{}'", gz_path.display()),
                e,
            )
        })?;
        let mut encoder = flate2::write::GzEncoder::new(
            BufWriter::with_capacity(64 * 1024, output),
            flate2::Compression::default(),
        );

        let mut chunk = [0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            encoder.write_all(&chunk[..n])?;
        }
        encoder.finish()?.flush()?;

        fs::remove_file(path).map_err(|e| {
            LoggerError::io_operation(
                "compress rotated file",
                format!("Failed to remove uncompressed '{}'", path.display()),
                e,
            )
        })?;

        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn write_line(&mut self, _level: LogLevel, line: &[u8]) -> Result<()> {
        if self.should_rotate() {
            self.rotate()?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;
        writer.write_all(line)?;
        self.current_size += line.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
