//! # Daylog
//!
//! Daylog is a library for writing application logs to a single active file
//! that is rotated at a period boundary (daily at midnight by default) and
//! pruned by two independent retention policies: a cap on the number of
//! archived files and a maximum age in days. Rotation renames the active
//! file with a date suffix (`app.log` becomes `app.log.2025-04-01`), starts
//! a fresh active file, and sweeps the archives left behind. Rotation
//! boundaries can be computed in UTC, the system local time zone, or a fixed
//! offset, and archived files can optionally be compressed. The
//! [`RollingAppender`] implements [`std::io::Write`], so it also works as an
//! appender for the `tracing` crate behind `tracing_appender::non_blocking`.
//!
//! ## Example
//!
//! ```rust
//! use daylog::{Logger, RollingAppenderBuilder, Rotation};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let appender = RollingAppenderBuilder::new("./logs", "app.log")
//!         .rotation(Rotation::Daily)
//!         .max_keep_files(7)   // Keep at most seven archived files
//!         .retention_days(7)   // Delete archives older than a week
//!         .build()?;
//!     let mut logger = Logger::new("DailyLogger", appender);
//!
//!     logger.info("Application started");
//!     logger.warning("This is a warning message");
//!     logger.error("This is an error message");
//!     logger.flush()?;
//!
//!     Ok(())
//! }
//! ```
use {
    chrono::{DateTime, FixedOffset, Local, NaiveTime, Timelike, Utc},
    flate2::write::GzEncoder,
    regex::Regex,
    std::{
        fmt,
        fs,
        io::{self, Write as _},
        path::{Path, PathBuf},
        sync::{PoisonError, RwLock},
        time::{Duration, SystemTime, UNIX_EPOCH},
    },
};

/// Timestamp layout used at the front of every rendered log line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of a log record.
///
/// Levels are ordered from least to most severe, so a [`Logger`] threshold
/// comparison like `level < min_level` does the expected thing. Each level
/// renders as its upper-case name in log lines (`INFO`, `WARNING`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single log record, created per call and consumed immediately by
/// formatting. Only the rendered text is persisted.
///
/// Rendering via [`fmt::Display`] produces the stable line layout:
///
/// ```text
/// YYYY-MM-DD HH:MM:SS - <logger-name> - <LEVEL> - <message>
/// ```
#[derive(Debug, Clone)]
pub struct Record<'a> {
    /// When the record was created, in the appender's time zone.
    pub timestamp: DateTime<FixedOffset>,
    /// Name of the logger that produced the record.
    pub logger: &'a str,
    /// Severity of the record.
    pub level: Level,
    /// The message text, written as-is.
    pub message: &'a str,
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.logger,
            self.level,
            self.message
        )
    }
}

/// How frequently the active log file is rotated.
///
/// The interval determines when the boundary check fires, the date suffix
/// given to archived files, and which file names the retention sweep
/// considers. Daily rotation at midnight is the default and suits most
/// applications; the finer intervals are mainly useful for high-volume
/// logging and for exercising rotation quickly.
#[derive(Debug, Clone)]
pub enum Rotation {
    /// Rotate every minute. Archives are named `app.log.2025-04-01-19-55`.
    Minutely,
    /// Rotate every hour. Archives are named `app.log.2025-04-01-19`.
    Hourly,
    /// Rotate every day at midnight in the configured time zone. Archives
    /// are named `app.log.2025-04-01`.
    Daily,
}

impl Rotation {
    /// Length of one rotation period.
    fn period(&self) -> chrono::Duration {
        match self {
            Rotation::Minutely => chrono::Duration::minutes(1),
            Rotation::Hourly => chrono::Duration::hours(1),
            Rotation::Daily => chrono::Duration::days(1),
        }
    }

    /// strftime layout for the archive date suffix.
    fn suffix_format(&self) -> &'static str {
        match self {
            Rotation::Minutely => "%Y-%m-%d-%H-%M",
            Rotation::Hourly => "%Y-%m-%d-%H",
            Rotation::Daily => "%Y-%m-%d",
        }
    }

    /// Regex fragment matching the archive date suffix.
    fn date_pattern(&self) -> &'static str {
        match self {
            Rotation::Minutely => r"\d{4}-\d{2}-\d{2}-\d{2}-\d{2}",
            Rotation::Hourly => r"\d{4}-\d{2}-\d{2}-\d{2}",
            Rotation::Daily => r"\d{4}-\d{2}-\d{2}",
        }
    }
}

/// Specifies the time zone used for rotation timing and archive naming.
///
/// # Examples
/// ```
/// use daylog::TimeZone;
/// use chrono::FixedOffset;
///
/// // Use UTC time for global deployments
/// let utc = TimeZone::UTC;
///
/// // Use the system local time zone (changes with system settings)
/// let local = TimeZone::Local;
///
/// // Use a fixed offset for a specific region (e.g. UTC+8)
/// let fixed = TimeZone::Fix(FixedOffset::east_opt(8 * 3600).unwrap());
/// ```
#[derive(Debug, Clone)]
pub enum TimeZone {
    /// Use UTC. Best for consistent timing across regions.
    UTC,
    /// Use the system's local time zone.
    Local,
    /// Use a fixed time zone offset.
    Fix(FixedOffset),
}

/// Compression applied to an archived file right after rotation.
///
/// The archive is rewritten once, gains the matching extension
/// (`app.log.2025-04-01.gz`), and the uncompressed form is removed. The
/// retention sweep recognizes both the plain and the compressed name.
#[derive(Debug, Clone)]
pub enum Compression {
    /// Gzip, a good balance of ratio and speed. Produces `.gz` files.
    Gzip,
    /// XZ, higher ratio but slower. Produces `.xz` files.
    XZ,
}

impl Compression {
    fn extension(&self) -> &'static str {
        match self {
            Compression::Gzip => "gz",
            Compression::XZ => "xz",
        }
    }
}

/// Configuration for the appender: where the log lives, when it rotates,
/// and which retention policies apply to its archives.
struct AppenderMeta {
    /// The directory where the active file and its archives are stored.
    directory: PathBuf,
    /// The name of the active log file.
    filename: PathBuf,
    /// How often the active file is rotated.
    rotation: Rotation,
    /// The time zone used for rotation timing and archive naming, stored as
    /// a fixed offset so boundary arithmetic is consistent for the lifetime
    /// of the appender.
    time_zone: FixedOffset,
    /// Optional compression applied to archives at rotation.
    compression: Option<Compression>,
    /// Count cap: keep at most this many archived files.
    max_keep_files: Option<u64>,
    /// Age cap: delete archived files whose last modification is older than
    /// this many days.
    retention_days: Option<u64>,
}

impl AppenderMeta {
    /// Defaults: daily rotation, local time zone, no compression, and both
    /// retention caps disabled.
    fn new<P: AsRef<Path>>(directory: P, filename: P) -> Self {
        AppenderMeta {
            directory: directory.as_ref().to_path_buf(),
            filename: filename.as_ref().to_path_buf(),
            rotation: Rotation::Daily,
            time_zone: Local::now().offset().to_owned(),
            compression: None,
            max_keep_files: None,
            retention_days: None,
        }
    }

    /// Get the current time in the configured time zone.
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.time_zone)
    }

    /// Replace the time-of-day in the datetime with the specified time.
    #[allow(deprecated)]
    fn replace_time(&self, base_datetime: DateTime<FixedOffset>, time_to_replaced: NaiveTime) -> DateTime<FixedOffset> {
        DateTime::<FixedOffset>::from_local(
            base_datetime.date_naive().and_time(time_to_replaced),
            *base_datetime.offset(),
        )
    }

    /// First rotation boundary strictly after `base_datetime`: the start of
    /// the next minute, hour, or day depending on the rotation interval.
    fn next_time(&self, base_datetime: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>, DaylogError> {
        match &self.rotation {
            Rotation::Minutely => {
                let d = base_datetime + chrono::Duration::minutes(1);
                Ok(self.replace_time(
                    d,
                    NaiveTime::from_hms_opt(d.hour(), d.minute(), 0).ok_or(DaylogError::GetNaiveTimeFailed)?,
                ))
            }
            Rotation::Hourly => {
                let d = base_datetime + chrono::Duration::hours(1);
                Ok(self.replace_time(
                    d,
                    NaiveTime::from_hms_opt(d.hour(), 0, 0).ok_or(DaylogError::GetNaiveTimeFailed)?,
                ))
            }
            Rotation::Daily => {
                let d = base_datetime + chrono::Duration::days(1);
                Ok(self.replace_time(
                    d,
                    NaiveTime::from_hms_opt(0, 0, 0).ok_or(DaylogError::GetNaiveTimeFailed)?,
                ))
            }
        }
    }

    /// Path of the active log file.
    fn active_log_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    /// Path for the archive covering the period that starts at `datetime`.
    fn archive_path(&self, datetime: &DateTime<FixedOffset>) -> PathBuf {
        let file_name = datetime
            .format(&format!(
                "{}.{}",
                self.filename.as_path().to_string_lossy(),
                self.rotation.suffix_format()
            ))
            .to_string();
        self.directory.join(file_name)
    }

    /// Open the log file for appending, creating it and its parent directory
    /// if they do not exist yet.
    fn create_log_file(&self, log_path: &Path) -> Result<fs::File, DaylogError> {
        let mut open_options = fs::OpenOptions::new();
        open_options.append(true).create(true);

        let mut create_log_file_res = open_options.open(log_path);
        if create_log_file_res.is_err() {
            // Create the directory if it doesn't exist
            if let Some(parent) = log_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|err| DaylogError::CreateDirectoryFailed(parent.to_path_buf(), err.to_string()))?;
                create_log_file_res = open_options.open(log_path);
            }
        }

        create_log_file_res.map_err(|err| DaylogError::CreateFileFailed(log_path.to_path_buf(), err.to_string()))
    }

    /// Archive the active file and start a fresh one.
    ///
    /// The active file is renamed with the date suffix of the period that
    /// just ended, a new active file is created and swapped into `writer`,
    /// and the retention sweep runs on the archives left behind. An occupied
    /// archive name aborts the attempt before anything is renamed; archived
    /// files are never overwritten.
    fn rotate(&self, writer: &mut fs::File, boundary: DateTime<FixedOffset>) -> Result<(), DaylogError> {
        let active_path = self.active_log_path();
        let archive_path = self.archive_path(&(boundary - self.rotation.period()));
        if archive_path.exists() {
            return Err(DaylogError::ArchiveCollision(archive_path));
        }

        writer.flush().map_err(DaylogError::FileIOError)?;
        fs::rename(&active_path, &archive_path).map_err(|err| DaylogError::RenameFileError {
            from: active_path.clone(),
            to: archive_path.clone(),
            error: err.to_string(),
        })?;

        match self.create_log_file(&active_path) {
            Ok(new_log_file) => *writer = new_log_file,
            Err(err) => {
                // Restore the active file so the next attempt starts clean.
                let _ = fs::rename(&archive_path, &active_path);
                return Err(err);
            }
        }

        if let Err(err) = self.process_archives(&archive_path) {
            eprintln!(
                "Failed to process old log files for '{}': {}",
                archive_path.display(),
                err
            );
        }
        Ok(())
    }

    /// Compress the newly created archive, then enforce the count cap and
    /// the age cap on everything that matches the archive pattern. Failure
    /// to delete one file is reported and never stops the sweep.
    fn process_archives(&self, archive_path: &PathBuf) -> Result<(), DaylogError> {
        self.compress(archive_path)?;
        let mut archives = self.list_archives()?;

        if let Some(max_keep_files) = self.max_keep_files {
            if archives.len() > max_keep_files as usize {
                let excess = archives.len() - max_keep_files as usize;
                for path in archives.drain(..excess) {
                    if let Err(err) = fs::remove_file(&path) {
                        eprintln!("Failed to remove old log file '{}': {}", path.display(), err);
                    }
                }
            }
        }

        if let Some(retention_days) = self.retention_days {
            let cutoff = SystemTime::now()
                .checked_sub(Duration::from_secs(retention_days * 24 * 60 * 60))
                .unwrap_or(UNIX_EPOCH);
            self.remove_stale_archives(&archives, cutoff);
        }

        Ok(())
    }

    /// Delete the archives whose last modification is older than `cutoff`,
    /// one file at a time.
    fn remove_stale_archives(&self, archives: &[PathBuf], cutoff: SystemTime) {
        for path in archives {
            let mtime = match fs::metadata(path).and_then(|metadata| metadata.modified()) {
                Ok(mtime) => mtime,
                Err(err) => {
                    eprintln!("Failed to read modification time of '{}': {}", path.display(), err);
                    continue;
                }
            };
            if mtime < cutoff {
                if let Err(err) = fs::remove_file(path) {
                    eprintln!("Failed to remove old log file '{}': {}", path.display(), err);
                }
            }
        }
    }

    /// Anchored pattern for archive file names. The whole name must match,
    /// so `applog.2023-10-01.bak` and similar near-misses are never touched.
    fn archive_pattern(&self) -> Result<Regex, DaylogError> {
        let compression_suffix = self
            .compression
            .as_ref()
            .map(|compression| format!(r"(\.{})?", compression.extension()))
            .unwrap_or_default();
        Regex::new(&format!(
            r"^{}\.{}{compression_suffix}$",
            regex::escape(&self.filename.as_path().to_string_lossy()),
            self.rotation.date_pattern()
        ))
        .map_err(|err| DaylogError::InternalError(err.to_string()))
    }

    /// List all archived log files in the directory, oldest first.
    fn list_archives(&self) -> Result<Vec<PathBuf>, DaylogError> {
        let pattern = self.archive_pattern()?;
        let files = fs::read_dir(&self.directory).map_err(|err| DaylogError::InternalError(err.to_string()))?;

        let mut archives = Vec::new();
        for file in files.flatten() {
            let metadata = file.metadata().map_err(DaylogError::FileIOError)?;
            if !metadata.is_file() {
                continue;
            }
            if let Some(file_name) = file.file_name().to_str() {
                if pattern.is_match(file_name) {
                    archives.push(file.path());
                }
            }
        }

        // Sort the archives by name; date suffixes sort chronologically.
        archives.sort();

        Ok(archives)
    }

    /// Compress the archive in place, replacing it with a `.gz`/`.xz` file.
    fn compress(&self, log_path: &PathBuf) -> Result<(), DaylogError> {
        let compression = match &self.compression {
            Some(compression) => compression,
            None => {
                return Ok(());
            }
        };
        let infile = fs::File::open(log_path).map_err(DaylogError::FileIOError)?;
        let mut reader = io::BufReader::new(infile);

        let compressed_path = PathBuf::from(format!(
            "{}.{}",
            log_path.to_string_lossy(),
            compression.extension()
        ));
        let outfile = fs::File::create(&compressed_path).map_err(DaylogError::FileIOError)?;
        let mut writer = io::BufWriter::new(outfile);

        match compression {
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(writer, flate2::Compression::default());
                io::copy(&mut reader, &mut encoder)?;
                encoder.finish()?.flush()?;
            }
            Compression::XZ => {
                lzma_rs::xz_compress(&mut reader, &mut writer)?;
                writer.flush()?;
            }
        }

        fs::remove_file(log_path).map_err(DaylogError::FileIOError)?;
        Ok(())
    }
}

/// Errors that can occur when using the appender or the logger.
#[derive(Debug, thiserror::Error)]
pub enum DaylogError {
    #[error("Failed to create directory '{0}': {1}")]
    CreateDirectoryFailed(PathBuf, String),
    #[error("Failed to create file '{0}': {1}")]
    CreateFileFailed(PathBuf, String),
    #[error("Failed to get naive time: invalid time format")]
    GetNaiveTimeFailed,
    #[error("Failed to rename file from '{from}' to '{to}': {error}")]
    RenameFileError { from: PathBuf, to: PathBuf, error: String },
    #[error("Archive target '{0}' already exists")]
    ArchiveCollision(PathBuf),
    #[error("File IO error: {0}")]
    FileIOError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// An appender that writes to a single active file, rotates it at each
/// period boundary, and prunes its archives.
///
/// The boundary check runs before each write, so the record that crosses
/// midnight is the first line of the fresh file. A failed rotation is
/// reported to stderr and the write proceeds to the still-open active file;
/// the logging path is never taken down by a rotation problem.
pub struct RollingAppender {
    meta: AppenderMeta,
    next_rotation_time: DateTime<FixedOffset>,
    writer: RwLock<fs::File>,
}

impl RollingAppender {
    /// Path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.meta.active_log_path()
    }
}

#[allow(clippy::io_other_error)]
impl io::Write for RollingAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.meta.now() >= self.next_rotation_time {
            let boundary = self.next_rotation_time;
            let writer = self.writer.get_mut().unwrap_or_else(PoisonError::into_inner);
            if let Err(err) = self.meta.rotate(writer, boundary) {
                eprintln!(
                    "Failed to rotate log file '{}': {}",
                    self.meta.active_log_path().display(),
                    err
                );
            }
            // Schedule the next boundary whether or not the attempt worked;
            // a persistent failure must not turn into a retry on every write.
            self.next_rotation_time = self
                .meta
                .next_time(self.meta.now())
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
        }

        self.writer.get_mut().unwrap_or_else(PoisonError::into_inner).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.get_mut().unwrap_or_else(PoisonError::into_inner).flush()
    }
}

/// Provides a fluent interface for configuring [`RollingAppender`] instances.
///
/// # Default Configuration
///
/// * Daily rotation at midnight
/// * Local system time zone
/// * No compression
/// * Both retention caps disabled (keep all archives)
///
/// # Examples
///
/// Rotate daily, keep at most seven archives, and delete anything older
/// than a week:
///
/// ```rust
/// use daylog::{RollingAppenderBuilder, Rotation};
///
/// let appender = RollingAppenderBuilder::new("./logs", "service.log")
///     .rotation(Rotation::Daily)
///     .max_keep_files(7)
///     .retention_days(7)
///     .build()
///     .unwrap();
/// ```
pub struct RollingAppenderBuilder {
    meta: AppenderMeta,
}

impl RollingAppenderBuilder {
    /// Create a new appender builder.
    /// # Arguments
    /// * `directory` - The directory where the log files are stored.
    /// * `filename` - The name of the active log file.
    pub fn new<P: AsRef<Path>>(directory: P, filename: P) -> Self {
        RollingAppenderBuilder {
            meta: AppenderMeta::new(directory, filename),
        }
    }

    /// Set the time zone used for rotation timing and archive naming.
    pub fn time_zone(self, time_zone: TimeZone) -> Self {
        Self {
            meta: AppenderMeta {
                time_zone: match time_zone {
                    TimeZone::UTC => Utc::now().fixed_offset().offset().to_owned(),
                    TimeZone::Local => Local::now().offset().to_owned(),
                    TimeZone::Fix(fixed_offset) => fixed_offset,
                },
                ..self.meta
            },
        }
    }

    /// Set the rotation interval.
    pub fn rotation(self, rotation: Rotation) -> Self {
        Self {
            meta: AppenderMeta { rotation, ..self.meta },
        }
    }

    /// Compress archived files with the given algorithm.
    pub fn compression(self, compression: Compression) -> Self {
        Self {
            meta: AppenderMeta {
                compression: Some(compression),
                ..self.meta
            },
        }
    }

    /// Keep at most this many archived files; the oldest are deleted first.
    pub fn max_keep_files(self, max_keep_files: u64) -> Self {
        Self {
            meta: AppenderMeta {
                max_keep_files: Some(max_keep_files),
                ..self.meta
            },
        }
    }

    /// Delete archived files whose last modification is older than this
    /// many days.
    pub fn retention_days(self, retention_days: u64) -> Self {
        Self {
            meta: AppenderMeta {
                retention_days: Some(retention_days),
                ..self.meta
            },
        }
    }

    /// Build the appender, opening the active file for appending.
    pub fn build(self) -> Result<RollingAppender, DaylogError> {
        let active_path = self.meta.active_log_path();
        let writer = self.meta.create_log_file(&active_path)?;

        // Schedule the first rotation from the mtime of a pre-existing
        // active file, so a stale file left over from an earlier run is
        // archived under its own date on the first write instead of
        // collecting another day of records.
        let base_datetime = fs::metadata(&active_path)
            .and_then(|metadata| metadata.modified())
            .map(|mtime| DateTime::<Utc>::from(mtime).with_timezone(&self.meta.time_zone))
            .unwrap_or_else(|_| self.meta.now());
        let next_rotation_time = self.meta.next_time(base_datetime)?;

        Ok(RollingAppender {
            meta: self.meta,
            next_rotation_time,
            writer: RwLock::new(writer),
        })
    }
}

/// The application-facing logging handle.
///
/// A `Logger` renders records with a timestamp, its own name, and the
/// severity level, then appends them through a [`RollingAppender`]. It is an
/// explicitly constructed instance with an explicit lifecycle: build it at
/// startup, pass it by reference to whatever needs to log, and [`flush`] it
/// at shutdown. There is no global logger state.
///
/// The leveled convenience methods never propagate errors; a failed write is
/// reported to stderr so it is not lost, and the application keeps running.
/// Callers that need to observe failures can use [`log`] directly.
///
/// [`flush`]: Logger::flush
/// [`log`]: Logger::log
///
/// # Examples
///
/// ```rust
/// use daylog::{Level, Logger, RollingAppenderBuilder};
///
/// let appender = RollingAppenderBuilder::new("./logs", "worker.log")
///     .build()
///     .unwrap();
/// let mut logger = Logger::new("worker", appender).with_min_level(Level::Info);
///
/// logger.info("worker started");
/// logger.flush().unwrap();
/// ```
pub struct Logger {
    name: String,
    min_level: Level,
    appender: RollingAppender,
}

impl Logger {
    /// Create a logger writing through `appender`. Records below
    /// [`Level::Info`] are skipped until [`with_min_level`] says otherwise.
    ///
    /// [`with_min_level`]: Logger::with_min_level
    pub fn new<N: Into<String>>(name: N, appender: RollingAppender) -> Self {
        Logger {
            name: name.into(),
            min_level: Level::Info,
            appender,
        }
    }

    /// Set the minimum severity this logger writes out.
    pub fn with_min_level(mut self, min_level: Level) -> Self {
        self.min_level = min_level;
        self
    }

    /// Render and append one record, returning any write failure to the
    /// caller. Records below the minimum level are skipped.
    pub fn log(&mut self, level: Level, message: &str) -> Result<(), DaylogError> {
        if level < self.min_level {
            return Ok(());
        }
        let record = Record {
            timestamp: self.appender.meta.now(),
            logger: &self.name,
            level,
            message,
        };
        // One write per record, so a rotation can never split a line.
        self.appender
            .write_all(format!("{record}\n").as_bytes())
            .map_err(DaylogError::FileIOError)
    }

    /// Log a message at [`Level::Debug`].
    pub fn debug(&mut self, message: &str) {
        self.emit(Level::Debug, message);
    }

    /// Log a message at [`Level::Info`].
    pub fn info(&mut self, message: &str) {
        self.emit(Level::Info, message);
    }

    /// Log a message at [`Level::Warning`].
    pub fn warning(&mut self, message: &str) {
        self.emit(Level::Warning, message);
    }

    /// Log a message at [`Level::Error`].
    pub fn error(&mut self, message: &str) {
        self.emit(Level::Error, message);
    }

    /// Log a message at [`Level::Critical`].
    pub fn critical(&mut self, message: &str) {
        self.emit(Level::Critical, message);
    }

    /// Flush the underlying writer. Call once at shutdown.
    pub fn flush(&mut self) -> Result<(), DaylogError> {
        self.appender.flush().map_err(DaylogError::FileIOError)
    }

    fn emit(&mut self, level: Level, message: &str) {
        if let Err(err) = self.log(level, message) {
            eprintln!(
                "Failed to write log record to '{}': {}",
                self.appender.path().display(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::io::{Read as _, Write as _};
    use tempfile::TempDir;

    fn builder(dir: &TempDir, filename: &str) -> RollingAppenderBuilder {
        RollingAppenderBuilder::new(dir.path(), Path::new(filename)).time_zone(TimeZone::UTC)
    }

    fn set_age_days(path: &Path, days: u64) {
        let mtime = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
        filetime::set_file_mtime(path, FileTime::from_system_time(mtime)).unwrap();
    }

    #[test]
    fn record_renders_expected_format() {
        let timestamp = DateTime::parse_from_rfc3339("2023-10-01T12:30:45+00:00").unwrap();
        let record = Record {
            timestamp,
            logger: "DailyLogger",
            level: Level::Info,
            message: "Application started",
        };
        assert_eq!(
            record.to_string(),
            "2023-10-01 12:30:45 - DailyLogger - INFO - Application started"
        );
    }

    #[test]
    fn level_display_and_ordering() {
        assert_eq!(Level::Debug.to_string(), "DEBUG");
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Warning.to_string(), "WARNING");
        assert_eq!(Level::Error.to_string(), "ERROR");
        assert_eq!(Level::Critical.to_string(), "CRITICAL");
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Critical);
    }

    #[test]
    fn next_time_advances_to_period_boundary() {
        let base = DateTime::parse_from_rfc3339("2025-03-01T13:45:10+00:00").unwrap();

        let daily = AppenderMeta::new("logs", "app.log");
        assert_eq!(
            daily.next_time(base).unwrap(),
            DateTime::parse_from_rfc3339("2025-03-02T00:00:00+00:00").unwrap()
        );

        let hourly = AppenderMeta {
            rotation: Rotation::Hourly,
            ..AppenderMeta::new("logs", "app.log")
        };
        assert_eq!(
            hourly.next_time(base).unwrap(),
            DateTime::parse_from_rfc3339("2025-03-01T14:00:00+00:00").unwrap()
        );

        let minutely = AppenderMeta {
            rotation: Rotation::Minutely,
            ..AppenderMeta::new("logs", "app.log")
        };
        assert_eq!(
            minutely.next_time(base).unwrap(),
            DateTime::parse_from_rfc3339("2025-03-01T13:46:00+00:00").unwrap()
        );
    }

    #[test]
    fn archive_pattern_is_anchored() {
        let meta = AppenderMeta::new("logs", "app.log");
        let pattern = meta.archive_pattern().unwrap();
        assert!(pattern.is_match("app.log.2023-10-01"));
        assert!(!pattern.is_match("applog.2023-10-01"));
        assert!(!pattern.is_match("app.log.2023-10-01.bak"));
        assert!(!pattern.is_match("app.log.20231001"));
        assert!(!pattern.is_match("app.log.2023-10-01.gz"));

        let gzipped = AppenderMeta {
            compression: Some(Compression::Gzip),
            ..AppenderMeta::new("logs", "app.log")
        };
        let pattern = gzipped.archive_pattern().unwrap();
        assert!(pattern.is_match("app.log.2023-10-01"));
        assert!(pattern.is_match("app.log.2023-10-01.gz"));
        assert!(!pattern.is_match("app.log.2023-10-01.gz.bak"));
    }

    #[test]
    fn logger_writes_lines_in_order() {
        let dir = TempDir::new().unwrap();
        let appender = builder(&dir, "app.log").build().unwrap();
        let mut logger = Logger::new("worker", appender);

        for i in 0..3 {
            logger.info(&format!("message {i}"));
        }
        logger.flush().unwrap();

        let content = fs::read_to_string(dir.path().join("app.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let line_pattern =
            Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} - worker - INFO - message (\d)$").unwrap();
        for (i, line) in lines.iter().enumerate() {
            let captures = line_pattern
                .captures(line)
                .unwrap_or_else(|| panic!("unexpected line format: {line}"));
            assert_eq!(captures[1].parse::<usize>().unwrap(), i);
        }
    }

    #[test]
    fn logger_skips_records_below_min_level() {
        let dir = TempDir::new().unwrap();
        let appender = builder(&dir, "app.log").build().unwrap();
        let mut logger = Logger::new("worker", appender).with_min_level(Level::Warning);

        logger.debug("not written");
        logger.info("not written either");
        logger.warning("kept");
        logger.error("also kept");
        logger.flush().unwrap();

        let content = fs::read_to_string(dir.path().join("app.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(" - WARNING - kept"));
        assert!(lines[1].contains(" - ERROR - also kept"));
    }

    #[test]
    fn rotation_archives_active_file_and_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let mut appender = builder(&dir, "app.log").build().unwrap();
        writeln!(appender, "first line").unwrap();

        // Pull the boundary back a day so the next write crosses it.
        let boundary = appender.next_rotation_time - chrono::Duration::days(1);
        appender.next_rotation_time = boundary;
        writeln!(appender, "second line").unwrap();

        let archive = dir.path().join(format!(
            "app.log.{}",
            (boundary - chrono::Duration::days(1)).format("%Y-%m-%d")
        ));
        assert_eq!(fs::read_to_string(&archive).unwrap(), "first line\n");
        assert_eq!(fs::read_to_string(appender.path()).unwrap(), "second line\n");
    }

    #[test]
    fn rotation_uses_mtime_of_existing_active_file() {
        let dir = TempDir::new().unwrap();
        let active = dir.path().join("app.log");
        fs::write(&active, "stale line\n").unwrap();
        let three_days_ago = SystemTime::now() - Duration::from_secs(3 * 24 * 60 * 60);
        filetime::set_file_mtime(&active, FileTime::from_system_time(three_days_ago)).unwrap();

        let mut appender = builder(&dir, "app.log").build().unwrap();
        writeln!(appender, "fresh line").unwrap();

        let expected_date = DateTime::<Utc>::from(three_days_ago).format("%Y-%m-%d").to_string();
        let archive = dir.path().join(format!("app.log.{expected_date}"));
        assert_eq!(fs::read_to_string(&archive).unwrap(), "stale line\n");
        assert_eq!(fs::read_to_string(&active).unwrap(), "fresh line\n");
    }

    #[test]
    fn rotation_aborts_when_archive_name_taken() {
        let dir = TempDir::new().unwrap();
        let mut appender = builder(&dir, "app.log").build().unwrap();
        writeln!(appender, "first line").unwrap();

        let boundary = appender.next_rotation_time - chrono::Duration::days(1);
        let occupied = dir.path().join(format!(
            "app.log.{}",
            (boundary - chrono::Duration::days(1)).format("%Y-%m-%d")
        ));
        fs::write(&occupied, "already archived\n").unwrap();

        appender.next_rotation_time = boundary;
        writeln!(appender, "second line").unwrap();

        // The occupant is untouched and both records stay in the active file.
        assert_eq!(fs::read_to_string(&occupied).unwrap(), "already archived\n");
        assert_eq!(
            fs::read_to_string(appender.path()).unwrap(),
            "first line\nsecond line\n"
        );
    }

    #[test]
    fn sweep_deletes_only_files_beyond_retention_window() {
        let dir = TempDir::new().unwrap();
        let appender = builder(&dir, "app.log").retention_days(7).build().unwrap();

        for (name, age_days) in [
            ("app.log.2025-01-01", 8),
            ("app.log.2025-01-02", 6),
            ("app.log.2025-01-03", 1),
        ] {
            let path = dir.path().join(name);
            fs::write(&path, "archived\n").unwrap();
            set_age_days(&path, age_days);
        }

        appender
            .meta
            .process_archives(&dir.path().join("app.log.2025-01-03"))
            .unwrap();

        assert!(!dir.path().join("app.log.2025-01-01").exists());
        assert!(dir.path().join("app.log.2025-01-02").exists());
        assert!(dir.path().join("app.log.2025-01-03").exists());
    }

    #[test]
    fn sweep_ignores_non_matching_file_names() {
        let dir = TempDir::new().unwrap();
        let appender = builder(&dir, "app.log").retention_days(7).build().unwrap();

        let matching = dir.path().join("app.log.2023-10-01");
        let near_misses = [
            dir.path().join("applog.2023-10-01"),
            dir.path().join("app.log.2023-10-01.bak"),
            dir.path().join("app.log.20231001"),
            dir.path().join("app.log.2023-10-01.gz"),
        ];
        for path in near_misses.iter().chain([&matching]) {
            fs::write(path, "old content\n").unwrap();
            set_age_days(path, 30);
        }

        appender.meta.process_archives(&matching).unwrap();

        assert!(!matching.exists());
        for path in &near_misses {
            assert!(path.exists(), "should not have deleted {}", path.display());
        }
    }

    #[test]
    fn sweep_enforces_count_cap() {
        let dir = TempDir::new().unwrap();
        let appender = builder(&dir, "app.log").max_keep_files(7).build().unwrap();

        for day in 1..=10 {
            fs::write(dir.path().join(format!("app.log.2025-01-{day:02}")), "archived\n").unwrap();
        }

        appender
            .meta
            .process_archives(&dir.path().join("app.log.2025-01-10"))
            .unwrap();

        for day in 1..=3 {
            assert!(!dir.path().join(format!("app.log.2025-01-{day:02}")).exists());
        }
        for day in 4..=10 {
            assert!(dir.path().join(format!("app.log.2025-01-{day:02}")).exists());
        }
    }

    #[cfg(unix)]
    #[test]
    fn sweep_survives_failed_deletions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let appender = builder(&dir, "app.log").retention_days(7).build().unwrap();

        for day in 1..=3 {
            let path = dir.path().join(format!("app.log.2025-01-{day:02}"));
            fs::write(&path, "archived\n").unwrap();
            set_age_days(&path, 10);
        }

        // Deleting a file needs write access to the directory; revoking it
        // makes every removal fail without touching the sweep's scan.
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();
        let result = appender
            .meta
            .process_archives(&dir.path().join("app.log.2025-01-01"));
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        assert!(result.is_ok());
    }

    #[test]
    fn gzip_archive_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut appender = builder(&dir, "app.log")
            .compression(Compression::Gzip)
            .build()
            .unwrap();
        writeln!(appender, "compressed line").unwrap();

        let boundary = appender.next_rotation_time - chrono::Duration::days(1);
        appender.next_rotation_time = boundary;
        writeln!(appender, "next line").unwrap();

        let date = (boundary - chrono::Duration::days(1)).format("%Y-%m-%d").to_string();
        let archive = dir.path().join(format!("app.log.{date}.gz"));
        assert!(archive.exists());
        assert!(!dir.path().join(format!("app.log.{date}")).exists());

        let mut decoded = String::new();
        flate2::read::GzDecoder::new(fs::File::open(&archive).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "compressed line\n");
    }
}
