//! Structured logging for the climate monitoring service
//!
//! Provides context-rich logging with component tags, data type
//! identifiers, timestamps, and severity levels. Supports both console
//! output and file-based logging for unattended report runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Noaa,
    Synthetic,
    Transform,
    Config,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Noaa => write!(f, "NOAA"),
            Component::Synthetic => write!(f, "SYNTH"),
            Component::Transform => write!(f, "XFORM"),
            Component::Config => write!(f, "CFG"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - no token configured, or the query window simply has no data
    Expected,
    /// Unexpected failure - indicates service degradation or an API change
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn format_entry(level: LogLevel, component: &Component, tag: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let tag_part = tag.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, component, tag_part, message)
    }

    fn log(&self, level: LogLevel, component: &Component, tag: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, component, tag, message);
        let tag_part = tag.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, tag_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, tag_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {}  // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, component: Component, tag: Option<&str>, message: &str) {
    // A poisoned lock drops the message; transforms must never panic on logging.
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &component, tag, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, tag: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, component, tag, message);
}

/// Log a warning message
pub fn warn(component: Component, tag: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, component, tag, message);
}

/// Log an error message
pub fn error(component: Component, tag: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, component, tag, message);
}

/// Log a debug message
pub fn debug(component: Component, tag: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, component, tag, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a NOAA CDO fetch failure based on the rendered error message
pub fn classify_noaa_failure(error_message: &str) -> FailureType {
    if error_message.contains("No NOAA API token") || error_message.contains("No data returned") {
        FailureType::Expected
    }
    // 429 is the CDO rate limit (5 req/s, 10k/day); 5xx is service trouble
    else if error_message.contains("HTTP error: 429") || error_message.contains("HTTP error: 5") {
        FailureType::Unexpected
    }
    // Parse errors suggest API changes
    else if error_message.contains("Parse error") {
        FailureType::Unexpected
    }
    else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a NOAA failure with automatic classification
pub fn log_noaa_failure(endpoint: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_noaa_failure(&error_msg);

    let message = format!(
        "{} failed [{}]: {}",
        operation,
        failure_type,
        error_msg
    );

    match failure_type {
        FailureType::Expected => debug(Component::Noaa, Some(endpoint), &message),
        FailureType::Unexpected => error(Component::Noaa, Some(endpoint), &message),
        FailureType::Unknown => warn(Component::Noaa, Some(endpoint), &message),
    }
}

// ---------------------------------------------------------------------------
// Fetch Summary Logging
// ---------------------------------------------------------------------------

/// Log how many records each data type contributed to a loaded dataset
pub fn log_fetch_summary(component: Component, counts: &[(String, usize)]) {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    let breakdown = counts
        .iter()
        .map(|(data_type, n)| format!("{}={}", data_type, n))
        .collect::<Vec<_>>()
        .join(", ");

    let message = format!("Loaded {} records ({})", total, breakdown);

    if total == 0 {
        warn(component, None, &message);
    } else {
        info(component, None, &message);
    }
}
