//! Logging helpers
//!
//! Scope timing on top of `tracing`, plus human-readable durations for log
//! fields and CLI output.

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Log levels for [`LogGuard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
}

/// RAII guard logging scope entry and exit with the elapsed time
///
/// ```rust
/// use tooling::logging::LogGuard;
///
/// fn encode_examples() {
///     let _guard = LogGuard::new("encode_examples");
///     // exit is logged when the guard drops
/// }
/// ```
pub struct LogGuard {
    name: String,
    level: LogLevel,
    start: Instant,
}

impl LogGuard {
    /// Create a guard logging at debug level
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_level(name, LogLevel::Debug)
    }

    /// Create a guard with a custom level
    pub fn with_level(name: impl Into<String>, level: LogLevel) -> Self {
        let name = name.into();
        match level {
            LogLevel::Debug => debug!("Entering: {}", name),
            LogLevel::Info => info!("Entering: {}", name),
        }
        Self {
            name,
            level,
            start: Instant::now(),
        }
    }

    /// Elapsed time since guard creation
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        let elapsed = format_duration(self.start.elapsed());
        match self.level {
            LogLevel::Debug => debug!("Exiting: {} (elapsed: {})", self.name, elapsed),
            LogLevel::Info => info!("Exiting: {} (elapsed: {})", self.name, elapsed),
        }
    }
}

/// Format duration in human-readable form
///
/// ```rust
/// use tooling::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
/// assert_eq!(format_duration(Duration::from_micros(500)), "500μs");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", micros / 1000)
    } else if micros < 60_000_000 {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    } else {
        let seconds = micros / 1_000_000;
        format!("{}m{}s", seconds / 60, seconds % 60)
    }
}
