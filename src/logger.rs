//! Leveled logging sink used by the store.
//!
//! The store only ever calls [`Logger`] methods. The default
//! [`ConsoleLogger`] forwards to the [`log`] facade, so install `env_logger`
//! (or any `log` backend) in your binary to see the output.

use std::fmt;

/// Severity of a log message, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Unrecoverable; the caller is expected to stop.
    Fatal,
    /// An operation failed.
    Error,
    /// Something odd that did not fail the operation.
    Warning,
    /// Lifecycle events.
    Info,
    /// Details useful while debugging.
    Debug,
    /// Per-operation chatter.
    Trace,
}

impl Level {
    fn to_log(self) -> log::Level {
        match self {
            Level::Fatal | Level::Error => log::Level::Error,
            Level::Warning => log::Level::Warn,
            Level::Info => log::Level::Info,
            Level::Debug => log::Level::Debug,
            Level::Trace => log::Level::Trace,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Fatal => "FATAL",
            Level::Error => "ERROR",
            Level::Warning => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        f.write_str(s)
    }
}

/// A sink for leveled messages. Only [`log`](Logger::log) is required; the
/// per-level methods route through it.
///
/// Messages come in as [`fmt::Arguments`], so call sites read
/// `logger.debug(format_args!("using {}", path.display()))`.
pub trait Logger: Send + Sync {
    /// Emit one message at `level`.
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    /// Log at [`Level::Fatal`].
    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Fatal, args)
    }

    /// Log at [`Level::Error`].
    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args)
    }

    /// Log at [`Level::Warning`].
    fn warning(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warning, args)
    }

    /// Log at [`Level::Info`].
    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args)
    }

    /// Log at [`Level::Debug`].
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args)
    }

    /// Log at [`Level::Trace`].
    fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, args)
    }
}

/// Forwards messages at or above a threshold to the `log` facade under the
/// `json_cabinet` target.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    threshold: Level,
}

impl ConsoleLogger {
    /// Pass through everything at `threshold` or more severe.
    pub fn new(threshold: Level) -> Self {
        Self { threshold }
    }

    /// The configured threshold.
    #[must_use]
    pub fn threshold(&self) -> Level {
        self.threshold
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if level > self.threshold {
            return;
        }
        if level == Level::Fatal {
            log::error!(target: "json_cabinet", "FATAL: {args}");
        } else {
            log::log!(target: "json_cabinet", level.to_log(), "{args}");
        }
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}
