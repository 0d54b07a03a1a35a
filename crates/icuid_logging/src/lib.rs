use core::{
    fmt::{Display, Arguments, Write as _},
    sync::atomic::{AtomicU8, self},
};
use std::io::{self, Write};

use parking_lot::{RwLock, Mutex};

mod time;
pub use time::*;

// The RwLock is only used to have a global set-able state that is `Sync`
static LOGGER : RwLock<Option<&'static Logger>> = RwLock::new(None);

/// Install the global logger used by the logging macros.
pub fn set_logger(logger: &'static Logger) {
    *LOGGER.write() = Some(logger);
}

/// Get the global logger, if one was installed.
///
/// Libraries log through this, so nothing is written until an application calls [`set_logger`].
pub fn get_logger() -> Option<&'static Logger> {
    *LOGGER.read()
}

/// Logging level
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LogLevel {
    /// Severe error: will probably result in a crash
    Severe,
    /// Error: may not result in a crash
    Error,
    /// Warning: While not as bad as an error, the result may not be what was expected
    Warning,
    /// General info
    Info,
    /// Verbose info
    Verbose,
    /// Debug info (includes verbose info)
    Debug,
}

impl LogLevel {
    /// Parse a level from its lowercase name, e.g. the value of an environment variable
    pub fn from_name(name: &str) -> Option<LogLevel> {
        match name.trim().to_ascii_lowercase().as_str() {
            "severe"  => Some(LogLevel::Severe),
            "error"   => Some(LogLevel::Error),
            "warning" => Some(LogLevel::Warning),
            "info"    => Some(LogLevel::Info),
            "verbose" => Some(LogLevel::Verbose),
            "debug"   => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl LogLevel {
    /// ANSI style and padded label of the level
    const fn style(self) -> (&'static str, &'static str) {
        match self {
            LogLevel::Severe  => ("\x1B[1m\x1B[41m\x1B[30m", "SEVERE "),
            LogLevel::Error   => ("\x1B[91m", "ERROR  "),
            LogLevel::Warning => ("\x1B[93m", "WARNING"),
            LogLevel::Info    => ("\x1B[37m", "INFO   "),
            LogLevel::Verbose => ("\x1B[90m", "VERBOSE"),
            LogLevel::Debug   => ("\x1B[94m", "DEBUG  "),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (style, label) = self.style();
        write!(f, "{style}[{label}]\x1B[0m")
    }
}

/// Log category
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LogCategory {
    category     : &'static str,
    sub_category : Option<&'static str>
}

impl LogCategory {
    pub const fn new(name: &'static str) -> Self {
        Self { category: name, sub_category: None }
    }

    /// Category with a sub-category, displayed as `name(sub_name)`
    pub const fn new_with_sub(name: &'static str, sub_name: &'static str) -> Self {
        Self { category: name, sub_category: Some(sub_name) }
    }
}

impl Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.category)?;
        if let Some(sub) = self.sub_category {
            write!(f, "({sub})")?;
        }
        Ok(())
    }
}

/// Source location and time of a message
#[derive(Clone, Copy, Debug)]
pub struct LogLocation {
    file     : &'static str,
    line     : u32,
    /// Empty when the macro wasn't given a function
    function : &'static str,
    time     : TimeStamp,
}

impl LogLocation {
    pub const fn new(file: &'static str, line: u32, function: &'static str, time: TimeStamp) -> Self {
        Self { file, line, function, time }
    }

    pub const fn file(&self) -> &str {
        self.file
    }

    pub const fn line(&self) -> u32 {
        self.line
    }

    pub const fn function(&self) -> &str {
        self.function
    }

    pub const fn timestamp(&self) -> TimeStamp {
        self.time
    }

    /// Only errors and debug messages show where they were logged
    fn shown_for(level: LogLevel) -> bool {
        matches!(level, LogLevel::Severe | LogLevel::Error | LogLevel::Debug)
    }
}

impl Display for LogLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, " ({}:{}: {})", self.file, self.line, self.function)
    }
}

/// Name of the function passed to the logging macros, e.g. `log_error!(CAT, Self::load, "...")`
pub fn get_func_name<F>(_: F) -> &'static str {
    core::any::type_name::<F>()
}

#[macro_export]
macro_rules! log_location {
    () => {
        $crate::LogLocation::new(file!(), line!(), "", $crate::get_timestamp())
    };
    ($func: expr) => {
        $crate::LogLocation::new(file!(), line!(), $crate::get_func_name($func), $crate::get_timestamp())
    };
}

type LogWriter = Box<dyn Write + Send>;

/// Buffered output of a [`Logger`]
pub struct LoggerState {
    writers:        [Option<LogWriter>; Self::MAX_WRITERS],
    /// Messages not yet written out
    pending:        String,
    always_flush:   bool,
    log_to_console: bool,
}

impl LoggerState {
    const MAX_WRITERS: usize = 8;
    const FLUSH_THRESHOLD: usize = 4 * 1024;

    pub const fn new() -> Self {
        Self {
            writers: [const { None }; Self::MAX_WRITERS],
            pending: String::new(),
            always_flush: false,
            log_to_console: true,
        }
    }

    fn append(&mut self, args: Arguments) {
        _ = self.pending.write_fmt(args);
    }

    fn end_message(&mut self) {
        self.pending.push('\n');
        if self.always_flush || self.pending.len() > Self::FLUSH_THRESHOLD {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let bytes = self.pending.as_bytes();
        if self.log_to_console {
            _ = io::stderr().lock().write_all(bytes);
        }
        for writer in self.writers.iter_mut().flatten() {
            _ = writer.write_all(bytes).and_then(|_| writer.flush());
        }
        self.pending.clear();
    }
}

/// Logger
///
/// Supports up to 8 writers, e.g. a log file, a pipe to an external tool, etc
pub struct Logger {
    state: Mutex<LoggerState>,
    max_log_level: AtomicU8,
}

impl Logger {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(LoggerState::new()),
            max_log_level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Set the maximum log level (severe == lowest, debug == highest)
    pub fn set_max_level(&self, level: LogLevel) {
        self.max_log_level.store(level as u8, atomic::Ordering::Relaxed)
    }

    /// Check if a message at `level` would be written
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.max_log_level.load(atomic::Ordering::Relaxed)
    }

    /// Set whether the logger should flush after each write
    pub fn set_always_flush(&self, always_flush: bool) {
        self.state.lock().always_flush = always_flush;
    }

    /// Set whether the logger should log it's output to console
    pub fn set_log_to_console(&self, log_to_console: bool) {
        let mut state = self.state.lock();

        // Make sure to flush first, cause all messages before wanted/didn't want to be log to be written to console
        state.flush();
        state.log_to_console = log_to_console;
    }

    /// Add a writer.
    ///
    /// Returns `Ok(index)` if space was available. This index can be used to remove the writer later on.
    ///
    /// Otherwise returns an `Err` with the provided writer
    pub fn add_writer(&self, writer: LogWriter) -> Result<usize, LogWriter> {
        let mut state = self.state.lock();

        match state.writers.iter().position(Option::is_none) {
            Some(index) => {
                state.writers[index] = Some(writer);
                Ok(index)
            },
            None => Err(writer),
        }
    }

    /// Remove a writer from the logger
    pub fn remove_writer(&self, index: usize) -> Option<LogWriter> {
        let mut state = self.state.lock();
        state.flush();
        state.writers.get_mut(index).and_then(Option::take)
    }

    /// Log a message
    pub fn log(&self, category: LogCategory, level: LogLevel, loc: LogLocation, text: &str) {
        self.log_fmt(category, level, loc, format_args!("{text}"));
    }

    pub fn log_fmt(&self, category: LogCategory, level: LogLevel, loc: LogLocation, format: Arguments) {
        if !self.is_enabled(level) {
            return;
        }

        let timestamp = loc.timestamp();
        let mut state = self.state.lock();
        state.append(format_args!("\x1B[38m{timestamp}\x1B[0m {level} [{category}]"));
        if LogLocation::shown_for(level) {
            state.append(format_args!("{loc}"));
        }
        state.append(format_args!(": {format}"));
        state.end_message();
    }

    pub fn flush(&self) {
        self.state.lock().flush()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Log a message through the global logger, does nothing when no logger is installed
///
/// Pass a function after the level to include it in the message's location.
#[macro_export]
macro_rules! log {
    (@no_func $category:expr, $level:expr, $($arg:tt)+) => {
        if let Some(logger) = $crate::get_logger() {
            logger.log_fmt($category, $level, $crate::log_location!(), format_args!($($arg)+));
        }
    };
    ($category:expr, $level:expr, $func:expr, $($arg:tt)+) => {
        if let Some(logger) = $crate::get_logger() {
            logger.log_fmt($category, $level, $crate::log_location!($func), format_args!($($arg)+));
        }
    };
}

#[macro_export]
macro_rules! log_severe {
    ($category:expr, $func:expr, $($arg:tt)+) => { $crate::log!($category, $crate::LogLevel::Severe, $func, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($category:expr, $func:expr, $($arg:tt)+) => { $crate::log!($category, $crate::LogLevel::Error, $func, $($arg)+) };
}

#[macro_export]
macro_rules! log_warning {
    ($category:expr, $($arg:tt)+) => { $crate::log!(@no_func $category, $crate::LogLevel::Warning, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
    ($category:expr, $($arg:tt)+) => { $crate::log!(@no_func $category, $crate::LogLevel::Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_verbose {
    ($category:expr, $($arg:tt)+) => { $crate::log!(@no_func $category, $crate::LogLevel::Verbose, $($arg)+) };
}

#[macro_export]
macro_rules! log_debug {
    ($category:expr, $func:expr, $($arg:tt)+) => { $crate::log!($category, $crate::LogLevel::Debug, $func, $($arg)+) };
}
