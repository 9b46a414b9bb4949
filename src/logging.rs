use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use colored::Colorize;

use crate::error::SprigError;

pub const DEFAULT_TEMPLATE: &str = "{Timestamp} [{Level}] ({Context}) {Message}{NewLine}{Exception}";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const FILE_PREFIX: &str = env!("CARGO_PKG_NAME");

/// Message severity, in increasing urgency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum Severity {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// the three letter code used in formatted output lines
    pub fn code(&self) -> &'static str {
        match self {
            Severity::Trace => "VRB",
            Severity::Debug => "DBG",
            Severity::Information => "INF",
            Severity::Warning => "WRN",
            Severity::Error => "ERR",
            Severity::Critical => "FTL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Information => "information",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        write!(f, "{}", name)
    }
}

/// One emitted message on its way to the sinks.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub severity: Severity,
    pub context: String,
    pub message: String,
    pub exception: Option<String>,
}

/// Renders a record against an output template.
///
/// Recognized placeholders: `{Timestamp}`, `{Level}` (three letter code),
/// `{Context}`, `{Message}`, `{NewLine}` and `{Exception}`. `{NewLine}`
/// expands to nothing when there is no exception text, so the default
/// template yields a single physical line per record.
pub fn render_template(template: &str, record: &LogRecord, timestamp: &str) -> String {
    let exception = record.exception.as_deref().unwrap_or("");
    let newline = if exception.is_empty() { "" } else { "\n" };

    // the message is substituted last, so placeholder-like text inside it
    // is not expanded again
    template
        .replace("{Timestamp}", timestamp)
        .replace("{Level}", record.severity.code())
        .replace("{Context}", &record.context)
        .replace("{NewLine}", newline)
        .replace("{Exception}", exception)
        .replace("{Message}", &record.message)
}

/// A destination for formatted log records.
pub trait Sink {
    fn emit(&self, record: &LogRecord, line: &str) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes formatted records to standard output, colorized by severity.
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn emit(&self, record: &LogRecord, line: &str) -> io::Result<()> {
        let styled = match record.severity {
            Severity::Trace | Severity::Debug => line.dimmed(),
            Severity::Information => line.green(),
            Severity::Warning => line.yellow(),
            Severity::Error | Severity::Critical => line.red(),
        };
        println!("{}", styled);
        Ok(())
    }
}

/// Appends formatted records to one file per calendar day, named
/// `sprig-<date>.txt` under the configured folder.
pub struct FileSink {
    folder: PathBuf,
    state: Mutex<FileState>,
}

struct FileState {
    date: NaiveDate,
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn new(folder: &Path) -> io::Result<Self> {
        let date = Local::now().date_naive();
        let writer = Self::open(folder, date)?;

        Ok(Self {
            folder: folder.to_path_buf(),
            state: Mutex::new(FileState { date, writer }),
        })
    }

    fn open(folder: &Path, date: NaiveDate) -> io::Result<BufWriter<File>> {
        let path = folder.join(format!("{}-{}.txt", FILE_PREFIX, date.format("%Y-%m-%d")));
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(BufWriter::new(file))
    }
}

impl Sink for FileSink {
    fn emit(&self, _record: &LogRecord, line: &str) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();

        // roll to a new file when the calendar day changes mid-run
        let today = Local::now().date_naive();
        if today != state.date {
            state.writer.flush()?;
            state.writer = Self::open(&self.folder, today)?;
            state.date = today;
        }

        writeln!(state.writer, "{}", line)
    }

    fn flush(&self) -> io::Result<()> {
        self.state.lock().unwrap().writer.flush()
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Swallows every record, so calling code never deals with an absent
/// logger.
pub struct DiscardSink;

impl Sink for DiscardSink {
    fn emit(&self, _record: &LogRecord, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// The composite logger
///
/// fans each record out to every configured sink. A record below the
/// minimum level is dropped before it reaches any sink, and a failing
/// sink never prevents delivery to the remaining ones.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    sinks: Vec<Box<dyn Sink>>,
    min_level: Severity,
    context: String,
    template: String,
}

impl Logger {
    pub fn new(
        sinks: Vec<Box<dyn Sink>>,
        min_level: Severity,
        context: &str,
        template: &str,
    ) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                sinks,
                min_level,
                context: context.to_string(),
                template: template.to_string(),
            }),
        }
    }

    /// a logger that drops everything
    pub fn discard() -> Self {
        Self::new(vec![Box::new(DiscardSink)], Severity::Trace, "", DEFAULT_TEMPLATE)
    }

    pub fn log(&self, severity: Severity, message: &str) {
        self.emit(LogRecord {
            severity,
            context: self.inner.context.clone(),
            message: message.to_string(),
            exception: None,
        });
    }

    pub fn emit(&self, record: LogRecord) {
        if record.severity < self.inner.min_level {
            return;
        }

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = render_template(&self.inner.template, &record, &timestamp);

        for sink in &self.inner.sinks {
            let _ = sink.emit(&record, &line);
        }
    }

    pub fn trace(&self, message: &str) {
        self.log(Severity::Trace, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    pub fn information(&self, message: &str) {
        self.log(Severity::Information, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.log(Severity::Critical, message);
    }

    pub fn flush(&self) {
        for sink in &self.inner.sinks {
            let _ = sink.flush();
        }
    }
}

/// The resolved sink configuration for one invocation.
pub struct LoggerConfig {
    pub console: bool,
    pub file_folder: Option<PathBuf>,
    pub min_level: Severity,
    pub template: String,
    pub context: String,
}

impl LoggerConfig {
    /// composes the logger, creating the log folder when needed
    pub fn build(&self) -> Result<Logger, SprigError> {
        let mut sinks: Vec<Box<dyn Sink>> = Vec::new();

        if self.console {
            sinks.push(Box::new(ConsoleSink));
        }

        if let Some(folder) = &self.file_folder {
            std::fs::create_dir_all(folder)?;
            sinks.push(Box::new(FileSink::new(folder)?));
        }

        if sinks.is_empty() {
            sinks.push(Box::new(DiscardSink));
        }

        Ok(Logger::new(sinks, self.min_level, &self.context, &self.template))
    }
}
