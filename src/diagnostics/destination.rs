//! Output destinations for diagnostics
//!
//! Three line styles:
//! - log: `[SEVERITY] <ts> Type: message`, plain text
//! - console: ANSI colored tag carrying the debug level
//! - markup: HTML `<div>` with a colored severity badge
//!
//! Every line is written with one `write_all` and flushed. A failed write
//! is reported through the `deliver` result, never as an error or panic.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::sink::Diagnostic;

/// A place diagnostics can be delivered to.
pub trait OutputDestination: Send {
    /// Deliver one diagnostic. `debug_level` is the emitting instance's
    /// effective level. Returns whether the line was accepted.
    fn deliver(&mut self, diagnostic: &Diagnostic, debug_level: u8) -> bool;
}

/// Formatting applied by [`WriterDestination`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Log,
    Console,
    Markup,
}

impl LineStyle {
    /// Render one diagnostic as a single line, newline included.
    pub fn render(&self, diagnostic: &Diagnostic, debug_level: u8) -> String {
        match self {
            LineStyle::Log => render_log_line(diagnostic),
            LineStyle::Console => render_console_line(diagnostic, debug_level),
            LineStyle::Markup => render_markup_line(diagnostic),
        }
    }
}

/// Destination writing rendered lines to any `Write`.
pub struct WriterDestination<W: Write + Send> {
    writer: W,
    style: LineStyle,
}

impl<W: Write + Send> WriterDestination<W> {
    pub fn new(writer: W, style: LineStyle) -> Self {
        Self { writer, style }
    }

    pub fn log(writer: W) -> Self {
        Self::new(writer, LineStyle::Log)
    }

    pub fn console(writer: W) -> Self {
        Self::new(writer, LineStyle::Console)
    }

    pub fn markup(writer: W) -> Self {
        Self::new(writer, LineStyle::Markup)
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterDestination<io::Stderr> {
    /// Log lines on stderr
    pub fn stderr_log() -> Self {
        Self::log(io::stderr())
    }

    /// Colored console lines on stderr
    pub fn stderr_console() -> Self {
        Self::console(io::stderr())
    }
}

impl WriterDestination<io::Stdout> {
    /// Markup lines on stdout
    pub fn stdout_markup() -> Self {
        Self::markup(io::stdout())
    }
}

impl<W: Write + Send> OutputDestination for WriterDestination<W> {
    fn deliver(&mut self, diagnostic: &Diagnostic, debug_level: u8) -> bool {
        let line = self.style.render(diagnostic, debug_level);
        self.writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.flush())
            .is_ok()
    }
}

/// In-memory destination, cloneable so the host can inspect what was emitted.
#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    records: Arc<Mutex<Vec<Diagnostic>>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all delivered diagnostics.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl OutputDestination for MemoryDestination {
    fn deliver(&mut self, diagnostic: &Diagnostic, _debug_level: u8) -> bool {
        match self.records.lock() {
            Ok(mut records) => {
                records.push(diagnostic.clone());
                true
            }
            Err(_) => false,
        }
    }
}

fn render_log_line(d: &Diagnostic) -> String {
    format!(
        "[{}] {} {}: {}\n",
        d.severity,
        d.epoch_seconds(),
        d.type_name,
        d.message
    )
}

fn render_console_line(d: &Diagnostic, debug_level: u8) -> String {
    use super::Severity;

    let mut tag = String::from("\x1b[0;37m[");
    tag.push_str(d.severity.ansi_color());
    tag.push_str(d.severity.as_str());
    // Errors are always shown, so the level carries no information there
    if d.severity != Severity::Error {
        tag.push_str(&debug_level.to_string());
    }
    tag.push_str("\x1b[0;37m]");

    format!(
        "{} \x1b[0;37m{} {}: \x1b[0m{}\n",
        tag,
        d.epoch_seconds(),
        d.type_name,
        d.message
    )
}

fn render_markup_line(d: &Diagnostic) -> String {
    format!(
        "<div style=\"font-size: 11px;font-family: monospace;\">\
         <span style=\"color:{};font-weight:bold;\">[{}]</span> \
         <span style=\"color: #666;\">{} {}:</span> {}</div>\n",
        d.severity.css_color(),
        d.severity,
        d.epoch_seconds(),
        escape_markup(&d.type_name),
        escape_markup(&d.message)
    )
}

fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
