//! Command output: the line-oriented sink handlers write to, plus colored
//! status helpers used for diagnostics and error reporting.

use std::io::Write;

use crossterm::style::{Color, Stylize};

use crate::errors::Result;

/// Append-only, line-oriented destination for command output.
///
/// Handlers receive a sink instead of printing directly, so output can be
/// captured in tests or redirected by the driver.
pub trait OutputSink: Send {
    /// Write one logical message. The sink appends the line terminator.
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Write a multi-line block, one `write_line` call per line.
    fn write_block(&mut self, block: &str) -> Result<()> {
        for line in block.lines() {
            self.write_line(line)?;
        }
        Ok(())
    }
}

/// Sink writing to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", line)?;
        Ok(())
    }
}

/// Sink that keeps every line in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All captured lines joined with `\n`.
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }
}

impl OutputSink for MemorySink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Print an error message in red to stderr.
pub fn error(msg: &str) {
    eprintln!("{}", msg.with(Color::Red));
}

/// Print a warning message in yellow to stderr.
pub fn warning(msg: &str) {
    eprintln!("{}", msg.with(Color::Yellow));
}

/// Print an info message in cyan to stderr.
pub fn info(msg: &str) {
    eprintln!("{}", msg.with(Color::Cyan));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures_lines() {
        let mut sink = MemorySink::new();
        sink.write_line("first = 1").unwrap();
        sink.write_line("last = 9").unwrap();
        assert_eq!(sink.lines(), ["first = 1", "last = 9"]);
        assert_eq!(sink.contents(), "first = 1\nlast = 9");
    }

    #[test]
    fn test_write_block_splits_lines() {
        let mut sink = MemorySink::new();
        sink.write_block("{\n    \"a\": 1\n}").unwrap();
        assert_eq!(sink.lines().len(), 3);
        assert_eq!(sink.lines()[1], "    \"a\": 1");
    }

    #[test]
    fn test_stdout_sink_writes() {
        let mut sink = StdoutSink;
        sink.write_line("hello").unwrap();
    }

    #[test]
    fn test_status_helpers_do_not_panic() {
        error("Something went wrong");
        warning("Careful now");
        info("FYI");
    }
}
