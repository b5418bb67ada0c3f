// src/terminal.rs

//! Terminal side effects used around the animation loop.
//!
//! The supervisor writes the spinner line and ANSI control sequences to the
//! terminal's output stream, and user-facing diagnostics to its diagnostic
//! stream. [`StdTerminal`] uses stdout/stderr; tests use in-memory buffers.

use std::io::{self, Stderr, Stdout, Write};

pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const CLEAR_LINE: &str = "\r\x1b[K";

pub trait Terminal {
    /// Stream the spinner line and control sequences go to.
    fn out(&mut self) -> &mut dyn Write;

    /// Write one diagnostic line.
    fn report(&mut self, line: &str);

    fn hide_cursor(&mut self) -> io::Result<()> {
        let out = self.out();
        out.write_all(HIDE_CURSOR.as_bytes())?;
        out.flush()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        let out = self.out();
        out.write_all(SHOW_CURSOR.as_bytes())?;
        out.flush()
    }

    fn clear_line(&mut self) -> io::Result<()> {
        self.out().write_all(CLEAR_LINE.as_bytes())
    }
}

/// Terminal over any pair of writers.
#[derive(Debug, Default)]
pub struct WriterTerminal<W, E> {
    out: W,
    err: E,
}

impl<W: Write, E: Write> WriterTerminal<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self { out, err }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn diagnostics(&self) -> &E {
        &self.err
    }
}

impl<W: Write, E: Write> Terminal for WriterTerminal<W, E> {
    fn out(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    fn report(&mut self, line: &str) {
        let _ = writeln!(self.err, "{line}");
        let _ = self.err.flush();
    }
}

/// The process's own stdout/stderr.
pub type StdTerminal = WriterTerminal<Stdout, Stderr>;

impl StdTerminal {
    pub fn stdio() -> Self {
        WriterTerminal::new(io::stdout(), io::stderr())
    }
}

/// Hides the cursor for its lifetime. On drop the spinner line is cleared and
/// the cursor shown again, whichever way the loop was left.
pub struct HiddenCursor<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
}

impl<'a, T: Terminal + ?Sized> HiddenCursor<'a, T> {
    pub fn new(terminal: &'a mut T) -> Self {
        if let Err(error) = terminal.hide_cursor() {
            tracing::debug!(%error, "failed to hide cursor");
        }
        Self { terminal }
    }

    pub fn terminal(&mut self) -> &mut T {
        self.terminal
    }
}

impl<T: Terminal + ?Sized> Drop for HiddenCursor<'_, T> {
    fn drop(&mut self) {
        let restored = self
            .terminal
            .clear_line()
            .and_then(|()| self.terminal.show_cursor());
        if let Err(error) = restored {
            tracing::debug!(%error, "failed to restore cursor");
        }
    }
}
