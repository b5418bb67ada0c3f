use spinwait::terminal::WriterTerminal;

/// Terminal that records everything in memory.
pub type RecordingTerminal = WriterTerminal<Vec<u8>, Vec<u8>>;

pub fn recording_terminal() -> RecordingTerminal {
    WriterTerminal::new(Vec::new(), Vec::new())
}

/// Spinner/control output as text.
pub fn output_text(terminal: &RecordingTerminal) -> String {
    String::from_utf8_lossy(terminal.output()).into_owned()
}

/// Diagnostic lines as text.
pub fn diagnostics_text(terminal: &RecordingTerminal) -> String {
    String::from_utf8_lossy(terminal.diagnostics()).into_owned()
}
