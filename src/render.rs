// src/render.rs

//! Spinner animation frames.

use std::io::{self, Write};

use crate::terminal::CLEAR_LINE;

/// Frame glyphs, in order.
pub const FRAMES: [char; 4] = ['-', '\\', '|', '/'];

/// Repaint the current line with `message` followed by the glyph at `index`.
///
/// Flushes immediately so a frame is never left half-drawn.
pub fn render(out: &mut dyn Write, message: &str, index: usize) -> io::Result<()> {
    write!(out, "{CLEAR_LINE}{message} {}", FRAMES[index % FRAMES.len()])?;
    out.flush()
}

/// Rotating frame index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spinner {
    index: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn glyph(&self) -> char {
        FRAMES[self.index]
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % FRAMES.len();
    }

    /// Render the current frame, then advance.
    pub fn tick(&mut self, out: &mut dyn Write, message: &str) -> io::Result<()> {
        let rendered = render(out, message, self.index);
        self.advance();
        rendered
    }
}
