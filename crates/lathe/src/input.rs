//! Byte cursor over a borrowed source buffer.
//!
//! The cursor tracks a byte offset plus 1-based line/column, and owns the
//! [`Interner`] so that symbol creation needs no global state. Parsing is
//! byte-oriented: multi-byte UTF-8 sequences are opaque to the primitives,
//! which is fine for the ASCII-shaped grammars this engine targets.
//!
//! Backtracking works through [`Checkpoint`]: a cheap copy of the position
//! triple that [`Input::restore`] writes back wholesale.

use crate::interner::Interner;

/// A saved cursor position. Restoring rewinds offset, line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    line: u32,
    col: u32,
}

/// Parse input: borrowed source, cursor position, and the symbol interner.
#[derive(Debug)]
pub struct Input<'src> {
    src: &'src str,
    pos: usize,
    line: u32,
    col: u32,
    interner: Interner,
}

impl<'src> Input<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            col: 1,
            interner: Interner::new(),
        }
    }

    #[inline]
    pub fn source(&self) -> &'src str {
        self.src
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.src.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    #[inline]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    #[inline]
    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    #[inline]
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.line = checkpoint.line;
        self.col = checkpoint.col;
    }

    /// Current byte without consuming it, or `None` at end of input.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    /// Byte at `lookahead` positions past the cursor.
    #[inline]
    pub fn peek_nth(&self, lookahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + lookahead).copied()
    }

    /// Consume one byte, updating line/col. Newline resets col to 1.
    pub fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(byte)
    }

    /// Consume `n` bytes (clamped to the remaining input).
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Remaining input as raw bytes.
    #[inline]
    pub fn rest(&self) -> &'src [u8] {
        &self.src.as_bytes()[self.pos..]
    }

    /// Whether the remaining input starts with `s`, byte for byte.
    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s.as_bytes())
    }

    /// ASCII case-insensitive variant of [`Input::starts_with`].
    pub fn starts_with_ci(&self, s: &str) -> bool {
        let rest = self.rest();
        rest.len() >= s.len() && rest[..s.len()].eq_ignore_ascii_case(s.as_bytes())
    }

    /// Up to `max` characters of remaining input, for "unexpected" snippets.
    /// Returns `None` at end of input.
    pub fn snippet(&self, max: usize) -> Option<String> {
        if self.at_end() {
            return None;
        }
        let text = String::from_utf8_lossy(self.rest());
        Some(text.chars().take(max).collect())
    }
}
