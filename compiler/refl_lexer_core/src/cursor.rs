//! Cursor over a borrowed source string.
//!
//! The cursor tracks a byte offset and a 1-based line number. Byte reads
//! past the end return `0x00`, so scanners can look ahead without explicit
//! bounds checks. Interior NUL bytes are distinguished from the end of input
//! with [`Cursor::is_eof`].

/// Byte-offset cursor with line tracking.
///
/// The cursor is [`Copy`]; the token reader snapshots it for unget and
/// save/restore.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    source: &'a str,
    /// Current read position (byte index into `source`).
    pos: u32,
    /// 1-based line of `pos`.
    line: u32,
}

const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    /// Create a cursor at offset 0, line 1.
    ///
    /// # Panics
    ///
    /// Debug builds assert that the source fits in a `u32` offset.
    pub fn new(source: &'a str) -> Self {
        debug_assert!(
            u32::try_from(source.len()).is_ok(),
            "source exceeds u32 offsets"
        );
        Cursor {
            source,
            pos: 0,
            line: 1,
        }
    }

    /// The whole source this cursor reads.
    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "source length is checked to fit u32 at construction"
    )]
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source.len() as u32
    }

    #[inline]
    fn byte_at(&self, pos: u32) -> u8 {
        self.source.as_bytes().get(pos as usize).copied().unwrap_or(0)
    }

    /// Byte at the current position, `0x00` at the end of input.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    /// Byte one position ahead.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    /// Byte two positions ahead.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.byte_at(self.pos + 2)
    }

    /// Full character at the current position, `'\0'` at the end of input.
    #[inline]
    pub fn current_char(&self) -> char {
        self.source[self.pos as usize..].chars().next().unwrap_or('\0')
    }

    /// The byte just before the current position, `0x00` at offset 0.
    #[inline]
    pub fn previous(&self) -> u8 {
        match self.pos {
            0 => 0,
            pos => self.byte_at(pos - 1),
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len()
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// 1-based line of the current position.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Override the line counter without moving.
    #[inline]
    pub fn set_line(&mut self, line: u32) {
        self.line = line;
    }

    /// Jump to a previously observed position and line.
    ///
    /// `pos` must come from this cursor (it must sit on a character
    /// boundary); it is clamped to the end of input.
    #[inline]
    pub fn reset(&mut self, pos: u32, line: u32) {
        debug_assert!(self.source.is_char_boundary(pos as usize));
        self.pos = pos.min(self.source_len());
        self.line = line;
    }

    /// Returns the number of bytes in the UTF-8 character starting with `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance past one full character, counting a `\n`.
    ///
    /// No-op at the end of input.
    #[inline]
    pub fn bump(&mut self) {
        if self.is_eof() {
            return;
        }
        let byte = self.current();
        if byte == b'\n' {
            self.line += 1;
        }
        self.pos = (self.pos + Self::utf8_char_width(byte)).min(self.source_len());
    }

    /// Advance past one character and return it (`'\0'` at the end of input).
    #[inline]
    pub fn bump_char(&mut self) -> char {
        let c = self.current_char();
        self.bump();
        c
    }

    /// Consume the current byte if it equals `byte`.
    #[inline]
    pub fn eat(&mut self, byte: u8) -> bool {
        if !self.is_eof() && self.current() == byte {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Step back over the character that ends at the current position.
    ///
    /// Reverses one [`bump`](Self::bump), line counter included.
    #[allow(clippy::cast_possible_truncation, reason = "char width is at most 4")]
    pub fn unbump(&mut self) {
        let Some(c) = self.source[..self.pos as usize].chars().next_back() else {
            return;
        };
        if c == '\n' {
            self.line = self.line.saturating_sub(1).max(1);
        }
        self.pos -= c.len_utf8() as u32;
    }

    /// Source text between two offsets.
    #[inline]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        &self.source[start as usize..end as usize]
    }

    /// Source text from `start` to the current position.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Advance while `pred` holds for the current character.
    ///
    /// Returns the number of characters consumed.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while !self.is_eof() && pred(self.current_char()) {
            self.bump();
            count += 1;
        }
        count
    }

    /// Advance to the next `\n` (left unread) or the end of input.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.source.as_bytes()[self.pos as usize..];
        match memchr::memchr(b'\n', remaining) {
            Some(offset) => self.pos += offset as u32,
            None => self.pos = self.source_len(),
        }
    }

    /// Skip a block comment body up to and including `*/`.
    ///
    /// The cursor must be just past the opening `/*`. Returns `false` (with
    /// the cursor at the end of input) when the comment is unterminated.
    /// Lines inside the comment are counted either way.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn eat_block_comment_body(&mut self) -> bool {
        let remaining = &self.source.as_bytes()[self.pos as usize..];
        let (consumed, closed) = match memchr::memmem::find(remaining, b"*/") {
            Some(offset) => (offset + 2, true),
            None => (remaining.len(), false),
        };
        let newlines = memchr::memchr_iter(b'\n', &remaining[..consumed]).count();
        self.line += newlines as u32;
        self.pos += consumed as u32;
        closed
    }
}
