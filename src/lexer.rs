//! The streaming scanner.
//!
//! [`Tokenizer`] turns a chunked byte stream into identifiers, numbers,
//! strings, and symbols, tracking zero-based line/column spans as it goes.
//! It presents a simple [`next_token`](Tokenizer::next_token) interface over
//! input whose buffer boundaries may fall anywhere inside a lexeme: token
//! text is stitched together by a recorder that flushes the live span of the
//! current buffer on every refill.
//!
//! All lexical problems are reported through the
//! [`ErrorCollector`](crate::error::ErrorCollector) and scanning continues;
//! the token stream only ends when the input does.

use crate::error::{ErrorCollector, LexError};
use crate::input::{InputStream, SliceInput};
use smallvec::SmallVec;

/// Tabs advance the column counter to the next multiple of this width.
/// Eight is the conventional interpretation; there is no way to do better
/// without knowing the author's editor settings.
const TAB_WIDTH: usize = 8;

/// Bitfield flags for byte classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFlags(u16);

impl CharacterFlags {
    /// Whitespace, including newline (space, `\t`, `\n`, `\r`, `\v`, `\f`).
    pub const WHITESPACE: Self = Self(1 << 0);
    /// Whitespace excluding newline.
    pub const WHITESPACE_NO_NEWLINE: Self = Self(1 << 1);
    /// Control bytes `0x01..=0x1F`. NUL is excluded; it doubles as the
    /// end-of-input sentinel and is handled separately.
    pub const UNPRINTABLE: Self = Self(1 << 2);
    /// ASCII decimal digit.
    pub const DIGIT: Self = Self(1 << 3);
    /// ASCII octal digit.
    pub const OCTAL_DIGIT: Self = Self(1 << 4);
    /// ASCII hex digit, either case.
    pub const HEX_DIGIT: Self = Self(1 << 5);
    /// ASCII letter or underscore; may start an identifier.
    pub const LETTER: Self = Self(1 << 6);
    /// ASCII letter, digit, or underscore; may continue an identifier.
    pub const ALPHANUMERIC: Self = Self(1 << 7);
    /// The single-character escape letters: `a b f n r t v \ ? ' "`.
    pub const ESCAPE: Self = Self(1 << 8);

    /// Creates empty flags.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns the union of two flag sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Checks if any of the given flags are set.
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Checks if all of the given flags are set.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for CharacterFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// 256-entry lookup table for O(1) byte classification.
#[derive(Debug)]
pub struct CharacterTable([CharacterFlags; 256]);

impl CharacterTable {
    pub const fn new() -> Self {
        let mut table = [CharacterFlags::empty(); 256];
        let mut i = 0;

        while i < 256 {
            let ch = i as u8;
            let mut flags = CharacterFlags::empty();

            match ch {
                b' ' | b'\n' | b'\t' | b'\r' | 0x0b | 0x0c => {
                    flags = flags.union(CharacterFlags::WHITESPACE);
                }
                _ => {}
            }
            match ch {
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => {
                    flags = flags.union(CharacterFlags::WHITESPACE_NO_NEWLINE);
                }
                _ => {}
            }

            if ch >= 0x01 && ch <= 0x1f {
                flags = flags.union(CharacterFlags::UNPRINTABLE);
            }

            if ch >= b'0' && ch <= b'9' {
                flags = flags.union(CharacterFlags::DIGIT);
            }
            if ch >= b'0' && ch <= b'7' {
                flags = flags.union(CharacterFlags::OCTAL_DIGIT);
            }
            match ch {
                b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' => {
                    flags = flags.union(CharacterFlags::HEX_DIGIT);
                }
                _ => {}
            }

            match ch {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                    flags = flags
                        .union(CharacterFlags::LETTER)
                        .union(CharacterFlags::ALPHANUMERIC);
                }
                b'0'..=b'9' => {
                    flags = flags.union(CharacterFlags::ALPHANUMERIC);
                }
                _ => {}
            }

            match ch {
                b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' | b'?' | b'\'' | b'"' => {
                    flags = flags.union(CharacterFlags::ESCAPE);
                }
                _ => {}
            }

            table[i] = flags;
            i += 1;
        }

        Self(table)
    }

    /// Tests whether a byte belongs to any of the given classes.
    #[inline(always)]
    pub const fn test(&self, ch: u8, flags: CharacterFlags) -> bool {
        self.0[ch as usize].intersects(flags)
    }

    #[inline(always)]
    pub const fn is_letter(&self, ch: u8) -> bool {
        self.test(ch, CharacterFlags::LETTER)
    }

    #[inline(always)]
    pub const fn is_alphanumeric(&self, ch: u8) -> bool {
        self.test(ch, CharacterFlags::ALPHANUMERIC)
    }

    #[inline(always)]
    pub const fn is_octal_digit(&self, ch: u8) -> bool {
        self.test(ch, CharacterFlags::OCTAL_DIGIT)
    }

    #[inline(always)]
    pub const fn is_hex_digit(&self, ch: u8) -> bool {
        self.test(ch, CharacterFlags::HEX_DIGIT)
    }
}

impl Default for CharacterTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Global character table instance.
pub static CHARACTER_TABLE: CharacterTable = CharacterTable::new();

/// Digit values for bases up to 36. `'0'..'9'` map to 0-9, letters of
/// either case map to 10-35, and every other byte maps to the sentinel 36.
const fn digit_table() -> [i8; 256] {
    let mut table = [36i8; 256];
    let mut i = 0;
    while i < 256 {
        let ch = i as u8;
        table[i] = match ch {
            b'0'..=b'9' => (ch - b'0') as i8,
            b'a'..=b'z' => (ch - b'a') as i8 + 10,
            b'A'..=b'Z' => (ch - b'A') as i8 + 10,
            _ => 36,
        };
        i += 1;
    }
    table
}

static DIGIT_VALUES: [i8; 256] = digit_table();

/// Interprets a byte as a numeric digit and returns its value, or 36 if the
/// byte is not a valid digit in any base up to 36. Callers compare against
/// their base to detect invalid digits.
#[inline(always)]
pub fn digit_value(digit: u8) -> i8 {
    DIGIT_VALUES[digit as usize]
}

/// Inline-stored token text. Most tokens in schema sources are a handful of
/// bytes, so the common case never touches the heap.
pub type TokenText = SmallVec<[u8; 16]>;

/// Kinds of token produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Placeholder before the first `next_token` call. Never returned.
    Start,
    /// End of input. `next_token` returns false once the current token has
    /// this type.
    End,
    /// A letter or underscore followed by letters, digits, underscores.
    Identifier,
    /// A decimal, octal (leading zero), or hex (leading `0x`) integer.
    Integer,
    /// A number containing a decimal point or exponent.
    Float,
    /// A quoted literal, delimiters and escape sequences intact.
    String,
    /// Any other printable byte.
    Symbol,
    /// A whitespace run; only reported when whitespace reporting is on.
    Whitespace,
    /// A single `\n`; only reported when newline reporting is on.
    Newline,
}

/// Comment syntax recognized by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `//` line comments and `/* */` block comments.
    Cpp,
    /// `#` line comments.
    Sh,
}

/// A token with its exact source text and span.
///
/// `line` and `column` locate the first byte of the token; `end_column` is
/// the column immediately after the last byte. All are zero-based, and
/// columns count bytes with tabs advancing to the next multiple of 8.
/// For tokens containing embedded newlines (multi-line strings),
/// `end_column` is a column on the token's last line; the counter is not
/// reset to the starting line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub line: usize,
    pub column: usize,
    pub end_column: usize,
    /// The exact text of the token as it appeared in the input. String
    /// tokens keep their quotes and escape sequences.
    pub text: TokenText,
}

impl Token {
    fn start() -> Self {
        Self {
            token_type: TokenType::Start,
            line: 0,
            column: 0,
            end_column: 0,
            text: TokenText::new(),
        }
    }
}

/// Outcome of probing for a comment opener.
enum NextCommentStatus {
    LineComment,
    BlockComment,
    /// A lone `/` was consumed; the current token has been filled in with a
    /// slash SYMBOL and should be returned as-is.
    SlashNotComment,
    NoComment,
}

/// The streaming tokenizer.
///
/// Errors are reported to the collector and scanning continues, so a parser
/// built on top can report several problems in one pass. On drop, any
/// unread bytes of the final buffer are returned to the input stream.
pub struct Tokenizer<'a, 'e> {
    current: Token,
    previous: Token,

    input: Box<dyn InputStream<'a> + 'a>,
    errors: &'e mut dyn ErrorCollector,

    /// Equals `buffer[buffer_pos]` while the buffer has bytes left, `\0`
    /// otherwise.
    current_char: u8,
    buffer: &'a [u8],
    buffer_pos: usize,
    /// Latched once the input is exhausted; later refreshes are no-ops.
    read_error: bool,

    line: usize,
    column: usize,

    /// While recording, bytes consumed from the buffer are owed to
    /// `record_buf`; the span from `record_start` is flushed on refill and
    /// when recording stops.
    recording: bool,
    record_start: usize,
    record_buf: TokenText,

    allow_f_after_float: bool,
    comment_style: CommentStyle,
    require_space_after_number: bool,
    allow_multiline_strings: bool,
    report_whitespace: bool,
    report_newlines: bool,
}

impl<'a, 'e> Tokenizer<'a, 'e> {
    /// Creates a tokenizer reading from a chunked stream.
    pub fn new(input: Box<dyn InputStream<'a> + 'a>, errors: &'e mut dyn ErrorCollector) -> Self {
        Self::build(&[], input, errors)
    }

    /// Creates a tokenizer over an in-memory byte slice.
    pub fn from_slice(data: &'a [u8], errors: &'e mut dyn ErrorCollector) -> Self {
        Self::build(&[], Box::new(SliceInput::new(data)), errors)
    }

    /// Creates a tokenizer that consumes `data` first and then continues
    /// with the chunked stream.
    pub fn with_buffer(
        data: &'a [u8],
        input: Box<dyn InputStream<'a> + 'a>,
        errors: &'e mut dyn ErrorCollector,
    ) -> Self {
        Self::build(data, input, errors)
    }

    fn build(
        buffer: &'a [u8],
        input: Box<dyn InputStream<'a> + 'a>,
        errors: &'e mut dyn ErrorCollector,
    ) -> Self {
        let mut tokenizer = Self {
            current: Token::start(),
            previous: Token::start(),
            input,
            errors,
            current_char: b'\0',
            buffer,
            buffer_pos: 0,
            read_error: false,
            line: 0,
            column: 0,
            recording: false,
            record_start: 0,
            record_buf: TokenText::new(),
            allow_f_after_float: false,
            comment_style: CommentStyle::Cpp,
            require_space_after_number: true,
            allow_multiline_strings: false,
            report_whitespace: false,
            report_newlines: false,
        };
        if tokenizer.buffer.is_empty() {
            tokenizer.refresh();
        } else {
            tokenizer.current_char = tokenizer.buffer[0];
        }
        tokenizer
    }

    /// The token produced by the most recent `next_token` call.
    #[inline(always)]
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// The token before `current`, including its text.
    #[inline(always)]
    pub fn previous(&self) -> &Token {
        &self.previous
    }

    pub fn set_allow_f_after_float(&mut self, allow: bool) {
        self.allow_f_after_float = allow;
    }

    pub fn set_comment_style(&mut self, style: CommentStyle) {
        self.comment_style = style;
    }

    pub fn set_require_space_after_number(&mut self, require: bool) {
        self.require_space_after_number = require;
    }

    pub fn set_allow_multiline_strings(&mut self, allow: bool) {
        self.allow_multiline_strings = allow;
    }

    /// Note: turning whitespace reporting off also turns newline reporting
    /// off.
    pub fn set_report_whitespace(&mut self, report: bool) {
        self.report_whitespace = report;
        self.report_newlines &= report;
    }

    pub fn report_whitespace(&self) -> bool {
        self.report_whitespace
    }

    /// Note: turning newline reporting on also turns whitespace reporting
    /// on.
    pub fn set_report_newlines(&mut self, report: bool) {
        self.report_newlines = report;
        self.report_whitespace |= report;
    }

    pub fn report_newlines(&self) -> bool {
        self.report_newlines
    }

    // -----------------------------------------------------------------
    // Buffered reading and recording.

    fn add_error(&mut self, error: LexError) {
        self.errors.add_error(self.line, self.column, error);
    }

    /// Pulls the next buffer from the input. No-op once `read_error` is
    /// latched.
    fn refresh(&mut self) {
        if self.read_error {
            self.current_char = b'\0';
            return;
        }

        // If we're inside a recorded span, the rest of this buffer belongs
        // to it.
        if self.recording {
            if self.record_start < self.buffer.len() {
                let buffer = self.buffer;
                self.record_buf.extend_from_slice(&buffer[self.record_start..]);
            }
            self.record_start = 0;
        }

        self.buffer = &[];
        self.buffer_pos = 0;

        match self.input.next_chunk() {
            Ok(Some(chunk)) if !chunk.is_empty() => {
                self.buffer = chunk;
                self.current_char = chunk[0];
            }
            _ => {
                // End of stream or read error; either way we're done.
                self.read_error = true;
                self.current_char = b'\0';
            }
        }
    }

    /// Consumes `current_char`, updating the line and column counters.
    fn next_char(&mut self) {
        if self.current_char == b'\n' {
            self.line += 1;
            self.column = 0;
        } else if self.current_char == b'\t' {
            self.column += TAB_WIDTH - self.column % TAB_WIDTH;
        } else {
            self.column += 1;
        }

        self.buffer_pos += 1;
        if self.buffer_pos < self.buffer.len() {
            self.current_char = self.buffer[self.buffer_pos];
        } else {
            self.refresh();
        }
    }

    #[inline(always)]
    fn start_recording(&mut self) {
        debug_assert!(!self.recording);
        self.recording = true;
        self.record_start = self.buffer_pos;
    }

    fn stop_recording(&mut self) {
        debug_assert!(self.recording);
        let buffer = self.buffer;
        self.record_buf
            .extend_from_slice(&buffer[self.record_start..self.buffer_pos]);
        self.recording = false;
        self.record_start = 0;
    }

    /// Called at the first byte of a candidate token. Text consumed from
    /// here until `end_token` becomes the token's text.
    fn start_token(&mut self) {
        self.current.token_type = TokenType::Start;
        self.current.text.clear();
        self.record_buf.clear();
        self.current.line = self.line;
        self.current.column = self.column;
        self.start_recording();
    }

    /// Called at the first byte after the token ends.
    fn end_token(&mut self) {
        self.stop_recording();
        self.current.text = std::mem::take(&mut self.record_buf);
        self.current.end_column = self.column;
    }

    // -----------------------------------------------------------------
    // Character-class helpers.

    /// Returns true if the current byte is in the given class, without
    /// consuming anything.
    #[inline(always)]
    fn looking_at(&self, class: CharacterFlags) -> bool {
        CHARACTER_TABLE.test(self.current_char, class)
    }

    /// If the current byte is in the given class, consume it and return
    /// true.
    #[inline(always)]
    fn try_consume_one(&mut self, class: CharacterFlags) -> bool {
        if CHARACTER_TABLE.test(self.current_char, class) {
            self.next_char();
            true
        } else {
            false
        }
    }

    /// Like above, but for one specific byte.
    #[inline(always)]
    fn try_consume(&mut self, c: u8) -> bool {
        if self.current_char == c {
            self.next_char();
            true
        } else {
            false
        }
    }

    fn consume_zero_or_more(&mut self, class: CharacterFlags) {
        while CHARACTER_TABLE.test(self.current_char, class) {
            self.next_char();
        }
    }

    /// Consumes one or more bytes of the given class, or reports the given
    /// error at the current position.
    fn consume_one_or_more(&mut self, class: CharacterFlags, error: LexError) {
        if !CHARACTER_TABLE.test(self.current_char, class) {
            self.add_error(error);
        } else {
            loop {
                self.next_char();
                if !CHARACTER_TABLE.test(self.current_char, class) {
                    break;
                }
            }
        }
    }

    // -----------------------------------------------------------------
    // Sub-consumers. Each is entered with the opening byte(s) of its
    // construct already consumed, since the dispatcher consumed them to
    // decide what it was looking at.

    /// Consumes a string body, ending when the delimiter is consumed.
    fn consume_string(&mut self, delimiter: u8) {
        loop {
            match self.current_char {
                b'\0' => {
                    self.add_error(LexError::UnexpectedEndOfString);
                    return;
                }

                b'\n' => {
                    if !self.allow_multiline_strings {
                        self.add_error(LexError::MultilineString);
                        return;
                    }
                    self.next_char();
                }

                b'\\' => {
                    // An escape sequence.
                    self.next_char();
                    if self.try_consume_one(CharacterFlags::ESCAPE) {
                        // Valid escape sequence.
                    } else if self.try_consume_one(CharacterFlags::OCTAL_DIGIT) {
                        // Possibly followed by two more octal digits, but
                        // those will be picked up by the main loop.
                    } else if self.try_consume(b'x') {
                        if !self.try_consume_one(CharacterFlags::HEX_DIGIT) {
                            self.add_error(LexError::ExpectedHexEscape);
                        }
                        // A second hex digit is also left to the main loop.
                    } else if self.try_consume(b'u') {
                        if !(self.try_consume_one(CharacterFlags::HEX_DIGIT)
                            && self.try_consume_one(CharacterFlags::HEX_DIGIT)
                            && self.try_consume_one(CharacterFlags::HEX_DIGIT)
                            && self.try_consume_one(CharacterFlags::HEX_DIGIT))
                        {
                            self.add_error(LexError::ExpectedShortUnicodeEscape);
                        }
                    } else if self.try_consume(b'U') {
                        // Eight hex digits, constrained to 000000xx..0010xxxx
                        // so the value stays inside the Unicode range.
                        if !self.try_consume(b'0')
                            || !self.try_consume(b'0')
                            || !(self.try_consume(b'0') || self.try_consume(b'1'))
                            || !self.try_consume_one(CharacterFlags::HEX_DIGIT)
                            || !self.try_consume_one(CharacterFlags::HEX_DIGIT)
                            || !self.try_consume_one(CharacterFlags::HEX_DIGIT)
                            || !self.try_consume_one(CharacterFlags::HEX_DIGIT)
                            || !self.try_consume_one(CharacterFlags::HEX_DIGIT)
                        {
                            self.add_error(LexError::ExpectedLongUnicodeEscape);
                        }
                    } else {
                        self.add_error(LexError::InvalidEscape);
                    }
                }

                c => {
                    self.next_char();
                    if c == delimiter {
                        return;
                    }
                }
            }
        }
    }

    /// Consumes a number body and classifies it. The dispatcher tells us
    /// whether the first byte was a zero (hex/octal detection) or a dot
    /// (float detection).
    fn consume_number(&mut self, started_with_zero: bool, started_with_dot: bool) -> TokenType {
        let mut is_float = false;

        if started_with_zero && (self.try_consume(b'x') || self.try_consume(b'X')) {
            // A hex number.
            self.consume_one_or_more(CharacterFlags::HEX_DIGIT, LexError::MissingHexDigits);
        } else if started_with_zero && self.looking_at(CharacterFlags::DIGIT) {
            // An octal number.
            self.consume_zero_or_more(CharacterFlags::OCTAL_DIGIT);
            if self.looking_at(CharacterFlags::DIGIT) {
                self.add_error(LexError::LeadingZeroNotOctal);
                self.consume_zero_or_more(CharacterFlags::DIGIT);
            }
        } else {
            // A decimal number.
            if started_with_dot {
                is_float = true;
                self.consume_zero_or_more(CharacterFlags::DIGIT);
            } else {
                self.consume_zero_or_more(CharacterFlags::DIGIT);
                if self.try_consume(b'.') {
                    is_float = true;
                    self.consume_zero_or_more(CharacterFlags::DIGIT);
                }
            }

            if self.try_consume(b'e') || self.try_consume(b'E') {
                is_float = true;
                if !self.try_consume(b'-') {
                    self.try_consume(b'+');
                }
                self.consume_one_or_more(CharacterFlags::DIGIT, LexError::MissingExponentDigits);
            }

            if self.allow_f_after_float && (self.try_consume(b'f') || self.try_consume(b'F')) {
                is_float = true;
            }
        }

        if self.looking_at(CharacterFlags::LETTER) && self.require_space_after_number {
            self.add_error(LexError::NeedSpaceAfterNumber);
        } else if self.current_char == b'.' {
            if is_float {
                self.add_error(LexError::ExtraDecimalPoint);
            } else {
                self.add_error(LexError::NonDecimalFloat);
            }
        }

        if is_float {
            TokenType::Float
        } else {
            TokenType::Integer
        }
    }

    /// Consumes the rest of a line. If `content` is given, the comment body
    /// (everything after the opener, including the newline) is appended to
    /// it.
    fn consume_line_comment(&mut self, content: Option<&mut TokenText>) {
        if content.is_some() {
            self.record_buf.clear();
            self.start_recording();
        }

        while self.current_char != b'\0' && self.current_char != b'\n' {
            self.next_char();
        }
        self.try_consume(b'\n');

        if let Some(out) = content {
            self.stop_recording();
            out.extend_from_slice(&self.record_buf);
            self.record_buf.clear();
        }
    }

    /// Consumes a block comment body up to and including the closing `*/`.
    ///
    /// When recording, the trailing `*/` is stripped and interior lines
    /// have their leading whitespace and `*` dropped, so a conventionally
    /// formatted comment records as its prose.
    fn consume_block_comment(&mut self, content: Option<&mut TokenText>) {
        let start_line = self.line;
        let start_column = self.column.saturating_sub(2);

        let capture = content.is_some();
        if capture {
            self.record_buf.clear();
            self.start_recording();
        }

        loop {
            while self.current_char != b'\0'
                && self.current_char != b'*'
                && self.current_char != b'/'
                && self.current_char != b'\n'
            {
                self.next_char();
            }

            if self.try_consume(b'\n') {
                if capture {
                    self.stop_recording();
                }

                // Consume leading whitespace and asterisk.
                self.consume_zero_or_more(CharacterFlags::WHITESPACE_NO_NEWLINE);
                if self.try_consume(b'*') && self.try_consume(b'/') {
                    break;
                }

                if capture {
                    self.start_recording();
                }
            } else if self.try_consume(b'*') && self.try_consume(b'/') {
                if capture {
                    self.stop_recording();
                    // Strip the trailing "*/".
                    let len = self.record_buf.len();
                    self.record_buf.truncate(len.saturating_sub(2));
                }
                break;
            } else if self.try_consume(b'/') && self.current_char == b'*' {
                // The '*' is left unconsumed so that a '/' right after it
                // still closes the outer comment.
                self.add_error(LexError::NestedBlockComment);
            } else if self.current_char == b'\0' {
                self.add_error(LexError::UnterminatedBlockComment);
                self.errors
                    .add_error(start_line, start_column, LexError::BlockCommentStart);
                if capture {
                    self.stop_recording();
                }
                break;
            }
        }

        if let Some(out) = content {
            out.extend_from_slice(&self.record_buf);
            self.record_buf.clear();
        }
    }

    /// Probes for the start of a comment under the configured style.
    fn try_consume_comment_start(&mut self) -> NextCommentStatus {
        if self.comment_style == CommentStyle::Cpp && self.try_consume(b'/') {
            if self.try_consume(b'/') {
                NextCommentStatus::LineComment
            } else if self.try_consume(b'*') {
                NextCommentStatus::BlockComment
            } else {
                // Oops, it was just a slash. Return it.
                self.current.token_type = TokenType::Symbol;
                self.current.text.clear();
                self.current.text.push(b'/');
                self.current.line = self.line;
                self.current.column = self.column - 1;
                self.current.end_column = self.column;
                NextCommentStatus::SlashNotComment
            }
        } else if self.comment_style == CommentStyle::Sh && self.try_consume(b'#') {
            NextCommentStatus::LineComment
        } else {
            NextCommentStatus::NoComment
        }
    }

    /// Consumes a whitespace run if one starts here. Returns true when the
    /// run should be reported as a WHITESPACE token.
    fn try_consume_whitespace(&mut self) -> bool {
        if self.report_newlines {
            if self.try_consume_one(CharacterFlags::WHITESPACE_NO_NEWLINE) {
                self.consume_zero_or_more(CharacterFlags::WHITESPACE_NO_NEWLINE);
                self.current.token_type = TokenType::Whitespace;
                return true;
            }
            return false;
        }
        if self.try_consume_one(CharacterFlags::WHITESPACE) {
            self.consume_zero_or_more(CharacterFlags::WHITESPACE);
            self.current.token_type = TokenType::Whitespace;
            return self.report_whitespace;
        }
        false
    }

    /// Consumes a newline if one starts here and newline reporting is on.
    fn try_consume_newline(&mut self) -> bool {
        if !self.report_whitespace || !self.report_newlines {
            return false;
        }
        if self.try_consume(b'\n') {
            self.current.token_type = TokenType::Newline;
            return true;
        }
        false
    }

    // -----------------------------------------------------------------

    /// Advances to the next token. Returns false once the input is
    /// exhausted, leaving `current` as an END token with empty text.
    pub fn next_token(&mut self) -> bool {
        self.previous = self.current.clone();

        while !self.read_error {
            self.start_token();
            let report_token = self.try_consume_whitespace() || self.try_consume_newline();
            self.end_token();
            if report_token {
                return true;
            }

            match self.try_consume_comment_start() {
                NextCommentStatus::LineComment => {
                    self.consume_line_comment(None);
                    continue;
                }
                NextCommentStatus::BlockComment => {
                    self.consume_block_comment(None);
                    continue;
                }
                NextCommentStatus::SlashNotComment => return true,
                NextCommentStatus::NoComment => {}
            }

            // Check for EOF before continuing.
            if self.read_error {
                break;
            }

            if self.looking_at(CharacterFlags::UNPRINTABLE) || self.current_char == b'\0' {
                self.add_error(LexError::InvalidControlCharacters);
                self.next_char();
                // Skip the rest of the run. '\0' is also what current_char
                // holds after EOF, so it may only be consumed while
                // read_error is still clear.
                while self.try_consume_one(CharacterFlags::UNPRINTABLE)
                    || (!self.read_error && self.try_consume(b'\0'))
                {}
            } else {
                // Reading some sort of token.
                self.start_token();

                if self.try_consume_one(CharacterFlags::LETTER) {
                    self.consume_zero_or_more(CharacterFlags::ALPHANUMERIC);
                    self.current.token_type = TokenType::Identifier;
                } else if self.try_consume(b'0') {
                    self.current.token_type = self.consume_number(true, false);
                } else if self.try_consume(b'.') {
                    // Either the start of a float or a lone '.' symbol.
                    if self.try_consume_one(CharacterFlags::DIGIT) {
                        // A float. Syntax like "blah.123" is not accepted;
                        // the diagnostic points at the '.'.
                        if self.previous.token_type == TokenType::Identifier
                            && self.current.line == self.previous.line
                            && self.current.column == self.previous.end_column
                        {
                            self.errors.add_error(
                                self.line,
                                self.column - 2,
                                LexError::NeedSpaceBeforeDecimalPoint,
                            );
                        }
                        self.current.token_type = self.consume_number(false, true);
                    } else {
                        self.current.token_type = TokenType::Symbol;
                    }
                } else if self.try_consume_one(CharacterFlags::DIGIT) {
                    self.current.token_type = self.consume_number(false, false);
                } else if self.try_consume(b'"') {
                    self.consume_string(b'"');
                    self.current.token_type = TokenType::String;
                } else if self.try_consume(b'\'') {
                    self.consume_string(b'\'');
                    self.current.token_type = TokenType::String;
                } else {
                    if self.current_char & 0x80 != 0 {
                        self.errors.add_error(
                            self.line,
                            self.column,
                            LexError::NonAsciiCodepoint(self.current_char),
                        );
                    }
                    self.next_char();
                    self.current.token_type = TokenType::Symbol;
                }

                self.end_token();
                return true;
            }
        }

        // EOF.
        self.current.token_type = TokenType::End;
        self.current.text.clear();
        self.current.line = self.line;
        self.current.column = self.column;
        self.current.end_column = self.column;
        false
    }
}

impl Drop for Tokenizer<'_, '_> {
    fn drop(&mut self) {
        // Return any unread buffer suffix so another reader can pick up
        // where the token stream stopped.
        let unread = self.buffer.len() - self.buffer_pos;
        if unread > 0 {
            self.input.back_up(unread);
        }
    }
}
