//! Diagnostics and the error-collector seam.
//!
//! Lexical problems never abort tokenization. The scanner reports each one
//! to an [`ErrorCollector`] with the zero-based line and column where the
//! offending byte was observed, then keeps producing tokens so a parser on
//! top can surface cascaded diagnostics in a single pass.

use std::fmt;
use thiserror::Error;

/// A lexical diagnostic.
///
/// The `Display` text of each variant is the message handed to the
/// collector, byte for byte. Several messages carry historical quirks
/// (a double space, a missing trailing period) that downstream tooling
/// matches on; do not "fix" them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Invalid control characters encountered in text.")]
    InvalidControlCharacters,

    #[error("Interpreting non ascii codepoint {0}.")]
    NonAsciiCodepoint(u8),

    #[error("Need space between identifier and decimal point.")]
    NeedSpaceBeforeDecimalPoint,

    #[error("Unexpected end of string.")]
    UnexpectedEndOfString,

    #[error("String literals cannot cross line boundaries.")]
    MultilineString,

    #[error("Expected hex digits for escape sequence.")]
    ExpectedHexEscape,

    #[error("Expected four hex digits for \\u escape sequence.")]
    ExpectedShortUnicodeEscape,

    #[error("Expected eight hex digits up to 10ffff for \\U escape sequence")]
    ExpectedLongUnicodeEscape,

    #[error("Invalid escape sequence in string literal.")]
    InvalidEscape,

    #[error("\"0x\" must be followed by hex digits.")]
    MissingHexDigits,

    #[error("Numbers starting with leading zero must be in octal.")]
    LeadingZeroNotOctal,

    #[error("\"e\" must be followed by exponent.")]
    MissingExponentDigits,

    #[error("Need space between number and identifier.")]
    NeedSpaceAfterNumber,

    #[error("Already saw decimal point or exponent; can't have another one.")]
    ExtraDecimalPoint,

    #[error("Hex and octal numbers must be integers.")]
    NonDecimalFloat,

    #[error("\"/*\" inside block comment.  Block comments cannot be nested.")]
    NestedBlockComment,

    #[error("End-of-file inside block comment.")]
    UnterminatedBlockComment,

    /// Follow-up to [`LexError::UnterminatedBlockComment`], reported at the
    /// position of the opening `/*`.
    #[error("  Comment started here.")]
    BlockCommentStart,
}

/// A diagnostic paired with the position it was reported at.
///
/// Positions are zero-based; `column` counts bytes with tabs advancing to
/// the next multiple of 8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub error: LexError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.error)
    }
}

/// Capability object that receives diagnostics from the tokenizer.
///
/// The core only ever calls [`add_error`](ErrorCollector::add_error);
/// `add_warning` is part of the contract for collectors shared with
/// downstream parsers and defaults to a no-op.
pub trait ErrorCollector {
    fn add_error(&mut self, line: usize, column: usize, error: LexError);

    fn add_warning(&mut self, _line: usize, _column: usize, _warning: LexError) {}
}

/// An [`ErrorCollector`] that records everything it is given.
#[derive(Debug, Default)]
pub struct VecCollector {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl VecCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors recorded so far, in report order.
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Warnings recorded so far, in report order.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// True if no errors have been recorded. Warnings do not count.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ErrorCollector for VecCollector {
    fn add_error(&mut self, line: usize, column: usize, error: LexError) {
        self.errors.push(Diagnostic {
            line,
            column,
            error,
        });
    }

    fn add_warning(&mut self, line: usize, column: usize, warning: LexError) {
        self.warnings.push(Diagnostic {
            line,
            column,
            error: warning,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_texts_are_stable() {
        assert_eq!(
            LexError::InvalidControlCharacters.to_string(),
            "Invalid control characters encountered in text."
        );
        assert_eq!(
            LexError::NonAsciiCodepoint(226).to_string(),
            "Interpreting non ascii codepoint 226."
        );
        // The double space and the missing period are load-bearing.
        assert_eq!(
            LexError::NestedBlockComment.to_string(),
            "\"/*\" inside block comment.  Block comments cannot be nested."
        );
        assert_eq!(
            LexError::ExpectedLongUnicodeEscape.to_string(),
            "Expected eight hex digits up to 10ffff for \\U escape sequence"
        );
    }

    #[test]
    fn test_collector_records_positions() {
        let mut collector = VecCollector::new();
        collector.add_error(3, 14, LexError::UnexpectedEndOfString);
        collector.add_warning(0, 0, LexError::NonAsciiCodepoint(0x80));

        assert_eq!(collector.errors().len(), 1);
        assert_eq!(collector.errors()[0].line, 3);
        assert_eq!(collector.errors()[0].column, 14);
        assert_eq!(collector.warnings().len(), 1);
        assert!(!collector.is_clean());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            line: 2,
            column: 7,
            error: LexError::MultilineString,
        };
        assert_eq!(
            diagnostic.to_string(),
            "2:7: String literals cannot cross line boundaries."
        );
    }
}
