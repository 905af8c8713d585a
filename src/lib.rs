//! # prototext-lexer
//!
//! A streaming tokenizer for the C-family text description language used by
//! protocol buffer text format and descriptor sources.
//!
//! ## Overview
//!
//! The tokenizer consumes a byte stream, in memory or chunked, and produces
//! a sequence of tagged tokens: identifiers, integers, floats, strings, and
//! symbols, plus optional whitespace and newline tokens. Every token
//! carries its exact source text and a zero-based line/column span, with
//! tab stops expanded to multiples of 8. Companion helpers decode a
//! token's literal text into its semantic value.
//!
//! ## Key Features
//!
//! - **Streaming, zero-copy input**: tokens are assembled correctly even
//!   when chunk boundaries fall in the middle of a lexeme
//! - **Non-fatal diagnostics**: malformed input is reported to an error
//!   collector and scanning continues, so one pass surfaces every problem
//! - **C-family lexical rules**: `//` and `/* */` (or `#`) comments, hex
//!   and octal integers, exponent floats, and full escape-sequence syntax
//!   including `\u`/`\U` Unicode escapes
//! - **Literal decoding**: integer parsing with overflow detection, float
//!   parsing tolerant of scanner-accepted malformed tails, and string
//!   unescaping with UTF-16 surrogate pair reassembly
//!
//! ## Basic Usage
//!
//! ```rust
//! use prototext_lexer::{TokenType, Tokenizer, VecCollector};
//!
//! let mut errors = VecCollector::new();
//! let mut tokenizer = Tokenizer::from_slice(b"optional int32 page = 1;", &mut errors);
//!
//! let mut idents = Vec::new();
//! while tokenizer.next_token() {
//!     if tokenizer.current().token_type == TokenType::Identifier {
//!         idents.push(tokenizer.current().text.to_vec());
//!     }
//! }
//! drop(tokenizer);
//!
//! assert_eq!(idents, [b"optional".to_vec(), b"int32".to_vec(), b"page".to_vec()]);
//! assert!(errors.is_clean());
//! ```
//!
//! ## Decoding Literals
//!
//! The scanner leaves token text exactly as it appeared in the source;
//! decoding is a separate step applied to already-classified tokens:
//!
//! ```rust
//! use prototext_lexer::{parse_integer, parse_string};
//!
//! assert_eq!(parse_integer(b"0x1F", u64::MAX), Some(31));
//! assert_eq!(parse_integer(b"18446744073709551616", u64::MAX), None); // overflow
//! assert_eq!(parse_string(br#""a\tb""#), b"a\tb");
//! ```
//!
//! ## Streaming Input
//!
//! Any type implementing [`InputStream`] can feed the tokenizer. The
//! stream hands out windows into its own storage; on drop the tokenizer
//! returns unread bytes of the last window so a downstream reader can
//! resume at byte accuracy.
//!
//! ```rust
//! use prototext_lexer::{ChunkedSliceInput, Tokenizer, VecCollector};
//!
//! let source = ChunkedSliceInput::new(b"message Search { }", 4);
//! let mut errors = VecCollector::new();
//! let mut tokenizer = Tokenizer::new(Box::new(source), &mut errors);
//! let mut count = 0;
//! while tokenizer.next_token() {
//!     count += 1;
//! }
//! assert_eq!(count, 4);
//! ```

pub mod error;
pub mod input;
pub mod lexer;
pub mod parse;

pub use error::{Diagnostic, ErrorCollector, LexError, VecCollector};
pub use input::{ChunkedSliceInput, InputStream, SliceInput};
pub use lexer::{
    digit_value, CharacterFlags, CharacterTable, CommentStyle, Token, TokenText, TokenType,
    Tokenizer, CHARACTER_TABLE,
};
pub use parse::{is_identifier, parse_float, parse_integer, parse_string, parse_string_append};
