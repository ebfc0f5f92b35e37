//! Tokenizer for Lime source text.
//!
//! `Lexer` turns a source string into a stream of [`Token`]s; it never
//! fails outright, instead emitting `TokenKind::Illegal` tokens and
//! recording a message for each one, so a caller can keep lexing the
//! rest of the file and report every problem in one pass.

mod cursor;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};
