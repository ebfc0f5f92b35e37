//! String literal lexing.
//!
//! The body between the quotes is stored verbatim, including any literal
//! `\n` escape sequences; those are rewritten during codegen's constant
//! building, not here.

use crate::lexer::core::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer {
    pub(crate) fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // opening quote
        let start = self.cursor.position();

        loop {
            match self.cursor.current_char() {
                Some('"') | None => break,
                Some(_) => self.cursor.advance(),
            }
        }

        let body = self.cursor.slice_from(start);
        if self.cursor.current_char() == Some('"') {
            self.cursor.advance();
        } else {
            self.errors.push(format!(
                "unterminated string literal starting on line {}, position {}",
                self.line, self.token_start
            ));
        }

        self.new_token(TokenKind::Str, body)
    }
}
