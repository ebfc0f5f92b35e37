//! Numeric literal lexing: integers and floats, distinguished by the
//! presence of a single `.`. More than one `.` is a lexical error.

use crate::lexer::core::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer {
    pub(crate) fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        let mut dot_count = 0u32;

        while let Some(ch) = self.cursor.current_char() {
            if ch == '.' {
                dot_count += 1;
            } else if !ch.is_ascii_digit() {
                break;
            }

            if dot_count > 1 {
                let text = self.cursor.slice_from(start);
                self.errors.push(format!(
                    "too many decimals in number `{text}` on line {}, position {}",
                    self.line, self.token_start
                ));
                return self.new_token(TokenKind::Illegal, text);
            }

            self.cursor.advance();
        }

        let text = self.cursor.slice_from(start);
        if dot_count == 0 {
            self.new_token(TokenKind::Int, text)
        } else {
            self.new_token(TokenKind::Float, text)
        }
    }
}
