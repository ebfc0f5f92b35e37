//! Operator lexing: single- and double-character arithmetic, comparison,
//! and assignment operators.

use crate::lexer::core::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer {
    fn two_char(&mut self, second: char, kind: TokenKind) -> Option<Token> {
        if self.cursor.peek_char() == Some(second) {
            let first = self.cursor.current_char().unwrap();
            self.cursor.advance();
            self.cursor.advance();
            Some(self.new_token(kind, format!("{first}{second}")))
        } else {
            None
        }
    }

    pub(crate) fn lex_plus(&mut self) -> Token {
        if let Some(tok) = self.two_char('=', TokenKind::PlusEq) {
            return tok;
        }
        if let Some(tok) = self.two_char('+', TokenKind::PlusPlus) {
            return tok;
        }
        let tok = self.new_token(TokenKind::Plus, "+");
        self.cursor.advance();
        tok
    }

    pub(crate) fn lex_minus(&mut self) -> Token {
        if let Some(tok) = self.two_char('>', TokenKind::Arrow) {
            return tok;
        }
        if let Some(tok) = self.two_char('-', TokenKind::MinusMinus) {
            return tok;
        }
        if let Some(tok) = self.two_char('=', TokenKind::MinusEq) {
            return tok;
        }
        let tok = self.new_token(TokenKind::Minus, "-");
        self.cursor.advance();
        tok
    }

    pub(crate) fn lex_star(&mut self) -> Token {
        if let Some(tok) = self.two_char('=', TokenKind::MulEq) {
            return tok;
        }
        let tok = self.new_token(TokenKind::Asterisk, "*");
        self.cursor.advance();
        tok
    }

    pub(crate) fn lex_slash(&mut self) -> Token {
        if let Some(tok) = self.two_char('=', TokenKind::DivEq) {
            return tok;
        }
        let tok = self.new_token(TokenKind::Slash, "/");
        self.cursor.advance();
        tok
    }

    pub(crate) fn lex_lt(&mut self) -> Token {
        if let Some(tok) = self.two_char('=', TokenKind::LtEq) {
            return tok;
        }
        let tok = self.new_token(TokenKind::Lt, "<");
        self.cursor.advance();
        tok
    }

    pub(crate) fn lex_gt(&mut self) -> Token {
        if let Some(tok) = self.two_char('=', TokenKind::GtEq) {
            return tok;
        }
        let tok = self.new_token(TokenKind::Gt, ">");
        self.cursor.advance();
        tok
    }

    pub(crate) fn lex_eq(&mut self) -> Token {
        if let Some(tok) = self.two_char('=', TokenKind::EqEq) {
            return tok;
        }
        let tok = self.new_token(TokenKind::Eq, "=");
        self.cursor.advance();
        tok
    }

    pub(crate) fn lex_bang(&mut self) -> Token {
        if let Some(tok) = self.two_char('=', TokenKind::NotEq) {
            return tok;
        }
        let tok = self.new_token(TokenKind::Bang, "!");
        self.cursor.advance();
        tok
    }
}
