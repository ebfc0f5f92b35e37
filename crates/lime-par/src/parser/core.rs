//! Parser state and the small helpers every parsing routine leans on.

use crate::ast::Program;
use lime_lex::{Lexer, Token, TokenKind};

/// Recursive-descent / Pratt parser over a token stream.
///
/// Parsing never panics on malformed input: every `parse_*` routine that
/// can fail returns `None` and pushes a message onto `errors`, letting
/// the caller decide whether to keep going or bail. `spec.md`'s error
/// model is deliberately flat strings, not a structured diagnostic type.
pub struct Parser {
    lexer: Lexer,
    pub(crate) current_token: Token,
    pub(crate) peek_token: Token,
    pub errors: Vec<String>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Self {
            lexer,
            current_token,
            peek_token,
            errors: Vec::new(),
        }
    }

    pub fn from_source(source: &str) -> Self {
        Self::new(Lexer::new(source))
    }

    pub(crate) fn next_token(&mut self) {
        std::mem::swap(&mut self.current_token, &mut self.peek_token);
        self.peek_token = self.lexer.next_token();
    }

    pub(crate) fn current_token_is(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    pub(crate) fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    pub(crate) fn peek_token_is_assignment(&self) -> bool {
        matches!(
            self.peek_token.kind,
            TokenKind::Eq | TokenKind::PlusEq | TokenKind::MinusEq | TokenKind::MulEq | TokenKind::DivEq
        )
    }

    /// If the peeked token has the expected kind, advances onto it and
    /// returns `true`; otherwise records an error and returns `false`.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    pub(crate) fn peek_error(&mut self, expected: TokenKind) {
        self.errors.push(format!(
            "expected next token to be {:?}, got {:?} instead on line {}",
            expected, self.peek_token.kind, self.peek_token.line
        ));
    }

    pub(crate) fn no_prefix_parse_fn_error(&mut self, kind: TokenKind) {
        self.errors
            .push(format!("no prefix parse function for {kind:?} found"));
    }

    /// Parses the whole token stream into a `Program`.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.current_token_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }

        program
    }
}
