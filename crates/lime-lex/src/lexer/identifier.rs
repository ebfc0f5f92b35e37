//! Identifier and keyword lexing.

use crate::lexer::core::Lexer;

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

impl Lexer {
    /// Reads an identifier's raw text, advancing the cursor past it.
    /// Keyword resolution happens in the caller via `lookup_ident`.
    pub(crate) fn lex_identifier_text(&mut self) -> String {
        let start = self.cursor.position();
        while let Some(ch) = self.cursor.current_char() {
            if !is_ident_continue(ch) {
                break;
            }
            self.cursor.advance();
        }
        self.cursor.slice_from(start)
    }
}
