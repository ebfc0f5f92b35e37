//! Statement dispatch and the grammar rule for each statement kind.

use crate::ast::*;
use crate::parser::core::Parser;
use crate::parser::expr::Precedence;
use lime_lex::TokenKind;

impl Parser {
    /// Chooses which statement grammar applies to the current token,
    /// falling back to a bare expression statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Statement> {
        if self.current_token_is(TokenKind::Ident) && self.peek_token_is_assignment() {
            return self.parse_assign_statement().map(Statement::Assign);
        }

        match self.current_token.kind {
            TokenKind::Let => self.parse_let_statement().map(Statement::Let),
            TokenKind::Fn => self.parse_function_statement().map(Statement::Function),
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            TokenKind::If => self.parse_if_statement().map(Statement::If),
            TokenKind::While => self.parse_while_statement().map(Statement::While),
            TokenKind::Break => Some(self.parse_break_statement()),
            TokenKind::Continue => Some(self.parse_continue_statement()),
            TokenKind::For => self.parse_for_statement().map(Statement::For),
            TokenKind::Import => self.parse_import_statement().map(Statement::Import),
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(ExpressionStatement {
            expr: Box::new(expr),
        })
    }

    /// `let a: int = 10;` — consumes up to (and including) the terminating
    /// `;`, tolerating a missing one at EOF the way the reference does.
    pub(crate) fn parse_let_statement(&mut self) -> Option<LetStatement> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.current_token.literal.clone();

        if !self.expect_peek(TokenKind::Colon) {
            return None;
        }
        if !self.expect_peek(TokenKind::Type) {
            return None;
        }
        let value_type = self.current_token.literal.clone();

        if !self.expect_peek(TokenKind::Eq) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        while !self.current_token_is(TokenKind::Semicolon) && !self.current_token_is(TokenKind::Eof) {
            self.next_token();
        }

        Some(LetStatement {
            name,
            value_type,
            value: Box::new(value),
        })
    }

    fn parse_function_statement(&mut self) -> Option<FunctionStatement> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.current_token.literal.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::Arrow) {
            return None;
        }
        self.next_token();
        let return_type = self.current_token.literal.clone();

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(FunctionStatement {
            name,
            parameters,
            return_type,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<FunctionParameter>> {
        let mut params = Vec::new();

        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(params);
        }

        self.next_token();
        let mut name = self.current_token.literal.clone();
        if !self.expect_peek(TokenKind::Colon) {
            return None;
        }
        self.next_token();
        params.push(FunctionParameter {
            name,
            value_type: self.current_token.literal.clone(),
        });

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            name = self.current_token.literal.clone();
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            params.push(FunctionParameter {
                name,
                value_type: self.current_token.literal.clone(),
            });
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(params)
    }

    pub(crate) fn parse_block_statement(&mut self) -> BlockStatement {
        let mut block = BlockStatement::default();
        self.next_token();

        while !self.current_token_is(TokenKind::RBrace) && !self.current_token_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                block.statements.push(stmt);
            }
            self.next_token();
        }

        block
    }

    fn parse_return_statement(&mut self) -> Option<ReturnStatement> {
        self.next_token();
        let return_value = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }

        Some(ReturnStatement {
            return_value: Box::new(return_value),
        })
    }

    pub(crate) fn parse_assign_statement(&mut self) -> Option<AssignStatement> {
        let name = self.current_token.literal.clone();

        self.next_token(); // onto the assignment operator
        let operator = self.current_token.literal.clone();
        self.next_token(); // onto the start of the rhs expression

        let value = self.parse_expression(Precedence::Lowest)?;
        self.next_token();

        Some(AssignStatement {
            name,
            operator,
            value: Box::new(value),
        })
    }

    fn parse_if_statement(&mut self) -> Option<IfStatement> {
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(IfStatement {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_while_statement(&mut self) -> Option<WhileStatement> {
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(WhileStatement {
            condition: Box::new(condition),
            body,
        })
    }

    fn parse_break_statement(&mut self) -> Statement {
        self.next_token();
        Statement::Break(BreakStatement {})
    }

    fn parse_continue_statement(&mut self) -> Statement {
        self.next_token();
        Statement::Continue(ContinueStatement {})
    }

    /// `for (let i: int = 0; i < 10; i = i + 1) { ... }` — the step clause
    /// is parsed without the trailing token-advance `parse_assign_statement`
    /// normally does for top-level statements, so the cursor lands exactly
    /// on the step's last token and the following `expect_peek(RParen)`
    /// lines up (matching the reference's raw-expression step parse, but
    /// generalized so `i = i + 1` lowers correctly instead of silently
    /// losing its assignment — see the ForStatement.step doc comment).
    fn parse_for_step(&mut self) -> Option<Statement> {
        if self.current_token_is(TokenKind::Ident) && self.peek_token_is_assignment() {
            let name = self.current_token.literal.clone();
            self.next_token();
            let operator = self.current_token.literal.clone();
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            Some(Statement::Assign(AssignStatement {
                name,
                operator,
                value: Box::new(value),
            }))
        } else {
            let expr = self.parse_expression(Precedence::Lowest)?;
            Some(Statement::Expression(ExpressionStatement {
                expr: Box::new(expr),
            }))
        }
    }

    /// `for (let i: int = 0; i < 10; i = i + 1) { ... }`
    fn parse_for_statement(&mut self) -> Option<ForStatement> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::Let) {
            return None;
        }

        let var_declaration = self.parse_let_statement()?;
        self.next_token(); // skip the `;` the let-statement loop stopped on

        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.next_token();

        let step = self.parse_for_step()?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(ForStatement {
            var_declaration: Box::new(var_declaration),
            condition: Box::new(condition),
            step: Box::new(step),
            body,
        })
    }

    fn parse_import_statement(&mut self) -> Option<ImportStatement> {
        if !self.expect_peek(TokenKind::Str) {
            return None;
        }
        let file_path = self.current_token.literal.clone();

        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }

        Some(ImportStatement { file_path })
    }
}
