//! Pratt (operator-precedence) expression parsing.

use crate::ast::*;
use crate::parser::core::Parser;
use lime_lex::TokenKind;

/// Binding power tiers, lowest to highest. Order is the contract: two
/// precedences compare with `<`/`>` by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Exponent,
    Prefix,
    Call,
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    use Precedence::*;
    match kind {
        TokenKind::Plus | TokenKind::Minus => Sum,
        TokenKind::Slash | TokenKind::Asterisk | TokenKind::Modulus => Product,
        TokenKind::Pow => Exponent,
        TokenKind::EqEq | TokenKind::NotEq => Equals,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => LessGreater,
        TokenKind::LParen => Call,
        TokenKind::PlusPlus | TokenKind::MinusMinus => Index,
        _ => Lowest,
    }
}

impl Parser {
    pub(crate) fn current_precedence(&self) -> Precedence {
        precedence_of(self.current_token.kind)
    }

    pub(crate) fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek_token.kind)
    }

    pub(crate) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current_token.kind {
            TokenKind::Ident => Some(Expression::Identifier(IdentifierLiteral {
                value: self.current_token.literal.clone(),
            })),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Float => self.parse_float_literal(),
            TokenKind::Str => Some(Expression::String(StringLiteral {
                value: self.current_token.literal.clone(),
            })),
            TokenKind::True | TokenKind::False => Some(Expression::Boolean(BooleanLiteral {
                value: self.current_token_is(TokenKind::True),
            })),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::Minus | TokenKind::Bang => self.parse_prefix_expression(),
            kind => {
                self.no_prefix_parse_fn_error(kind);
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.current_token.kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Slash
            | TokenKind::Asterisk
            | TokenKind::Pow
            | TokenKind::Modulus
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq => self.parse_infix_expression(left),
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::PlusPlus | TokenKind::MinusMinus => Some(self.parse_postfix_expression(left)),
            _ => Some(left),
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current_token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(IntegerLiteral { value })),
            Err(_) => {
                self.errors.push(format!(
                    "could not parse `{}` as an integer",
                    self.current_token.literal
                ));
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expression> {
        match self.current_token.literal.parse::<f64>() {
            Ok(value) => Some(Expression::Float(FloatLiteral { value })),
            Err(_) => {
                self.errors.push(format!(
                    "could not parse `{}` as a float",
                    self.current_token.literal
                ));
                None
            }
        }
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let operator = self.current_token.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix(PrefixExpression {
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = self.current_token.literal.clone();
        let precedence = self.current_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix(InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_postfix_expression(&mut self, left: Expression) -> Expression {
        Expression::Postfix(PostfixExpression {
            left: Box::new(left),
            operator: self.current_token.literal.clone(),
        })
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call(CallExpression {
            function: Box::new(function),
            arguments,
        }))
    }

    pub(crate) fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_token_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }
}
