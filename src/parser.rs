use std::rc::Rc;

use crate::{
    ast,
    lexer::Lexer,
    token::{Token, TokenKind},
};

/// Binding powers, weakest to tightest. Comparing two of these is what
/// drives the precedence-climbing loop in [`Parser::parse_expression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn token_precedence(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lesser | TokenKind::Greater => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::LeftParen => Precedence::Call,
        TokenKind::LeftBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

/// Recursive-descent parser with one token of look-ahead.
///
/// Parsing never aborts the whole program: a statement that fails to parse
/// appends a diagnostic and the parser moves on to the next statement.
/// Callers must check [`Parser::errors`] before trusting the returned
/// [`ast::Program`].
pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        let mut parser = Parser {
            lexer,
            cur_token: Token::new(TokenKind::Eof, ""),
            peek_token: Token::new(TokenKind::Eof, ""),
            errors: Vec::new(),
        };

        // fill cur_token and peek_token
        parser.next_token();
        parser.next_token();
        parser
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn cur_token_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            true
        } else {
            self.errors.push(format!(
                "expected next token to be {}, got {} instead",
                kind, self.peek_token.kind
            ));
            false
        }
    }

    fn peek_precedence(&self) -> Precedence {
        token_precedence(self.peek_token.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        token_precedence(self.cur_token.kind)
    }

    pub fn parse_program(&mut self) -> ast::Program {
        let mut statements = Vec::new();
        while !self.cur_token_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        ast::Program { statements }
    }

    fn parse_statement(&mut self) -> Option<ast::Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<ast::Statement> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = ast::Identifier {
            name: self.cur_token.literal.clone(),
        };
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_to_terminator();
        Some(ast::LetStatement { name, value }.into())
    }

    fn parse_return_statement(&mut self) -> Option<ast::Statement> {
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_to_terminator();
        Some(ast::ReturnStatement { value }.into())
    }

    // Tokens between the parsed expression and the terminator are discarded
    // without validation. Stops at Eof so a missing ';' cannot spin.
    fn skip_to_terminator(&mut self) {
        while !self.cur_token_is(TokenKind::Semicolon) && !self.cur_token_is(TokenKind::Eof) {
            self.next_token();
        }
    }

    fn parse_expression_statement(&mut self) -> Option<ast::Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some(ast::Statement::Expression(expression))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<ast::Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            match self.peek_token.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Slash
                | TokenKind::Asterisk
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lesser
                | TokenKind::Greater => {
                    self.next_token();
                    left = self.parse_infix_expression(left)?;
                }
                TokenKind::LeftParen => {
                    self.next_token();
                    left = self.parse_call_expression(left)?;
                }
                TokenKind::LeftBracket => {
                    self.next_token();
                    left = self.parse_index_expression(left)?;
                }
                _ => return Some(left),
            }
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<ast::Expression> {
        match self.cur_token.kind {
            TokenKind::Ident => Some(
                ast::Identifier {
                    name: self.cur_token.literal.clone(),
                }
                .into(),
            ),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::String => Some(
                ast::StringLiteral {
                    value: self.cur_token.literal.clone(),
                }
                .into(),
            ),
            TokenKind::True | TokenKind::False => Some(
                ast::BooleanLiteral {
                    value: self.cur_token_is(TokenKind::True),
                }
                .into(),
            ),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LeftParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_hash_literal(),
            kind => {
                self.errors
                    .push(format!("no prefix parse function for {} found", kind));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<ast::Expression> {
        match self.cur_token.literal.parse::<i64>() {
            Ok(value) => Some(ast::IntegerLiteral { value }.into()),
            Err(_) => {
                self.errors.push(format!(
                    "could not parse {:?} as integer",
                    self.cur_token.literal
                ));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<ast::Expression> {
        let operator = self.cur_token.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(
            ast::PrefixExpression {
                operator,
                right: Box::new(right),
            }
            .into(),
        )
    }

    fn parse_infix_expression(&mut self, left: ast::Expression) -> Option<ast::Expression> {
        let operator = self.cur_token.literal.clone();
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(
            ast::InfixExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }
            .into(),
        )
    }

    fn parse_grouped_expression(&mut self) -> Option<ast::Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }
        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<ast::Expression> {
        if !self.expect_peek(TokenKind::LeftParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::LeftBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(
            ast::IfExpression {
                condition: Box::new(condition),
                consequence,
                alternative,
            }
            .into(),
        )
    }

    fn parse_block_statement(&mut self) -> ast::BlockStatement {
        let mut statements = Vec::new();
        self.next_token();
        while !self.cur_token_is(TokenKind::RightBrace) && !self.cur_token_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        ast::BlockStatement { statements }
    }

    fn parse_function_literal(&mut self) -> Option<ast::Expression> {
        if !self.expect_peek(TokenKind::LeftParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let body = Rc::new(self.parse_block_statement());
        Some(ast::FunctionLiteral { parameters, body }.into())
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<ast::Identifier>> {
        let mut identifiers = Vec::new();

        if self.peek_token_is(TokenKind::RightParen) {
            self.next_token();
            return Some(identifiers);
        }

        self.next_token();
        identifiers.push(ast::Identifier {
            name: self.cur_token.literal.clone(),
        });

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            identifiers.push(ast::Identifier {
                name: self.cur_token.literal.clone(),
            });
        }

        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }
        Some(identifiers)
    }

    fn parse_call_expression(&mut self, function: ast::Expression) -> Option<ast::Expression> {
        let arguments = self.parse_expression_list(TokenKind::RightParen)?;
        Some(
            ast::CallExpression {
                function: Box::new(function),
                arguments,
            }
            .into(),
        )
    }

    fn parse_array_literal(&mut self) -> Option<ast::Expression> {
        let elements = self.parse_expression_list(TokenKind::RightBracket)?;
        Some(ast::ArrayLiteral { elements }.into())
    }

    // Shared comma-separated reader for call arguments and array elements.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<ast::Expression>> {
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

    fn parse_index_expression(&mut self, left: ast::Expression) -> Option<ast::Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RightBracket) {
            return None;
        }
        Some(
            ast::IndexExpression {
                left: Box::new(left),
                index: Box::new(index),
            }
            .into(),
        )
    }

    fn parse_hash_literal(&mut self) -> Option<ast::Expression> {
        let mut pairs = Vec::new();

        while !self.peek_token_is(TokenKind::RightBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_token_is(TokenKind::RightBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RightBrace) {
            return None;
        }
        Some(ast::HashLiteral { pairs }.into())
    }
}
