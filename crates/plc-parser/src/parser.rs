//! Recursive-descent parser: turns a token sequence into a [`Source`] tree.
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use plc_syntax::ast::*;
use plc_syntax::error::{syntax_error, ParseResult};
use plc_syntax::token::{Token, TokenKind};
use tracing::debug;

use crate::literal;

/// Reserved words. Matched without regard to ASCII case and never accepted
/// where a name is expected.
pub const KEYWORDS: [&str; 17] = [
    "LIST", "VAR", "VAL", "FUN", "DO", "END", "LET", "SWITCH", "CASE", "DEFAULT", "IF", "ELSE",
    "WHILE", "RETURN", "NIL", "TRUE", "FALSE",
];

const LOGICAL: [&str; 2] = ["&&", "||"];
const COMPARISON: [&str; 4] = ["<", ">", "==", "!="];
const ADDITIVE: [&str; 2] = ["+", "-"];
const MULTIPLICATIVE: [&str; 3] = ["*", "/", "^"];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Something the current token can be tested against: either a token kind or
/// an exact literal.
pub trait Pattern {
    fn matches(&self, token: &Token) -> bool;
}

impl Pattern for TokenKind {
    fn matches(&self, token: &Token) -> bool {
        token.kind == *self
    }
}

impl Pattern for &str {
    fn matches(&self, token: &Token) -> bool {
        if token.kind == TokenKind::Identifier {
            token.literal.eq_ignore_ascii_case(self)
        } else {
            token.literal == *self
        }
    }
}

/// Parse a whole program from `tokens`.
pub fn parse(tokens: Vec<Token>) -> ParseResult<Source> {
    Parser::new(tokens).parse_source()
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// `source ::= global* function+`
    #[tracing::instrument(skip_all, fields(tokens = self.tokens.len()))]
    pub fn parse_source(&mut self) -> ParseResult<Source> {
        let mut globals = Vec::new();
        while self.peek("LIST") || self.peek("VAR") || self.peek("VAL") {
            globals.push(self.parse_global()?);
        }
        let mut functions = Vec::new();
        while self.peek("FUN") {
            functions.push(self.parse_function()?);
        }
        if functions.is_empty() {
            return self.error("expected 'FUN'");
        }
        if let Some(token) = self.tokens.get(self.pos) {
            return self.error(format!("unexpected '{}' after last function", token.literal));
        }
        debug!(
            globals = globals.len(),
            functions = functions.len(),
            "parsed source"
        );
        Ok(Source { globals, functions })
    }

    /// One `LIST`, `VAR` or `VAL` global including its trailing `;`.
    pub fn parse_global(&mut self) -> ParseResult<Global> {
        let global = if self.matches("LIST") {
            self.parse_list()?
        } else if self.matches("VAR") {
            self.parse_variable(true)?
        } else if self.matches("VAL") {
            self.parse_variable(false)?
        } else {
            return self.error("expected 'LIST', 'VAR' or 'VAL'");
        };
        self.expect(";")?;
        Ok(global)
    }

    fn parse_list(&mut self) -> ParseResult<Global> {
        let name = self.expect_name()?;
        let type_name = self.parse_type_annotation()?;
        self.expect("=")?;
        self.expect("[")?;
        let values = self.parse_expression_list("]", false)?;
        Ok(Global {
            name,
            type_name,
            mutable: true,
            value: Some(Expression::list(values)),
            binding: None,
        })
    }

    fn parse_variable(&mut self, mutable: bool) -> ParseResult<Global> {
        let name = self.expect_name()?;
        let type_name = self.parse_type_annotation()?;
        let value = if self.matches("=") {
            Some(self.parse_expression()?)
        } else if mutable {
            None
        } else {
            return self.error("expected '=' after immutable global");
        };
        Ok(Global {
            name,
            type_name,
            mutable,
            value,
            binding: None,
        })
    }

    /// `FUN name ( params ) [: Type] DO block END`
    pub fn parse_function(&mut self) -> ParseResult<Function> {
        self.expect("FUN")?;
        let name = self.expect_name()?;
        self.expect("(")?;
        let mut parameters = Vec::new();
        if !self.matches(")") {
            loop {
                let name = self.expect_name()?;
                self.expect(":")?;
                let type_name = self.expect_type_name()?;
                parameters.push(Parameter { name, type_name });
                if self.matches(",") {
                    if self.peek(")") {
                        return self.error("trailing ',' in parameter list");
                    }
                    continue;
                }
                self.expect(")")?;
                break;
            }
        }
        let return_type_name = self.parse_type_annotation()?;
        self.expect("DO")?;
        let body = self.parse_block()?;
        self.expect("END")?;
        Ok(Function {
            name,
            parameters,
            return_type_name,
            body,
            signature: None,
        })
    }

    /// Statements up to, but not including, `END`, `ELSE`, `CASE` or `DEFAULT`.
    pub fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            if self.pos >= self.tokens.len() {
                return self.error("unexpected end of input, expected 'END'");
            }
            if self.peek("END") || self.peek("ELSE") || self.peek("CASE") || self.peek("DEFAULT") {
                return Ok(statements);
            }
            statements.push(self.parse_statement()?);
        }
    }

    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        if self.matches("LET") {
            self.parse_declaration()
        } else if self.matches("SWITCH") {
            self.parse_switch()
        } else if self.matches("IF") {
            self.parse_if()
        } else if self.matches("WHILE") {
            self.parse_while()
        } else if self.matches("RETURN") {
            let value = self.parse_expression()?;
            self.expect(";")?;
            Ok(Statement::Return(value))
        } else {
            let expression = self.parse_expression()?;
            if self.matches("=") {
                let value = self.parse_expression()?;
                self.expect(";")?;
                Ok(Statement::Assignment {
                    receiver: expression,
                    value,
                })
            } else {
                self.expect(";")?;
                Ok(Statement::Expression(expression))
            }
        }
    }

    fn parse_declaration(&mut self) -> ParseResult<Statement> {
        let name = self.expect_name()?;
        let type_name = self.parse_type_annotation()?;
        let value = if self.matches("=") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(";")?;
        Ok(Statement::Declaration {
            name,
            type_name,
            value,
            binding: None,
        })
    }

    fn parse_switch(&mut self) -> ParseResult<Statement> {
        let condition = self.parse_expression()?;
        let mut cases = Vec::new();
        while self.matches("CASE") {
            let value = self.parse_expression()?;
            self.expect(":")?;
            let body = self.parse_block()?;
            cases.push(Case {
                value: Some(value),
                body,
            });
        }
        if cases.is_empty() {
            return self.error("expected 'CASE'");
        }
        self.expect("DEFAULT")?;
        let body = self.parse_block()?;
        cases.push(Case { value: None, body });
        self.expect("END")?;
        Ok(Statement::Switch { condition, cases })
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        let condition = self.parse_expression()?;
        self.expect("DO")?;
        let then_body = self.parse_block()?;
        if then_body.is_empty() {
            return self.error("expected at least one statement after 'DO'");
        }
        let else_body = if self.matches("ELSE") {
            self.parse_block()?
        } else {
            Vec::new()
        };
        self.expect("END")?;
        Ok(Statement::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        let condition = self.parse_expression()?;
        self.expect("DO")?;
        let body = self.parse_block()?;
        self.expect("END")?;
        Ok(Statement::While { condition, body })
    }

    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_logical_expression()
    }

    pub fn parse_logical_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary(&LOGICAL, Self::parse_comparison_expression)
    }

    pub fn parse_comparison_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary(&COMPARISON, Self::parse_additive_expression)
    }

    pub fn parse_additive_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary(&ADDITIVE, Self::parse_multiplicative_expression)
    }

    pub fn parse_multiplicative_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary(&MULTIPLICATIVE, Self::parse_primary_expression)
    }

    /// Left-associative fold of `operand (op operand)*`.
    fn parse_binary(
        &mut self,
        operators: &[&str],
        operand: fn(&mut Self) -> ParseResult<Expression>,
    ) -> ParseResult<Expression> {
        let mut left = operand(self)?;
        while let Some(operator) = self.match_operator(operators) {
            let right = operand(self)?;
            left = Expression::binary(operator, left, right);
        }
        Ok(left)
    }

    pub fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        if self.matches("NIL") {
            return Ok(Expression::literal(Literal::Nil));
        }
        if self.matches("TRUE") {
            return Ok(Expression::literal(Literal::Boolean(true)));
        }
        if self.matches("FALSE") {
            return Ok(Expression::literal(Literal::Boolean(false)));
        }
        if self.matches("(") {
            let inner = self.parse_expression()?;
            self.expect(")")?;
            return Ok(Expression::group(inner));
        }

        let index = self.pos;
        let Some(token) = self.tokens.get(index).cloned() else {
            return self.error("expected expression, found end of input");
        };
        let decoded = match token.kind {
            TokenKind::Integer => BigInt::from_str(&token.literal)
                .map(Literal::Integer)
                .map_err(|_| format!("malformed integer literal {}", token.literal)),
            TokenKind::Decimal => BigDecimal::from_str(&token.literal)
                .map(Literal::Decimal)
                .map_err(|_| format!("malformed decimal literal {}", token.literal)),
            TokenKind::Character => literal::decode_character(&token.literal).map(Literal::Character),
            TokenKind::String => literal::decode_string(&token.literal).map(Literal::String),
            TokenKind::Identifier if is_keyword(&token.literal) => {
                return self.error(format!("expected expression, found keyword '{}'", token.literal));
            }
            TokenKind::Identifier => {
                self.pos += 1;
                return self.parse_name_expression(token.literal);
            }
            TokenKind::Operator => {
                return self.error(format!("expected expression, found '{}'", token.literal));
            }
        };
        match decoded {
            Ok(value) => {
                self.pos += 1;
                Ok(Expression::literal(value))
            }
            Err(msg) => syntax_error(index, token.offset, msg),
        }
    }

    /// What follows an identifier: a call, an indexed access or a plain access.
    fn parse_name_expression(&mut self, name: String) -> ParseResult<Expression> {
        if self.matches("(") {
            let arguments = self.parse_expression_list(")", true)?;
            Ok(Expression::call(name, arguments))
        } else if self.matches("[") {
            let index = self.parse_expression()?;
            self.expect("]")?;
            Ok(Expression::access(name, Some(index)))
        } else {
            Ok(Expression::access(name, None))
        }
    }

    /// Comma separated expressions up to and including `close`. The opening
    /// delimiter has already been consumed.
    fn parse_expression_list(&mut self, close: &str, allow_empty: bool) -> ParseResult<Vec<Expression>> {
        let mut values = Vec::new();
        if allow_empty && self.matches(close) {
            return Ok(values);
        }
        loop {
            values.push(self.parse_expression()?);
            if self.matches(",") {
                if self.peek(close) {
                    return self.error(format!("trailing ',' before '{}'", close));
                }
                continue;
            }
            self.expect(close)?;
            return Ok(values);
        }
    }

    fn parse_type_annotation(&mut self) -> ParseResult<Option<String>> {
        if self.matches(":") {
            Ok(Some(self.expect_type_name()?))
        } else {
            Ok(None)
        }
    }

    // ---- token helpers ----

    /// True if the current token matches `pattern`.
    pub fn peek(&self, pattern: impl Pattern) -> bool {
        self.peek_at(0, pattern)
    }

    /// True if the token `ahead` positions past the current one matches.
    pub fn peek_at(&self, ahead: usize, pattern: impl Pattern) -> bool {
        self.tokens
            .get(self.pos + ahead)
            .is_some_and(|token| pattern.matches(token))
    }

    /// Consumes the current token if it matches `pattern`.
    pub fn matches(&mut self, pattern: impl Pattern) -> bool {
        if self.peek(pattern) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, literal: &str) -> ParseResult<()> {
        if self.matches(literal) {
            Ok(())
        } else {
            self.error(format!("expected '{}'{}", literal, self.found()))
        }
    }

    fn expect_name(&mut self) -> ParseResult<String> {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind == TokenKind::Identifier && !is_keyword(&token.literal) => {
                let name = token.literal.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => self.error(format!("expected identifier{}", self.found())),
        }
    }

    /// Type names are identifiers but may collide with keywords (`Nil`).
    fn expect_type_name(&mut self) -> ParseResult<String> {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind == TokenKind::Identifier => {
                let name = token.literal.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => self.error(format!("expected type name{}", self.found())),
        }
    }

    fn match_operator(&mut self, operators: &[&str]) -> Option<BinaryOp> {
        let token = self.tokens.get(self.pos)?;
        if token.kind != TokenKind::Operator || !operators.contains(&token.literal.as_str()) {
            return None;
        }
        let operator = BinaryOp::from_symbol(&token.literal)?;
        self.pos += 1;
        Some(operator)
    }

    fn found(&self) -> String {
        match self.tokens.get(self.pos) {
            Some(token) => format!(", found '{}'", token.literal),
            None => ", found end of input".to_string(),
        }
    }

    /// Fails at the current token, or just past the last one at end of input.
    fn error<T>(&self, msg: impl Into<String>) -> ParseResult<T> {
        let offset = match self.tokens.get(self.pos) {
            Some(token) => token.offset,
            None => self.tokens.last().map_or(0, Token::end),
        };
        syntax_error(self.pos.min(self.tokens.len()), offset, msg)
    }
}
