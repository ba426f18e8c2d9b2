//! A minimal parser for the expression dialect the connector emits.
//!
//! Two grammars are covered, enough for the in-memory store to interpret
//! what the planner and update builder produce:
//!
//! ```text
//! key-conditions := term ( "AND" term )*
//! term           := "#name" op ":value" | "begins_with" "(" "#name" "," ":value" ")"
//! op             := "=" | "<=" | "<" | ">=" | ">"
//!
//! set-expression := "set" assignment ( "," assignment )*
//! assignment     := "#name" "=" ":value"
//! ```
//!
//! `#` and `:` tokens are resolved through the accompanying substitution maps.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use docstore_dynamo_model::AttributeValue;

/// Parse failures; the store surfaces them as validation errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExpressionError {
    /// A token that does not fit the grammar at its position.
    #[error("unexpected token in expression: {0}")]
    UnexpectedToken(String),
    /// The expression ended mid-production.
    #[error("unexpected end of expression")]
    UnexpectedEof,
    /// A `#name` token with no entry in the names map.
    #[error("unresolved expression attribute name: {0}")]
    UnresolvedName(String),
    /// A `:value` token with no entry in the values map.
    #[error("unresolved expression attribute value: {0}")]
    UnresolvedValue(String),
}

/// Comparison operators allowed in a key condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<=`
    Le,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `>`
    Gt,
}

/// One resolved key-condition term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCondition {
    /// `field OP value`.
    Compare {
        /// Resolved attribute name.
        field: String,
        /// Comparison operator.
        op: CompareOp,
        /// Resolved operand.
        value: AttributeValue,
    },
    /// `begins_with(field, value)`.
    BeginsWith {
        /// Resolved attribute name.
        field: String,
        /// Resolved prefix operand.
        value: AttributeValue,
    },
}

/// One resolved `set` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Resolved attribute name.
    pub field: String,
    /// Resolved value to assign.
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),   // #token
    Value(String),  // :token
    Ident(String),  // AND, set, begins_with
    Op(CompareOp),  // = <= < >= >
    Comma,
    LParen,
    RParen,
}

fn lex(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' => {
                chars.next();
            }
            '#' => {
                chars.next();
                tokens.push(Token::Name(format!("#{}", take_word(&mut chars))));
            }
            ':' => {
                chars.next();
                tokens.push(Token::Value(format!(":{}", take_word(&mut chars))));
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Op(CompareOp::Eq));
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Op(CompareOp::Le));
                } else {
                    tokens.push(Token::Op(CompareOp::Lt));
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Op(CompareOp::Ge));
                } else {
                    tokens.push(Token::Op(CompareOp::Gt));
                }
            }
            _ if c.is_ascii_alphanumeric() || c == '_' => {
                tokens.push(Token::Ident(take_word(&mut chars)));
            }
            _ => return Err(ExpressionError::UnexpectedToken(c.to_string())),
        }
    }
    Ok(tokens)
}

fn take_word(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut word = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }
    word
}

struct Parser<'a> {
    tokens: std::vec::IntoIter<Token>,
    names: &'a HashMap<String, String>,
    values: &'a HashMap<String, AttributeValue>,
}

impl<'a> Parser<'a> {
    fn new(
        input: &str,
        names: &'a HashMap<String, String>,
        values: &'a HashMap<String, AttributeValue>,
    ) -> Result<Self, ExpressionError> {
        Ok(Self {
            tokens: lex(input)?.into_iter(),
            names,
            values,
        })
    }

    fn next(&mut self) -> Result<Token, ExpressionError> {
        self.tokens.next().ok_or(ExpressionError::UnexpectedEof)
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExpressionError> {
        let token = self.next()?;
        if token == *expected {
            Ok(())
        } else {
            Err(ExpressionError::UnexpectedToken(format!("{token:?}")))
        }
    }

    fn field(&mut self) -> Result<String, ExpressionError> {
        match self.next()? {
            Token::Name(token) => self
                .names
                .get(&token)
                .cloned()
                .ok_or(ExpressionError::UnresolvedName(token)),
            other => Err(ExpressionError::UnexpectedToken(format!("{other:?}"))),
        }
    }

    fn value(&mut self) -> Result<AttributeValue, ExpressionError> {
        match self.next()? {
            Token::Value(token) => self
                .values
                .get(&token)
                .cloned()
                .ok_or(ExpressionError::UnresolvedValue(token)),
            other => Err(ExpressionError::UnexpectedToken(format!("{other:?}"))),
        }
    }

    fn term(&mut self) -> Result<KeyCondition, ExpressionError> {
        match self.next()? {
            Token::Name(token) => {
                let field = self
                    .names
                    .get(&token)
                    .cloned()
                    .ok_or(ExpressionError::UnresolvedName(token))?;
                let op = match self.next()? {
                    Token::Op(op) => op,
                    other => {
                        return Err(ExpressionError::UnexpectedToken(format!("{other:?}")));
                    }
                };
                let value = self.value()?;
                Ok(KeyCondition::Compare { field, op, value })
            }
            Token::Ident(word) if word == "begins_with" => {
                self.expect(&Token::LParen)?;
                let field = self.field()?;
                self.expect(&Token::Comma)?;
                let value = self.value()?;
                self.expect(&Token::RParen)?;
                Ok(KeyCondition::BeginsWith { field, value })
            }
            other => Err(ExpressionError::UnexpectedToken(format!("{other:?}"))),
        }
    }
}

/// Parses a key-condition expression, resolving all substitution tokens.
pub fn parse_key_conditions(
    expression: &str,
    names: &HashMap<String, String>,
    values: &HashMap<String, AttributeValue>,
) -> Result<Vec<KeyCondition>, ExpressionError> {
    let mut parser = Parser::new(expression, names, values)?;
    let mut conditions = vec![parser.term()?];
    loop {
        match parser.tokens.next() {
            None => return Ok(conditions),
            Some(Token::Ident(word)) if word == "AND" => conditions.push(parser.term()?),
            Some(other) => {
                return Err(ExpressionError::UnexpectedToken(format!("{other:?}")));
            }
        }
    }
}

/// Parses a `set` update expression, resolving all substitution tokens.
pub fn parse_set_expression(
    expression: &str,
    names: &HashMap<String, String>,
    values: &HashMap<String, AttributeValue>,
) -> Result<Vec<Assignment>, ExpressionError> {
    let mut parser = Parser::new(expression, names, values)?;
    match parser.next()? {
        Token::Ident(word) if word == "set" => {}
        other => return Err(ExpressionError::UnexpectedToken(format!("{other:?}"))),
    }
    let mut assignments = Vec::new();
    loop {
        let field = parser.field()?;
        parser.expect(&Token::Op(CompareOp::Eq))?;
        let value = parser.value()?;
        assignments.push(Assignment { field, value });
        match parser.tokens.next() {
            None => return Ok(assignments),
            Some(Token::Comma) => {}
            Some(other) => {
                return Err(ExpressionError::UnexpectedToken(format!("{other:?}")));
            }
        }
    }
}
