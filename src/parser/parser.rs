//! Parser implementation for building the position-annotated IR.
//!
//! This module contains the main Parser struct and the `parse` entry
//! point. Expressions are parsed Pratt-style with NUD/LED handlers looked
//! up by token kind; types are parsed with their own NUD table.
//!
//! The parser owns the variable space, so every identifier is resolved to
//! its identity as soon as it is read.

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    ir::ir::Exp,
    lexer::tokens::{Token, TokenKind},
    var_space::var_space::VarSpace,
    Position, Span,
};

use super::{
    expr::parse_expr,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler,
        NUDLookup,
    },
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (trailing) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers
    binding_power_lookup: BPLookup,
    /// Lookup table for type handlers
    type_nud_lookup: TypeNUDLookup,
    /// Identity assignment for every variable occurrence
    pub vars: VarSpace,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let end = tokens.last().map(|t| t.span.end.clone()).unwrap_or(Position(0, file));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span { start: end.clone(), end },
            });
        }

        Parser {
            tokens,
            pos: 0,
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            vars: VarSpace::new(),
        }
    }

    /// Returns the current token without advancing. Never moves past EOF.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an "unexpected token" error at the current token.
    pub fn unexpected(&self, message: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: message.to_string(),
            },
            token.span.start.clone(),
        )
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers a left denotation (trailing form) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: &Position) -> Span {
        let end = match self.pos.checked_sub(1) {
            Some(last) => self.tokens[last].span.end.clone(),
            None => start.clone(),
        };

        Span {
            start: start.clone(),
            end,
        }
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Member names of the `rec` bundle whose `rec` keyword is the current token.
    ///
    /// Names must be bound before any member body is parsed. The scan walks
    /// forward to the bundle's own `in`, counting nested `let`/`rec`/`store`
    /// forms so that their `in` and `and` keywords are skipped.
    pub fn scan_bundle_names(&self) -> Vec<Token> {
        let mut names = vec![];
        let mut depth = 0usize;
        let mut index = self.pos + 1;

        if let Some(first) = self.tokens.get(index) {
            if first.kind == TokenKind::Identifier {
                names.push(first.clone());
            }
        }

        while let Some(token) = self.tokens.get(index) {
            match token.kind {
                TokenKind::Rec | TokenKind::Let | TokenKind::Store => depth += 1,
                TokenKind::In if depth == 0 => break,
                TokenKind::In => depth -= 1,
                TokenKind::And if depth == 0 => match self.tokens.get(index + 1) {
                    Some(name) if name.kind == TokenKind::Identifier => names.push(name.clone()),
                    _ => {}
                },
                TokenKind::EOF => break,
                _ => {}
            }
            index += 1;
        }

        names
    }
}

/// Parses a stream of tokens into a position-annotated expression.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses one expression that must span
/// the whole input.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (its variable space names every identity)
/// - Result containing either the root expression or an Error
#[tracing::instrument(level = "debug", skip_all, fields(file = %file))]
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, Result<Exp<Span>, Error>) {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let result = parse_expr(&mut parser, BindingPower::Default).and_then(|expr| {
        if parser.current_token_kind() != TokenKind::EOF {
            return Err(parser.unexpected("expected end of input"));
        }
        Ok(expr)
    });

    debug!(variables = parser.vars.len(), ok = result.is_ok(), "parsed");
    (parser, result)
}
