//! Type parsing implementation.
//!
//! This module handles parsing of type annotations:
//!
//! - `void`, `iN`, `half`, `float`, `double`, `fp128`
//! - Pointers `&T`
//! - Vectors `<N x P>` of primitive types and arrays `[N x T]`
//! - Tuples `{T, ...}` and function pointers `fun (T, ...) -> T`
//! - Parenthesized types
//!
//! Every type form is introduced by its first token, so a single NUD
//! table is enough.

use std::collections::HashMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    ir::types::{FloatKind, Ty, MAX_INT_WIDTH},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_list, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Ty, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Ampersand, parse_pointer_type);
    parser.type_nud(TokenKind::Less, parse_vector_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
    parser.type_nud(TokenKind::OpenCurly, parse_tuple_type);
    parser.type_nud(TokenKind::Fun, parse_function_type);
    parser.type_nud(TokenKind::OpenParen, parse_grouping_type);
}

pub fn parse_type(parser: &mut Parser) -> Result<Ty, Error> {
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("expected a type"));
    };

    nud(parser)
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<Ty, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    let name = token.value.as_str();

    if name == "void" {
        return Ok(Ty::Void);
    }
    if let Some(kind) = FloatKind::from_name(name) {
        return Ok(Ty::float(kind));
    }
    if let Some(width) = name.strip_prefix('i').and_then(|w| w.parse::<u32>().ok()) {
        if (1..=MAX_INT_WIDTH).contains(&width) {
            return Ok(Ty::int(width));
        }
    }

    Err(Error::new(ErrorImpl::UnknownType { type_: token.value.clone() }, token.span.start))
}

pub fn parse_pointer_type(parser: &mut Parser) -> Result<Ty, Error> {
    parser.advance();
    Ok(Ty::ptr(parse_type(parser)?))
}

/// Parses the `N x` prefix shared by vector and array types.
fn parse_length(parser: &mut Parser) -> Result<u32, Error> {
    let token = parser.expect_error(TokenKind::Number, Some(parser.unexpected("expected a length")))?;
    let length = token.value.parse().map_err(|_| {
        Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone())
    })?;

    let by = parser.expect_error(TokenKind::Identifier, Some(parser.unexpected("expected `x`")))?;
    if by.value != "x" {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed { token: by.value, message: String::from("expected `x`") },
            by.span.start,
        ));
    }

    Ok(length)
}

pub fn parse_vector_type(parser: &mut Parser) -> Result<Ty, Error> {
    parser.advance();
    let length = parse_length(parser)?;
    let start = parser.get_position();
    let elem = parse_type(parser)?;
    parser.expect(TokenKind::Greater)?;

    match elem {
        Ty::Prim(prim) => Ok(Ty::Vector(length, prim)),
        other => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: other.to_string(),
                message: String::from("vector elements must be a primitive type"),
            },
            start,
        )),
    }
}

pub fn parse_array_type(parser: &mut Parser) -> Result<Ty, Error> {
    parser.advance();
    let length = parse_length(parser)?;
    let elem = parse_type(parser)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Ty::Array(length, Box::new(elem)))
}

pub fn parse_tuple_type(parser: &mut Parser) -> Result<Ty, Error> {
    parser.advance();
    Ok(Ty::Tuple(parse_list(parser, TokenKind::CloseCurly, parse_type)?))
}

pub fn parse_function_type(parser: &mut Parser) -> Result<Ty, Error> {
    parser.advance();
    parser.expect(TokenKind::OpenParen)?;
    let params = parse_list(parser, TokenKind::CloseParen, parse_type)?;
    parser.expect(TokenKind::Arrow)?;
    let ret = parse_type(parser)?;

    Ok(Ty::fun(params, ret))
}

pub fn parse_grouping_type(parser: &mut Parser) -> Result<Ty, Error> {
    parser.advance();
    let ty = parse_type(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(ty)
}
