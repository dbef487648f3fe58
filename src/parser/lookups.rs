use std::collections::HashMap;

use crate::{errors::errors::Error, ir::ir::Exp, lexer::tokens::TokenKind, Span};

use super::{expr::*, parser::Parser};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    /// Trailing forms: `: T`, `as T` and `(args)`, all left-associative.
    Trailing,
}

pub type NUDHandler = fn(&mut Parser) -> Result<Exp<Span>, Error>;
pub type LEDHandler = fn(&mut Parser, Exp<Span>, BindingPower) -> Result<Exp<Span>, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Trailing forms
    parser.led(TokenKind::Colon, BindingPower::Trailing, parse_ascription_expr);
    parser.led(TokenKind::As, BindingPower::Trailing, parse_coercion_expr);
    parser.led(TokenKind::OpenParen, BindingPower::Trailing, parse_call_expr);

    // Literals and symbols
    parser.nud(TokenKind::IntLiteral, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenCurly, parse_tuple_expr);
    parser.nud(TokenKind::Less, parse_vector_expr);
    parser.nud(TokenKind::Prim, parse_prim_expr);

    // Binders
    parser.nud(TokenKind::Let, parse_let_expr);
    parser.nud(TokenKind::Rec, parse_rec_expr);

    // Control flow and memory
    parser.nud(TokenKind::Case, parse_case_expr);
    parser.nud(TokenKind::Gep, parse_gep_expr);
    parser.nud(TokenKind::Load, parse_load_expr);
    parser.nud(TokenKind::Store, parse_store_expr);
    parser.nud(TokenKind::Update, parse_update_expr);
}

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
