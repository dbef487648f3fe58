use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("rec", TokenKind::Rec);
        map.insert("and", TokenKind::And);
        map.insert("in", TokenKind::In);
        map.insert("case", TokenKind::Case);
        map.insert("as", TokenKind::As);
        map.insert("let", TokenKind::Let);
        map.insert("fun", TokenKind::Fun);
        map.insert("add", TokenKind::Prim);
        map.insert("sub", TokenKind::Prim);
        map.insert("mul", TokenKind::Prim);
        map.insert("div", TokenKind::Prim);
        map.insert("gep", TokenKind::Gep);
        map.insert("load", TokenKind::Load);
        map.insert("store", TokenKind::Store);
        map.insert("update", TokenKind::Update);
        map.insert("_", TokenKind::Underscore);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    /// Bare integer: case arms and constant path offsets.
    Number,
    /// Integer with a width suffix, e.g. `42i32`.
    IntLiteral,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,
    Less,
    Greater,

    Assignment, // =
    FatArrow,   // =>
    Arrow,      // ->
    Ampersand,
    At,
    Dot,
    Colon,
    Comma,

    // Reserved
    Rec,
    And,
    In,
    Case,
    As,
    Let,
    Fun,
    Prim,
    Gep,
    Load,
    Store,
    Update,
    Underscore,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.value)
    }
}
