//! Unit tests for the lexer module.

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.phi".to_string()))
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("rec and in case as let fun gep load store update _"),
        vec![
            TokenKind::Rec,
            TokenKind::And,
            TokenKind::In,
            TokenKind::Case,
            TokenKind::As,
            TokenKind::Let,
            TokenKind::Fun,
            TokenKind::Gep,
            TokenKind::Load,
            TokenKind::Store,
            TokenKind::Update,
            TokenKind::Underscore,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_prim_names() {
    let tokens = tokenize("add sub mul div".to_string(), None).unwrap();

    assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Prim));
    assert_eq!(tokens[2].value, "mul");
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 _x 9lives i32 x".to_string(), None).unwrap();

    for (token, value) in tokens.iter().zip(["foo", "baz_123", "_x", "9lives", "i32", "x"]) {
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.value, value);
    }
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42i32 -7i8 0 -3 12".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
    assert_eq!(tokens[0].value, "42i32");
    assert_eq!(tokens[1].kind, TokenKind::IntLiteral);
    assert_eq!(tokens[1].value, "-7i8");
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[3].kind, TokenKind::Number);
    assert_eq!(tokens[3].value, "-3");
    assert_eq!(tokens[4].kind, TokenKind::Number);
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] < > & @ . : , = => ->"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Ampersand,
            TokenKind::At,
            TokenKind::Dot,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Assignment,
            TokenKind::FatArrow,
            TokenKind::Arrow,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_path_steps() {
    assert_eq!(
        kinds("p .0 [2] @i"),
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Number,
            TokenKind::OpenBracket,
            TokenKind::Number,
            TokenKind::CloseBracket,
            TokenKind::At,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments_and_whitespace() {
    let tokens = tokenize("  let // binds x\n  x".to_string(), None).unwrap();

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Let);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].span.start.0, 19);
}

#[test]
fn test_tokenize_spans() {
    let tokens = tokenize("add(x, 10i64)".to_string(), Some("spans.phi".to_string())).unwrap();

    assert_eq!(tokens[4].value, "10i64");
    assert_eq!(tokens[4].span.start.0, 7);
    assert_eq!(tokens[4].span.end.0, 12);
    assert_eq!(*tokens[4].span.start.1, "spans.phi");
}

#[test]
fn test_tokenize_unrecognized_token() {
    let error = tokenize("let x = $".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_tokenize_bad_negative_number() {
    let error = tokenize("-3abc".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_tokenize_default_file_name() {
    let tokens = tokenize("x".to_string(), None).unwrap();

    assert_eq!(*tokens[0].span.start.1, "shell");
}
