use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &str) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler
}

macro_rules! pattern {
    ($regex:literal, $handler:expr) => {
        RegexPattern { regex: Regex::new($regex).unwrap(), handler: $handler }
    };
    ($regex:literal, $kind:expr, $value:literal) => {
        RegexPattern {
            regex: Regex::new($regex).unwrap(),
            handler: |lexer: &mut Lexer, matched: &str| {
                let handler: fn(&mut Lexer, &str) = MK_DEFAULT_HANDLER!($kind, $value);
                handler(lexer, matched);
                Ok(())
            }
        }
    };
}

lazy_static! {
    // Order matters: the first pattern matching at the cursor wins.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern!(r"^[A-Za-z0-9_]+", word_handler),
        pattern!(r"^-[0-9][A-Za-z0-9_]*", negative_number_handler),
        pattern!(r"^\s+", skip_handler),
        pattern!(r"^//[^\n]*", skip_handler),
        pattern!(r"^->", TokenKind::Arrow, "->"),
        pattern!(r"^=>", TokenKind::FatArrow, "=>"),
        pattern!(r"^=", TokenKind::Assignment, "="),
        pattern!(r"^\(", TokenKind::OpenParen, "("),
        pattern!(r"^\)", TokenKind::CloseParen, ")"),
        pattern!(r"^\{", TokenKind::OpenCurly, "{"),
        pattern!(r"^\}", TokenKind::CloseCurly, "}"),
        pattern!(r"^\[", TokenKind::OpenBracket, "["),
        pattern!(r"^\]", TokenKind::CloseBracket, "]"),
        pattern!(r"^<", TokenKind::Less, "<"),
        pattern!(r"^>", TokenKind::Greater, ">"),
        pattern!(r"^&", TokenKind::Ampersand, "&"),
        pattern!(r"^@", TokenKind::At, "@"),
        pattern!(r"^\.", TokenKind::Dot, "."),
        pattern!(r"^:", TokenKind::Colon, ":"),
        pattern!(r"^,", TokenKind::Comma, ","),
    ];

    static ref INT_LITERAL: Regex = Regex::new(r"^-?[0-9]+i[0-9]+$").unwrap();
    static ref NUMBER: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span covering the next `len` bytes.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn classify_word(word: &str) -> TokenKind {
    if INT_LITERAL.is_match(word) {
        TokenKind::IntLiteral
    } else if NUMBER.is_match(word) {
        TokenKind::Number
    } else if let Some(kind) = RESERVED_LOOKUP.get(word) {
        *kind
    } else {
        TokenKind::Identifier
    }
}

fn word_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let kind = classify_word(matched);
    let span = lexer.span_of(matched.len());
    lexer.push(MK_TOKEN!(kind, String::from(matched), span));
    lexer.advance_n(matched.len());
    Ok(())
}

fn negative_number_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    match classify_word(matched) {
        kind @ (TokenKind::IntLiteral | TokenKind::Number) => {
            let span = lexer.span_of(matched.len());
            lexer.push(MK_TOKEN!(kind, String::from(matched), span));
            lexer.advance_n(matched.len());
            Ok(())
        }
        _ => Err(Error::new(ErrorImpl::NumberParseError { token: String::from(matched) }, lexer.position())),
    }
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    lexer.advance_n(matched.len());
    Ok(())
}

#[tracing::instrument(level = "debug", skip_all, fields(file = file.as_deref().unwrap_or("shell")))]
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in PATTERNS.iter() {
            let found = pattern.regex.find(lex.remainder()).map(|m| m.as_str().to_string());

            if let Some(text) = found {
                (pattern.handler)(&mut lex, &text)?;
                matched = true;
                break;
            }
        }

        if !matched {
            return Err(Error::new(ErrorImpl::UnrecognisedToken { token: lex.at().to_string() }, lex.position()));
        }
    }

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    debug!(tokens = lex.tokens.len(), "tokenized");
    Ok(lex.tokens)
}
