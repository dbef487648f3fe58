#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    errors::errors::{Error, ErrorTip},
    ir::ir::{Checked, Exp},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod errors;
pub mod ir;
pub mod lexer;
pub mod lowering;
pub mod macros;
pub mod parser;
pub mod type_checker;
pub mod var_space;

extern crate regex;

/// Byte offset into a named source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Finds the line containing byte `position`.
///
/// Returns the 1-based line number, the line text and the 0-based offset of
/// `position` within that line. A position at the very end of the source
/// maps to the end of the last line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // End of input: point just past the last character.
    match content.split_inclusive('\n').last() {
        Some(last) if !last.ends_with('\n') => Some((line_number - 1, last.to_string(), last.len())),
        _ => Some((line_number, String::new(), 0)),
    }
}

/// Renders an error as `<file>:<line>:<col>: <message>`.
pub fn render_diagnostic(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let (line, column) = match get_line_at_position(source, position.0) {
        Some((line, text, offset)) => (line, text[..offset].chars().count() + 1),
        None => (0, 0),
    };

    format!("{}:{}:{}: {}", position.1, line, column, error.message())
}

/// Runs the whole front end over `source`.
///
/// Tokenizes, parses and type checks; on failure the error is rendered with
/// [`render_diagnostic`].
pub fn check_source(file: &str, source: &str) -> Result<Exp<Checked>, String> {
    let run = || -> Result<Exp<Checked>, Error> {
        let tokens = tokenize(source.to_string(), Some(file.to_string()))?;
        let (_, ast) = parse(tokens, Rc::new(file.to_string()));
        type_check(&ast?)
    };

    run().map_err(|error| render_diagnostic(&error, source))
}

pub fn display_error(error: &Error, source: &str) {
    /*
        Error: TypeMismatch (...)
        -> main.phi
           |
        20 | add(x, 2i64)
           | -------^
    */

    let position = error.get_position();
    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        eprintln!("Error: {} ({})", error.get_error_name(), error);
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}: {}", error.get_error_name(), error);
    } else {
        eprintln!("Error: {}: {} ({})", error.get_error_name(), error, error.get_tip());
    }
    eprintln!("-> {}", position.1);
    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();

    (String::from(&string[start..]), start)
}
