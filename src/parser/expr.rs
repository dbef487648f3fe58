use crate::{
    errors::errors::{Error, ErrorImpl},
    ir::{
        ir::{Arm, Exp, ExpKind, Func, Param, Path, Pattern, Prim, Step},
        types::int_fits,
    },
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Exp<Span>, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("expected an expression"));
    };

    let mut left = nud(parser)?;

    // While the current token binds tighter than `bp`, keep extending lhs
    while let Some(next_bp) = parser.get_bp_lookup().get(&parser.current_token_kind()).copied() {
        if next_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected("unexpected trailing token"));
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

/// Parses `item (, item)* close`, allowing an empty list.
pub fn parse_list<T>(
    parser: &mut Parser,
    close: TokenKind,
    mut item: impl FnMut(&mut Parser) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let mut items = vec![];

    while parser.current_token_kind() != close {
        items.push(item(parser)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(close)?;
    Ok(items)
}

/// Splits `42i32` into value and width, checking the value fits the width.
fn parse_int_literal(text: &str) -> Option<(i128, u32)> {
    let (value, width) = text.split_once('i')?;
    let value: i128 = value.parse().ok()?;
    let width: u32 = width.parse().ok()?;

    int_fits(value, width).then_some((value, width))
}

fn parse_constant_offset(parser: &mut Parser) -> Result<u32, Error> {
    let token = parser.expect_error(TokenKind::Number, Some(parser.unexpected("expected a constant offset")))?;

    token.value.parse().map_err(|_| {
        Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone())
    })
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    match parser.current_token_kind() {
        TokenKind::IntLiteral => {
            let token = parser.advance().clone();
            let Some((value, width)) = parse_int_literal(&token.value) else {
                return Err(Error::new(ErrorImpl::NumberParseError { token: token.value }, token.span.start));
            };

            Ok(Exp::new(token.span, ExpKind::Int { value, width }))
        },
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            let id = parser.vars.resolve(&token.value, token.span.start.clone())?;

            Ok(Exp::new(token.span, ExpKind::Var(id)))
        },
        _ => Err(parser.unexpected("expected a literal or variable")),
    }
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_ascription_expr(parser: &mut Parser, left: Exp<Span>, _bp: BindingPower) -> Result<Exp<Span>, Error> {
    parser.advance();
    let ty = parse_type(parser)?;
    let span = parser.span_from(&left.ann.start);

    Ok(Exp::new(span, ExpKind::Ann(Box::new(left), ty)))
}

pub fn parse_coercion_expr(parser: &mut Parser, left: Exp<Span>, _bp: BindingPower) -> Result<Exp<Span>, Error> {
    parser.advance();
    let ty = parse_type(parser)?;
    let span = parser.span_from(&left.ann.start);

    Ok(Exp::new(span, ExpKind::Coerce(Box::new(left), ty)))
}

pub fn parse_call_expr(parser: &mut Parser, left: Exp<Span>, _bp: BindingPower) -> Result<Exp<Span>, Error> {
    parser.advance();
    let args = parse_list(parser, TokenKind::CloseParen, |p| parse_expr(p, BindingPower::Default))?;
    let span = parser.span_from(&left.ann.start);

    Ok(Exp::new(span, ExpKind::Call(Box::new(left), args)))
}

pub fn parse_prim_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    let token = parser.advance().clone();
    let op = match token.value.as_str() {
        "add" => Prim::Add,
        "sub" => Prim::Sub,
        "mul" => Prim::Mul,
        _ => Prim::Div,
    };

    parser.expect(TokenKind::OpenParen)?;
    let args = parse_list(parser, TokenKind::CloseParen, |p| parse_expr(p, BindingPower::Default))?;

    Ok(Exp::new(parser.span_from(&token.span.start), ExpKind::Prim(op, args)))
}

pub fn parse_tuple_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    let start = parser.advance().span.start.clone();
    let elems = parse_list(parser, TokenKind::CloseCurly, |p| parse_expr(p, BindingPower::Default))?;

    Ok(Exp::new(parser.span_from(&start), ExpKind::Tuple(elems)))
}

pub fn parse_vector_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    let start = parser.advance().span.start.clone();
    let elems = parse_list(parser, TokenKind::Greater, |p| parse_expr(p, BindingPower::Default))?;

    Ok(Exp::new(parser.span_from(&start), ExpKind::Vector(elems)))
}

pub fn parse_let_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    // let x: T = e1 in e2
    let start = parser.advance().span.start.clone();

    let error = parser.unexpected("expected identifier after let");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;
    parser.expect(TokenKind::Assignment)?;

    // The bound expression cannot see the new name
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::In)?;

    parser.vars.push_scope();
    let id = parser.vars.bind(&name.value);
    let body = parse_expr(parser, BindingPower::Default);
    parser.vars.pop_scope();

    Ok(Exp::new(
        parser.span_from(&start),
        ExpKind::Let {
            name: id,
            ty,
            value: Box::new(value),
            body: Box::new(body?),
        },
    ))
}

pub fn parse_case_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    // case e { 0 => e, ..., _ => e }
    let start = parser.advance().span.start.clone();
    let scrutinee = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::OpenCurly)?;

    let arms = parse_list(parser, TokenKind::CloseCurly, |p| {
        let pattern = match p.current_token_kind() {
            TokenKind::Underscore => {
                p.advance();
                Pattern::Default
            }
            TokenKind::Number => {
                let token = p.advance().clone();
                let value = token.value.parse().map_err(|_| {
                    Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone())
                })?;
                Pattern::Lit(value)
            }
            _ => return Err(p.unexpected("expected an integer or `_` case pattern")),
        };

        p.expect(TokenKind::FatArrow)?;
        let body = parse_expr(p, BindingPower::Default)?;
        Ok(Arm { pattern, body })
    })?;

    Ok(Exp::new(parser.span_from(&start), ExpKind::Case(Box::new(scrutinee), arms)))
}

pub fn parse_rec_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    // rec f(x: T, ...): T = e and g(...): T = e in e
    let names = parser.scan_bundle_names();
    let start = parser.advance().span.start.clone();

    parser.vars.push_scope();
    let result = parse_bundle(parser, &names.iter().map(|t| t.value.clone()).collect::<Vec<_>>());
    parser.vars.pop_scope();

    let (funcs, body) = result?;
    Ok(Exp::new(parser.span_from(&start), ExpKind::Rec(funcs, Box::new(body))))
}

fn parse_bundle(parser: &mut Parser, names: &[String]) -> Result<(Vec<Func<Span>>, Exp<Span>), Error> {
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(parser.unexpected(&format!("function `{}` defined twice in one rec bundle", name)));
        }
    }

    let ids = names.iter().map(|name| parser.vars.bind(name)).collect::<Vec<_>>();
    let mut funcs = vec![];

    loop {
        let error = parser.unexpected("expected function name in rec bundle");
        let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
        let Some(&id) = ids.get(funcs.len()) else {
            return Err(parser.unexpected("malformed rec bundle"));
        };

        parser.vars.push_scope();
        let func = parse_func(parser, id, &name.span);
        parser.vars.pop_scope();
        funcs.push(func?);

        if parser.current_token_kind() == TokenKind::And {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::In)?;
    let body = parse_expr(parser, BindingPower::Default)?;

    Ok((funcs, body))
}

fn parse_func(parser: &mut Parser, id: u32, name_span: &Span) -> Result<Func<Span>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut seen: Vec<String> = vec![];
    let params = parse_list(parser, TokenKind::CloseParen, |p| {
        let error = p.unexpected("expected parameter name");
        let name = p.expect_error(TokenKind::Identifier, Some(error))?;
        if seen.contains(&name.value) {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: name.value.clone(),
                    message: format!("parameter `{}` declared twice", name.value),
                },
                name.span.start.clone(),
            ));
        }
        seen.push(name.value.clone());
        p.expect(TokenKind::Colon)?;
        let ty = parse_type(p)?;

        Ok(Param {
            ann: p.span_from(&name.span.start),
            name: p.vars.bind(&name.value),
            ty,
        })
    })?;

    parser.expect(TokenKind::Colon)?;
    let ret = parse_type(parser)?;
    parser.expect(TokenKind::Assignment)?;
    let body = parse_expr(parser, BindingPower::Default)?;

    Ok(Func {
        ann: parser.span_from(&name_span.start),
        name: id,
        params,
        ret,
        body,
    })
}

/// Parses path steps until a token that cannot start a step.
pub fn parse_path(parser: &mut Parser) -> Result<Path<Span>, Error> {
    let mut path = vec![];

    loop {
        match parser.current_token_kind() {
            TokenKind::Dot => {
                parser.advance();
                path.push(Step::Proj(parse_constant_offset(parser)?));
            }
            TokenKind::OpenBracket => {
                parser.advance();
                path.push(Step::ElemA(parse_constant_offset(parser)?));
                parser.expect(TokenKind::CloseBracket)?;
            }
            TokenKind::Less => {
                parser.advance();
                path.push(Step::Elem(parse_expr(parser, BindingPower::Default)?));
                parser.expect(TokenKind::Greater)?;
            }
            TokenKind::At => {
                parser.advance();
                path.push(Step::Index(parse_expr(parser, BindingPower::Default)?));
            }
            _ => return Ok(path),
        }
    }
}

fn parse_based_path(parser: &mut Parser) -> Result<(Exp<Span>, Path<Span>), Error> {
    let base = parse_expr(parser, BindingPower::Default)?;
    let path = parse_path(parser)?;

    Ok((base, path))
}

pub fn parse_gep_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;
    let (base, path) = parse_based_path(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Exp::new(parser.span_from(&start), ExpKind::Gep(Box::new(base), path)))
}

pub fn parse_load_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;
    let (base, path) = parse_based_path(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Exp::new(parser.span_from(&start), ExpKind::Load(Box::new(base), path)))
}

pub fn parse_update_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    // update(e path, v)
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;
    let (base, path) = parse_based_path(parser)?;
    parser.expect(TokenKind::Comma)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Exp::new(
        parser.span_from(&start),
        ExpKind::Update { base: Box::new(base), path, value: Box::new(value) },
    ))
}

pub fn parse_store_expr(parser: &mut Parser) -> Result<Exp<Span>, Error> {
    // store e path = v in k
    let start = parser.advance().span.start.clone();
    let (dest, path) = parse_based_path(parser)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::In)?;
    let body = parse_expr(parser, BindingPower::Default)?;

    Ok(Exp::new(
        parser.span_from(&start),
        ExpKind::Store {
            dest: Box::new(dest),
            path,
            value: Box::new(value),
            body: Box::new(body),
        },
    ))
}
