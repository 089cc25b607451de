//! The combinator interpreter.
//!
//! `eval` dispatches on the node kind, threading the cursor through
//! sub-parsers. Committed sequences (seq, left, right, between, the
//! operand step of chainl1) restore their entry checkpoint on failure;
//! alternations (multi, optional, not, peek, the iteration steps of many
//! and sep_by) restore per attempt and move on. Failures keep the
//! position where the child failure was detected, not the restored entry
//! position.

use crate::ast::{self, Ast, NONE, Tag};
use crate::error::{ErrorKind, ParseError};
use crate::input::Input;

use super::{Kind, Parser, expr, primitive};

pub(super) fn eval(p: &Parser, input: &mut Input<'_>) -> Result<Ast, ParseError> {
    match dispatch(p, input) {
        Ok(ast) => Ok(ast),
        Err(mut err) => {
            if err.parser_name.is_none()
                && let Some(name) = p.name()
            {
                err.parser_name = Some(name.to_string());
            }
            Err(err)
        }
    }
}

fn dispatch(p: &Parser, input: &mut Input<'_>) -> Result<Ast, ParseError> {
    match p.kind() {
        Kind::Lit(s) => primitive::scan_lit(input, s),
        Kind::LitCi(s) => primitive::scan_lit_ci(input, s),
        Kind::KeywordCi(s) => primitive::scan_keyword_ci(input, s),
        Kind::Satisfy { pred, tag } => primitive::scan_satisfy(input, &**pred, *tag),
        Kind::AnyChar => primitive::scan_satisfy(input, &|_| true, NONE),
        Kind::Integer(tag) => primitive::scan_integer(input, *tag),
        Kind::Real(tag) => primitive::scan_real(input, *tag),
        Kind::StringLit(tag) => primitive::scan_string(input, *tag),
        Kind::CharLit(tag) => primitive::scan_char(input, *tag),
        Kind::CIdent(tag) => primitive::scan_cident(input, *tag),
        Kind::Until { delim, tag } => primitive::scan_until(input, delim, *tag),
        Kind::Eoi => primitive::scan_eoi(input),
        Kind::Succeed(ast) => Ok(ast.clone()),

        Kind::Seq { tag, items } => run_seq(input, *tag, items),
        Kind::GSeq { tag, items } => run_gseq(input, *tag, items),
        Kind::Multi { tag, alts } => run_multi(input, *tag, alts),
        Kind::Many(inner) => run_many(input, inner),
        Kind::Optional(inner) => run_optional(input, inner),
        Kind::Between { open, inner, close } => run_between(input, open, inner, close),
        Kind::SepBy { item, sep } => run_sep_by(input, item, sep, false),
        Kind::SepEndBy { item, sep } => run_sep_by(input, item, sep, true),
        Kind::Chainl1 { item, op } => run_chainl1(input, item, op),
        Kind::Left { first, second } => run_pair(input, first, second, true),
        Kind::Right { first, second } => run_pair(input, first, second, false),
        Kind::Not(inner) => run_not(input, inner),
        Kind::Peek(inner) => run_peek(input, inner),

        Kind::Map { inner, f } => eval(inner, input).map(|ast| f(ast)),
        Kind::ErrMap { inner, f } => eval(inner, input).map_err(|err| f(err)),
        Kind::FlatMap { inner, f } => run_flat_map(input, inner, &**f),
        Kind::Expect { inner, msg } => run_expect(input, inner, msg),
        Kind::Lazy(cell) => run_lazy(input, cell),
        Kind::Expr(table) => expr::run_expr(table, input),
    }
}

/// Collapse gathered sequence children: NONE-tagged sequences pass the
/// list through, anything else wraps it in a node of that tag.
fn finish_seq(tag: Tag, children: Vec<Ast>, line: u32, col: u32) -> Ast {
    if tag == NONE {
        ast::list(children, line, col)
    } else {
        Ast::node(tag, children, line, col)
    }
}

fn run_seq(input: &mut Input<'_>, tag: Tag, items: &[Parser]) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let (line, col) = (input.line(), input.col());
    let mut children = Vec::new();
    for item in items {
        match eval(item, input) {
            Ok(child) => ast::gather(child, &mut children),
            Err(cause) => {
                let mut err =
                    ParseError::wrap(ErrorKind::SubParserFailure, cause.message.clone(), cause);
                if !children.is_empty() {
                    err = err.with_partial(ast::list(children, line, col));
                }
                input.restore(checkpoint);
                return Err(err);
            }
        }
    }
    Ok(finish_seq(tag, children, line, col))
}

/// Non-committed sequence: no checkpoint, failures propagate untouched.
/// The surrounding combinator is expected to own the backtracking.
fn run_gseq(input: &mut Input<'_>, tag: Tag, items: &[Parser]) -> Result<Ast, ParseError> {
    let (line, col) = (input.line(), input.col());
    let mut children = Vec::new();
    for item in items {
        let child = eval(item, input)?;
        ast::gather(child, &mut children);
    }
    Ok(finish_seq(tag, children, line, col))
}

fn run_multi(input: &mut Input<'_>, tag: Tag, alts: &[Parser]) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let mut last_err = None;
    for alt in alts {
        input.restore(checkpoint);
        match eval(alt, input) {
            Ok(ast) => {
                return Ok(if tag == NONE { ast } else { Ast::unary(tag, ast) });
            }
            Err(err) => last_err = Some(err),
        }
    }
    input.restore(checkpoint);
    Err(last_err.expect("multi combinator requires at least one alternative"))
}

fn run_many(input: &mut Input<'_>, inner: &Parser) -> Result<Ast, ParseError> {
    let (line, col) = (input.line(), input.col());
    let mut children = Vec::new();
    loop {
        let checkpoint = input.checkpoint();
        let before = input.pos();
        match eval(inner, input) {
            Ok(ast) => {
                // Zero-consumption guard: a parser that succeeds without
                // moving the cursor would loop forever.
                if input.pos() == before {
                    input.restore(checkpoint);
                    break;
                }
                ast::gather(ast, &mut children);
            }
            Err(_) => {
                input.restore(checkpoint);
                break;
            }
        }
    }
    Ok(ast::list(children, line, col))
}

fn run_optional(input: &mut Input<'_>, inner: &Parser) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    match eval(inner, input) {
        Ok(ast) => Ok(ast),
        Err(_) => {
            input.restore(checkpoint);
            Ok(Ast::nil())
        }
    }
}

fn run_between(
    input: &mut Input<'_>,
    open: &Parser,
    inner: &Parser,
    close: &Parser,
) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    if let Err(err) = eval(open, input) {
        input.restore(checkpoint);
        return Err(err);
    }
    let value = match eval(inner, input) {
        Ok(value) => value,
        Err(err) => {
            input.restore(checkpoint);
            return Err(err);
        }
    };
    match eval(close, input) {
        Ok(_) => Ok(value),
        Err(cause) => {
            let err = ParseError::wrap(ErrorKind::MissingClose, cause.message.clone(), cause);
            input.restore(checkpoint);
            Err(err)
        }
    }
}

fn run_sep_by(
    input: &mut Input<'_>,
    item: &Parser,
    sep: &Parser,
    allow_trailing: bool,
) -> Result<Ast, ParseError> {
    let entry = input.checkpoint();
    let (line, col) = (input.line(), input.col());
    let mut children = Vec::new();

    match eval(item, input) {
        Ok(first) => ast::gather(first, &mut children),
        Err(_) => {
            input.restore(entry);
            return Ok(Ast::nil());
        }
    }

    loop {
        let checkpoint = input.checkpoint();
        if eval(sep, input).is_err() {
            input.restore(checkpoint);
            break;
        }
        match eval(item, input) {
            Ok(next) => ast::gather(next, &mut children),
            Err(_) => {
                // Rewind to just before the separator; the caller decides
                // whether what follows is acceptable.
                input.restore(checkpoint);
                break;
            }
        }
    }

    if allow_trailing {
        let checkpoint = input.checkpoint();
        if eval(sep, input).is_err() {
            input.restore(checkpoint);
        }
    }

    Ok(ast::list(children, line, col))
}

fn run_chainl1(input: &mut Input<'_>, item: &Parser, op: &Parser) -> Result<Ast, ParseError> {
    let mut left = eval(item, input)?;
    loop {
        let checkpoint = input.checkpoint();
        let op_ast = match eval(op, input) {
            Ok(ast) => ast,
            Err(_) => {
                input.restore(checkpoint);
                break;
            }
        };
        let op_tag = op_ast.tag;
        match eval(item, input) {
            Ok(rhs) => left = Ast::binary(op_tag, left, rhs),
            Err(cause) => {
                let err = ParseError::wrap(
                    ErrorKind::SubParserFailure,
                    "Expected operand after operator in chainl1",
                    cause,
                );
                input.restore(checkpoint);
                return Err(err);
            }
        }
    }
    Ok(left)
}

fn run_pair(
    input: &mut Input<'_>,
    first: &Parser,
    second: &Parser,
    keep_first: bool,
) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let first_ast = match eval(first, input) {
        Ok(ast) => ast,
        Err(err) => {
            input.restore(checkpoint);
            return Err(err);
        }
    };
    match eval(second, input) {
        Ok(second_ast) => Ok(if keep_first { first_ast } else { second_ast }),
        Err(cause) => {
            let err = if keep_first {
                ParseError::wrap(
                    ErrorKind::SubParserFailure,
                    "left combinator failed on second parser",
                    cause,
                )
                .with_partial(first_ast)
            } else {
                cause
            };
            input.restore(checkpoint);
            Err(err)
        }
    }
}

fn run_not(input: &mut Input<'_>, inner: &Parser) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let result = eval(inner, input);
    input.restore(checkpoint);
    match result {
        Ok(_) => Err(ParseError::at(
            input,
            ErrorKind::NotViolation,
            "not combinator failed.",
        )),
        Err(_) => Ok(Ast::nil()),
    }
}

fn run_peek(input: &mut Input<'_>, inner: &Parser) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let result = eval(inner, input);
    input.restore(checkpoint);
    result
}

fn run_flat_map(
    input: &mut Input<'_>,
    inner: &Parser,
    f: &dyn Fn(Ast, &crate::interner::Interner) -> Parser,
) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let first = eval(inner, input)?;
    let next = f(first, input.interner());
    match eval(&next, input) {
        Ok(ast) => Ok(ast),
        Err(err) => {
            input.restore(checkpoint);
            Err(err)
        }
    }
}

fn run_expect(input: &mut Input<'_>, inner: &Parser, msg: &str) -> Result<Ast, ParseError> {
    match eval(inner, input) {
        Ok(ast) => Ok(ast),
        Err(mut cause) => {
            let message = match &cause.unexpected {
                Some(found) => format!("{msg} but found '{found}'"),
                None => msg.to_string(),
            };
            let partial = cause.partial.take();
            let mut err = ParseError::wrap(ErrorKind::WrappedContext, message, cause);
            if let Some(partial) = partial {
                err = err.with_partial(partial);
            }
            Err(err)
        }
    }
}

fn run_lazy(
    input: &mut Input<'_>,
    cell: &std::rc::Weak<std::cell::RefCell<Option<Parser>>>,
) -> Result<Ast, ParseError> {
    let cell = cell
        .upgrade()
        .expect("lazy parser used after its slot was dropped");
    let parser = cell
        .borrow()
        .clone()
        .expect("lazy parser used before its slot was filled");
    eval(&parser, input)
}
