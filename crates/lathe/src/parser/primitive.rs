//! Primitive parsers: the leaves of a parser graph.
//!
//! Constructors build the parser values; the `scan_*` functions are their
//! evaluation bodies, called from the interpreter. None of them skip
//! whitespace — grammars wanting tokenization wrap primitives in their own
//! `token` helper built from `many`/`satisfy`/`left`/`right`.
//!
//! Failure positions are captured where the mismatch was detected, then
//! the cursor is rewound to where the primitive started.

use std::rc::Rc;

use crate::ast::{Ast, Tag};
use crate::error::ParseError;
use crate::input::Input;

use super::{Kind, Parser, core};

/// Consume the literal `s` exactly. Produces the empty value.
pub fn lit(s: impl Into<String>) -> Parser {
    let s = s.into();
    let name = format!("'{s}'");
    Parser::named(Kind::Lit(s), name)
}

/// Consume `s`, comparing ASCII case-insensitively. Produces the empty
/// value.
pub fn lit_ci(s: impl Into<String>) -> Parser {
    let s = s.into();
    let name = format!("'{s}'");
    Parser::named(Kind::LitCi(s), name)
}

/// Case-insensitive keyword with a word-boundary check: the byte after the
/// match, if any, must not be `[A-Za-z0-9_]`.
pub fn keyword_ci(s: impl Into<String>) -> Parser {
    let s = s.into();
    let name = format!("keyword '{s}'");
    Parser::named(Kind::KeywordCi(s), name)
}

/// Consume one byte iff `pred` accepts it; produces a leaf with that byte
/// as its symbol.
pub fn satisfy(pred: impl Fn(u8) -> bool + 'static, tag: Tag) -> Parser {
    Parser::new(Kind::Satisfy {
        pred: Rc::new(pred),
        tag,
    })
}

/// Consume any single byte.
pub fn any_char() -> Parser {
    Parser::named(Kind::AnyChar, "any character")
}

/// Decimal integer with optional leading minus. The symbol is the lexeme
/// verbatim.
pub fn integer(tag: Tag) -> Parser {
    Parser::named(Kind::Integer(tag), "integer")
}

/// Decimal number with a mandatory fractional part and optional signed
/// exponent. `1.`, `1e` and `1e-` are rejected.
pub fn real(tag: Tag) -> Parser {
    Parser::named(Kind::Real(tag), "real number")
}

/// Double-quoted string with C-style escapes. The symbol is the decoded
/// content.
pub fn string_lit(tag: Tag) -> Parser {
    Parser::named(Kind::StringLit(tag), "string literal")
}

/// Single-quoted single character, backslash escapes allowed.
pub fn char_literal(tag: Tag) -> Parser {
    Parser::named(Kind::CharLit(tag), "character literal")
}

/// C-style identifier: letter or underscore, then letters, digits,
/// underscores. Reserved-word filtering is the grammar's job.
pub fn cident(tag: Tag) -> Parser {
    Parser::named(Kind::CIdent(tag), "identifier")
}

/// Consume bytes up to (never including) a point where `delim` would
/// succeed, or to end of input. Produces a leaf with the consumed text.
pub fn until(delim: Parser, tag: Tag) -> Parser {
    let name = format!("until {}", delim.name().unwrap_or("unnamed_parser"));
    Parser::named(Kind::Until { delim, tag }, name)
}

/// Succeed only at end of input. Produces the empty value.
pub fn eoi() -> Parser {
    Parser::named(Kind::Eoi, "end of input")
}

/// Always succeed without consuming, returning a deep copy of `ast`.
/// Useful for injecting operator-tag markers into `chainl1` glue.
pub fn succeed(ast: Ast) -> Parser {
    Parser::new(Kind::Succeed(ast))
}

// --- scanners -------------------------------------------------------------

pub(super) fn scan_lit(input: &mut Input<'_>, s: &str) -> Result<Ast, ParseError> {
    if input.starts_with(s) {
        input.advance(s.len());
        Ok(Ast::nil())
    } else {
        Err(ParseError::unexpected(input, format!("Expected '{s}'")))
    }
}

pub(super) fn scan_lit_ci(input: &mut Input<'_>, s: &str) -> Result<Ast, ParseError> {
    if input.starts_with_ci(s) {
        input.advance(s.len());
        Ok(Ast::nil())
    } else {
        Err(ParseError::unexpected(input, format!("Expected '{s}'")))
    }
}

pub(super) fn scan_keyword_ci(input: &mut Input<'_>, s: &str) -> Result<Ast, ParseError> {
    if !input.starts_with_ci(s) {
        return Err(ParseError::unexpected(
            input,
            format!("Expected keyword '{s}' (case-insensitive)"),
        ));
    }
    let checkpoint = input.checkpoint();
    input.advance(s.len());
    if let Some(next) = input.peek()
        && (next.is_ascii_alphanumeric() || next == b'_')
    {
        let err = ParseError::unexpected(
            input,
            format!("Expected keyword '{s}', not part of identifier"),
        );
        input.restore(checkpoint);
        return Err(err);
    }
    Ok(Ast::nil())
}

pub(super) fn scan_satisfy(
    input: &mut Input<'_>,
    pred: &dyn Fn(u8) -> bool,
    tag: Tag,
) -> Result<Ast, ParseError> {
    let (line, col) = (input.line(), input.col());
    match input.peek() {
        None => Err(ParseError::unexpected(input, "Unexpected end of input")),
        Some(byte) if pred(byte) => {
            input.bump();
            let sym = input.interner_mut().intern_owned((byte as char).to_string());
            Ok(Ast::leaf(tag, Some(sym), line, col))
        }
        Some(_) => Err(ParseError::unexpected(input, "Unexpected character")),
    }
}

fn lexeme(input: &Input<'_>, start: usize) -> String {
    String::from_utf8_lossy(&input.source().as_bytes()[start..input.pos()]).into_owned()
}

fn eat_digits(input: &mut Input<'_>) -> usize {
    let mut count = 0;
    while let Some(byte) = input.peek() {
        if !byte.is_ascii_digit() {
            break;
        }
        input.bump();
        count += 1;
    }
    count
}

pub(super) fn scan_integer(input: &mut Input<'_>, tag: Tag) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let (line, col) = (input.line(), input.col());
    let start = input.pos();

    if input.peek() == Some(b'-') {
        input.bump();
    }
    if eat_digits(input) == 0 {
        let err = ParseError::unexpected(input, "Expected integer");
        input.restore(checkpoint);
        return Err(err);
    }

    let text = lexeme(input, start);
    let sym = input.interner_mut().intern_owned(text);
    Ok(Ast::leaf(tag, Some(sym), line, col))
}

pub(super) fn scan_real(input: &mut Input<'_>, tag: Tag) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let (line, col) = (input.line(), input.col());
    let start = input.pos();

    if input.peek() == Some(b'-') {
        input.bump();
    }
    if eat_digits(input) == 0 {
        let err = ParseError::unexpected(input, "Expected real number");
        input.restore(checkpoint);
        return Err(err);
    }
    if input.peek() != Some(b'.') {
        let err = ParseError::unexpected(input, "Expected real number");
        input.restore(checkpoint);
        return Err(err);
    }
    input.bump();
    if eat_digits(input) == 0 {
        // A dot with no fractional digits is not a real number.
        let err = ParseError::unexpected(input, "Expected digits after decimal point");
        input.restore(checkpoint);
        return Err(err);
    }

    if matches!(input.peek(), Some(b'e' | b'E')) {
        input.bump();
        if matches!(input.peek(), Some(b'+' | b'-')) {
            input.bump();
        }
        if eat_digits(input) == 0 {
            let err = ParseError::unexpected(input, "Expected digits in exponent");
            input.restore(checkpoint);
            return Err(err);
        }
    }

    let text = lexeme(input, start);
    let sym = input.interner_mut().intern_owned(text);
    Ok(Ast::leaf(tag, Some(sym), line, col))
}

fn decode_escape(byte: u8) -> Option<u8> {
    match byte {
        b'n' => Some(b'\n'),
        b't' => Some(b'\t'),
        b'r' => Some(b'\r'),
        b'b' => Some(0x08),
        b'f' => Some(0x0c),
        b'v' => Some(0x0b),
        b'0' => Some(0),
        b'\\' | b'"' | b'\'' | b'/' => Some(byte),
        _ => None,
    }
}

pub(super) fn scan_string(input: &mut Input<'_>, tag: Tag) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let (line, col) = (input.line(), input.col());

    if input.peek() != Some(b'"') {
        return Err(ParseError::unexpected(input, "Expected string literal"));
    }
    input.bump();

    let mut content = Vec::new();
    loop {
        match input.bump() {
            None => {
                let err = ParseError::unexpected(input, "Unterminated string literal");
                input.restore(checkpoint);
                return Err(err);
            }
            Some(b'"') => break,
            Some(b'\\') => match input.bump().and_then(decode_escape) {
                Some(decoded) => content.push(decoded),
                None => {
                    let err =
                        ParseError::unexpected(input, "Invalid escape sequence in string literal");
                    input.restore(checkpoint);
                    return Err(err);
                }
            },
            Some(byte) => content.push(byte),
        }
    }

    let text = String::from_utf8_lossy(&content).into_owned();
    let sym = input.interner_mut().intern_owned(text);
    Ok(Ast::leaf(tag, Some(sym), line, col))
}

pub(super) fn scan_char(input: &mut Input<'_>, tag: Tag) -> Result<Ast, ParseError> {
    let checkpoint = input.checkpoint();
    let (line, col) = (input.line(), input.col());

    if input.peek() != Some(b'\'') {
        return Err(ParseError::unexpected(input, "Expected character literal"));
    }
    input.bump();

    let byte = match input.bump() {
        None | Some(b'\'') => {
            let err = ParseError::unexpected(input, "Empty character literal");
            input.restore(checkpoint);
            return Err(err);
        }
        Some(b'\\') => match input.bump().and_then(decode_escape) {
            Some(decoded) => decoded,
            None => {
                let err =
                    ParseError::unexpected(input, "Invalid escape sequence in character literal");
                input.restore(checkpoint);
                return Err(err);
            }
        },
        Some(byte) => byte,
    };

    if input.peek() != Some(b'\'') {
        let err = ParseError::unexpected(input, "Unterminated character literal");
        input.restore(checkpoint);
        return Err(err);
    }
    input.bump();

    let sym = input.interner_mut().intern_owned((byte as char).to_string());
    Ok(Ast::leaf(tag, Some(sym), line, col))
}

pub(super) fn scan_cident(input: &mut Input<'_>, tag: Tag) -> Result<Ast, ParseError> {
    let (line, col) = (input.line(), input.col());
    let start = input.pos();

    match input.peek() {
        Some(byte) if byte.is_ascii_alphabetic() || byte == b'_' => {
            input.bump();
        }
        _ => return Err(ParseError::unexpected(input, "Expected identifier")),
    }
    while let Some(byte) = input.peek() {
        if !(byte.is_ascii_alphanumeric() || byte == b'_') {
            break;
        }
        input.bump();
    }

    let text = lexeme(input, start);
    let sym = input.interner_mut().intern_owned(text);
    Ok(Ast::leaf(tag, Some(sym), line, col))
}

pub(super) fn scan_until(
    input: &mut Input<'_>,
    delim: &Parser,
    tag: Tag,
) -> Result<Ast, ParseError> {
    let (line, col) = (input.line(), input.col());
    let start = input.pos();

    while !input.at_end() {
        let checkpoint = input.checkpoint();
        let stopped = core::eval(delim, input).is_ok();
        input.restore(checkpoint);
        if stopped {
            break;
        }
        input.bump();
    }

    let text = lexeme(input, start);
    let sym = input.interner_mut().intern_owned(text);
    Ok(Ast::leaf(tag, Some(sym), line, col))
}

pub(super) fn scan_eoi(input: &mut Input<'_>) -> Result<Ast, ParseError> {
    if input.at_end() {
        Ok(Ast::nil())
    } else {
        Err(ParseError::unexpected(input, "Expected end of input"))
    }
}
