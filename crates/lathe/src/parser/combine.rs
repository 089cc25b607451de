//! Combinator constructors.
//!
//! These build composite parser values; evaluation lives in `core`. Each
//! constructor assigns a descriptive name built from its children's names,
//! which ends up in [`ParseError::parser_name`](crate::ParseError) when a
//! failure surfaces from inside.

use std::rc::Rc;

use crate::ast::{Ast, Tag};
use crate::error::ParseError;
use crate::interner::Interner;

use super::{Kind, Parser, Slot};

fn display_name(p: &Parser) -> &str {
    p.name().unwrap_or("unnamed_parser")
}

fn joined(items: &[Parser]) -> String {
    items
        .iter()
        .map(display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run `items` in order, gathering non-empty results. A NONE tag returns
/// the gathered list directly; any other tag wraps it. Committed: restores
/// the cursor on failure and attaches the partial list to the error.
pub fn seq(tag: Tag, items: Vec<Parser>) -> Parser {
    let name = format!("sequence of {}", joined(&items));
    Parser::named(Kind::Seq { tag, items }, name)
}

/// As [`seq`], but without the entry checkpoint: on failure the cursor
/// stays wherever the failing child left it. Internal-grade helper for
/// callers that already own a snapshot.
pub fn gseq(tag: Tag, items: Vec<Parser>) -> Parser {
    let name = format!("gseq of {}", joined(&items));
    Parser::named(Kind::GSeq { tag, items }, name)
}

/// First-success alternation, tried left to right. Returns the *last*
/// alternative's error when all fail.
///
/// # Panics
/// Panics when `alts` is empty; an alternation with no alternatives is a
/// grammar construction bug.
pub fn multi(tag: Tag, alts: Vec<Parser>) -> Parser {
    assert!(
        !alts.is_empty(),
        "multi combinator requires at least one alternative"
    );
    let name = format!("any of {}", joined(&alts));
    Parser::named(Kind::Multi { tag, alts }, name)
}

/// Zero or more repetitions, with a guard against parsers that succeed
/// without consuming.
pub fn many(p: Parser) -> Parser {
    let name = format!("many {}", display_name(&p));
    Parser::named(Kind::Many(p), name)
}

/// One or zero: failure becomes the empty value with the cursor restored.
pub fn optional(p: Parser) -> Parser {
    let name = format!("optional {}", display_name(&p));
    Parser::named(Kind::Optional(p), name)
}

/// `open`, then `p`, then `close`; yields `p`'s result and discards the
/// delimiters. A failing closer is reported as a missing-close error.
pub fn between(open: Parser, p: Parser, close: Parser) -> Parser {
    let name = format!(
        "between {} and {}",
        display_name(&open),
        display_name(&close)
    );
    Parser::named(
        Kind::Between {
            open,
            inner: p,
            close,
        },
        name,
    )
}

/// Zero or more `p` separated by `sep`. A failing first `p` yields the
/// empty value; a failing `p` after a consumed `sep` rewinds to just
/// before that `sep`.
pub fn sep_by(p: Parser, sep: Parser) -> Parser {
    let name = format!("{} separated by {}", display_name(&p), display_name(&sep));
    Parser::named(Kind::SepBy { item: p, sep }, name)
}

/// As [`sep_by`], but also permits and consumes one trailing `sep`.
pub fn sep_end_by(p: Parser, sep: Parser) -> Parser {
    let name = format!(
        "{} separated and ended by {}",
        display_name(&p),
        display_name(&sep)
    );
    Parser::named(Kind::SepEndBy { item: p, sep }, name)
}

/// One `p`, then left-folded `(op, p)` repetitions: the op result's tag
/// becomes the tag of a two-child node combining the accumulator and the
/// right operand. A missing operand after a successful `op` is a hard
/// failure.
pub fn chainl1(p: Parser, op: Parser) -> Parser {
    let name = format!("chainl1 of {} with {}", display_name(&p), display_name(&op));
    Parser::named(Kind::Chainl1 { item: p, op }, name)
}

/// Run both, keep the first result.
pub fn left(a: Parser, b: Parser) -> Parser {
    let name = format!("left of {} and {}", display_name(&a), display_name(&b));
    Parser::named(
        Kind::Left {
            first: a,
            second: b,
        },
        name,
    )
}

/// Run both, keep the second result.
pub fn right(a: Parser, b: Parser) -> Parser {
    let name = format!("right of {} and {}", display_name(&a), display_name(&b));
    Parser::named(
        Kind::Right {
            first: a,
            second: b,
        },
        name,
    )
}

/// Negative lookahead: succeeds with the empty value iff `p` fails. Never
/// consumes.
pub fn not(p: Parser) -> Parser {
    let name = format!("not {}", display_name(&p));
    Parser::named(Kind::Not(p), name)
}

/// Positive lookahead: runs `p` and propagates its result, but never
/// consumes.
pub fn peek(p: Parser) -> Parser {
    let name = format!("peek {}", display_name(&p));
    Parser::named(Kind::Peek(p), name)
}

/// Transform the result AST on success.
pub fn map(p: Parser, f: impl Fn(Ast) -> Ast + 'static) -> Parser {
    let name = format!("map over {}", display_name(&p));
    Parser::named(
        Kind::Map {
            inner: p,
            f: Rc::new(f),
        },
        name,
    )
}

/// Transform the error on failure, typically to add context.
pub fn errmap(p: Parser, f: impl Fn(ParseError) -> ParseError + 'static) -> Parser {
    let name = format!("errmap over {}", display_name(&p));
    Parser::named(
        Kind::ErrMap {
            inner: p,
            f: Rc::new(f),
        },
        name,
    )
}

/// Parse `p`, build a new parser from its result, and run that parser
/// once. The interner is supplied so the continuation can inspect the
/// result's symbols.
pub fn flat_map(p: Parser, f: impl Fn(Ast, &Interner) -> Parser + 'static) -> Parser {
    let name = format!("flatMap over {}", display_name(&p));
    Parser::named(
        Kind::FlatMap {
            inner: p,
            f: Rc::new(f),
        },
        name,
    )
}

/// Replace `p`'s failure message with `msg`, appending the unexpected
/// input when the inner error captured one. The inner error survives as
/// the cause.
pub fn expect(p: Parser, msg: impl Into<String>) -> Parser {
    let name = format!("expect {}", display_name(&p));
    Parser::named(
        Kind::Expect {
            inner: p,
            msg: msg.into(),
        },
        name,
    )
}

/// Defer to the parser held by `slot` at evaluation time. This is the
/// recursion point for self-referential grammars: build with `lazy`,
/// fill the slot afterwards.
pub fn lazy(slot: &Slot) -> Parser {
    Parser::new(Kind::Lazy(slot.downgrade()))
}
