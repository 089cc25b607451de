//! Parser values and their interpreter.
//!
//! # Architecture
//!
//! A [`Parser`] is a first-class value: a cheaply cloneable handle over one
//! node of a parser DAG. Each node is a kind from a closed set of
//! primitives and combinators with kind-specific payloads, plus an
//! optional descriptive name that builder functions assign ("sequence of
//! '(', expression, ')'") and failures report.
//!
//! Evaluation is a plain recursive interpreter over the node kinds; there
//! is no pre-compilation. Two backtracking disciplines cover every
//! composite: committed sequences restore their entry checkpoint and
//! propagate the failure (optionally with a partial AST), alternations
//! restore per attempt and try the next candidate.
//!
//! Recursive grammars go through [`Slot`]: a client-held cell that `lazy`
//! parsers dereference at evaluation time. The cell holds the only strong
//! reference cycle-breaking edge, so dropping the client's handles frees
//! the whole graph.

mod combine;
mod core;
mod expr;
mod primitive;

#[cfg(test)]
mod expr_tests;
#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::ast::{Ast, Tag};
use crate::error::ParseError;
use crate::input::Input;
use crate::interner::Interner;

pub use combine::{
    between, chainl1, errmap, expect, flat_map, gseq, lazy, left, many, map, multi, not, optional,
    peek, right, sep_by, sep_end_by, seq,
};
pub use expr::{Assoc, Fixity, expr, expr_altern, expr_insert};
pub use primitive::{
    any_char, char_literal, cident, eoi, integer, keyword_ci, lit, lit_ci, real, satisfy,
    string_lit, succeed, until,
};

use expr::ExprTable;

/// A first-class parser value. Cloning is cheap (reference-counted), so
/// one parser can appear in several places of a grammar.
#[derive(Clone)]
pub struct Parser {
    inner: Rc<Node>,
}

struct Node {
    kind: Kind,
    name: Option<String>,
}

impl Parser {
    pub(crate) fn new(kind: Kind) -> Self {
        Self {
            inner: Rc::new(Node { kind, name: None }),
        }
    }

    pub(crate) fn named(kind: Kind, name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(Node {
                kind,
                name: Some(name.into()),
            }),
        }
    }

    /// The descriptive name assigned by the builder, if any.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Run this parser against the input, leaving the cursor after the
    /// consumed text on success and combinator-defined on failure.
    pub fn parse(&self, input: &mut Input<'_>) -> Result<Ast, ParseError> {
        core::eval(self, input)
    }

    /// As [`Parser::parse`], but additionally require that the whole input
    /// was consumed.
    pub fn parse_complete(&self, input: &mut Input<'_>) -> Result<Ast, ParseError> {
        let ast = self.parse(input)?;
        if input.at_end() {
            Ok(ast)
        } else {
            Err(ParseError::unexpected(
                input,
                "Parser did not consume entire input",
            ))
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("kind", &self.inner.kind.label())
            .field("name", &self.inner.name)
            .finish()
    }
}

/// A settable cell for recursive grammars.
///
/// Build the graph with `lazy(&slot)` wherever the recursive reference is
/// needed, then fill the slot with the finished parser. The slot must stay
/// alive (and filled) while parsing runs; evaluating an unfilled or
/// dropped slot is a logic error and panics.
#[derive(Clone, Default)]
pub struct Slot {
    cell: Rc<RefCell<Option<Parser>>>,
}

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill (or replace) the parser this slot resolves to.
    pub fn set(&self, parser: Parser) {
        *self.cell.borrow_mut() = Some(parser);
    }

    /// The parser currently held, if any.
    pub fn get(&self) -> Option<Parser> {
        self.cell.borrow().clone()
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<Option<Parser>>> {
        Rc::downgrade(&self.cell)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("filled", &self.cell.borrow().is_some())
            .finish()
    }
}

/// The closed set of parser node kinds.
pub(crate) enum Kind {
    Lit(String),
    LitCi(String),
    KeywordCi(String),
    Satisfy {
        pred: Rc<dyn Fn(u8) -> bool>,
        tag: Tag,
    },
    AnyChar,
    Integer(Tag),
    Real(Tag),
    StringLit(Tag),
    CharLit(Tag),
    CIdent(Tag),
    Until {
        delim: Parser,
        tag: Tag,
    },
    Eoi,
    Succeed(Ast),
    Seq {
        tag: Tag,
        items: Vec<Parser>,
    },
    GSeq {
        tag: Tag,
        items: Vec<Parser>,
    },
    Multi {
        tag: Tag,
        alts: Vec<Parser>,
    },
    Many(Parser),
    Optional(Parser),
    Between {
        open: Parser,
        inner: Parser,
        close: Parser,
    },
    SepBy {
        item: Parser,
        sep: Parser,
    },
    SepEndBy {
        item: Parser,
        sep: Parser,
    },
    Chainl1 {
        item: Parser,
        op: Parser,
    },
    Left {
        first: Parser,
        second: Parser,
    },
    Right {
        first: Parser,
        second: Parser,
    },
    Not(Parser),
    Peek(Parser),
    Map {
        inner: Parser,
        f: Rc<dyn Fn(Ast) -> Ast>,
    },
    ErrMap {
        inner: Parser,
        f: Rc<dyn Fn(ParseError) -> ParseError>,
    },
    FlatMap {
        inner: Parser,
        f: Rc<dyn Fn(Ast, &Interner) -> Parser>,
    },
    Expect {
        inner: Parser,
        msg: String,
    },
    Lazy(Weak<RefCell<Option<Parser>>>),
    Expr(RefCell<ExprTable>),
}

impl Kind {
    fn label(&self) -> &'static str {
        match self {
            Kind::Lit(_) => "lit",
            Kind::LitCi(_) => "lit_ci",
            Kind::KeywordCi(_) => "keyword_ci",
            Kind::Satisfy { .. } => "satisfy",
            Kind::AnyChar => "any_char",
            Kind::Integer(_) => "integer",
            Kind::Real(_) => "real",
            Kind::StringLit(_) => "string_lit",
            Kind::CharLit(_) => "char_literal",
            Kind::CIdent(_) => "cident",
            Kind::Until { .. } => "until",
            Kind::Eoi => "eoi",
            Kind::Succeed(_) => "succeed",
            Kind::Seq { .. } => "seq",
            Kind::GSeq { .. } => "gseq",
            Kind::Multi { .. } => "multi",
            Kind::Many(_) => "many",
            Kind::Optional(_) => "optional",
            Kind::Between { .. } => "between",
            Kind::SepBy { .. } => "sep_by",
            Kind::SepEndBy { .. } => "sep_end_by",
            Kind::Chainl1 { .. } => "chainl1",
            Kind::Left { .. } => "left",
            Kind::Right { .. } => "right",
            Kind::Not(_) => "not",
            Kind::Peek(_) => "peek",
            Kind::Map { .. } => "map",
            Kind::ErrMap { .. } => "errmap",
            Kind::FlatMap { .. } => "flat_map",
            Kind::Expect { .. } => "expect",
            Kind::Lazy(_) => "lazy",
            Kind::Expr(_) => "expr",
        }
    }
}
