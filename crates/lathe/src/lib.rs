#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Lathe: a parser combinator engine.
//!
//! Grammars are built by composing first-class parser values:
//! - `parser::primitive` - literals, numbers, strings, identifiers
//! - `parser::combine` - sequencing, alternation, repetition, lookahead
//! - `parser::expr` - data-driven operator-precedence expressions
//! - `ast` - the child-vector parse tree and its visitors
//! - `error` - structured failures with cause chains and partial trees
//! - `input` - the byte cursor with line/column tracking
//! - `interner` - symbol interning for leaf payloads
//!
//! A parser tree is evaluated by a recursive interpreter:
//! [`Parser::parse`] consumes bytes from an [`Input`] and yields either an
//! [`Ast`] or a [`ParseError`]. Recursive grammars tie the knot with
//! [`Slot`] and [`lazy`](parser::lazy); operator grammars use
//! [`expr`](parser::expr) with numeric precedence levels.
//!
//! ```
//! use lathe::{Assoc, Fixity, Input, Slot, Tag, NONE};
//! use lathe::{between, expr, expr_insert, integer, lazy, lit, multi};
//!
//! const T_INT: Tag = 1;
//! const T_ADD: Tag = 2;
//! const T_MUL: Tag = 3;
//!
//! let slot = Slot::new();
//! let atom = multi(NONE, vec![
//!     integer(T_INT),
//!     between(lit("("), lazy(&slot), lit(")")),
//! ]);
//! let arith = expr(atom);
//! expr_insert(&arith, 0, T_ADD, Fixity::Infix, Assoc::Left, lit("+"));
//! expr_insert(&arith, 1, T_MUL, Fixity::Infix, Assoc::Left, lit("*"));
//! slot.set(arith.clone());
//!
//! let mut input = Input::new("1+2*3");
//! let ast = arith.parse_complete(&mut input).unwrap();
//! assert_eq!(ast.tag, T_ADD);
//! assert_eq!(ast.children[1].tag, T_MUL);
//! ```

pub mod ast;
pub mod error;
pub mod input;
pub mod interner;
pub mod parser;

#[cfg(test)]
mod input_tests;

pub use ast::{Ast, NONE, Tag, walk, walk_mut};
pub use error::{ErrorKind, ErrorPrinter, ParseError};
pub use input::{Checkpoint, Input};
pub use interner::{Interner, Symbol};
pub use parser::{
    Assoc, Fixity, Parser, Slot, any_char, between, chainl1, char_literal, cident, eoi, errmap,
    expect, expr, expr_altern, expr_insert, flat_map, gseq, integer, keyword_ci, lazy, left, lit,
    lit_ci, many, map, multi, not, optional, peek, real, right, satisfy, sep_by, sep_end_by, seq,
    string_lit, succeed, until,
};

/// Result of evaluating a parser against an input.
pub type ParseResult = std::result::Result<Ast, ParseError>;
