//! Data-driven operator-precedence expression parsing.
//!
//! An expression parser is one dispatch kind holding a table: the atom
//! parser plus numeric precedence levels, each an insertion-ordered list
//! of operator entries. Parsing is Pratt-style precedence climbing with
//! the level number bounding recursion.
//!
//! Tie-breaks: within a level, alternatives are tried in reverse insertion
//! order, so operators added later (`<=`, `<>`) shadow their
//! single-character prefixes (`<`); between levels, the highest qualifying
//! level wins. Prefix and infix entries may share a level and a tag — the
//! node arity tells them apart.

use std::cell::RefCell;

use crate::ast::{self, Ast, Tag};
use crate::error::{ErrorKind, ParseError};
use crate::input::Input;

use super::{Kind, Parser, core};

/// Operator arity and placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Infix,
    Prefix,
}

/// Operator associativity. Prefix operators use `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    None,
}

pub(super) struct OpEntry {
    tag: Tag,
    fixity: Fixity,
    assoc: Assoc,
    op: Parser,
}

pub(super) struct Level {
    entries: Vec<OpEntry>,
}

pub(crate) struct ExprTable {
    base: Parser,
    levels: Vec<Level>,
}

/// Create an expression parser around the atom parser `base`. Operators
/// are added afterwards with [`expr_insert`] and [`expr_altern`].
pub fn expr(base: Parser) -> Parser {
    Parser::named(
        Kind::Expr(RefCell::new(ExprTable {
            base,
            levels: Vec::new(),
        })),
        "expression",
    )
}

fn expr_table(p: &Parser) -> &RefCell<ExprTable> {
    match p.kind() {
        Kind::Expr(table) => table,
        _ => panic!("expr_insert/expr_altern called on a non-expression parser"),
    }
}

/// Add the first operator of a precedence group at `level` (0 is lowest).
/// Levels must be inserted densely: `level` may be at most the current
/// level count.
///
/// # Panics
/// Panics when `level` would leave a gap, or when `p` is not an
/// expression parser.
pub fn expr_insert(p: &Parser, level: usize, tag: Tag, fixity: Fixity, assoc: Assoc, op: Parser) {
    let mut table = expr_table(p).borrow_mut();
    if level == table.levels.len() {
        table.levels.push(Level {
            entries: Vec::new(),
        });
    } else if level > table.levels.len() {
        panic!(
            "expression levels must be dense: inserting level {level} with {} levels present",
            table.levels.len()
        );
    }
    table.levels[level].entries.push(OpEntry {
        tag,
        fixity,
        assoc,
        op,
    });
}

/// Add a further operator sharing the precedence (and fixity and
/// associativity) of the most recent [`expr_insert`] at `level`.
///
/// # Panics
/// Panics when `level` has no entries yet.
pub fn expr_altern(p: &Parser, level: usize, tag: Tag, op: Parser) {
    let mut table = expr_table(p).borrow_mut();
    let Some(group) = table.levels.get_mut(level) else {
        panic!("expr_altern at level {level} before any expr_insert there");
    };
    let (fixity, assoc) = {
        let last = group
            .entries
            .last()
            .expect("a present level has at least one entry");
        (last.fixity, last.assoc)
    };
    group.entries.push(OpEntry {
        tag,
        fixity,
        assoc,
        op,
    });
}

pub(super) fn run_expr(
    table: &RefCell<ExprTable>,
    input: &mut Input<'_>,
) -> Result<Ast, ParseError> {
    let table = table.borrow();
    climb(&table, input, 0)
}

fn node_at(tag: Tag, parts: Vec<Ast>, line: u32, col: u32) -> Ast {
    let mut children = Vec::new();
    for part in parts {
        ast::gather(part, &mut children);
    }
    Ast::node(tag, children, line, col)
}

fn climb(table: &ExprTable, input: &mut Input<'_>, min_level: usize) -> Result<Ast, ParseError> {
    let (line, col) = (input.line(), input.col());

    // A matching prefix operator parses its operand at its own level
    // (right-associative) and the result seeds the infix loop below.
    let mut left = None;
    'prefix: for level in (min_level..table.levels.len()).rev() {
        for entry in table.levels[level].entries.iter().rev() {
            if entry.fixity != Fixity::Prefix {
                continue;
            }
            let checkpoint = input.checkpoint();
            if core::eval(&entry.op, input).is_err() {
                input.restore(checkpoint);
                continue;
            }
            match climb(table, input, level) {
                Ok(operand) => {
                    left = Some(node_at(entry.tag, vec![operand], line, col));
                    break 'prefix;
                }
                Err(cause) => {
                    let err = ParseError::wrap(
                        ErrorKind::SubParserFailure,
                        "Expected operand after prefix operator",
                        cause,
                    );
                    input.restore(checkpoint);
                    return Err(err);
                }
            }
        }
    }

    let mut left = match left {
        Some(ast) => ast,
        None => core::eval(&table.base, input)?,
    };

    // Repeatedly take the highest applicable infix operator. A consumed
    // operator with no right operand is a hard failure: rewind to before
    // the operator and surface the error with the accumulated left side
    // as the partial tree.
    'infix: loop {
        for level in (min_level..table.levels.len()).rev() {
            for entry in table.levels[level].entries.iter().rev() {
                if entry.fixity != Fixity::Infix {
                    continue;
                }
                let checkpoint = input.checkpoint();
                if core::eval(&entry.op, input).is_err() {
                    input.restore(checkpoint);
                    continue;
                }
                let next_min = if entry.assoc == Assoc::Left {
                    level + 1
                } else {
                    level
                };
                match climb(table, input, next_min) {
                    Ok(rhs) => {
                        left = node_at(entry.tag, vec![left, rhs], line, col);
                        continue 'infix;
                    }
                    Err(cause) => {
                        let err = ParseError::wrap(
                            ErrorKind::SubParserFailure,
                            "Expected operand after operator",
                            cause,
                        )
                        .with_partial(node_at(entry.tag, vec![left], line, col));
                        input.restore(checkpoint);
                        return Err(err);
                    }
                }
            }
        }
        return Ok(left);
    }
}
