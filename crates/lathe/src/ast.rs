//! Abstract syntax trees produced by parsing.
//!
//! Nodes carry a client-defined [`Tag`], an optional interned symbol, and a
//! vector of children. There is no separate sibling chain and no shared nil
//! sentinel: "no tree here" is the explicit empty value [`Ast::nil`], and a
//! [`NONE`]-tagged symbol-less node with children acts as a transparent
//! sibling list that sequencing combinators splice when gathering results.

use crate::interner::{Interner, Symbol};

/// Client-defined node tag. Tag 0 ([`NONE`]) carries no semantic meaning to
/// the engine; it marks passthrough values and transparent lists.
pub type Tag = u16;

/// The grammar-agnostic passthrough tag.
pub const NONE: Tag = 0;

/// A parse tree node.
///
/// `line`/`col` are fixed at construction from the cursor position where
/// the node's text began.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Ast {
    pub tag: Tag,
    pub sym: Option<Symbol>,
    pub children: Vec<Ast>,
    pub line: u32,
    pub col: u32,
}

impl Ast {
    /// The empty value: no tag, no symbol, no children.
    ///
    /// Primitives that consume input without producing structure (literals,
    /// keywords, `eoi`) return this; sequencing combinators drop it when
    /// gathering children.
    pub fn nil() -> Self {
        Self {
            tag: NONE,
            sym: None,
            children: Vec::new(),
            line: 0,
            col: 0,
        }
    }

    /// Whether this is the empty value.
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.tag == NONE && self.sym.is_none() && self.children.is_empty()
    }

    /// Whether this node is a transparent sibling list (NONE tag, no
    /// symbol, at least one child). Such nodes are spliced, not nested,
    /// when a sequence gathers them.
    #[inline]
    pub fn is_list(&self) -> bool {
        self.tag == NONE && self.sym.is_none() && !self.children.is_empty()
    }

    /// A leaf node with an optional symbol payload.
    pub fn leaf(tag: Tag, sym: Option<Symbol>, line: u32, col: u32) -> Self {
        Self {
            tag,
            sym,
            children: Vec::new(),
            line,
            col,
        }
    }

    /// An interior node with explicit children and position.
    pub fn node(tag: Tag, children: Vec<Ast>, line: u32, col: u32) -> Self {
        Self {
            tag,
            sym: None,
            children,
            line,
            col,
        }
    }

    /// Wrap one subtree under `tag`. The empty value contributes no child;
    /// a transparent list contributes all of its elements. Position is
    /// taken from the wrapped subtree.
    pub fn unary(tag: Tag, child: Ast) -> Self {
        let (line, col) = (child.line, child.col);
        let mut children = Vec::new();
        gather(child, &mut children);
        Self {
            tag,
            sym: None,
            children,
            line,
            col,
        }
    }

    /// Combine two subtrees under `tag`, position taken from the left one.
    pub fn binary(tag: Tag, lhs: Ast, rhs: Ast) -> Self {
        let (line, col) = (lhs.line, lhs.col);
        let mut children = Vec::new();
        gather(lhs, &mut children);
        gather(rhs, &mut children);
        Self {
            tag,
            sym: None,
            children,
            line,
            col,
        }
    }

    /// Resolve this node's symbol against an interner.
    pub fn text<'a>(&self, interner: &'a Interner) -> Option<&'a str> {
        self.sym.and_then(|sym| interner.try_resolve(sym))
    }

    /// Indented tree dump; `tag_name` maps client tags to display names.
    ///
    /// ```text
    /// (ADD
    ///   (INT 1)
    ///   (MUL
    ///     (INT 2)
    ///     (INT 3)))
    /// ```
    pub fn display_with<F>(&self, interner: &Interner, tag_name: F) -> String
    where
        F: Fn(Tag) -> String,
    {
        let mut out = String::new();
        self.display_into(&mut out, interner, &tag_name, 0);
        out
    }

    fn display_into<F>(&self, out: &mut String, interner: &Interner, tag_name: &F, depth: usize)
    where
        F: Fn(Tag) -> String,
    {
        if self.is_nil() {
            return;
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push('(');
        out.push_str(&tag_name(self.tag));
        if let Some(text) = self.text(interner) {
            out.push(' ');
            out.push_str(text);
        }
        for child in &self.children {
            out.push('\n');
            child.display_into(out, interner, tag_name, depth + 1);
        }
        out.push(')');
    }
}

/// Append `ast` to `out`, dropping the empty value and splicing transparent
/// lists. This is how every sequencing combinator collects child results.
pub(crate) fn gather(ast: Ast, out: &mut Vec<Ast>) {
    if ast.is_nil() {
        return;
    }
    if ast.is_list() {
        out.extend(ast.children);
    } else {
        out.push(ast);
    }
}

/// Collapse a gathered child list into a single result: empty becomes the
/// empty value, a single element passes through, anything longer becomes a
/// transparent list positioned at `line`/`col`.
pub(crate) fn list(mut children: Vec<Ast>, line: u32, col: u32) -> Ast {
    match children.len() {
        0 => Ast::nil(),
        1 => children.pop().expect("len checked"),
        _ => Ast::node(NONE, children, line, col),
    }
}

/// Pre-order traversal: the node first, then its children in order. The
/// empty value is skipped entirely.
pub fn walk<'a, F>(ast: &'a Ast, visit: &mut F)
where
    F: FnMut(&'a Ast),
{
    if ast.is_nil() {
        return;
    }
    visit(ast);
    for child in &ast.children {
        walk(child, visit);
    }
}

/// Mutable pre-order traversal. The visitor may rewrite `tag` and `sym`
/// but must leave the tree shape alone.
pub fn walk_mut<F>(ast: &mut Ast, visit: &mut F)
where
    F: FnMut(&mut Ast),
{
    if ast.is_nil() {
        return;
    }
    visit(ast);
    for child in &mut ast.children {
        walk_mut(child, visit);
    }
}
