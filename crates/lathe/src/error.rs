//! Parse failure values and their rendering.
//!
//! A [`ParseError`] is a structured value: kind, message, source position,
//! the name of the combinator that reported it, a snippet of the
//! unexpected input, an optional cause chain (the enclosing combinators'
//! contributions), and an optional partial AST preserving whatever a
//! sequence managed to build before failing.
//!
//! [`ErrorPrinter`] renders an error against its source as an annotated
//! snippet; without a source it falls back to a plain `line, col: message`
//! listing of the cause chain.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use crate::ast::Ast;
use crate::input::Input;

/// Broad classification of parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A primitive predicate or literal did not match.
    UnexpectedInput,
    /// A bracketing construct did not find its closer.
    MissingClose,
    /// A composite combinator's child failed; always carries a cause.
    SubParserFailure,
    /// Context added by `expect` or `errmap`.
    WrappedContext,
    /// `not` matched something it disallows.
    NotViolation,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnexpectedInput => "unexpected input",
            ErrorKind::MissingClose => "missing closing delimiter",
            ErrorKind::SubParserFailure => "sub-parser failure",
            ErrorKind::WrappedContext => "wrapped context",
            ErrorKind::NotViolation => "not-combinator violation",
        }
    }
}

/// A structured parse failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("line {line}, col {col}: {message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: u32,
    pub col: u32,
    /// Byte offset of the failure, for snippet rendering.
    pub offset: usize,
    /// Name of the combinator that reported the failure, when it had one.
    pub parser_name: Option<String>,
    /// Up to the first few characters of the input that did not match.
    pub unexpected: Option<String>,
    #[source]
    pub cause: Option<Box<ParseError>>,
    /// Best-effort tree built before the failure, when a sequence had one.
    pub partial: Option<Ast>,
}

/// How many characters of remaining input an error keeps as context.
const UNEXPECTED_LEN: usize = 10;

impl ParseError {
    /// An error at the cursor's current position, with no input snippet.
    pub fn at(input: &Input<'_>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: input.line(),
            col: input.col(),
            offset: input.pos(),
            parser_name: None,
            unexpected: None,
            cause: None,
            partial: None,
        }
    }

    /// A primitive failure at the cursor, capturing the unexpected input.
    pub fn unexpected(input: &Input<'_>, message: impl Into<String>) -> Self {
        let mut err = Self::at(input, ErrorKind::UnexpectedInput, message);
        err.unexpected = input.snippet(UNEXPECTED_LEN);
        err
    }

    /// Wrap `cause` with a new message. Position and unexpected snippet are
    /// carried over from the cause, which becomes the `source()`.
    pub fn wrap(kind: ErrorKind, message: impl Into<String>, cause: ParseError) -> Self {
        Self {
            kind,
            message: message.into(),
            line: cause.line,
            col: cause.col,
            offset: cause.offset,
            parser_name: None,
            unexpected: cause.unexpected.clone(),
            cause: Some(Box::new(cause)),
            partial: None,
        }
    }

    pub fn with_parser_name(mut self, name: impl Into<String>) -> Self {
        self.parser_name = Some(name.into());
        self
    }

    pub fn with_partial(mut self, partial: Ast) -> Self {
        self.partial = Some(partial);
        self
    }

    /// This error followed by its transitive causes, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &ParseError> {
        std::iter::successors(Some(self), |err| err.cause.as_deref())
    }

    /// Pretty renderer for this error.
    pub fn printer(&self) -> ErrorPrinter<'_, '_> {
        ErrorPrinter::new(self)
    }

    fn span(&self, source_len: usize) -> Range<usize> {
        let start = self.offset.min(source_len);
        let len = self.unexpected.as_ref().map_or(1, |s| s.len()).max(1);
        let end = (self.offset + len).min(source_len).max(start);
        start..end
    }
}

/// Builder-pattern renderer for a [`ParseError`].
pub struct ErrorPrinter<'e, 's> {
    error: &'e ParseError,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> ErrorPrinter<'e, 's> {
    pub fn new(error: &'e ParseError) -> Self {
        Self {
            error,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(self.error.span(source.len()))
                .label(&self.error.message),
        );

        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        for cause in self.error.chain().skip(1) {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(cause.span(source.len()))
                    .label(&cause.message),
            );
        }

        let report: Vec<Group> = vec![
            Level::ERROR
                .primary_title(&self.error.message)
                .element(snippet),
        ];
        write!(w, "{}", renderer.render(&report))
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, err) in self.error.chain().enumerate() {
            if i > 0 {
                write!(w, "\ncaused by: ")?;
            }
            write!(w, "line {}, col {}: ", err.line, err.col)?;
            if let Some(name) = &err.parser_name {
                write!(w, "In parser '{}': ", name)?;
            }
            write!(w, "{}", err.message)?;
        }
        if let Some(unexpected) = &self.error.unexpected {
            write!(w, "\nUnexpected input: \"{}\"", unexpected)?;
        }
        if self.error.partial.is_some() {
            write!(w, "\nA partial parse tree was preserved.")?;
        }
        Ok(())
    }
}
