use std::{
    fmt::{Debug, Display},
    ops::Range,
    sync::Arc,
};

use crate::{RealValue, Sym, pddl::input::Input};
use annotate_snippets::*;
use itertools::Itertools;
use thiserror::Error;

/// Namespaces of the symbol table. Names must be unique within each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SymbolKind {
    #[display("sort")]
    Sort,
    #[display("object")]
    Object,
    #[display("predicate")]
    Predicate,
    #[display("function")]
    Function,
    #[display("action")]
    Action,
    #[display("parameter")]
    Parameter,
}

/// Errors raised while building a model.
///
/// All of them are detected when the faulty element is submitted, before anything is recorded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{kind} `{name}` is already declared (as `{previous}`)")]
    NameCollision { kind: SymbolKind, name: Sym, previous: Sym },
    #[error("unknown {kind}: `{name}`")]
    UnknownSymbol { kind: SymbolKind, name: String },
    #[error("`{symbol}` expects {expected} argument(s) but {got} were given")]
    ArityMismatch { symbol: Sym, expected: usize, got: usize },
    #[error("argument {position} of `{symbol}` has sort `{found}` but a `{expected}` was expected")]
    SortMismatch {
        symbol: Sym,
        position: usize,
        expected: Sym,
        found: Sym,
    },
    #[error("`{atom}` is not ground: parameter `?{param}` is unbound")]
    UnboundVariable { atom: String, param: Sym },
    #[error("action `{action}` both adds and deletes `{atom}`")]
    ConflictingEffect { action: Sym, atom: String },
    #[error("action `{action}` has a negative cost: {cost}")]
    NegativeCost { action: Sym, cost: RealValue },
    #[error("`{0}` is not a valid PDDL name")]
    InvalidName(String),
    #[error("{0} cannot be written as a PDDL number")]
    NonDecimalValue(RealValue),
}

pub type Res<T> = Result<T, Message>;

pub type SrcRange = Range<usize>;

/// A substring of a file, with metadata for displaying (filename, indices, ...)
#[derive(Clone)]
pub struct Span {
    input: Arc<Input>,
    span: SrcRange,
}

impl Span {
    pub fn new(input: Arc<Input>, first: usize, last: usize) -> Self {
        Span {
            input,
            span: first..(last + 1),
        }
    }

    pub fn str(&self) -> &str {
        &self.input.text.as_str()[self.span.clone()]
    }

    pub fn annotate(&self, lvl: Level<'static>, message: impl ToString) -> Annot {
        Annot {
            level: lvl,
            span: self.clone(),
            message: message.to_string(),
        }
    }

    pub fn error(&self, message: impl ToString) -> Annot {
        self.annotate(Level::ERROR, message)
    }

    pub fn info(&self, message: impl ToString) -> Annot {
        self.annotate(Level::INFO, message)
    }

    pub fn invalid(&self, msg: impl ToString) -> Message {
        let msg = msg.to_string();
        if self.span.len() < 40 {
            Message::error(format!("{msg}: {}", self.str())).snippet(self.error(msg))
        } else {
            Message::error(&msg).snippet(self.error(msg))
        }
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[span]")
    }
}

pub trait Spanned: Display {
    fn span(&self) -> Option<&Span>;

    fn span_or_default(&self) -> Span {
        self.span().cloned().unwrap_or_else(|| {
            let text = self.to_string();
            let span = 0..text.len();
            Span {
                input: Arc::new(Input::from_string(text)),
                span,
            }
        })
    }

    fn loc(&self) -> Span {
        self.span_or_default()
    }

    fn invalid(&self, msg: impl ToString) -> Message {
        self.span_or_default().invalid(msg)
    }

    fn error(&self, message: impl ToString) -> Annot {
        self.span_or_default().error(message)
    }

    fn info(&self, message: impl ToString) -> Annot {
        self.span_or_default().info(message)
    }
}

impl<T: Spanned> Spanned for &T {
    fn span(&self) -> Option<&Span> {
        (*self).span()
    }
}

pub struct Annot {
    level: Level<'static>,
    span: Span,
    message: String,
}

impl Annot {
    fn build_annot(&self) -> Annotation<'_> {
        let annotation_kind = if self.level == Level::ERROR {
            AnnotationKind::Primary
        } else {
            AnnotationKind::Context
        };
        annotation_kind.span(self.span.span.clone()).label(&self.message)
    }
}

/// A diagnostic, possibly annotating one or several places of the input files.
pub struct Message {
    level: Level<'static>,
    title: String,
    snippets: Vec<Annot>,
}

impl Message {
    #[cold]
    pub fn new(level: Level<'static>, title: impl ToString) -> Self {
        Self {
            level,
            title: title.to_string(),
            snippets: Vec::new(),
        }
    }

    #[cold]
    pub fn error(title: impl ToString) -> Self {
        Self::new(Level::ERROR, title)
    }

    #[cold]
    pub fn snippet(mut self, snippet: Annot) -> Self {
        self.snippets.push(snippet);
        self
    }

    #[cold]
    pub fn info(self, s: impl Spanned, msg: &str) -> Message {
        let annot = s.info(msg);
        self.snippet(annot)
    }

    #[cold]
    pub fn title(mut self, s: impl ToString) -> Message {
        self.title = s.to_string();
        self
    }

    pub fn title_str(&self) -> &str {
        &self.title
    }

    #[cold]
    pub fn failed<T>(self) -> std::result::Result<T, Message> {
        Err(self)
    }
}

pub trait Ctx<T> {
    fn title(self, error_context: impl Display) -> std::result::Result<T, Message>;
}
impl<T> Ctx<T> for std::result::Result<T, Message> {
    fn title(self, error_context: impl Display) -> Result<T, Message> {
        self.map_err(|e| e.title(error_context))
    }
}
impl<T> Ctx<T> for Option<T> {
    fn title(self, msg: impl Display) -> Result<T, Message> {
        self.ok_or_else(|| Message::error(msg))
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // create a snippet for each source file with all its annotations
        let snippets_by_source = self.snippets.iter().into_group_map_by(|s| s.span.input.clone());
        let snippets = snippets_by_source
            .iter()
            .map(|(source, annots)| {
                let snippet = Snippet::source(&source.text).line_start(1).fold(true);
                let snippet = if let Some(file) = source.source.as_ref() {
                    snippet.path(file.as_str())
                } else {
                    snippet
                };
                snippet.annotations(annots.iter().map(|a| a.build_annot()))
            })
            .collect_vec();

        let renderer = Renderer::styled();
        let disp = self.level.clone().primary_title(&self.title).elements(snippets);
        let disp = renderer.render(&[disp]);
        f.write_str(&disp)
    }
}
impl Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl<E> From<E> for Message
where
    E: core::error::Error,
{
    #[cold]
    fn from(error: E) -> Self {
        Message::error(error)
    }
}
