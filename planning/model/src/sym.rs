use crate::errors::{Span, Spanned};
use std::{
    fmt::{Debug, Display},
    sync::LazyLock,
};

use regex::Regex;

/// Symbol in the model, possibly annotated with its origin (file/line)
#[derive(Clone)]
pub struct Sym {
    /// Canonical view of the symbol (lower cased, as PDDL is case insensitive)
    /// The underlying type uses small string optimization to avoid head allocation for short identifiers
    symbol: compact_str::CompactString,
    /// Spelling of the symbol as it was provided, used for display.
    view: compact_str::CompactString,
    /// Origin of the symbol, only present for symbols read from a PDDL file.
    pub span: Option<Span>,
}

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[A-Za-z][A-Za-z0-9_-]*$").unwrap());

impl Sym {
    pub fn new(s: impl AsRef<str>) -> Sym {
        let view = compact_str::CompactString::from(s.as_ref());
        Sym {
            symbol: view.to_lowercase().into(),
            view,
            span: None,
        }
    }

    pub fn with_source(s: impl AsRef<str>, source: Span) -> Sym {
        Sym {
            span: Some(source),
            ..Sym::new(s)
        }
    }

    pub fn canonical_str(&self) -> &str {
        self.symbol.as_str()
    }

    /// Returns true if the symbol can be used as a PDDL name: a letter followed by letters, digits, `-` or `_`.
    pub fn is_identifier(&self) -> bool {
        IDENTIFIER.is_match(&self.view)
    }
}

impl AsRef<str> for Sym {
    fn as_ref(&self) -> &str {
        &self.symbol
    }
}

impl From<&str> for Sym {
    fn from(value: &str) -> Self {
        Sym::new(value)
    }
}

impl From<String> for Sym {
    fn from(value: String) -> Self {
        Sym::new(value)
    }
}

impl From<&String> for Sym {
    fn from(value: &String) -> Self {
        Sym::new(value)
    }
}

impl From<&Sym> for Sym {
    fn from(value: &Sym) -> Self {
        value.clone()
    }
}

impl Spanned for Sym {
    fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }
}

impl Debug for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.view)
    }
}
impl Display for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.view)
    }
}

impl PartialEq for Sym {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl PartialEq<str> for Sym {
    fn eq(&self, other: &str) -> bool {
        self.canonical_str() == other
    }
}
impl PartialEq<&str> for Sym {
    fn eq(&self, other: &&str) -> bool {
        self.canonical_str() == *other
    }
}

impl Eq for Sym {}

impl PartialOrd for Sym {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Sym {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.symbol.cmp(&other.symbol)
    }
}

impl std::hash::Hash for Sym {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state)
    }
}
