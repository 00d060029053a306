use derive_more::derive::Display;

use crate::{SortRef, Sym};

/// Typed parameter of an action. Rendered as a PDDL variable (`?name`).
#[derive(Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("?{name}")]
pub struct Param {
    pub name: Sym,
    pub sort: SortRef,
}

impl Param {
    pub fn new(name: impl Into<Sym>, sort: SortRef) -> Self {
        Self {
            name: name.into(),
            sort,
        }
    }

    pub fn name(&self) -> &Sym {
        &self.name
    }

    pub fn sort(&self) -> SortRef {
        self.sort
    }
}
