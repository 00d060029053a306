use derive_more::derive::Display;
use smallvec::SmallVec;

use crate::ref_store::{Named, NamedStore};
use crate::*;

create_ref_type!(PredicateRef);
create_ref_type!(FunctionRef);

/// Sorts of the arguments of a predicate or function.
pub type ArgSorts = SmallVec<[SortRef; 3]>;

/// A boolean state variable, e.g. `(at ?x - ball ?y - room)`.
#[derive(Clone, Debug, Display)]
#[display("{name}")]
pub struct Predicate {
    pub name: Sym,
    pub args: ArgSorts,
}

/// A numeric state variable, e.g. `(total-cost)`.
#[derive(Clone, Debug, Display)]
#[display("{name}")]
pub struct Function {
    pub name: Sym,
    pub args: ArgSorts,
}

impl Named for Predicate {
    fn name(&self) -> &Sym {
        &self.name
    }
}

impl Named for Function {
    fn name(&self) -> &Sym {
        &self.name
    }
}

/// Registry of predicates and numeric functions, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Fluents {
    predicates: NamedStore<PredicateRef, Predicate>,
    functions: NamedStore<FunctionRef, Function>,
}

impl Fluents {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_predicate(&mut self, name: Sym, args: ArgSorts) -> Result<PredicateRef, ModelError> {
        self.predicates
            .push(Predicate {
                name: name.clone(),
                args,
            })
            .map_err(|previous| ModelError::NameCollision {
                kind: SymbolKind::Predicate,
                name,
                previous,
            })
    }

    pub(crate) fn add_function(&mut self, name: Sym, args: ArgSorts) -> Result<FunctionRef, ModelError> {
        self.functions
            .push(Function {
                name: name.clone(),
                args,
            })
            .map_err(|previous| ModelError::NameCollision {
                kind: SymbolKind::Function,
                name,
                previous,
            })
    }

    pub fn predicate(&self, pred: PredicateRef) -> Result<&Predicate, ModelError> {
        self.predicates.get(pred).ok_or_else(|| ModelError::UnknownSymbol {
            kind: SymbolKind::Predicate,
            name: format!("#{}", pred.to_u32()),
        })
    }

    pub fn function(&self, fun: FunctionRef) -> Result<&Function, ModelError> {
        self.functions.get(fun).ok_or_else(|| ModelError::UnknownSymbol {
            kind: SymbolKind::Function,
            name: format!("#{}", fun.to_u32()),
        })
    }

    pub fn predicate_by_name(&self, name: &str) -> Result<PredicateRef, ModelError> {
        self.predicates
            .get_ref(&Sym::from(name))
            .ok_or_else(|| ModelError::UnknownSymbol {
                kind: SymbolKind::Predicate,
                name: name.to_string(),
            })
    }

    pub fn function_by_name(&self, name: &str) -> Result<FunctionRef, ModelError> {
        self.functions
            .get_ref(&Sym::from(name))
            .ok_or_else(|| ModelError::UnknownSymbol {
                kind: SymbolKind::Function,
                name: name.to_string(),
            })
    }

    pub fn predicates(&self) -> impl Iterator<Item = (PredicateRef, &Predicate)> + '_ {
        self.predicates.iter()
    }

    pub fn functions(&self) -> impl Iterator<Item = (FunctionRef, &Function)> + '_ {
        self.functions.iter()
    }

    pub fn num_predicates(&self) -> usize {
        self.predicates.len()
    }

    pub fn num_functions(&self) -> usize {
        self.functions.len()
    }
}
