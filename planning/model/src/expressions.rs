use std::fmt::Display;

use smallvec::SmallVec;

use crate::*;

/// Argument of a predicate or function application.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Object(ObjectRef),
    Param(Param),
}

impl From<ObjectRef> for Term {
    fn from(value: ObjectRef) -> Self {
        Term::Object(value)
    }
}
impl From<Param> for Term {
    fn from(value: Param) -> Self {
        Term::Param(value)
    }
}
impl From<&Param> for Term {
    fn from(value: &Param) -> Self {
        Term::Param(value.clone())
    }
}

impl Term {
    pub fn as_param(&self) -> Option<&Param> {
        match self {
            Term::Param(p) => Some(p),
            Term::Object(_) => None,
        }
    }
}

pub type Args = SmallVec<[Term; 3]>;

/// A predicate applied to a list of terms, e.g. `(at ?obj room1)`.
///
/// Atoms can only be built through [`Environment::atom`] which checks arity and sorts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Atom {
    predicate: PredicateRef,
    args: Args,
}

impl Atom {
    pub fn predicate(&self) -> PredicateRef {
        self.predicate
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    /// Returns the first parameter appearing in the atom, if any.
    pub fn free_param(&self) -> Option<&Param> {
        self.args.iter().find_map(Term::as_param)
    }

    pub fn is_ground(&self) -> bool {
        self.free_param().is_none()
    }
}

/// A numeric function applied to a list of terms, e.g. `(total-cost)` or `(road-length ?from ?to)`.
///
/// Applications can only be built through [`Environment::apply`] which checks arity and sorts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionApp {
    function: FunctionRef,
    args: Args,
}

impl FunctionApp {
    pub fn function(&self) -> FunctionRef {
        self.function
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn free_param(&self) -> Option<&Param> {
        self.args.iter().find_map(Term::as_param)
    }

    pub fn is_ground(&self) -> bool {
        self.free_param().is_none()
    }
}

/// A conjunction of atoms. The empty conjunction is trivially true.
///
/// Atoms are kept in the order they were first seen and appear at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Formula {
    atoms: Vec<Atom>,
}

impl Formula {
    /// The empty conjunction.
    pub fn top() -> Self {
        Self::default()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.atoms.contains(atom)
    }
}

impl From<Atom> for Formula {
    fn from(value: Atom) -> Self {
        Formula { atoms: vec![value] }
    }
}

impl From<&Atom> for Formula {
    fn from(value: &Atom) -> Self {
        Formula {
            atoms: vec![value.clone()],
        }
    }
}

/// Builds the conjunction of the given atoms or formulas.
///
/// Nested conjunctions are flattened into a single list of atoms, in order of first appearance,
/// and duplicated atoms are removed.
pub fn conjunction<F: Into<Formula>>(items: impl IntoIterator<Item = F>) -> Formula {
    let mut seen = hashbrown::HashSet::new();
    let mut atoms = Vec::new();
    for item in items {
        for atom in item.into().atoms {
            if seen.insert(atom.clone()) {
                atoms.push(atom);
            }
        }
    }
    Formula { atoms }
}

impl Environment {
    /// Builds the atom `(pred args...)`, checking that the number of arguments and their sorts
    /// match the declaration of the predicate.
    pub fn atom<T: Into<Term>>(&self, pred: PredicateRef, args: impl IntoIterator<Item = T>) -> Result<Atom, ModelError> {
        let predicate = self.fluents.predicate(pred)?;
        let args: Args = args.into_iter().map(Into::into).collect();
        self.check_application(&predicate.name, &predicate.args, &args)?;
        Ok(Atom { predicate: pred, args })
    }

    /// Builds the application `(fun args...)` of a numeric function, checking that the number of
    /// arguments and their sorts match the declaration of the function.
    pub fn apply<T: Into<Term>>(&self, fun: FunctionRef, args: impl IntoIterator<Item = T>) -> Result<FunctionApp, ModelError> {
        let function = self.fluents.function(fun)?;
        let args: Args = args.into_iter().map(Into::into).collect();
        self.check_application(&function.name, &function.args, &args)?;
        Ok(FunctionApp { function: fun, args })
    }

    fn check_application(&self, symbol: &Sym, expected: &[SortRef], args: &[Term]) -> Result<(), ModelError> {
        if expected.len() != args.len() {
            return Err(ModelError::ArityMismatch {
                symbol: symbol.clone(),
                expected: expected.len(),
                got: args.len(),
            });
        }
        for (position, (arg, &expected)) in args.iter().zip(expected).enumerate() {
            let found = self.sort_of(arg)?;
            if !self.sorts.is_subsort_of(found, expected) {
                return Err(ModelError::SortMismatch {
                    symbol: symbol.clone(),
                    position,
                    expected: self.sorts.name(expected).clone(),
                    found: self.sorts.name(found).clone(),
                });
            }
        }
        Ok(())
    }

    /// Sort of a term. Fails if the term refers to an unknown object or sort.
    pub fn sort_of(&self, term: &Term) -> Result<SortRef, ModelError> {
        match term {
            Term::Object(o) => Ok(self.objects.get(*o)?.sort()),
            Term::Param(p) => {
                self.sorts.get(p.sort)?;
                Ok(p.sort)
            }
        }
    }
}

impl Display for Env<'_, &Term> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.elem {
            Term::Object(o) => write!(f, "{}", self.env.object_name(*o)),
            Term::Param(p) => write!(f, "{p}"),
        }
    }
}

impl Display for Env<'_, &Atom> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.env.predicate_name(self.elem.predicate))?;
        for arg in &self.elem.args {
            write!(f, " {}", self.env / arg)?;
        }
        write!(f, ")")
    }
}

impl Display for Env<'_, &FunctionApp> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.env.function_name(self.elem.function))?;
        for arg in &self.elem.args {
            write!(f, " {}", self.env / arg)?;
        }
        write!(f, ")")
    }
}

/// Renders a conjunction as `(and ...)`, or the bare atom if there is a single one.
impl Display for Env<'_, &Formula> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.elem.atoms() {
            [single] => write!(f, "{}", self.env / single),
            atoms => {
                write!(f, "(and")?;
                for atom in atoms {
                    write!(f, " {}", self.env / atom)?;
                }
                write!(f, ")")
            }
        }
    }
}
