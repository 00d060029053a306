use tracing::trace;

use crate::*;

/// Symbol table of a planning domain: sorts, objects, predicates and functions.
///
/// Each kind of symbol lives in its own namespace. Declarations are append-only and a failed
/// declaration leaves the table untouched.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    pub sorts: Sorts,
    pub objects: Objects,
    pub fluents: Fluents,
}

/// An element paired with the environment needed to display it, e.g. `env / &atom`.
#[derive(Copy, Clone)]
pub struct Env<'a, T> {
    pub elem: T,
    pub env: &'a Environment,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node<T>(&self, elem: T) -> Env<'_, T> {
        self / elem
    }

    /// Declares a new sort, direct subsort of `object`.
    pub fn declare_sort(&mut self, name: impl Into<Sym>) -> Result<SortRef, ModelError> {
        self.declare_subsort(name, Sorts::OBJECT)
    }

    pub fn declare_subsort(&mut self, name: impl Into<Sym>, parent: SortRef) -> Result<SortRef, ModelError> {
        let name = valid_name(name)?;
        trace!("declaring sort {name}");
        self.sorts.declare(name, parent)
    }

    /// Declares a domain-level object (PDDL constant).
    pub fn declare_object(&mut self, name: impl Into<Sym>, sort: SortRef) -> Result<ObjectRef, ModelError> {
        self.add_object(name, sort, ObjectScope::Constant)
    }

    pub(crate) fn add_object(
        &mut self,
        name: impl Into<Sym>,
        sort: SortRef,
        scope: ObjectScope,
    ) -> Result<ObjectRef, ModelError> {
        let name = valid_name(name)?;
        self.sorts.get(sort)?;
        trace!("declaring object {name} - {}", self.sorts.name(sort));
        self.objects.add_object(name, sort, scope)
    }

    pub fn declare_predicate(
        &mut self,
        name: impl Into<Sym>,
        args: impl IntoIterator<Item = SortRef>,
    ) -> Result<PredicateRef, ModelError> {
        let name = valid_name(name)?;
        let args = self.checked_sorts(args)?;
        trace!("declaring predicate {name}/{}", args.len());
        self.fluents.add_predicate(name, args)
    }

    pub fn declare_function(
        &mut self,
        name: impl Into<Sym>,
        args: impl IntoIterator<Item = SortRef>,
    ) -> Result<FunctionRef, ModelError> {
        let name = valid_name(name)?;
        let args = self.checked_sorts(args)?;
        trace!("declaring function {name}/{}", args.len());
        self.fluents.add_function(name, args)
    }

    fn checked_sorts(&self, sorts: impl IntoIterator<Item = SortRef>) -> Result<ArgSorts, ModelError> {
        let sorts: ArgSorts = sorts.into_iter().collect();
        for &s in &sorts {
            self.sorts.get(s)?;
        }
        Ok(sorts)
    }

    pub fn sort_by_name(&self, name: &str) -> Result<SortRef, ModelError> {
        self.sorts.by_name(name)
    }

    pub fn object_by_name(&self, name: &str) -> Result<ObjectRef, ModelError> {
        self.objects.by_name(name)
    }

    pub fn predicate_by_name(&self, name: &str) -> Result<PredicateRef, ModelError> {
        self.fluents.predicate_by_name(name)
    }

    pub fn function_by_name(&self, name: &str) -> Result<FunctionRef, ModelError> {
        self.fluents.function_by_name(name)
    }

    /// Name of an object. Panics if the object was not declared in this environment.
    pub fn object_name(&self, object: ObjectRef) -> &Sym {
        self.objects.get(object).expect("object from another environment").name()
    }

    pub fn predicate_name(&self, pred: PredicateRef) -> &Sym {
        &self.fluents.predicate(pred).expect("predicate from another environment").name
    }

    pub fn function_name(&self, fun: FunctionRef) -> &Sym {
        &self.fluents.function(fun).expect("function from another environment").name
    }
}

/// Checks that the name is usable as a PDDL identifier.
pub(crate) fn valid_name(name: impl Into<Sym>) -> Result<Sym, ModelError> {
    let name = name.into();
    if name.is_identifier() {
        Ok(name)
    } else {
        Err(ModelError::InvalidName(name.to_string()))
    }
}

impl<'a, T> std::ops::Div<T> for &'a Environment {
    type Output = Env<'a, T>;

    fn div(self, rhs: T) -> Self::Output {
        Env { elem: rhs, env: self }
    }
}

impl<'a, T> std::ops::Div<T> for &'a mut Environment {
    type Output = Env<'a, T>;

    fn div(self, rhs: T) -> Self::Output {
        Env { elem: rhs, env: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_independent() {
        let mut env = Environment::new();
        let ball = env.declare_sort("ball").unwrap();
        // the same name may be used as a sort, a predicate and an object
        let pred = env.declare_predicate("ball", [Sorts::OBJECT]).unwrap();
        let obj = env.declare_object("ball", ball).unwrap();

        assert_eq!(env.sort_by_name("ball"), Ok(ball));
        assert_eq!(env.predicate_by_name("BALL"), Ok(pred));
        assert_eq!(env.object_by_name("ball"), Ok(obj));
        assert!(env.function_by_name("ball").is_err());
    }

    #[test]
    fn failed_declarations_leave_table_unchanged() {
        let mut env = Environment::new();
        let room = env.declare_sort("room").unwrap();
        env.declare_predicate("at-robby", [room]).unwrap();

        let err = env.declare_predicate("At-Robby", [room, room]).unwrap_err();
        assert_eq!(
            err,
            ModelError::NameCollision {
                kind: SymbolKind::Predicate,
                name: "At-Robby".into(),
                previous: "at-robby".into(),
            }
        );
        assert_eq!(env.fluents.num_predicates(), 1);
        let pred = env.predicate_by_name("at-robby").unwrap();
        assert_eq!(env.fluents.predicate(pred).unwrap().args.len(), 1);

        let foreign = SortRef::from_u32(42);
        assert!(matches!(
            env.declare_object("r", foreign),
            Err(ModelError::UnknownSymbol { kind: SymbolKind::Sort, .. })
        ));
        assert!(env.objects.is_empty());
    }

    #[test]
    fn names_must_be_identifiers() {
        let mut env = Environment::new();
        assert_eq!(env.declare_sort(""), Err(ModelError::InvalidName(String::new())));
        assert_eq!(
            env.declare_predicate("two words", []),
            Err(ModelError::InvalidName("two words".to_string()))
        );
        assert!(env.declare_function("1st", []).is_err());
        assert!(env.declare_function("total-cost", []).is_ok());
    }
}
