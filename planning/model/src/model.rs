use std::fmt::Display;
use std::path::Path;

use crate::pddl::{WriteError, WriterOptions};
use crate::*;

/// Name of the numeric fluent accumulating action costs.
pub const TOTAL_COST: &str = "total-cost";

/// A planning domain: its symbol table and its actions.
#[derive(Debug, Clone)]
pub struct Domain {
    pub name: Sym,
    pub env: Environment,
    pub actions: Actions,
    total_cost: FunctionRef,
}

impl Domain {
    /// Creates an empty domain, where only the `object` sort and the `total-cost` function are declared.
    pub fn new(name: impl Into<Sym>) -> Result<Self, ModelError> {
        let name = env::valid_name(name)?;
        let mut env = Environment::new();
        let total_cost = env.declare_function(TOTAL_COST, [])?;
        Ok(Domain {
            name,
            env,
            actions: Actions::default(),
            total_cost,
        })
    }

    /// The `(total-cost)` fluent.
    pub fn total_cost(&self) -> Result<FunctionApp, ModelError> {
        self.env.apply::<Term>(self.total_cost, [])
    }

    pub fn define_action(
        &mut self,
        name: impl Into<Sym>,
        parameters: Vec<Param>,
        precondition: Formula,
        add: impl IntoIterator<Item = Atom>,
        delete: impl IntoIterator<Item = Atom>,
        cost: Cost,
    ) -> Result<ActionRef, ModelError> {
        self.actions
            .define(&self.env, name, parameters, precondition, add, delete, cost)
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Domain {}", self.name)?;
        write!(f, "\n\nPredicates:")?;
        for (_, p) in self.env.fluents.predicates() {
            write!(f, "\n  {p}/{}", p.args.len())?;
        }
        write!(f, "\n\nActions:")?;
        for a in self.actions.iter() {
            write!(f, "\n\n  {}", &self.env / a)?;
        }
        Ok(())
    }
}

/// A domain together with a single problem instance.
///
/// Gathers the operations of [`Domain`] and [`Problem`] behind a single value, which is the
/// usual way of building a benchmark instance.
#[derive(Debug, Clone)]
pub struct Model {
    pub domain: Domain,
    pub problem: Problem,
}

impl Model {
    pub fn new(domain_name: impl Into<Sym>, problem_name: impl Into<Sym>) -> Result<Self, ModelError> {
        let domain = Domain::new(domain_name)?;
        let problem = Problem::new(problem_name, &domain)?;
        Ok(Model { domain, problem })
    }

    pub fn env(&self) -> &Environment {
        &self.domain.env
    }

    pub fn declare_sort(&mut self, name: impl Into<Sym>) -> Result<SortRef, ModelError> {
        self.domain.env.declare_sort(name)
    }

    pub fn declare_predicate(
        &mut self,
        name: impl Into<Sym>,
        args: impl IntoIterator<Item = SortRef>,
    ) -> Result<PredicateRef, ModelError> {
        self.domain.env.declare_predicate(name, args)
    }

    /// Adds an object to the problem instance.
    pub fn add_object(&mut self, name: impl Into<Sym>, sort: SortRef) -> Result<ObjectRef, ModelError> {
        self.problem.add_object(&mut self.domain.env, name, sort)
    }

    pub fn atom<T: Into<Term>>(&self, pred: PredicateRef, args: impl IntoIterator<Item = T>) -> Result<Atom, ModelError> {
        self.domain.env.atom(pred, args)
    }

    pub fn define_action(
        &mut self,
        name: impl Into<Sym>,
        parameters: Vec<Param>,
        precondition: Formula,
        add: impl IntoIterator<Item = Atom>,
        delete: impl IntoIterator<Item = Atom>,
        cost: Cost,
    ) -> Result<ActionRef, ModelError> {
        self.domain.define_action(name, parameters, precondition, add, delete, cost)
    }

    pub fn add_init_fact(&mut self, fact: Atom) -> Result<(), ModelError> {
        self.problem.add_init_fact(&self.domain.env, fact)
    }

    pub fn set_init_value(&mut self, fluent: FunctionApp, value: RealValue) -> Result<(), ModelError> {
        self.problem.set_init_value(&self.domain.env, fluent, value)
    }

    pub fn set_goal(&mut self, goal: impl IntoIterator<Item = Atom>) -> Result<(), ModelError> {
        self.problem.set_goal(&self.domain.env, goal)
    }

    pub fn set_metric(&mut self, metric: Metric) -> Result<(), ModelError> {
        self.problem.set_metric(&self.domain.env, metric)
    }

    pub fn domain_to_pddl(&self) -> String {
        pddl::render_domain(&self.domain)
    }

    pub fn problem_to_pddl(&self) -> Result<String, ModelError> {
        pddl::render_problem(&self.domain, &self.problem)
    }

    /// Renders both the domain and the problem with the given options.
    pub fn to_pddl_with(&self, options: &WriterOptions) -> Result<(String, String), ModelError> {
        let dom = pddl::render_domain_with(&self.domain, options);
        let pb = pddl::render_problem(&self.domain, &self.problem)?;
        Ok((dom, pb))
    }

    /// Writes the domain and problem files, replacing any existing file.
    pub fn write_pddl_files(&self, domain_file: &Path, problem_file: &Path) -> Result<(), WriteError> {
        pddl::write_pddl_files(&self.domain, &self.problem, domain_file, problem_file)
    }
}
