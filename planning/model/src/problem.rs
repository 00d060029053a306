use std::fmt::Display;

use tracing::trace;

use crate::*;

/// Optimization criterion of a problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    Minimize(FunctionApp),
    Maximize(FunctionApp),
}

impl Metric {
    pub fn direction(&self) -> &'static str {
        match self {
            Metric::Minimize(_) => "minimize",
            Metric::Maximize(_) => "maximize",
        }
    }

    pub fn target(&self) -> &FunctionApp {
        match self {
            Metric::Minimize(f) | Metric::Maximize(f) => f,
        }
    }
}

impl<'env> Display for Env<'env, &Metric> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {})", self.elem.direction(), self.env / self.elem.target())
    }
}

/// One instance of a domain: objects, initial state, goal and metric.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: Sym,
    pub domain_name: Sym,
    objects: Vec<ObjectRef>,
    init: Vec<Atom>,
    init_values: Vec<(FunctionApp, RealValue)>,
    goal: Formula,
    metric: Option<Metric>,
}

impl Problem {
    /// Creates an empty problem for the domain, where `total-cost` is initially 0 and must be minimized.
    pub fn new(name: impl Into<Sym>, domain: &Domain) -> Result<Self, ModelError> {
        let total_cost = domain.total_cost()?;
        Ok(Problem {
            name: crate::env::valid_name(name)?,
            domain_name: domain.name.clone(),
            objects: Vec::new(),
            init: Vec::new(),
            init_values: vec![(total_cost.clone(), RealValue::from_integer(0))],
            goal: Formula::top(),
            metric: Some(Metric::Minimize(total_cost)),
        })
    }

    /// Declares a new object of this instance. The name must not clash with any other object,
    /// including domain constants.
    pub fn add_object(&mut self, env: &mut Environment, name: impl Into<Sym>, sort: SortRef) -> Result<ObjectRef, ModelError> {
        let obj = env.add_object(name, sort, ObjectScope::Instance)?;
        self.objects.push(obj);
        Ok(obj)
    }

    /// Adds a fact to the initial state. Facts already present are ignored.
    pub fn add_init_fact(&mut self, env: &Environment, fact: Atom) -> Result<(), ModelError> {
        check_ground_atom(env, &fact)?;
        if !self.init.contains(&fact) {
            trace!("init: {}", env / &fact);
            self.init.push(fact);
        }
        Ok(())
    }

    /// Sets the initial value of a numeric fluent, replacing any previous value.
    pub fn set_init_value(&mut self, env: &Environment, fluent: FunctionApp, value: RealValue) -> Result<(), ModelError> {
        check_function_app(env, &fluent)?;
        if !crate::utils::has_decimal_form(value) {
            return Err(ModelError::NonDecimalValue(value));
        }
        if let Some(param) = fluent.free_param() {
            return Err(ModelError::UnboundVariable {
                atom: (env / &fluent).to_string(),
                param: param.name.clone(),
            });
        }
        match self.init_values.iter_mut().find(|(f, _)| *f == fluent) {
            Some((_, v)) => *v = value,
            None => self.init_values.push((fluent, value)),
        }
        Ok(())
    }

    /// Replaces the goal with the conjunction of the given atoms.
    pub fn set_goal(&mut self, env: &Environment, goal: impl IntoIterator<Item = Atom>) -> Result<(), ModelError> {
        let goal = conjunction(goal);
        for atom in goal.atoms() {
            check_ground_atom(env, atom)?;
        }
        self.goal = goal;
        Ok(())
    }

    pub fn set_metric(&mut self, env: &Environment, metric: Metric) -> Result<(), ModelError> {
        check_function_app(env, metric.target())?;
        self.metric = Some(metric);
        Ok(())
    }

    pub fn objects(&self) -> &[ObjectRef] {
        &self.objects
    }

    pub fn init(&self) -> &[Atom] {
        &self.init
    }

    pub fn init_values(&self) -> &[(FunctionApp, RealValue)] {
        &self.init_values
    }

    pub fn goal(&self) -> &Formula {
        &self.goal
    }

    pub fn metric(&self) -> Option<&Metric> {
        self.metric.as_ref()
    }

    /// Checks that every object mentioned in the initial state or the goal is either part of this
    /// problem or a constant of the domain.
    pub fn check_inventory(&self, env: &Environment) -> Result<(), ModelError> {
        let terms = self
            .init
            .iter()
            .chain(self.goal.atoms())
            .flat_map(|a| a.args())
            .chain(self.init_values.iter().flat_map(|(f, _)| f.args()));
        for t in terms {
            if let Term::Object(o) = t {
                let obj = env.objects.get(*o)?;
                if !obj.is_constant() && !self.objects.contains(o) {
                    return Err(ModelError::UnknownSymbol {
                        kind: SymbolKind::Object,
                        name: obj.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Rejects references to symbols that are not part of `env`, e.g. built against another domain.
fn check_known_symbols(env: &Environment, args: &[Term]) -> Result<(), ModelError> {
    for t in args {
        if let Term::Object(o) = t {
            env.objects.get(*o)?;
        }
    }
    Ok(())
}

fn check_function_app(env: &Environment, app: &FunctionApp) -> Result<(), ModelError> {
    env.fluents.function(app.function())?;
    check_known_symbols(env, app.args())
}

fn check_ground_atom(env: &Environment, atom: &Atom) -> Result<(), ModelError> {
    env.fluents.predicate(atom.predicate())?;
    check_known_symbols(env, atom.args())?;
    match atom.free_param() {
        Some(param) => Err(ModelError::UnboundVariable {
            atom: (env / atom).to_string(),
            param: param.name.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> (Domain, SortRef, PredicateRef) {
        let mut domain = Domain::new("test").unwrap();
        let room = domain.env.declare_sort("room").unwrap();
        let at_robby = domain.env.declare_predicate("at-robby", [room]).unwrap();
        (domain, room, at_robby)
    }

    #[test]
    fn defaults_to_minimizing_total_cost() {
        let (domain, _, _) = domain();
        let pb = Problem::new("p", &domain).unwrap();
        let total_cost = domain.total_cost().unwrap();
        assert_eq!(pb.metric(), Some(&Metric::Minimize(total_cost.clone())));
        assert_eq!(pb.init_values(), &[(total_cost, RealValue::from_integer(0))]);
        assert_eq!(pb.domain_name, "test");
    }

    #[test]
    fn init_and_goal_must_be_ground() {
        let (mut domain, room, at_robby) = domain();
        let mut pb = Problem::new("p", &domain).unwrap();
        let r0 = pb.add_object(&mut domain.env, "room0", room).unwrap();
        let env = &domain.env;

        let fact = env.atom(at_robby, [r0]).unwrap();
        pb.add_init_fact(env, fact.clone()).unwrap();
        pb.add_init_fact(env, fact.clone()).unwrap();
        assert_eq!(pb.init().len(), 1);

        let x = Param::new("x", room);
        let open = env.atom(at_robby, [&x]).unwrap();
        assert_eq!(
            pb.add_init_fact(env, open.clone()),
            Err(ModelError::UnboundVariable {
                atom: "(at-robby ?x)".to_string(),
                param: "x".into()
            })
        );
        assert!(pb.set_goal(env, [open]).is_err());
        assert!(pb.goal().is_empty());
    }

    #[test]
    fn init_values_must_be_decimal_numbers() {
        let (domain, _, _) = domain();
        let mut pb = Problem::new("p", &domain).unwrap();
        let total_cost = domain.total_cost().unwrap();
        let third = RealValue::new(1, 3);
        assert_eq!(
            pb.set_init_value(&domain.env, total_cost.clone(), third),
            Err(ModelError::NonDecimalValue(third))
        );
        pb.set_init_value(&domain.env, total_cost.clone(), RealValue::new(5, 4)).unwrap();
        assert_eq!(pb.init_values(), &[(total_cost, RealValue::new(5, 4))]);
    }

    #[test]
    fn last_goal_wins() {
        let (mut domain, room, at_robby) = domain();
        let mut pb = Problem::new("p", &domain).unwrap();
        let r0 = pb.add_object(&mut domain.env, "room0", room).unwrap();
        let r1 = pb.add_object(&mut domain.env, "room1", room).unwrap();
        let env = &domain.env;

        pb.set_goal(env, [env.atom(at_robby, [r0]).unwrap()]).unwrap();
        pb.set_goal(env, [env.atom(at_robby, [r1]).unwrap()]).unwrap();
        assert_eq!(pb.goal().atoms(), &[env.atom(at_robby, [r1]).unwrap()]);
    }

    #[test]
    fn inventory_is_checked_lazily() {
        let (mut domain, room, at_robby) = domain();
        let home = domain.env.declare_object("home", room).unwrap();
        let mut pb = Problem::new("p", &domain).unwrap();
        let mut other = Problem::new("q", &domain).unwrap();
        let away = other.add_object(&mut domain.env, "away", room).unwrap();
        let env = &domain.env;

        pb.add_init_fact(env, env.atom(at_robby, [home]).unwrap()).unwrap();
        assert_eq!(pb.check_inventory(env), Ok(()));

        pb.set_goal(env, [env.atom(at_robby, [away]).unwrap()]).unwrap();
        assert_eq!(
            pb.check_inventory(env),
            Err(ModelError::UnknownSymbol {
                kind: SymbolKind::Object,
                name: "away".to_string()
            })
        );
    }

    #[test]
    fn symbols_of_another_domain_are_rejected() {
        let mut other = Domain::new("other").unwrap();
        let preds = ["p0", "p1", "p2"].map(|p| other.env.declare_predicate(p, []).unwrap());
        let cost = other.env.declare_function("fuel", []).unwrap();
        let foreign = other.env.atom::<Term>(preds[2], []).unwrap();
        let fuel = other.env.apply::<Term>(cost, []).unwrap();

        let (domain, _, _) = domain();
        let env = &domain.env;
        let mut pb = Problem::new("p", &domain).unwrap();
        assert!(matches!(
            pb.add_init_fact(env, foreign.clone()),
            Err(ModelError::UnknownSymbol {
                kind: SymbolKind::Predicate,
                ..
            })
        ));
        assert!(matches!(
            pb.set_goal(env, [foreign]),
            Err(ModelError::UnknownSymbol {
                kind: SymbolKind::Predicate,
                ..
            })
        ));
        assert!(matches!(
            pb.set_init_value(env, fuel.clone(), RealValue::from_integer(3)),
            Err(ModelError::UnknownSymbol {
                kind: SymbolKind::Function,
                ..
            })
        ));
        assert!(matches!(
            pb.set_metric(env, Metric::Minimize(fuel)),
            Err(ModelError::UnknownSymbol {
                kind: SymbolKind::Function,
                ..
            })
        ));
        assert!(pb.init().is_empty());
        assert!(pb.goal().is_empty());
        assert_eq!(pb.init_values().len(), 1);
        assert_eq!(pb.metric(), Some(&Metric::Minimize(domain.total_cost().unwrap())));
        assert!(crate::pddl::render_problem(&domain, &pb).is_ok());
    }
}
