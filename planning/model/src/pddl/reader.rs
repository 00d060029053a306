//! Structural reader for PDDL domains and problems.
//!
//! The reader does not build a [`crate::Domain`]: it only checks that the text is a well-formed
//! STRIPS domain/problem with typing and action costs, and returns a summary of its content.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use itertools::Itertools;

use crate::errors::*;
use crate::pddl::input::*;
use crate::pddl::sexpr::*;
use crate::Sym;

pub fn parse_pddl_domain(dom: Input) -> Res<DomainDef> {
    let dom = Arc::new(dom);
    let expr = parse(dom)?;
    read_domain(&expr).title("Invalid domain: Syntax error")
}

pub fn parse_pddl_problem(pb: Input) -> Res<ProblemDef> {
    let pb = Arc::new(pb);
    let expr = parse(pb)?;
    read_problem(&expr).title("Invalid problem: Syntax error")
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PddlFeature {
    Strips,
    Typing,
    Equality,
    NegativePreconditions,
    DisjunctivePreconditions,
    ConditionalEffects,
    Adl,
    NumericFluents,
    ActionCosts,
}

const FEATURES: [(PddlFeature, &str); 9] = [
    (PddlFeature::Strips, ":strips"),
    (PddlFeature::Typing, ":typing"),
    (PddlFeature::Equality, ":equality"),
    (PddlFeature::NegativePreconditions, ":negative-preconditions"),
    (PddlFeature::DisjunctivePreconditions, ":disjunctive-preconditions"),
    (PddlFeature::ConditionalEffects, ":conditional-effects"),
    (PddlFeature::Adl, ":adl"),
    (PddlFeature::NumericFluents, ":numeric-fluents"),
    (PddlFeature::ActionCosts, ":action-costs"),
];

impl FromStr for PddlFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FEATURES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(f, _)| *f)
            .ok_or_else(|| format!("Unknown feature `{s}`"))
    }
}

impl Display for PddlFeature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (_, name) = FEATURES.iter().find(|(feat, _)| feat == self).ok_or(std::fmt::Error)?;
        write!(f, "{name}")
    }
}

/// A symbol with an optional type annotation, e.g. `?x - room` or `ball0`.
#[derive(Clone, Debug)]
pub struct TypedSymbol {
    pub symbol: Sym,
    pub tpe: Option<Sym>,
}

impl Display for TypedSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.tpe {
            Some(tpe) => write!(f, "{} - {tpe}", self.symbol),
            None => write!(f, "{}", self.symbol),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PredicateDef {
    pub name: Sym,
    pub args: Vec<TypedSymbol>,
    pub source: Option<Span>,
}

impl Display for PredicateDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.args.iter().format(", "))
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: Sym,
    pub args: Vec<TypedSymbol>,
    /// Codomain of the function, e.g. `number`
    pub tpe: Option<Sym>,
    pub source: Option<Span>,
}

impl Display for FunctionDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.args.iter().format(", "))?;
        if let Some(tpe) = &self.tpe {
            write!(f, " -> {tpe}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ActionDef {
    pub name: Sym,
    pub args: Vec<TypedSymbol>,
    /// Conjuncts of the precondition
    pub pre: Vec<SExpr>,
    /// Conjuncts of the effect
    pub eff: Vec<SExpr>,
    /// Span covering the entire action definition
    pub span: Span,
}

impl Display for ActionDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.args.iter().format(", "))
    }
}

#[derive(Debug, Clone)]
pub struct DomainDef {
    pub name: Sym,
    pub features: Vec<PddlFeature>,
    pub types: Vec<TypedSymbol>,
    pub constants: Vec<TypedSymbol>,
    pub predicates: Vec<PredicateDef>,
    pub functions: Vec<FunctionDef>,
    pub actions: Vec<ActionDef>,
}

impl DomainDef {
    pub fn predicate(&self, name: &Sym) -> Option<&PredicateDef> {
        self.predicates.iter().find(|p| &p.name == name)
    }

    pub fn function(&self, name: &Sym) -> Option<&FunctionDef> {
        self.functions.iter().find(|p| &p.name == name)
    }

    fn has_type(&self, tpe: &Sym) -> bool {
        tpe == "object" || self.types.iter().any(|t| &t.symbol == tpe)
    }
}

impl Display for DomainDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "# Domain : {}", self.name)?;
        write!(f, "\n# Requirements \n  {}", self.features.iter().format(" "))?;
        write!(f, "\n# Types \n  {}", self.types.iter().format("\n  "))?;
        write!(f, "\n# Constants \n  {}", self.constants.iter().format("\n  "))?;
        write!(f, "\n# Predicates \n  {}", self.predicates.iter().format("\n  "))?;
        write!(f, "\n# Functions \n  {}", self.functions.iter().format("\n  "))?;
        write!(f, "\n# Actions \n  {}", self.actions.iter().format("\n  "))
    }
}

#[derive(Clone, Debug)]
pub enum MetricDef {
    Minimize(SExpr),
    Maximize(SExpr),
}

impl Display for MetricDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricDef::Minimize(e) => write!(f, "minimize {e}"),
            MetricDef::Maximize(e) => write!(f, "maximize {e}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProblemDef {
    pub problem_name: Sym,
    pub domain_name: Sym,
    pub objects: Vec<TypedSymbol>,
    pub init: Vec<SExpr>,
    /// Conjuncts of the goal
    pub goal: Vec<SExpr>,
    pub metric: Option<MetricDef>,
}

impl Display for ProblemDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "# Problem {} (domain: {})", self.problem_name, self.domain_name)?;
        write!(f, "\n# Objects \n  {}", self.objects.iter().format("\n  "))?;
        write!(f, "\n# Init \n  {}", self.init.iter().format("\n  "))?;
        write!(f, "\n# Goal \n  {}", self.goal.iter().format("\n  "))?;
        if let Some(metric) = &self.metric {
            write!(f, "\n# Metric \n  {metric}")?;
        }
        Ok(())
    }
}

/// Consume a typed list of symbols
///  - (a - loc b - loc c - loc) : symbols a, b and c of type loc
///  - (a b c - loc)  : symbols a, b and c of type loc
///  - (a b c) : symbols a b and c without type
pub fn consume_typed_symbols(input: &mut ListIter) -> Res<Vec<TypedSymbol>> {
    let mut args = Vec::with_capacity(input.len());
    let mut untyped: Vec<Sym> = Vec::new();
    while !input.is_empty() {
        let next = input.pop_atom()?;
        if next.canonical_str() == "-" {
            let tpe = input.pop_atom().title("expected a type name after `-`")?;
            if untyped.is_empty() {
                return Err(next.invalid("type annotation without any symbol"));
            }
            args.extend(untyped.drain(..).map(|symbol| TypedSymbol {
                symbol,
                tpe: Some(tpe.clone()),
            }));
        } else {
            untyped.push(next.clone());
        }
    }
    args.extend(untyped.drain(..).map(|symbol| TypedSymbol { symbol, tpe: None }));
    Ok(args)
}

/// given a term type T, parse one of `T, () or (and T T ...)
fn parse_conjunction<T>(e: &SExpr, item_parser: impl Fn(&SExpr) -> Res<T>) -> Res<Vec<T>> {
    match e {
        SExpr::Atom(_) => Ok(vec![item_parser(e)?]),
        SExpr::List(l) => {
            if let Some(conjuncts) = e.as_application("and") {
                conjuncts.iter().map(item_parser).collect()
            } else if l.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(vec![item_parser(e)?])
            }
        }
    }
}

/// Accepts a single literal `(pred args...)` or `(not (pred args...))`, or a numeric update.
fn parse_literal(e: &SExpr) -> Res<SExpr> {
    let mut list = e.as_list_iter().ok_or_else(|| e.invalid("Expected a literal"))?;
    let head = list.pop_atom()?;
    if head.canonical_str() == "not" {
        let inner = list.pop()?;
        parse_literal(inner)?;
    }
    for arg in list {
        if head.canonical_str() == "not" {
            return Err(arg.invalid("Unexpected argument of negation"));
        }
        if arg.as_atom().is_none() && !matches!(head.canonical_str(), "increase" | "decrease" | "=") {
            return Err(arg.invalid("Expected an object or a parameter"));
        }
    }
    Ok(e.clone())
}

fn read_domain(dom: &SExpr) -> Res<DomainDef> {
    let dom = &mut dom.as_list_iter().ok_or_else(|| dom.invalid("Expected a list"))?;

    dom.pop_known_atom("define")?;

    // extract the name of the domain, of the form `(domain XXX)`
    let mut domain_name_decl = dom.pop_list()?.iter();
    domain_name_decl.pop_known_atom("domain")?;
    let name = domain_name_decl.pop_atom().title("missing name of domain")?.clone();

    let mut res = DomainDef {
        name,
        features: vec![],
        types: vec![],
        constants: vec![],
        predicates: vec![],
        functions: vec![],
        actions: vec![],
    };

    for current in dom {
        // a property associates a key (e.g. `:predicates`) to a value or a sequence of values
        let mut property = current
            .as_list_iter()
            .ok_or_else(|| current.invalid("expected a property list"))?;

        match property.pop_atom()?.canonical_str() {
            ":requirements" => {
                for feature in property {
                    let feature = feature
                        .as_atom()
                        .ok_or_else(|| feature.invalid("Expected feature name but got list"))?;
                    let f = PddlFeature::from_str(feature.canonical_str()).map_err(|e| feature.invalid(e))?;
                    res.features.push(f);
                }
            }
            ":types" => {
                if !res.types.is_empty() {
                    return Err(current.invalid("More than one ':types' section definition"));
                }
                res.types = consume_typed_symbols(&mut property)?;
            }
            ":constants" => {
                if !res.constants.is_empty() {
                    return Err(current.invalid("More than one ':constants' section definition"));
                }
                res.constants = consume_typed_symbols(&mut property)?;
            }
            ":predicates" => {
                for pred in property {
                    let mut pred = pred.as_list_iter().ok_or_else(|| pred.invalid("Expected a list"))?;
                    let name = pred.pop_atom()?.clone();
                    let args = consume_typed_symbols(&mut pred)?;
                    res.predicates.push(PredicateDef {
                        name,
                        args,
                        source: Some(pred.loc()),
                    });
                }
            }
            ":functions" => {
                while let Ok(func) = property.pop() {
                    // element is necessarily a function name and parameters, e.g., (battery ?r)
                    let mut func = func.as_list_iter().ok_or_else(|| func.invalid("Expected a list"))?;
                    let name = func.pop_atom()?.clone();
                    let args = consume_typed_symbols(&mut func)?;

                    // optional type annotation, e.g., (total-cost) - number
                    let tpe = if property.peek().is_some_and(|a| a.is_atom("-")) {
                        property.pop_known_atom("-")?;
                        Some(property.pop_atom().title("expected a type")?.clone())
                    } else {
                        None
                    };
                    res.functions.push(FunctionDef {
                        name,
                        args,
                        tpe,
                        source: Some(func.loc()),
                    });
                }
            }
            ":action" => {
                let name = property.pop_atom()?.clone();
                let mut args = None;
                let mut pre = Vec::new();
                let mut eff = Vec::new();
                while !property.is_empty() {
                    let key_expr = property.pop_atom()?;
                    let value = property.pop().title(format!("No value associated to {key_expr}"))?;
                    match key_expr.canonical_str() {
                        ":parameters" => {
                            if args.is_some() {
                                return Err(key_expr.invalid("Duplicated ':parameters' tag is not allowed"));
                            }
                            let mut value = value
                                .as_list_iter()
                                .ok_or_else(|| value.invalid("Expected a parameter list"))?;
                            args = Some(consume_typed_symbols(&mut value)?);
                        }
                        ":precondition" => pre.extend(parse_conjunction(value, parse_literal)?),
                        ":effect" => eff.extend(parse_conjunction(value, parse_literal)?),
                        _ => return Err(key_expr.invalid("unsupported key in action")),
                    }
                }
                res.actions.push(ActionDef {
                    name,
                    args: args.unwrap_or_default(),
                    pre,
                    eff,
                    span: current.loc(),
                })
            }
            _ => return Err(current.invalid("unsupported block")),
        }
    }
    Ok(res)
}

fn read_problem(problem: &SExpr) -> Res<ProblemDef> {
    let mut problem = problem
        .as_list_iter()
        .ok_or_else(|| problem.invalid("Expected a list"))?;
    problem.pop_known_atom("define")?;

    let mut problem_name = problem
        .pop_list()
        .title("Expected problem name definition of the form '(problem XXXXXX)'")?
        .iter();
    problem_name.pop_known_atom("problem")?;
    let problem_name = problem_name.pop_atom()?.clone();

    let mut domain_name_def = problem.pop_list()?.iter();
    domain_name_def.pop_known_atom(":domain")?;
    let domain_name = domain_name_def.pop_atom()?.clone();

    let mut res = ProblemDef {
        problem_name,
        domain_name,
        objects: vec![],
        init: vec![],
        goal: vec![],
        metric: None,
    };

    for current in problem {
        // a property associates a key (e.g. `:objects`) to a value or a sequence of values
        let mut property = current
            .as_list_iter()
            .ok_or_else(|| current.invalid("Expected a list"))?;
        match property.pop_atom()?.canonical_str() {
            ":objects" => {
                res.objects.extend(consume_typed_symbols(&mut property)?);
            }
            ":init" => {
                for fact in property {
                    res.init.push(parse_literal(fact)?);
                }
            }
            ":goal" => {
                let goal = property.pop()?;
                res.goal = parse_conjunction(goal, parse_literal)?;
                if let Some(extra) = property.next() {
                    return Err(extra.invalid("Expected a single goal formula"));
                }
            }
            ":metric" => {
                let qualifier = property.pop_atom()?;
                match qualifier.canonical_str() {
                    "minimize" => res.metric = Some(MetricDef::Minimize(property.pop()?.clone())),
                    "maximize" => res.metric = Some(MetricDef::Maximize(property.pop()?.clone())),
                    _ => return Err(qualifier.invalid("expected `maximize` or `minimize`")),
                }
            }
            _ => return Err(current.invalid("unsupported block")),
        }
    }

    Ok(res)
}

/// Checks that the problem only refers to the types, predicates, functions and objects declared
/// in the domain or problem, with the right number of arguments.
pub fn check_problem(dom: &DomainDef, pb: &ProblemDef) -> Res<()> {
    if dom.name != pb.domain_name {
        return Err(pb
            .domain_name
            .invalid("Problem refers to another domain")
            .info(&dom.name, "domain declared here"));
    }
    for o in dom.constants.iter().chain(&pb.objects) {
        if let Some(tpe) = &o.tpe {
            if !dom.has_type(tpe) {
                return Err(tpe.invalid("Unknown type"));
            }
        }
    }
    let is_object = |s: &Sym| dom.constants.iter().chain(&pb.objects).any(|o| &o.symbol == s);
    let check_atom = |e: &SExpr| -> Res<()> {
        let mut list = e.as_list_iter().ok_or_else(|| e.invalid("Expected an atom"))?;
        let head = list.pop_atom()?;
        let expected = match head.canonical_str() {
            "not" | "=" => return check_numeric_or_negated(dom, e, &is_object),
            _ => dom
                .predicate(head)
                .ok_or_else(|| head.invalid("Unknown predicate"))?
                .args
                .len(),
        };
        if list.len() != expected {
            return Err(e.invalid(format!("Expected {expected} argument(s)")));
        }
        for arg in list {
            let arg = arg.as_atom().ok_or_else(|| arg.invalid("Expected an object"))?;
            if !is_object(arg) {
                return Err(arg.invalid("Unknown object"));
            }
        }
        Ok(())
    };
    for e in pb.init.iter().chain(&pb.goal) {
        check_atom(e)?;
    }
    Ok(())
}

fn check_numeric_or_negated(dom: &DomainDef, e: &SExpr, is_object: &dyn Fn(&Sym) -> bool) -> Res<()> {
    if let Some([inner]) = e.as_application("not") {
        return Err(inner.invalid("Negative literals are not supported in the initial state or goal"));
    }
    let Some([fluent, value]) = e.as_application("=") else {
        return Err(e.invalid("Expected `(= (function args...) value)`"));
    };
    let mut fluent = fluent
        .as_list_iter()
        .ok_or_else(|| fluent.invalid("Expected a function application"))?;
    let head = fluent.pop_atom()?;
    let fun = dom.function(head).ok_or_else(|| head.invalid("Unknown function"))?;
    if fluent.len() != fun.args.len() {
        return Err(head.invalid(format!("Expected {} argument(s)", fun.args.len())));
    }
    for arg in fluent {
        match arg.as_atom() {
            Some(a) if is_object(a) => {}
            _ => return Err(arg.invalid("Unknown object")),
        }
    }
    let value = value.as_atom().ok_or_else(|| value.invalid("Expected a number"))?;
    if crate::utils::parse_decimal(value.canonical_str()).is_none() {
        return Err(value.invalid("Expected a number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "
    ; a small logistics domain
    (define (domain Delivery)
        (:requirements :typing :action-costs)
        (:types truck place - object depot - place)
        (:constants hq - depot)
        (:predicates (at ?t - truck ?p - place) (road ?from ?to - place))
        (:functions (total-cost) - number)
        (:action drive
            :parameters (?t - truck ?from ?to - place)
            :precondition (and (at ?t ?from) (road ?from ?to))
            :effect (and (not (at ?t ?from)) (at ?t ?to) (increase (total-cost) 1))
        )
    )";

    const PROBLEM: &str = "
    (define (problem deliver-1)
        (:domain delivery)
        (:objects t0 - truck p0 p1 - place)
        (:init (at t0 hq) (road hq p0) (road p0 p1) (= (total-cost) 0))
        (:goal (and (at t0 p1)))
        (:metric minimize (total-cost))
    )";

    #[test]
    fn read_domain_summary() -> Res<()> {
        let dom = parse_pddl_domain(Input::from_string(DOMAIN))?;
        assert_eq!(dom.name, "delivery");
        assert_eq!(dom.features, vec![PddlFeature::Typing, PddlFeature::ActionCosts]);
        let types = dom.types.iter().map(ToString::to_string).collect_vec();
        assert_eq!(types, vec!["truck - object", "place - object", "depot - place"]);
        assert_eq!(dom.constants.len(), 1);
        assert_eq!(dom.predicates.iter().map(|p| p.args.len()).collect_vec(), vec![2, 2]);
        assert_eq!(dom.functions[0].tpe.as_ref().map(|t| t.to_string()), Some("number".to_string()));

        let drive = &dom.actions[0];
        assert_eq!(drive.args.len(), 3);
        assert_eq!(drive.pre.len(), 2);
        assert_eq!(drive.eff.len(), 3);
        assert_eq!(drive.eff[0].to_string(), "(not (at ?t ?from))");
        Ok(())
    }

    #[test]
    fn read_and_check_problem() -> Res<()> {
        let dom = parse_pddl_domain(Input::from_string(DOMAIN))?;
        let pb = parse_pddl_problem(Input::from_string(PROBLEM))?;
        assert_eq!(pb.problem_name, "deliver-1");
        assert_eq!(pb.objects.len(), 3);
        assert_eq!(pb.init.len(), 4);
        assert_eq!(pb.goal.len(), 1);
        assert!(matches!(pb.metric, Some(MetricDef::Minimize(_))));
        check_problem(&dom, &pb)
    }

    #[test]
    fn detect_inconsistent_problems() -> Res<()> {
        let dom = parse_pddl_domain(Input::from_string(DOMAIN))?;
        let check = |text: &str| -> Res<()> {
            let pb = parse_pddl_problem(Input::from_string(text))?;
            check_problem(&dom, &pb)
        };
        let err = check("(define (problem p) (:domain other))").unwrap_err();
        assert!(err.title_str().starts_with("Problem refers to another domain"));
        let err = check("(define (problem p) (:domain delivery) (:objects t - truck) (:init (at t p9)))").unwrap_err();
        assert!(err.title_str().starts_with("Unknown object"));
        let err = check("(define (problem p) (:domain delivery) (:init (parked hq)))").unwrap_err();
        assert!(err.title_str().starts_with("Unknown predicate"));
        let err = check("(define (problem p) (:domain delivery) (:init (road hq)))").unwrap_err();
        assert!(err.title_str().starts_with("Expected 2 argument(s)"));
        let err = check("(define (problem p) (:domain delivery) (:objects x - boat))").unwrap_err();
        assert!(err.title_str().starts_with("Unknown type"));
        Ok(())
    }

    #[test]
    fn syntax_errors_are_localized() {
        let err = parse_pddl_domain(Input::from_string("(define (domain d) (:requirements :teleportation))")).unwrap_err();
        assert_eq!(err.title_str(), "Invalid domain: Syntax error");
        assert!(err.to_string().contains("Unknown feature `:teleportation`"));
        assert!(parse_pddl_problem(Input::from_string("(define (problem p))")).is_err());
    }
}
