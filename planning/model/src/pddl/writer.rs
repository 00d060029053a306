//! Rendering of domains and problems as PDDL text.
//!
//! Rendering is deterministic: every section lists its elements in declaration order.

use std::fmt::{Display, Formatter, Write};

use itertools::Itertools;

use crate::pddl::PddlFeature;
use crate::utils::DecimalValue;
use crate::*;

const INDENT: &str = "    ";

/// Options controlling the rendering of a domain.
#[derive(Clone, Debug)]
pub struct WriterOptions {
    /// Do not list `:numeric-fluents` in the requirements, even when the domain declares functions.
    ///
    /// Many classical planners accept `(total-cost)` under `:action-costs` but reject the
    /// `:numeric-fluents` requirement.
    pub suppress_numeric_fluents: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            suppress_numeric_fluents: true,
        }
    }
}

/// Requirements of the domain, in the order they are listed.
pub fn requirements(domain: &Domain, options: &WriterOptions) -> Vec<PddlFeature> {
    let mut features = vec![PddlFeature::Typing];
    if domain.actions.iter().any(Action::has_cost) {
        features.push(PddlFeature::ActionCosts);
    }
    if domain.env.fluents.num_functions() > 0 && !options.suppress_numeric_fluents {
        features.push(PddlFeature::NumericFluents);
    }
    features
}

pub fn render_domain(domain: &Domain) -> String {
    render_domain_with(domain, &WriterOptions::default())
}

pub fn render_domain_with(domain: &Domain, options: &WriterOptions) -> String {
    DomainText { domain, options }.to_string()
}

struct DomainText<'a> {
    domain: &'a Domain,
    options: &'a WriterOptions,
}

impl Display for DomainText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_domain(f, self.domain, self.options)
    }
}

fn write_domain(out: &mut impl Write, domain: &Domain, options: &WriterOptions) -> std::fmt::Result {
    let env = &domain.env;
    writeln!(out, "(define (domain {})", domain.name)?;
    writeln!(out, "{INDENT}(:requirements {})", requirements(domain, options).iter().format(" "))?;

    if env.sorts.user_sorts().next().is_some() {
        writeln!(out, "{INDENT}(:types")?;
        for (_, sort) in env.sorts.user_sorts() {
            let parent = sort.parent().unwrap_or(Sorts::OBJECT);
            writeln!(out, "{INDENT}{INDENT}{} - {}", sort.name(), env.sorts.name(parent))?;
        }
        writeln!(out, "{INDENT})")?;
    }

    let constants = env.objects.constants().map(|(o, _)| o).collect_vec();
    if !constants.is_empty() {
        writeln!(out, "{INDENT}(:constants")?;
        write_typed_objects(out, env, &constants)?;
        writeln!(out, "{INDENT})")?;
    }

    writeln!(out, "{INDENT}(:predicates")?;
    for (_, pred) in env.fluents.predicates() {
        writeln!(out, "{INDENT}{INDENT}({}{})", pred.name, TypedArgs(env, &pred.args))?;
    }
    writeln!(out, "{INDENT})")?;

    if env.fluents.num_functions() > 0 {
        writeln!(out, "{INDENT}(:functions")?;
        for (_, fun) in env.fluents.functions() {
            writeln!(out, "{INDENT}{INDENT}({}{}) - number", fun.name, TypedArgs(env, &fun.args))?;
        }
        writeln!(out, "{INDENT})")?;
    }

    for action in domain.actions.iter() {
        writeln!(out)?;
        write_action(out, env, action)?;
    }
    writeln!(out, ")")
}

/// Argument list of a predicate or function declaration: ` ?x1 - room ?x2 - ball`
struct TypedArgs<'a>(&'a Environment, &'a [SortRef]);

impl Display for TypedArgs<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, sort) in self.1.iter().enumerate() {
            write!(f, " ?x{} - {}", i + 1, self.0.sorts.name(*sort))?;
        }
        Ok(())
    }
}

fn write_action(out: &mut impl Write, env: &Environment, action: &Action) -> std::fmt::Result {
    writeln!(out, "{INDENT}(:action {}", action.name)?;
    writeln!(
        out,
        "{INDENT}{INDENT}:parameters ({})",
        action
            .parameters
            .iter()
            .format_with(" ", |p, f| f(&format_args!("{p} - {}", env.sorts.name(p.sort))))
    )?;
    writeln!(out, "{INDENT}{INDENT}:precondition {}", env / &action.precondition)?;
    write!(out, "{INDENT}{INDENT}:effect (and")?;
    for eff in &action.effects {
        write!(out, " {}", env / eff)?;
    }
    if action.has_cost() {
        write!(out, " (increase (total-cost) {})", env / &action.cost)?;
    }
    writeln!(out, ")")?;
    writeln!(out, "{INDENT})")
}

/// Writes one line per sort, e.g. `room0 room1 - room`, sorts being ordered by first appearance.
fn write_typed_objects(out: &mut impl Write, env: &Environment, objects: &[ObjectRef]) -> std::fmt::Result {
    let typed = objects
        .iter()
        .filter_map(|&o| env.objects.get(o).ok().map(|obj| (obj.sort(), o)))
        .collect_vec();
    let sorts = typed.iter().map(|(s, _)| *s).unique().collect_vec();
    let by_sort = typed.into_iter().into_group_map();
    for sort in sorts {
        let names = by_sort[&sort].iter().map(|&o| env.object_name(o)).format(" ");
        writeln!(out, "{INDENT}{INDENT}{names} - {}", env.sorts.name(sort))?;
    }
    Ok(())
}

/// Renders the problem. Fails if the problem mentions an object that is neither declared in the
/// problem nor a constant of the domain.
pub fn render_problem(domain: &Domain, problem: &Problem) -> Result<String, ModelError> {
    problem.check_inventory(&domain.env)?;
    for &o in problem.objects() {
        domain.env.objects.get(o)?;
    }
    Ok(ProblemText { domain, problem }.to_string())
}

struct ProblemText<'a> {
    domain: &'a Domain,
    problem: &'a Problem,
}

impl Display for ProblemText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_problem(f, self.domain, self.problem)
    }
}

fn write_problem(out: &mut impl Write, domain: &Domain, problem: &Problem) -> std::fmt::Result {
    let env = &domain.env;
    writeln!(out, "(define (problem {})", problem.name)?;
    writeln!(out, "{INDENT}(:domain {})", problem.domain_name)?;

    writeln!(out, "{INDENT}(:objects")?;
    write_typed_objects(out, env, problem.objects())?;
    writeln!(out, "{INDENT})")?;

    writeln!(out, "{INDENT}(:init")?;
    for fact in problem.init() {
        writeln!(out, "{INDENT}{INDENT}{}", env / fact)?;
    }
    for (fluent, value) in problem.init_values() {
        writeln!(out, "{INDENT}{INDENT}(= {} {})", env / fluent, DecimalValue(*value))?;
    }
    writeln!(out, "{INDENT})")?;

    write!(out, "{INDENT}(:goal (and")?;
    for atom in problem.goal().atoms() {
        write!(out, " {}", env / atom)?;
    }
    writeln!(out, "))")?;

    if let Some(metric) = problem.metric() {
        writeln!(out, "{INDENT}(:metric {} {})", metric.direction(), env / metric.target())?;
    }
    writeln!(out, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pddl::input::Input;
    use crate::pddl::reader::{check_problem, parse_pddl_domain, parse_pddl_problem};

    /// A two-room domain with a robot moving between rooms.
    fn model() -> Model {
        let mut m = Model::new("rooms", "visit").unwrap();
        let room = m.declare_sort("room").unwrap();
        let at = m.declare_predicate("at-robby", [room]).unwrap();
        let connected = m.declare_predicate("connected", [room, room]).unwrap();
        let from = Param::new("from", room);
        let to = Param::new("to", room);
        let pre = conjunction([m.atom(at, [&from]).unwrap(), m.atom(connected, [&from, &to]).unwrap()]);
        let add = m.atom(at, [&to]).unwrap();
        let del = m.atom(at, [&from]).unwrap();
        m.define_action("move", vec![from, to], pre, [add], [del], Cost::constant(1))
            .unwrap();

        let r0 = m.add_object("room0", room).unwrap();
        let r1 = m.add_object("room1", room).unwrap();
        m.add_init_fact(m.atom(at, [r0]).unwrap()).unwrap();
        m.add_init_fact(m.atom(connected, [r0, r1]).unwrap()).unwrap();
        m.set_goal([m.atom(at, [r1]).unwrap()]).unwrap();
        m
    }

    #[test]
    fn domain_text() {
        let expected = "\
(define (domain rooms)
    (:requirements :typing :action-costs)
    (:types
        room - object
    )
    (:predicates
        (at-robby ?x1 - room)
        (connected ?x1 - room ?x2 - room)
    )
    (:functions
        (total-cost) - number
    )

    (:action move
        :parameters (?from - room ?to - room)
        :precondition (and (at-robby ?from) (connected ?from ?to))
        :effect (and (not (at-robby ?from)) (at-robby ?to) (increase (total-cost) 1))
    )
)
";
        assert_eq!(model().domain_to_pddl(), expected);
    }

    #[test]
    fn problem_text() {
        let expected = "\
(define (problem visit)
    (:domain rooms)
    (:objects
        room0 room1 - room
    )
    (:init
        (at-robby room0)
        (connected room0 room1)
        (= (total-cost) 0)
    )
    (:goal (and (at-robby room1)))
    (:metric minimize (total-cost))
)
";
        assert_eq!(model().problem_to_pddl().unwrap(), expected);
    }

    #[test]
    fn texts_are_written_through_any_writer() {
        let m = model();
        let mut dom = String::new();
        write_domain(&mut dom, &m.domain, &WriterOptions::default()).unwrap();
        assert_eq!(dom, m.domain_to_pddl());
        let mut pb = String::new();
        write_problem(&mut pb, &m.domain, &m.problem).unwrap();
        assert_eq!(pb, m.problem_to_pddl().unwrap());
        assert_eq!(ProblemText { domain: &m.domain, problem: &m.problem }.to_string(), pb);
    }

    #[test]
    fn numeric_fluents_requirement_can_be_enabled() {
        let m = model();
        let options = WriterOptions {
            suppress_numeric_fluents: false,
        };
        let (dom, _) = m.to_pddl_with(&options).unwrap();
        assert!(dom.contains("(:requirements :typing :action-costs :numeric-fluents)"));
        assert!(!m.domain_to_pddl().contains(":numeric-fluents"));
    }

    #[test]
    fn minimal_domain() {
        let mut m = Model::new("empty", "p").unwrap();
        m.define_action("noop", vec![], Formula::top(), [], [], Cost::zero())
            .unwrap();
        let dom = m.domain_to_pddl();
        assert!(dom.contains("(:requirements :typing)\n"));
        assert!(!dom.contains(":types"));
        assert!(!dom.contains(":constants"));
        assert!(dom.contains(":parameters ()\n"));
        assert!(dom.contains(":precondition (and)\n"));
        assert!(dom.contains(":effect (and)\n"));
        assert!(m.problem_to_pddl().unwrap().contains("(:goal (and))"));
    }

    #[test]
    fn constants_and_subsorts() {
        let mut m = Model::new("d", "p").unwrap();
        let place = m.declare_sort("place").unwrap();
        let depot = m.domain.env.declare_subsort("depot", place).unwrap();
        m.domain.env.declare_object("hq", depot).unwrap();
        m.domain.env.declare_object("annex", depot).unwrap();
        let dom = m.domain_to_pddl();
        assert!(dom.contains("(:types\n        place - object\n        depot - place\n    )"));
        assert!(dom.contains("(:constants\n        hq annex - depot\n    )"));
    }

    #[test]
    fn written_text_reads_back() -> Res<()> {
        let m = model();
        let dom = parse_pddl_domain(Input::from_string(m.domain_to_pddl()))?;
        let pb = parse_pddl_problem(Input::from_string(m.problem_to_pddl()?))?;
        check_problem(&dom, &pb)?;
        assert_eq!(dom.predicates.len(), 2);
        assert_eq!(dom.actions.len(), 1);
        assert_eq!(dom.actions[0].eff.len(), 3);
        assert_eq!(pb.objects.len(), 2);
        assert_eq!(pb.init.len(), 3);
        Ok(())
    }
}
