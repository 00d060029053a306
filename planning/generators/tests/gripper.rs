use pddl_generators::gripper::{self, GeneratorError, GripperParams};
use pddl_generators::{FixedWords, NameRandomization, SymbolNames};
use pddl_model::pddl::input::Input;
use pddl_model::pddl::{check_problem, parse_pddl_domain, parse_pddl_problem};
use pddl_model::{ModelError, SymbolKind};

fn params(rooms: usize, balls: usize, grippers: usize) -> GripperParams {
    let mut params = GripperParams::new(balls);
    params.rooms = rooms;
    params.grippers = grippers;
    params
}

fn texts(params: &GripperParams, names: &SymbolNames) -> (String, String) {
    let model = gripper::generate(params, names).unwrap();
    (model.domain_to_pddl(), model.problem_to_pddl().unwrap())
}

#[test]
fn baseline_instance() {
    let (dom, pb) = texts(&params(2, 1, 1), &SymbolNames::default());
    assert!(dom.starts_with("(define (domain gripper-generated-domain)"));
    assert!(dom.contains("(:action move"));
    assert!(dom.contains("(:action pick"));
    assert!(dom.contains("(:action drop"));
    assert!(dom.contains(":action-costs"));

    assert!(pb.starts_with("(define (problem problem-problem)"));
    assert!(pb.contains("(:domain gripper-generated-domain)"));
    assert!(pb.contains("(at-robby room0)"));
    assert!(pb.contains("(at ball0 room0)"));
    assert!(pb.contains("(free gripper0)"));
    assert!(pb.contains("(:goal (and (at ball0 room1)))"));
    assert!(pb.contains("(= (total-cost) 0)"));
    assert!(pb.contains("(:metric minimize (total-cost))"));
}

#[test]
fn generation_is_deterministic() {
    for randomize_location in [false, true] {
        let mut p = params(5, 7, 3);
        p.randomize_location = randomize_location;
        assert_eq!(texts(&p, &SymbolNames::default()), texts(&p, &SymbolNames::default()));
    }
}

#[test]
fn seed_changes_locations() {
    let mut p = params(10, 20, 2);
    p.randomize_location = true;
    let (_, first) = texts(&p, &SymbolNames::default());
    p.seed += 1;
    let (_, second) = texts(&p, &SymbolNames::default());
    assert_ne!(first, second);
}

#[test]
fn written_instances_read_back() {
    let mut p = params(4, 6, 3);
    p.randomize_location = true;
    let (dom, pb) = texts(&p, &SymbolNames::default());

    let dom = parse_pddl_domain(Input::from_string(dom)).unwrap();
    let pb = parse_pddl_problem(Input::from_string(pb)).unwrap();
    check_problem(&dom, &pb).unwrap();

    assert_eq!(dom.predicates.len(), 7);
    assert_eq!(dom.actions.len(), 3);
    assert_eq!(pb.objects.len(), 4 + 6 + 3);
    // facts and the initial value of `total-cost`
    assert_eq!(pb.init.len(), 4 + 2 * 6 + 2 * 3 + 1 + 1);
    assert_eq!(pb.goal.len(), 6);
    for i in 0..6 {
        let ball = format!("ball{i}");
        let covered = pb.goal.iter().filter(|g| {
            let g = g.to_string();
            g.starts_with("(at ") && g.split_whitespace().nth(1) == Some(ball.as_str())
        });
        assert_eq!(covered.count(), 1, "goal of {ball}");
    }
}

#[test]
fn randomized_names() {
    let which = NameRandomization {
        objects: true,
        predicates: true,
        actions: true,
    };
    let mut words = FixedWords::new([
        "pebble", "cellar", "claw", // objects
        "round", "place", "hand", "there", "located", "empty", "holds", // predicates
        "walk", "grab", "release", // actions
    ]);
    let names = SymbolNames::randomized(which, &mut words).unwrap();
    let (dom, pb) = texts(&params(2, 2, 1), &names);

    assert!(dom.contains("(:action walk"));
    assert!(dom.contains("(:action grab"));
    assert!(dom.contains("(holds ?obj ?gripper)"));
    assert!(!dom.contains("at-robby"));
    assert!(pb.contains("(there cellar0)"));
    assert!(pb.contains("(located pebble1 cellar0)"));
    assert!(pb.contains("(empty claw0)"));

    let dom = parse_pddl_domain(Input::from_string(dom)).unwrap();
    let pb = parse_pddl_problem(Input::from_string(pb)).unwrap();
    check_problem(&dom, &pb).unwrap();
}

#[test]
fn colliding_words_are_rejected() {
    let which = NameRandomization {
        predicates: true,
        ..Default::default()
    };
    let mut words = FixedWords::new(["same", "same", "a", "b", "c", "d", "e"]);
    let names = SymbolNames::randomized(which, &mut words).unwrap();
    let res = gripper::generate(&params(2, 1, 1), &names);
    assert!(matches!(
        res,
        Err(GeneratorError::Model(ModelError::NameCollision {
            kind: SymbolKind::Predicate,
            ..
        }))
    ));

    let which = NameRandomization {
        actions: true,
        ..Default::default()
    };
    let mut words = FixedWords::new(["", "pick", "drop"]);
    let names = SymbolNames::randomized(which, &mut words).unwrap();
    let res = gripper::generate(&params(2, 1, 1), &names);
    assert!(matches!(res, Err(GeneratorError::Model(ModelError::InvalidName(_)))));
}

#[test]
fn regeneration_replaces_files() {
    let out = tempfile::tempdir().unwrap();
    let p = params(3, 4, 2);
    let model = gripper::generate(&p, &SymbolNames::default()).unwrap();

    let (dom_file, pb_file) = gripper::write_instance(&model, &p, out.path()).unwrap();
    let first = (std::fs::read_to_string(&dom_file).unwrap(), std::fs::read_to_string(&pb_file).unwrap());
    gripper::write_instance(&model, &p, out.path()).unwrap();
    let second = (std::fs::read_to_string(&dom_file).unwrap(), std::fs::read_to_string(&pb_file).unwrap());

    assert_eq!(first, second);
    assert_eq!(first.0, model.domain_to_pddl());
    let dir = out.path().join(gripper::DOMAIN_NAME);
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 2);
    assert!(dir.join("domain.pddl").exists());
    assert!(dir.join("problem.pddl").exists());
}
