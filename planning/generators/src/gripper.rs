//! Generator for the gripper domain: a robot with several grippers carries balls between rooms.

use std::path::{Path, PathBuf};

use pddl_model::pddl::WriteError;
use pddl_model::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info_span};

use crate::names::{NameRandomization, SymbolNames};
use crate::words::{WordSource, WordSourceError};

/// Name of the generated domain, also used as the name of the output directory.
pub const DOMAIN_NAME: &str = "gripper-generated";

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Words(#[from] WordSourceError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("invalid instance shape: {0}")]
    InvalidShape(String),
    #[error("could not create directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shape of a gripper instance and the policy used to generate it.
#[derive(Clone, Debug)]
pub struct GripperParams {
    pub rooms: usize,
    pub balls: usize,
    pub grippers: usize,
    /// Seed of the generator choosing the initial and goal rooms.
    pub seed: u64,
    /// If false, all balls start in the first room and must be moved to the second one.
    /// Otherwise, rooms are chosen at random.
    pub randomize_location: bool,
    pub randomize_names: NameRandomization,
    pub problem: String,
}

impl GripperParams {
    pub fn new(balls: usize) -> Self {
        GripperParams {
            rooms: 2,
            balls,
            grippers: 2,
            seed: 2022,
            randomize_location: false,
            randomize_names: NameRandomization::none(),
            problem: "problem".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.rooms == 0 {
            return Err(GeneratorError::InvalidShape("at least one room is needed".to_string()));
        }
        if self.rooms < 2 && !self.randomize_location {
            return Err(GeneratorError::InvalidShape(format!(
                "at least two rooms are needed when locations are not randomized (got {})",
                self.rooms
            )));
        }
        Ok(())
    }

    /// Names to use for this instance, drawing words from the source for the randomized groups.
    pub fn symbol_names(&self, words: &mut dyn WordSource) -> Result<SymbolNames, WordSourceError> {
        SymbolNames::randomized(self.randomize_names, words)
    }

    /// Paths of the domain and problem files, in the `gripper-generated` subdirectory of `out_dir`.
    pub fn output_paths(&self, out_dir: &Path) -> (PathBuf, PathBuf) {
        let dir = out_dir.join(DOMAIN_NAME);
        let domain = dir.join("domain.pddl");
        let problem = dir.join(format!("{}.pddl", self.problem));
        (domain, problem)
    }
}

/// Chooses rooms, either at random or from a fixed position.
struct RoomChooser<'a> {
    rooms: &'a [ObjectRef],
    rng: Option<&'a mut SmallRng>,
}

impl RoomChooser<'_> {
    fn choose(&mut self, default: usize) -> ObjectRef {
        match &mut self.rng {
            Some(rng) => self.rooms[rng.random_range(0..self.rooms.len())],
            None => self.rooms[default],
        }
    }
}

/// Builds the domain and problem of a gripper instance.
pub fn generate(params: &GripperParams, names: &SymbolNames) -> Result<Model, GeneratorError> {
    let _span = info_span!("gripper", rooms = params.rooms, balls = params.balls, grippers = params.grippers).entered();
    params.validate()?;
    let mut rng = SmallRng::seed_from_u64(params.seed);

    let mut model = Model::new(format!("{DOMAIN_NAME}-domain"), format!("{}-problem", params.problem))?;
    let obj = Sorts::OBJECT;

    // predicates
    let p = &names.predicates;
    let room = model.declare_predicate(&p.room, [obj])?;
    let ball = model.declare_predicate(&p.ball, [obj])?;
    let gripper = model.declare_predicate(&p.gripper, [obj])?;
    let at_robby = model.declare_predicate(&p.at_robby, [obj])?;
    let at = model.declare_predicate(&p.at, [obj, obj])?;
    let free = model.declare_predicate(&p.free, [obj])?;
    let carry = model.declare_predicate(&p.carry, [obj, obj])?;

    // actions
    let from = Param::new("from", obj);
    let to = Param::new("to", obj);
    let pre = conjunction([
        model.atom(room, [&from])?,
        model.atom(room, [&to])?,
        model.atom(at_robby, [&from])?,
    ]);
    let add = [model.atom(at_robby, [&to])?];
    let del = [model.atom(at_robby, [&from])?];
    model.define_action(&names.actions.r#move, vec![from, to], pre, add, del, Cost::constant(1))?;

    let o = Param::new("obj", obj);
    let r = Param::new("room", obj);
    let g = Param::new("gripper", obj);
    let pre = conjunction([
        model.atom(ball, [&o])?,
        model.atom(room, [&r])?,
        model.atom(gripper, [&g])?,
        model.atom(at, [&o, &r])?,
        model.atom(at_robby, [&r])?,
        model.atom(free, [&g])?,
    ]);
    let add = [model.atom(carry, [&o, &g])?];
    let del = [model.atom(at, [&o, &r])?, model.atom(free, [&g])?];
    let ball_params = vec![o.clone(), r.clone(), g.clone()];
    model.define_action(&names.actions.pick, ball_params.clone(), pre, add, del, Cost::constant(1))?;

    let pre = conjunction([
        model.atom(ball, [&o])?,
        model.atom(room, [&r])?,
        model.atom(gripper, [&g])?,
        model.atom(carry, [&o, &g])?,
        model.atom(at_robby, [&r])?,
    ]);
    let add = [model.atom(at, [&o, &r])?, model.atom(free, [&g])?];
    let del = [model.atom(carry, [&o, &g])?];
    model.define_action(&names.actions.drop, ball_params, pre, add, del, Cost::constant(1))?;

    // objects, initial state and goal
    let base = &names.objects;
    let mut rooms = Vec::with_capacity(params.rooms);
    for i in 0..params.rooms {
        let r = model.add_object(format!("{}{i}", base.room), obj)?;
        model.add_init_fact(model.atom(room, [r])?)?;
        rooms.push(r);
    }
    let mut chooser = RoomChooser {
        rooms: &rooms,
        rng: params.randomize_location.then_some(&mut rng),
    };

    let mut goals = Vec::with_capacity(params.balls);
    for i in 0..params.balls {
        let b = model.add_object(format!("{}{i}", base.ball), obj)?;
        model.add_init_fact(model.atom(ball, [b])?)?;
        let init_room = chooser.choose(0);
        model.add_init_fact(model.atom(at, [b, init_room])?)?;
        let goal_room = chooser.choose(1);
        goals.push(model.atom(at, [b, goal_room])?);
    }

    for i in 0..params.grippers {
        let g = model.add_object(format!("{}{i}", base.gripper), obj)?;
        model.add_init_fact(model.atom(gripper, [g])?)?;
        model.add_init_fact(model.atom(free, [g])?)?;
    }

    let robot_room = chooser.choose(0);
    model.add_init_fact(model.atom(at_robby, [robot_room])?)?;

    model.set_goal(goals)?;

    debug!(
        "generated {} objects, {} initial facts and {} goals",
        model.problem.objects().len(),
        model.problem.init().len(),
        model.problem.goal().len()
    );
    Ok(model)
}

/// Writes the instance in the `gripper-generated` subdirectory of `out_dir`, creating it if needed.
/// Returns the paths of the domain and problem files.
pub fn write_instance(model: &Model, params: &GripperParams, out_dir: &Path) -> Result<(PathBuf, PathBuf), GeneratorError> {
    let (domain_file, problem_file) = params.output_paths(out_dir);
    let dir = out_dir.join(DOMAIN_NAME);
    std::fs::create_dir_all(&dir).map_err(|source| GeneratorError::Io { path: dir, source })?;
    model.write_pddl_files(&domain_file, &problem_file)?;
    Ok((domain_file, problem_file))
}
