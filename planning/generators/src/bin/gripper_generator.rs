use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pddl_generators::gripper::{self, GripperParams};
use pddl_generators::{NameRandomization, RandomWords};
use tracing::info;

/// Generates instances of the gripper domain, where a robot must carry balls between rooms.
///
/// The domain and problem are written in the `gripper-generated` subdirectory of the output directory.
#[derive(Debug, Clone, Parser)]
#[command(name = "gripper-generator", rename_all = "kebab-case")]
struct Args {
    /// The number of grippers
    #[arg(long, default_value_t = 2)]
    grippers: usize,
    /// The number of balls
    #[arg(long)]
    balls: usize,
    /// The number of rooms
    #[arg(long, default_value_t = 2)]
    rooms: usize,

    /// The seed for random init and goal locations
    #[arg(long, default_value_t = 2022)]
    seed: u64,
    /// Randomize the initial and goal locations of the balls and the robot
    #[arg(long)]
    randomize_location: bool,
    /// Randomize object names
    #[arg(long)]
    randomize_names_objects: bool,
    /// Randomize predicate names
    #[arg(long)]
    randomize_names_predicates: bool,
    /// Randomize action names
    #[arg(long)]
    randomize_names_actions: bool,

    /// Problem name
    #[arg(long, default_value = "problem")]
    problem: String,

    /// Directory in which the `gripper-generated` directory is created
    #[arg(long, env = "GRIPPER_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,
    /// File with one word per line, used instead of the built-in list when randomizing names
    #[arg(long)]
    word_list: Option<PathBuf>,
    /// Seed of the random word source. If absent, randomized names differ on each run.
    #[arg(long)]
    word_seed: Option<u64>,
    /// Also print the domain and problem on the standard output
    #[arg(long)]
    print: bool,

    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: tracing::Level,
}

impl Args {
    fn params(&self) -> GripperParams {
        GripperParams {
            rooms: self.rooms,
            balls: self.balls,
            grippers: self.grippers,
            seed: self.seed,
            randomize_location: self.randomize_location,
            randomize_names: NameRandomization {
                objects: self.randomize_names_objects,
                predicates: self.randomize_names_predicates,
                actions: self.randomize_names_actions,
            },
            problem: self.problem.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // set up logger
    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(std::time::Instant::now()))
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let params = args.params();
    let mut words = match &args.word_list {
        Some(file) => RandomWords::from_file(file, args.word_seed)?,
        None => RandomWords::new(args.word_seed),
    };
    let names = params.symbol_names(&mut words)?;

    let model = gripper::generate(&params, &names)?;
    let (domain_file, problem_file) = gripper::write_instance(&model, &params, &args.output_dir)?;
    info!("domain: {}", domain_file.display());
    info!("problem: {}", problem_file.display());

    if args.print {
        println!("{}", model.domain_to_pddl());
        println!("{}", model.problem_to_pddl()?);
    }
    Ok(())
}
