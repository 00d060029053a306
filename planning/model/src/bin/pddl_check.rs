use clap::Parser;
use std::path::PathBuf;

use pddl_model::{errors::*, pddl::*};

/// Structural checker for PDDL domain/problem pairs.
///
/// Prints a summary of the domain and problem, reporting any error encountered.
#[derive(Debug, Parser)]
#[command(name = "pddl-check", rename_all = "kebab-case")]
struct Args {
    /// If not set, will look for a `domain.pddl` file in the directory of the
    /// problem file or in the parent directory.
    #[arg(long, short)]
    domain: Option<PathBuf>,
    /// Path to the problem file to check.
    problem: PathBuf,
}

fn main() -> Res<()> {
    let opt = Args::parse();

    let problem_file = &opt.problem;
    if !problem_file.exists() {
        return Err(Message::error(format!(
            "Problem file {} does not exist",
            problem_file.display()
        )));
    }

    let problem_file = problem_file.canonicalize()?;
    let domain_file = match opt.domain {
        Some(name) => name,
        None => find_file::find_domain_of(&problem_file)
            .title("Unable to automatically find the domain file. Consider specifying the domain with the option -d/--domain")?,
    };
    let domain = parse_pddl_domain(input::Input::from_file(&domain_file)?)?;
    let problem = parse_pddl_problem(input::Input::from_file(&problem_file)?)?;
    check_problem(&domain, &problem)?;

    println!("{domain}\n\n{problem}");

    Ok(())
}
