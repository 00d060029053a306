//! Utility to find the domain file of a problem, based on naming conventions.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::{Message, Res, errors::Ctx};

/// Attempts to find the domain file of the given PDDL problem.
///
/// The candidates, looked up in the problem's folder then in its parent folder, are:
///  - `domain.pddl`
///  - `XXX.dom.pddl` for a problem named `XXX.pb.pddl`
///  - `XXX-domain.pddl` and `domain-XXX.pddl` for a problem named `XXX.pddl`
pub fn find_domain_of(problem_file: &Path) -> Res<PathBuf> {
    let mut candidate_domain_files: Vec<PathBuf> = vec![PathBuf::from("domain.pddl")];

    let problem_filename = problem_file
        .file_name()
        .title("Invalid file")?
        .to_str()
        .title("Could not convert file name to utf8")?;

    let pb_suffix = Regex::new("^(.+)\\.pb\\.pddl$")?;
    if let Some(m) = pb_suffix.captures(problem_filename) {
        candidate_domain_files.push(format!("{}.dom.pddl", &m[1]).into());
    }
    let plain = Regex::new("^(.+)\\.pddl$")?;
    if let Some(m) = plain.captures(problem_filename) {
        candidate_domain_files.push(format!("{}-domain.pddl", &m[1]).into());
        candidate_domain_files.push(format!("domain-{}.pddl", &m[1]).into());
    }

    let mut candidate_directories = Vec::with_capacity(2);
    if let Some(curr) = problem_file.parent() {
        candidate_directories.push(curr.to_owned());
        if let Some(parent) = curr.parent() {
            candidate_directories.push(parent.to_owned());
        }
    }

    for f in &candidate_domain_files {
        for dir in &candidate_directories {
            let candidate = dir.join(f);
            if candidate.exists() && candidate != problem_file {
                return Ok(candidate);
            }
        }
    }
    Err(Message::error(format!(
        "Could not find a domain file in the same or parent directory as the problem file. Candidates: {candidate_domain_files:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_next_to_problem() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("instances");
        std::fs::create_dir(&sub).unwrap();
        let pb = sub.join("p01.pddl");
        std::fs::write(&pb, "").unwrap();

        // domain in the parent folder
        let parent_domain = dir.path().join("domain.pddl");
        std::fs::write(&parent_domain, "").unwrap();
        assert_eq!(find_domain_of(&pb).unwrap(), parent_domain);

        // a domain in the same folder takes precedence
        let domain = sub.join("domain.pddl");
        std::fs::write(&domain, "").unwrap();
        assert_eq!(find_domain_of(&pb).unwrap(), domain);
    }

    #[test]
    fn named_domains() {
        let dir = tempfile::tempdir().unwrap();
        let pb = dir.path().join("gripper.pb.pddl");
        let dom = dir.path().join("gripper.dom.pddl");
        std::fs::write(&pb, "").unwrap();
        assert!(find_domain_of(&pb).is_err());
        std::fs::write(&dom, "").unwrap();
        assert_eq!(find_domain_of(&pb).unwrap(), dom);
    }
}
