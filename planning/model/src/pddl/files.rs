use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::pddl::{render_domain, render_problem};
use crate::{Domain, ModelError, Problem};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders the domain and the problem and writes them to the given files.
///
/// Both texts are rendered before anything is written, so that an invalid problem leaves the
/// filesystem untouched. Existing files are replaced.
pub fn write_pddl_files(
    domain: &Domain,
    problem: &Problem,
    domain_file: &Path,
    problem_file: &Path,
) -> Result<(), WriteError> {
    let domain_text = render_domain(domain);
    let problem_text = render_problem(domain, problem)?;
    write_atomically(domain_file, &domain_text)?;
    write_atomically(problem_file, &problem_text)?;
    info!("wrote {} and {}", domain_file.display(), problem_file.display());
    Ok(())
}

/// Writes the content to a temporary file in the destination directory, then moves it over the
/// destination. On failure, the temporary file is removed and the destination is left untouched.
pub fn write_atomically(path: &Path, content: &str) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(content.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    debug!("wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    fn model() -> Model {
        let mut m = Model::new("d", "p").unwrap();
        let thing = m.declare_sort("thing").unwrap();
        let here = m.declare_predicate("here", [thing]).unwrap();
        let t = m.add_object("t0", thing).unwrap();
        m.add_init_fact(m.atom(here, [t]).unwrap()).unwrap();
        m
    }

    #[test]
    fn files_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let dom = dir.path().join("domain.pddl");
        let pb = dir.path().join("p.pddl");
        std::fs::write(&dom, "stale content that is much longer than what will be written").unwrap();

        let m = model();
        m.write_pddl_files(&dom, &pb).unwrap();
        assert_eq!(std::fs::read_to_string(&dom).unwrap(), m.domain_to_pddl());
        assert_eq!(std::fs::read_to_string(&pb).unwrap(), m.problem_to_pddl().unwrap());

        m.write_pddl_files(&dom, &pb).unwrap();
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 2);
    }

    #[test]
    fn invalid_problem_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = model();
        let thing = m.env().sort_by_name("thing").unwrap();
        let here = m.env().predicate_by_name("here").unwrap();
        // object declared by another problem of the same domain
        let mut other = Problem::new("q", &m.domain).unwrap();
        let stray = other.add_object(&mut m.domain.env, "stray", thing).unwrap();
        m.set_goal([m.atom(here, [stray]).unwrap()]).unwrap();

        let dom = dir.path().join("domain.pddl");
        let pb = dir.path().join("p.pddl");
        let err = m.write_pddl_files(&dom, &pb).unwrap_err();
        assert!(matches!(err, WriteError::Model(ModelError::UnknownSymbol { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("domain.pddl");
        let err = write_atomically(&path, "(define)").unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
        assert!(!path.exists());
    }
}
