//! Reading and writing of PDDL files.

pub mod files;
pub mod find_file;
pub mod input;
pub mod reader;
pub mod sexpr;
pub mod writer;

pub use files::{WriteError, write_atomically, write_pddl_files};
pub use reader::{DomainDef, PddlFeature, ProblemDef, check_problem, parse_pddl_domain, parse_pddl_problem};
pub use sexpr::{SAtom, SExpr, SList};
pub use writer::{WriterOptions, render_domain, render_domain_with, render_problem, requirements};
