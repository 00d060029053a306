//! Generators of benchmark instances for classical planning.
//!
//! Each generator builds a [`pddl_model::Model`] from a few shape parameters and writes it as a
//! pair of PDDL files.

pub mod gripper;
pub mod names;
pub mod words;

pub use gripper::{GeneratorError, GripperParams};
pub use names::{NameRandomization, SymbolNames};
pub use words::{FixedWords, RandomWords, WordSource, WordSourceError};
