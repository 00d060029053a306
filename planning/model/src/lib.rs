//! Typed builder for classical planning models and their PDDL rendering.
//!
//! A [`Domain`] owns the symbol table ([`Environment`]) and the set of [`Actions`].
//! A [`Problem`] holds the object inventory, initial state, goal and metric of one instance.
//! Both are rendered to PDDL text by the [`pddl::writer`] module, and can be read back
//! with [`pddl::reader`] for structural checks.

#[macro_use]
mod ref_store;

mod actions;
mod effects;
mod env;
pub mod errors;
mod expressions;
mod fluents;
mod model;
mod objects;
mod params;
pub mod pddl;
mod problem;
mod sym;
mod types;
pub(crate) mod utils;

pub use actions::*;
pub use effects::*;
pub use env::*;
pub use errors::{ModelError, SymbolKind};
pub use expressions::*;
pub use fluents::*;
pub use model::*;
pub use objects::*;
pub use params::*;
pub use problem::*;
pub use sym::*;
pub use types::*;

pub use errors::{Message, Res};

/// Exact numeric value, used for action costs and initial values of numeric fluents.
pub type RealValue = num_rational::Rational64;
