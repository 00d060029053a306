use std::fmt::Display;

use crate::{env::Env, utils::DecimalValue, *};

/// Unconditional STRIPS effect of an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Effect {
    Add(Atom),
    Delete(Atom),
}

impl Effect {
    pub fn atom(&self) -> &Atom {
        match self {
            Effect::Add(a) | Effect::Delete(a) => a,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Effect::Delete(_))
    }
}

impl<'env> Display for Env<'env, &Effect> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.elem {
            Effect::Add(atom) => write!(f, "{}", self.env / atom),
            Effect::Delete(atom) => write!(f, "(not {})", self.env / atom),
        }
    }
}

/// Amount by which an action increases the `total-cost` accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cost {
    Constant(RealValue),
    /// Cost given by the value of a numeric fluent, e.g. `(road-length ?from ?to)`
    Additive(FunctionApp),
}

impl Cost {
    pub fn constant(value: i64) -> Cost {
        Cost::Constant(RealValue::from_integer(value))
    }

    /// A null constant cost. Such a cost is not rendered.
    pub fn zero() -> Cost {
        Cost::constant(0)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Cost::Constant(c) if *c == RealValue::from_integer(0))
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost::zero()
    }
}

impl From<i64> for Cost {
    fn from(value: i64) -> Self {
        Cost::constant(value)
    }
}

impl From<FunctionApp> for Cost {
    fn from(value: FunctionApp) -> Self {
        Cost::Additive(value)
    }
}

impl<'env> Display for Env<'env, &Cost> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.elem {
            Cost::Constant(c) => write!(f, "{}", DecimalValue(*c)),
            Cost::Additive(app) => write!(f, "{}", self.env / app),
        }
    }
}
