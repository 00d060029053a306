use std::fmt::Display;

use itertools::Itertools;
use tracing::debug;

use crate::env::valid_name;
use crate::ref_store::{Named, NamedStore};
use crate::*;

create_ref_type!(ActionRef);

/// A STRIPS action with a conjunctive precondition, unconditional effects and a cost.
#[derive(Debug, Clone)]
pub struct Action {
    pub name: Sym,
    pub parameters: Vec<Param>,
    pub precondition: Formula,
    /// Delete effects first, then add effects.
    pub effects: Vec<Effect>,
    pub cost: Cost,
}

impl Action {
    pub fn add_effects(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.effects.iter().filter(|e| !e.is_delete()).map(Effect::atom)
    }

    pub fn delete_effects(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.effects.iter().filter(|e| e.is_delete()).map(Effect::atom)
    }

    pub fn has_cost(&self) -> bool {
        !self.cost.is_zero()
    }
}

impl Named for Action {
    fn name(&self) -> &Sym {
        &self.name
    }
}

impl<'env> Display for Env<'env, &Action> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let a = self.elem;
        write!(f, "{}({})", a.name, a.parameters.iter().format(", "))?;
        write!(f, "\n    pre: {}", self.env / &a.precondition)?;
        for eff in &a.effects {
            write!(f, "\n    eff: {}", self.env / eff)?;
        }
        if a.has_cost() {
            write!(f, "\n    cost: {}", self.env / &a.cost)?;
        }
        Ok(())
    }
}

/// All actions of a domain, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Actions {
    actions: NamedStore<ActionRef, Action>,
}

impl Actions {
    /// Validates a new action against the environment and records it.
    ///
    /// Each action has its own parameter scope: atoms may only refer to domain constants and to
    /// the parameters given here.
    pub fn define(
        &mut self,
        env: &Environment,
        name: impl Into<Sym>,
        parameters: Vec<Param>,
        precondition: Formula,
        add: impl IntoIterator<Item = Atom>,
        delete: impl IntoIterator<Item = Atom>,
        cost: Cost,
    ) -> Result<ActionRef, ModelError> {
        let name = valid_name(name)?;
        if let Some(previous) = self.actions.get_ref(&name) {
            return Err(ModelError::NameCollision {
                kind: SymbolKind::Action,
                previous: self.actions.get(previous).map_or(name.clone(), |a| a.name.clone()),
                name,
            });
        }

        {
            let mut seen: hashbrown::HashMap<&Sym, &Param> = hashbrown::HashMap::new();
            for p in &parameters {
                if !p.name.is_identifier() {
                    return Err(ModelError::InvalidName(p.name.to_string()));
                }
                if let Some(previous) = seen.insert(&p.name, p) {
                    return Err(ModelError::NameCollision {
                        kind: SymbolKind::Parameter,
                        name: p.name.clone(),
                        previous: previous.name.clone(),
                    });
                }
                env.sorts.get(p.sort)?;
            }
        }
        let scope = ActionScope { env, parameters: &parameters };

        let add: Vec<Atom> = add.into_iter().collect();
        let delete: Vec<Atom> = delete.into_iter().collect();
        for atom in precondition.atoms().iter().chain(&add).chain(&delete) {
            scope.check_atom(atom)?;
        }
        for atom in &add {
            if delete.contains(atom) {
                return Err(ModelError::ConflictingEffect {
                    action: name,
                    atom: (env / atom).to_string(),
                });
            }
        }
        match &cost {
            Cost::Constant(c) if *c < RealValue::from_integer(0) => {
                return Err(ModelError::NegativeCost { action: name, cost: *c });
            }
            Cost::Constant(c) if !crate::utils::has_decimal_form(*c) => {
                return Err(ModelError::NonDecimalValue(*c));
            }
            Cost::Constant(_) => {}
            Cost::Additive(app) => {
                env.fluents.function(app.function())?;
                scope.check_terms(app.args())?;
            }
        }

        let effects = conjunction(delete)
            .atoms()
            .iter()
            .cloned()
            .map(Effect::Delete)
            .chain(conjunction(add).atoms().iter().cloned().map(Effect::Add))
            .collect_vec();
        debug!(
            "defined action {name} with {} parameter(s) and {} effect(s)",
            parameters.len(),
            effects.len()
        );
        let action = Action {
            name,
            parameters,
            precondition,
            effects,
            cost,
        };
        self.actions.push(action).map_err(|previous| ModelError::NameCollision {
            kind: SymbolKind::Action,
            name: previous.clone(),
            previous,
        })
    }

    pub fn get(&self, action: ActionRef) -> Result<&Action, ModelError> {
        self.actions.get(action).ok_or_else(|| ModelError::UnknownSymbol {
            kind: SymbolKind::Action,
            name: format!("#{}", action.to_u32()),
        })
    }

    pub fn by_name(&self, name: &str) -> Result<ActionRef, ModelError> {
        self.actions
            .get_ref(&Sym::from(name))
            .ok_or_else(|| ModelError::UnknownSymbol {
                kind: SymbolKind::Action,
                name: name.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> + '_ {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

struct ActionScope<'a> {
    env: &'a Environment,
    parameters: &'a [Param],
}

impl ActionScope<'_> {
    fn check_atom(&self, atom: &Atom) -> Result<(), ModelError> {
        self.env.fluents.predicate(atom.predicate())?;
        self.check_terms(atom.args())
    }

    fn check_terms(&self, terms: &[Term]) -> Result<(), ModelError> {
        for t in terms {
            match t {
                Term::Object(o) => {
                    // instance objects are not declared in the domain text
                    let obj = self.env.objects.get(*o)?;
                    if !obj.is_constant() {
                        return Err(ModelError::UnknownSymbol {
                            kind: SymbolKind::Object,
                            name: obj.name().to_string(),
                        });
                    }
                }
                Term::Param(p) => {
                    if !self.parameters.contains(p) {
                        return Err(ModelError::UnknownSymbol {
                            kind: SymbolKind::Parameter,
                            name: p.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
