//! Names used for the symbols of the gripper domain.

use tracing::debug;

use crate::words::{WordSource, WordSourceError};

/// Base names of the objects, suffixed with an index (e.g. `ball0`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectNames {
    pub ball: String,
    pub room: String,
    pub gripper: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredicateNames {
    pub ball: String,
    pub room: String,
    pub gripper: String,
    pub at_robby: String,
    pub at: String,
    pub free: String,
    pub carry: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionNames {
    pub r#move: String,
    pub pick: String,
    pub drop: String,
}

/// All names of a generated gripper domain and its objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolNames {
    pub objects: ObjectNames,
    pub predicates: PredicateNames,
    pub actions: ActionNames,
}

impl Default for SymbolNames {
    fn default() -> Self {
        SymbolNames {
            objects: ObjectNames {
                ball: "ball".to_string(),
                room: "room".to_string(),
                gripper: "gripper".to_string(),
            },
            predicates: PredicateNames {
                ball: "ball".to_string(),
                room: "room".to_string(),
                gripper: "gripper".to_string(),
                at_robby: "at-robby".to_string(),
                at: "at".to_string(),
                free: "free".to_string(),
                carry: "carry".to_string(),
            },
            actions: ActionNames {
                r#move: "move".to_string(),
                pick: "pick".to_string(),
                drop: "drop".to_string(),
            },
        }
    }
}

/// Which groups of names should be replaced by random words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NameRandomization {
    pub objects: bool,
    pub predicates: bool,
    pub actions: bool,
}

impl NameRandomization {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any(&self) -> bool {
        self.objects || self.predicates || self.actions
    }
}

impl SymbolNames {
    /// Default names, where the selected groups are replaced by words from the source.
    ///
    /// Exactly one word is requested per replaced name, in the order objects (ball, room, gripper),
    /// predicates (ball, room, gripper, at-robby, at, free, carry) and actions (move, pick, drop).
    pub fn randomized(which: NameRandomization, words: &mut dyn WordSource) -> Result<Self, WordSourceError> {
        let mut names = SymbolNames::default();
        if which.objects {
            let o = &mut names.objects;
            for name in [&mut o.ball, &mut o.room, &mut o.gripper] {
                *name = words.next_word()?;
            }
        }
        if which.predicates {
            let p = &mut names.predicates;
            for name in [
                &mut p.ball,
                &mut p.room,
                &mut p.gripper,
                &mut p.at_robby,
                &mut p.at,
                &mut p.free,
                &mut p.carry,
            ] {
                *name = words.next_word()?;
            }
        }
        if which.actions {
            let a = &mut names.actions;
            for name in [&mut a.r#move, &mut a.pick, &mut a.drop] {
                *name = words.next_word()?;
            }
        }
        if which.any() {
            debug!("randomized names: {names:?}");
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::FixedWords;

    #[test]
    fn no_randomization_keeps_defaults() {
        let mut words = FixedWords::default();
        let names = SymbolNames::randomized(NameRandomization::none(), &mut words).unwrap();
        assert_eq!(names, SymbolNames::default());
    }

    #[test]
    fn words_are_assigned_in_order() {
        let mut words = FixedWords::new(["snack", "cell", "pocket", "crawl", "hide", "reveal"]);
        let which = NameRandomization {
            objects: true,
            predicates: false,
            actions: true,
        };
        let names = SymbolNames::randomized(which, &mut words).unwrap();
        assert_eq!(names.objects.ball, "snack");
        assert_eq!(names.objects.room, "cell");
        assert_eq!(names.objects.gripper, "pocket");
        assert_eq!(names.predicates, SymbolNames::default().predicates);
        assert_eq!(names.actions.r#move, "crawl");
        assert_eq!(names.actions.pick, "hide");
        assert_eq!(names.actions.drop, "reveal");
    }

    #[test]
    fn exhausted_source_fails() {
        let mut words = FixedWords::new(["only", "two"]);
        let which = NameRandomization {
            predicates: true,
            ..Default::default()
        };
        assert!(matches!(
            SymbolNames::randomized(which, &mut words),
            Err(WordSourceError::Exhausted)
        ));
    }
}
