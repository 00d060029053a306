use derive_more::derive::Display;

use crate::ref_store::{Named, NamedStore};
use crate::*;

create_ref_type!(ObjectRef);

/// Whether an object is part of the domain (a PDDL constant) or only of a problem instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectScope {
    Constant,
    Instance,
}

#[derive(Clone, Display, Debug)]
#[display("{}", name)]
pub struct Object {
    name: Sym,
    sort: SortRef,
    scope: ObjectScope,
}

impl Object {
    pub fn name(&self) -> &Sym {
        &self.name
    }

    pub fn sort(&self) -> SortRef {
        self.sort
    }

    pub fn is_constant(&self) -> bool {
        self.scope == ObjectScope::Constant
    }
}

impl Named for Object {
    fn name(&self) -> &Sym {
        &self.name
    }
}

#[derive(Clone, Debug, Default)]
pub struct Objects {
    objects: NamedStore<ObjectRef, Object>,
}

impl Objects {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_object(&mut self, name: Sym, sort: SortRef, scope: ObjectScope) -> Result<ObjectRef, ModelError> {
        self.objects
            .push(Object {
                name: name.clone(),
                sort,
                scope,
            })
            .map_err(|previous| ModelError::NameCollision {
                kind: SymbolKind::Object,
                name,
                previous,
            })
    }

    pub fn get(&self, object: ObjectRef) -> Result<&Object, ModelError> {
        self.objects.get(object).ok_or_else(|| ModelError::UnknownSymbol {
            kind: SymbolKind::Object,
            name: format!("#{}", object.to_u32()),
        })
    }

    pub fn by_name(&self, name: &str) -> Result<ObjectRef, ModelError> {
        self.objects
            .get_ref(&Sym::from(name))
            .ok_or_else(|| ModelError::UnknownSymbol {
                kind: SymbolKind::Object,
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, &Object)> + '_ {
        self.objects.iter()
    }

    /// Iterates on the objects declared at the domain level, in declaration order.
    pub fn constants(&self) -> impl Iterator<Item = (ObjectRef, &Object)> + '_ {
        self.iter().filter(|(_, o)| o.is_constant())
    }
}
