use crate::ref_store::{Named, NamedStore};
use crate::*;

create_ref_type!(SortRef);

/// Name of the builtin sort, of which all other sorts are subsorts.
pub const OBJECT_SORT: &str = "object";

/// A user-declared type. Each sort has a single parent, except for the builtin `object` sort.
#[derive(Clone, Debug)]
pub struct Sort {
    name: Sym,
    parent: Option<SortRef>,
}

impl Sort {
    pub fn name(&self) -> &Sym {
        &self.name
    }

    pub fn parent(&self) -> Option<SortRef> {
        self.parent
    }
}

impl Named for Sort {
    fn name(&self) -> &Sym {
        &self.name
    }
}

/// Registry of all sorts of a domain, in declaration order.
/// The builtin `object` sort is always present, as the first sort.
#[derive(Clone, Debug)]
pub struct Sorts {
    sorts: NamedStore<SortRef, Sort>,
}

impl Default for Sorts {
    fn default() -> Self {
        Self::new()
    }
}

impl Sorts {
    pub const OBJECT: SortRef = SortRef::from_u32(0);

    pub fn new() -> Self {
        let mut sorts = NamedStore::default();
        let object = sorts.push(Sort {
            name: Sym::from(OBJECT_SORT),
            parent: None,
        });
        debug_assert_eq!(object, Ok(Self::OBJECT));
        Self { sorts }
    }

    pub(crate) fn declare(&mut self, name: Sym, parent: SortRef) -> Result<SortRef, ModelError> {
        self.get(parent)?;
        self.sorts
            .push(Sort {
                name: name.clone(),
                parent: Some(parent),
            })
            .map_err(|previous| ModelError::NameCollision {
                kind: SymbolKind::Sort,
                name,
                previous,
            })
    }

    pub fn get(&self, sort: SortRef) -> Result<&Sort, ModelError> {
        self.sorts.get(sort).ok_or_else(|| ModelError::UnknownSymbol {
            kind: SymbolKind::Sort,
            name: format!("#{}", sort.to_u32()),
        })
    }

    pub fn by_name(&self, name: &str) -> Result<SortRef, ModelError> {
        self.sorts
            .get_ref(&Sym::from(name))
            .ok_or_else(|| ModelError::UnknownSymbol {
                kind: SymbolKind::Sort,
                name: name.to_string(),
            })
    }

    /// Name of the sort. Panics if the sort does not belong to this registry.
    pub fn name(&self, sort: SortRef) -> &Sym {
        &self.sorts.get(sort).expect("sort from another environment").name
    }

    /// Returns true if `sort` is `other` or one of its (transitive) subsorts.
    pub fn is_subsort_of(&self, sort: SortRef, other: SortRef) -> bool {
        let mut current = Some(sort);
        while let Some(s) = current {
            if s == other {
                return true;
            }
            current = self.sorts.get(s).and_then(|s| s.parent);
        }
        false
    }

    /// Iterates on all sorts, starting with the builtin `object` sort.
    pub fn iter(&self) -> impl Iterator<Item = (SortRef, &Sort)> + '_ {
        self.sorts.iter()
    }

    /// Iterates on all sorts that were explicitly declared (i.e. all but `object`).
    pub fn user_sorts(&self) -> impl Iterator<Item = (SortRef, &Sort)> + '_ {
        self.iter().filter(|(s, _)| *s != Self::OBJECT)
    }
}
