use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use itertools::Itertools;

use crate::Sym;

/// Creates a new copyable reference type, usable as an index in a [`NamedStore`].
macro_rules! create_ref_type {
    ($type_name:ident) => {
        #[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
        pub struct $type_name(u32);

        impl $type_name {
            pub const fn to_u32(self) -> u32 {
                self.0
            }
            pub const fn from_u32(u: u32) -> Self {
                $type_name(u)
            }
        }
        impl From<usize> for $type_name {
            fn from(u: usize) -> Self {
                Self::from_u32(u as u32)
            }
        }
        impl From<$type_name> for usize {
            fn from(v: $type_name) -> Self {
                v.0 as usize
            }
        }
    };
}

pub trait Ref: Into<usize> + From<usize> + Copy + PartialEq {}

impl<X> Ref for X where X: Into<usize> + From<usize> + Copy + PartialEq {}

/// Any declaration that is identified by its name.
pub trait Named {
    fn name(&self) -> &Sym;
}

/// An append-only store of named declarations.
///
/// Values are kept in insertion order and can be retrieved either from the key returned
/// upon insertion or by name. Two values with the same (canonical) name cannot coexist.
#[derive(Clone)]
pub struct NamedStore<Key, Val> {
    internal: Vec<Val>,
    rev: hashbrown::HashMap<Sym, Key>,
    phantom: PhantomData<Key>,
}

impl<K, V> Default for NamedStore<K, V> {
    fn default() -> Self {
        NamedStore {
            internal: Vec::new(),
            rev: hashbrown::HashMap::new(),
            phantom: PhantomData,
        }
    }
}

impl<K, V: Named> Debug for NamedStore<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.internal.iter().map(|v| v.name()).format(", "))
    }
}

impl<K: Ref, V: Named> NamedStore<K, V> {
    pub fn len(&self) -> usize {
        self.internal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.internal.is_empty()
    }

    /// Adds a new value to the store.
    /// If another value with the same name is already present, the store is left untouched and the
    /// name of the previous value is returned as an error.
    pub fn push(&mut self, v: V) -> Result<K, Sym> {
        if let Some((previous, _)) = self.rev.get_key_value(v.name()) {
            return Err(previous.clone());
        }
        let id: K = self.internal.len().into();
        self.rev.insert(v.name().clone(), id);
        self.internal.push(v);
        Ok(id)
    }

    pub fn get(&self, k: K) -> Option<&V> {
        self.internal.get(k.into())
    }

    pub fn get_ref(&self, name: &Sym) -> Option<K> {
        self.rev.get(name).copied()
    }

    pub fn contains(&self, k: K) -> bool {
        k.into() < self.internal.len()
    }

    /// Iterates on all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.internal.iter().enumerate().map(|(i, v)| (K::from(i), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.internal.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    create_ref_type!(ItemId);

    struct Item(Sym);
    impl Named for Item {
        fn name(&self) -> &Sym {
            &self.0
        }
    }

    #[test]
    fn insertion_order_and_lookup() {
        let mut store: NamedStore<ItemId, Item> = NamedStore::default();
        let b = store.push(Item("b".into())).unwrap();
        let a = store.push(Item("a".into())).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_ref(&"a".into()), Some(a));
        assert_eq!(store.get_ref(&"B".into()), Some(b));
        let names: Vec<_> = store.values().map(|i| i.0.to_string()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut store: NamedStore<ItemId, Item> = NamedStore::default();
        store.push(Item("at".into())).unwrap();
        let prev = store.push(Item("AT".into())).unwrap_err();
        assert_eq!(prev.to_string(), "at");
        assert_eq!(store.len(), 1);
        assert!(!store.contains(ItemId::from(1usize)));
    }
}
