// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use string_interner::symbol::SymbolU32;
use string_interner::{DefaultBackend, StringInterner};

/// Cheap, hashable handle to an interned string.
///
/// Two handles obtained from the same [`NamedIdStore`] are equal exactly when
/// the strings they were created from are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamedId {
    uid: SymbolU32,
}

/// A store for named IDs
#[derive(Default)]
pub struct NamedIdStore {
    interner: StringInterner<DefaultBackend>,
}

impl NamedIdStore {
    pub fn new() -> Self {
        NamedIdStore {
            interner: StringInterner::new(),
        }
    }

    /// Return the ID of a name that was already inserted, otherwise None.
    pub fn get(&self, name: impl AsRef<str>) -> Option<NamedId> {
        self.interner.get(name).map(|uid| NamedId { uid })
    }

    /// Return a unique ID for a given name, inserting it if necessary.
    pub fn get_or_insert(&mut self, name: impl AsRef<str>) -> NamedId {
        let uid = self.interner.get_or_intern(name);
        NamedId { uid }
    }

    /// Resolve a unique ID to its original string.
    pub fn resolve(&self, uid: impl Into<NamedId>) -> Option<&str> {
        self.interner.resolve(Into::<NamedId>::into(uid).uid)
    }

    /// Number of distinct names in the store.
    pub fn len(&self) -> usize {
        self.interner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_id_store() {
        let mut store = NamedIdStore::new();
        let id1 = store.get_or_insert("Rest for 1 hour");
        let id2 = store.get_or_insert("Rest for 1 hour");
        assert_eq!(id1, id2);
        assert_eq!(store.resolve(id1), Some("Rest for 1 hour"));

        let id3 = store.get_or_insert("Charge at 1C for 1 hour");
        assert_ne!(id1, id3);
        assert_eq!(store.resolve(id3), Some("Charge at 1C for 1 hour"));
        assert_eq!(store.get("Charge at 1C for 1 hour"), Some(id3));
        assert_eq!(store.get("Discharge at 1C for 1 hour"), None);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }
}
