use std::collections::HashMap;
use std::hash::Hash;

use crate::ids::SurrogateKey;

/// Natural key to surrogate key mapping for one dimension.
///
/// Built once by the dimension builder and then only read.
#[derive(Debug, Clone)]
pub struct LookupIndex<K> {
    map: HashMap<K, SurrogateKey>,
}

impl<K> Default for LookupIndex<K> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> LookupIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key; returns the existing surrogate key if the natural key was
    /// already present, leaving the mapping unchanged.
    pub fn insert(&mut self, natural_key: K, surrogate: SurrogateKey) -> Option<SurrogateKey> {
        match self.map.entry(natural_key) {
            std::collections::hash_map::Entry::Occupied(entry) => Some(*entry.get()),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(surrogate);
                None
            }
        }
    }

    pub fn get(&self, natural_key: &K) -> Option<SurrogateKey> {
        self.map.get(natural_key).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Eq + Hash> PartialEq for LookupIndex<K> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_mapping() {
        let mut index = LookupIndex::new();
        assert_eq!(index.insert("a", SurrogateKey::new(1)), None);
        assert_eq!(
            index.insert("a", SurrogateKey::new(2)),
            Some(SurrogateKey::new(1))
        );
        assert_eq!(index.get(&"a"), Some(SurrogateKey::new(1)));
        assert_eq!(index.len(), 1);
    }
}
