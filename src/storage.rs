//! Generic repository abstraction.
//!
//! The engine persists unavailability records and scenarios through a
//! narrow per-entity repository trait: upsert-by-key, full scan,
//! lookup, delete, and predicate query. Any key-value or relational
//! store satisfies it; [`InMemoryRepository`] is the default backing
//! used by the engine itself and by tests.

use std::collections::HashMap;
use std::hash::Hash;

use thiserror::Error;

/// Storage-layer failure.
///
/// Read paths in the stores above this trait absorb these fail-open
/// (empty result + warning); write paths propagate them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// A read or write against the backing store failed.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// A storable entity with an identifying key.
pub trait Entity: Clone {
    /// Key type, unique per entity instance.
    type Key: Clone + Eq + Hash;

    /// The entity's key.
    fn key(&self) -> Self::Key;
}

/// Narrow persistence contract, one repository per entity type.
pub trait Repository<T: Entity> {
    /// Inserts or replaces by key.
    fn save(&mut self, entity: T) -> Result<(), StorageError>;

    /// Returns all stored entities, in unspecified order.
    fn find_all(&self) -> Result<Vec<T>, StorageError>;

    /// Looks up one entity by key.
    fn find_by_key(&self, key: &T::Key) -> Result<Option<T>, StorageError>;

    /// Deletes by key. Returns whether an entity was present.
    fn delete(&mut self, key: &T::Key) -> Result<bool, StorageError>;

    /// Returns all entities matching a predicate.
    fn query(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>, StorageError>;
}

/// Hash-map backed repository. Never fails.
pub struct InMemoryRepository<T: Entity> {
    items: HashMap<T::Key, T>,
}

impl<T: Entity> InMemoryRepository<T> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn save(&mut self, entity: T) -> Result<(), StorageError> {
        self.items.insert(entity.key(), entity);
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<T>, StorageError> {
        Ok(self.items.values().cloned().collect())
    }

    fn find_by_key(&self, key: &T::Key) -> Result<Option<T>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn delete(&mut self, key: &T::Key) -> Result<bool, StorageError> {
        Ok(self.items.remove(key).is_some())
    }

    fn query(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>, StorageError> {
        Ok(self
            .items
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: u64,
        text: String,
    }

    impl Entity for Note {
        type Key = u64;

        fn key(&self) -> u64 {
            self.id
        }
    }

    fn note(id: u64, text: &str) -> Note {
        Note {
            id,
            text: text.into(),
        }
    }

    #[test]
    fn test_save_is_upsert() {
        let mut repo = InMemoryRepository::new();
        repo.save(note(1, "first")).unwrap();
        repo.save(note(1, "second")).unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "second");
    }

    #[test]
    fn test_find_and_delete() {
        let mut repo = InMemoryRepository::new();
        repo.save(note(1, "a")).unwrap();
        repo.save(note(2, "b")).unwrap();

        assert_eq!(repo.find_by_key(&2).unwrap().unwrap().text, "b");
        assert!(repo.find_by_key(&99).unwrap().is_none());

        assert!(repo.delete(&1).unwrap());
        assert!(!repo.delete(&1).unwrap());
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_query_by_predicate() {
        let mut repo = InMemoryRepository::new();
        repo.save(note(1, "keep")).unwrap();
        repo.save(note(2, "drop")).unwrap();
        repo.save(note(3, "keep")).unwrap();

        let kept = repo.query(&|n: &Note| n.text == "keep").unwrap();
        assert_eq!(kept.len(), 2);
    }
}
