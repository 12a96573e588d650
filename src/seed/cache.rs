//! Per-run lookup tables from fixture keys to created records.

use std::collections::HashMap;
use std::hash::Hash;
use tracing::warn;

use crate::fixtures::Role;

/// Append-only map. The first value written for a key wins.
#[derive(Debug, Clone)]
pub struct CacheTable<K, V> {
    name: &'static str,
    entries: HashMap<K, V>,
}

impl<K, V> CacheTable<K, V>
where
    K: Eq + Hash + std::fmt::Display,
{
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: HashMap::new(),
        }
    }

    /// Returns `false` and keeps the existing entry if `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.entries.contains_key(&key) {
            warn!(table = self.name, key = %key, "Cache entry already present, keeping first");
            return false;
        }
        self.entries.insert(key, value);
        true
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub address_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedProduct {
    pub id: i32,
    pub price: f64,
    pub deluxe_price: f64,
}

/// Everything later families resolve through. Built at the start of a run
/// and dropped when the run ends.
#[derive(Debug, Clone)]
pub struct SeedContext {
    /// Question ids by 1-based fixture position.
    pub security_questions: CacheTable<i32, i32>,
    pub users: CacheTable<String, CachedUser>,
    pub challenges: CacheTable<String, i32>,
    pub products: CacheTable<String, CachedProduct>,
    /// Basket ids by owning user key.
    pub baskets: CacheTable<String, i32>,
}

impl Default for SeedContext {
    fn default() -> Self {
        Self {
            security_questions: CacheTable::new("security_questions"),
            users: CacheTable::new("users"),
            challenges: CacheTable::new("challenges"),
            products: CacheTable::new("products"),
            baskets: CacheTable::new("baskets"),
        }
    }
}
