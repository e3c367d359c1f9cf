use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Index;

use crate::{DeckComposition, HandSignature};

/// Results keyed by a composite state key, valid for one shoe version. When
/// the shoe moves on, `sync_version` drops the entries that can never be hit
/// again, so keys themselves only describe the shoe state.
#[derive(Debug, Clone)]
pub struct StateCache<K: Eq + Hash, T> {
    data: HashMap<K, T>,
    shoe_version: u64,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash, T> Default for StateCache<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, T> StateCache<K, T> {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            shoe_version: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Forgets everything computed against an older shoe snapshot.
    pub fn sync_version(&mut self, shoe_version: u64) {
        if self.shoe_version != shoe_version {
            self.data.clear();
            self.shoe_version = shoe_version;
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&T> {
        let found = self.data.get(key);
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub fn insert(&mut self, key: K, value: T) {
        self.data.insert(key, value);
    }

    pub fn contains_state(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl<K: Eq + Hash, T> Index<&K> for StateCache<K, T> {
    type Output = T;
    fn index(&self, key: &K) -> &Self::Output {
        &self.data[key]
    }
}

/// Key of a dealer outcome distribution: up value, shoe size and true count.
/// The soft 17 rule is part of it because rules can change mid-shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DealerKey {
    pub up_value: u8,
    pub total_cards: u16,
    true_count_bits: u64,
    pub hits_soft17: bool,
}

impl DealerKey {
    pub fn new(up_value: u8, shoe: &DeckComposition, hits_soft17: bool) -> Self {
        Self {
            up_value,
            total_cards: shoe.total_cards(),
            true_count_bits: shoe.true_count().to_bits(),
            hits_soft17,
        }
    }
}

/// Key of a full decision evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecisionKey {
    pub hand: HandSignature,
    pub dealer_up_value: u8,
    pub shoe_version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank;

    fn signature(hard_total: u8) -> HandSignature {
        HandSignature {
            hard_total,
            has_ace: false,
            pair: None,
        }
    }

    #[test]
    fn stores_and_counts_hits() {
        let mut cache: StateCache<DecisionKey, f64> = StateCache::new();
        let key = DecisionKey {
            hand: signature(16),
            dealer_up_value: 10,
            shoe_version: 0,
        };
        assert!(cache.get(&key).is_none());
        cache.insert(key, -0.5);
        assert_eq!(cache.get(&key), Some(&-0.5));
        assert_eq!(cache[&key], -0.5);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn new_shoe_version_drops_entries() {
        let mut cache: StateCache<DecisionKey, f64> = StateCache::new();
        let key = DecisionKey {
            hand: signature(12),
            dealer_up_value: 4,
            shoe_version: 0,
        };
        cache.insert(key, 0.1);
        cache.sync_version(0);
        assert!(cache.contains_state(&key));
        cache.sync_version(1);
        assert!(cache.is_empty());
    }

    #[test]
    fn dealer_keys_differ_by_shoe_state() {
        let full = DeckComposition::with_number_of_decks(1);
        let mut counts = *full.remaining_cards();
        counts[Rank::Five.index()] -= 1;
        let dealt = DeckComposition::from_counts(counts, 1);
        assert_eq!(DealerKey::new(6, &full, false), DealerKey::new(6, &full, false));
        assert_ne!(DealerKey::new(6, &full, false), DealerKey::new(6, &dealt, false));
        assert_ne!(DealerKey::new(6, &full, false), DealerKey::new(6, &full, true));
    }

    #[test]
    fn dealer_entries_expire_with_the_shoe_version() {
        let full = DeckComposition::with_number_of_decks(1);
        let mut cache: StateCache<DealerKey, f64> = StateCache::new();
        let key = DealerKey::new(10, &full, false);
        cache.sync_version(3);
        cache.insert(key, 0.21);
        cache.sync_version(3);
        assert_eq!(cache.get(&key), Some(&0.21));
        // Same total and count after a reshuffle, but a new snapshot.
        cache.sync_version(4);
        assert!(cache.get(&key).is_none());
    }
}
