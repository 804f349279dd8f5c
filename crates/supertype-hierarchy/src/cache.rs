use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;

/// Unordered pair of type names: `(a, b)` and `(b, a)` are the same key.
#[derive(Debug, Clone)]
pub struct PairKey {
    first: Arc<str>,
    second: Arc<str>,
}

impl PairKey {
    pub fn new(first: impl Into<Arc<str>>, second: impl Into<Arc<str>>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

fn component_hash(name: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}

impl Hash for PairKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let a = component_hash(&self.first);
        let b = component_hash(&self.second);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        state.write_u64(lo.wrapping_mul(37).wrapping_add(hi));
    }
}

impl PartialEq for PairKey {
    fn eq(&self, other: &Self) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

impl Eq for PairKey {}

/// Memoized `common_super_class` answers.
///
/// Entries are never evicted; failed queries are never stored.
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: Mutex<HashMap<PairKey, Arc<str>>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, first: &str, second: &str) -> Option<Arc<str>> {
        let key = PairKey::new(first, second);
        self.entries.lock().get(&key).cloned()
    }

    /// Records `answer` unless another caller already did, and returns the
    /// stored answer either way.
    pub fn insert(&self, first: &str, second: &str, answer: Arc<str>) -> Arc<str> {
        self.entries
            .lock()
            .entry(PairKey::new(first, second))
            .or_insert(answer)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
