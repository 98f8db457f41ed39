use std::{collections::HashMap, future::Future, hash::Hash};

use log::debug;

/// Remembers successful results by their exact input so repeated requests for
/// the same parameters within a session don't hit the network again. Failures
/// are never stored.
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: HashMap<K, V>,
    hits: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
        }
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub async fn get_or_try_fetch<F, Fut, E>(&mut self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.entries.get(&key) {
            self.hits += 1;
            debug!("Memo hit ({} so far)", self.hits);
            return Ok(value.clone());
        }
        let value = fetch().await?;
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }
}
