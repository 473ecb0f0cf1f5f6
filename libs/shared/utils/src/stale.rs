use std::sync::Mutex;

/// Issued when a fetch starts; presented again when its result arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    generation: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Drops results of fetches that were superseded while in flight.
///
/// Each [`StaleGuard::begin`] bumps the generation. A result is only
/// accepted if its ticket is from the latest generation and was issued for
/// the key that is current now.
#[derive(Debug)]
pub struct StaleGuard<K> {
    current: Mutex<(u64, Option<K>)>,
}

impl<K: Clone + PartialEq> Default for StaleGuard<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + PartialEq> StaleGuard<K> {
    pub fn new() -> Self {
        Self {
            current: Mutex::new((0, None)),
        }
    }

    pub fn begin(&self, key: K) -> Ticket<K> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.0 += 1;
        current.1 = Some(key.clone());
        Ticket {
            generation: current.0,
            key,
        }
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.0 == ticket.generation && current.1.as_ref() == Some(&ticket.key)
    }

    pub fn current_key(&self) -> Option<K> {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.1.clone()
    }
}
