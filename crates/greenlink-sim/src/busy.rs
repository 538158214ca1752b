//! Per-entity re-entrancy guards.
//!
//! A workflow claims an entity key before starting a timed operation and
//! holds the [`BusyClaim`] until the transition is applied. While the claim
//! is held, further claims on the same key fail. Dropping the claim (also
//! when the owning future is dropped) releases the key.
//!
//! The set is guarded by a `parking_lot::Mutex` that is only held for the
//! insert or remove, never across an `.await`.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Default)]
pub struct BusySet {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl BusySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or `None` if it is already claimed.
    pub fn try_claim(&self, key: &str) -> Option<BusyClaim> {
        if !self.keys.lock().insert(key.to_string()) {
            return None;
        }
        Some(BusyClaim {
            keys: Arc::clone(&self.keys),
            key: key.to_string(),
        })
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.keys.lock().contains(key)
    }
}

/// Held for the duration of a timed operation.
#[derive(Debug)]
pub struct BusyClaim {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl BusyClaim {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for BusyClaim {
    fn drop(&mut self) {
        self.keys.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_fails_until_release() {
        let busy = BusySet::new();
        let claim = busy.try_claim("BATCH-1").unwrap();
        assert!(busy.try_claim("BATCH-1").is_none());
        assert!(busy.try_claim("BATCH-2").is_some());
        assert!(busy.is_busy("BATCH-1"));
        drop(claim);
        assert!(!busy.is_busy("BATCH-1"));
        assert!(busy.try_claim("BATCH-1").is_some());
    }

    #[test]
    fn clones_share_keys() {
        let a = BusySet::new();
        let b = a.clone();
        let _claim = a.try_claim("REQ-401").unwrap();
        assert!(b.try_claim("REQ-401").is_none());
    }
}
