//! Demo device-token registry.
//!
//! In-memory, single-process, intentionally non-persistent: it backs the
//! demo push-registration endpoint and nothing else.

use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct DeviceTokenRegistry {
    tokens: Mutex<HashSet<String>>,
}

impl DeviceTokenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token; returns false when it was already present.
    pub fn register(&self, token: &str) -> bool {
        self.tokens
            .lock()
            .map(|mut tokens| tokens.insert(token.to_string()))
            .unwrap_or(false)
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens
            .lock()
            .map(|tokens| tokens.contains(token))
            .unwrap_or(false)
    }

    /// Snapshot of all registered tokens, sorted for stable output.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .tokens
            .lock()
            .map(|tokens| tokens.iter().cloned().collect())
            .unwrap_or_default();
        tokens.sort_unstable();
        tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.lock().map(|tokens| tokens.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
