//! Configuration types for sequence materialization

use serde::{Deserialize, Serialize};

/// Buffer configuration for draining a sequence into a `Vec`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    pub initial_capacity: usize,
    /// Upper bound on collected elements; `None` drains without limit
    pub max_len: Option<usize>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            max_len: None,
        }
    }
}

impl BufferConfig {
    /// Create a new buffer configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial capacity of the output vector
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Fail once more than `max_len` elements have been pulled
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub(crate) fn capacity_hint(&self) -> usize {
        match self.max_len {
            Some(limit) => self.initial_capacity.min(limit),
            None => self.initial_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = BufferConfig::new().initial_capacity(4).max_len(10);
        assert_eq!(config.initial_capacity, 4);
        assert_eq!(config.max_len, Some(10));
    }

    #[test]
    fn json_fills_missing_fields() {
        let config = BufferConfig::from_json(r#"{"max_len": 2}"#).unwrap();
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.max_len, Some(2));
        assert_eq!(config.capacity_hint(), 2);
    }
}
