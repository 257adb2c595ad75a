//! Registry configuration.

use serde::Deserialize;

/// Validator registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Seed for validator sampling.
    ///
    /// `None` samples in map iteration order. `Some(seed)` draws a uniform
    /// sample without replacement from a seeded ChaCha stream, so two
    /// registries with the same seed and mutation history sample identically.
    pub sample_seed: Option<u64>,

    /// Whether a newly registered listener receives one added notification
    /// per existing record before any live notification.
    pub replay_on_register: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            sample_seed: None,
            replay_on_register: true,
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling seed.
    pub fn with_sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    /// Enable or disable listener replay on registration.
    pub fn with_replay_on_register(mut self, replay: bool) -> Self {
        self.replay_on_register = replay;
        self
    }
}
