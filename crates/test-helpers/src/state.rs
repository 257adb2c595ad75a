//! A closure-overridable [`ValidatorState`] double.

use std::collections::HashMap;

use warpset_types::{NetworkId, NodeId};
use warpset_validators::{StateError, ValidatorRecord, ValidatorState, WarpSet};

type ValidatorSetFn =
    dyn Fn(u64, NetworkId) -> Result<HashMap<NodeId, ValidatorRecord>, StateError> + Send + Sync;
type CurrentHeightFn = dyn Fn() -> Result<u64, StateError> + Send + Sync;
type WarpSetFn = dyn Fn(u64, NetworkId) -> Result<WarpSet, StateError> + Send + Sync;
type WarpSetsFn = dyn Fn(&[u64], &[NetworkId]) -> Result<HashMap<NetworkId, HashMap<u64, WarpSet>>, StateError>
    + Send
    + Sync;

/// Validator state whose answers are supplied per test.
///
/// Without overrides every snapshot is empty, the current height is zero and
/// chain/network lookups are the identity.
#[derive(Default)]
pub struct TestState {
    validator_set_fn: Option<Box<ValidatorSetFn>>,
    current_height_fn: Option<Box<CurrentHeightFn>>,
    warp_validator_set_fn: Option<Box<WarpSetFn>>,
    warp_validator_sets_fn: Option<Box<WarpSetsFn>>,
}

impl std::fmt::Debug for TestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestState")
            .field("validator_set", &self.validator_set_fn.is_some())
            .field("current_height", &self.current_height_fn.is_some())
            .field("warp_validator_set", &self.warp_validator_set_fn.is_some())
            .field("warp_validator_sets", &self.warp_validator_sets_fn.is_some())
            .finish()
    }
}

impl TestState {
    /// Create a state with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `validator_set` (and `current_validators`) with `f`.
    pub fn with_validator_set<F>(mut self, f: F) -> Self
    where
        F: Fn(u64, NetworkId) -> Result<HashMap<NodeId, ValidatorRecord>, StateError>
            + Send
            + Sync
            + 'static,
    {
        self.validator_set_fn = Some(Box::new(f));
        self
    }

    /// Serve a fixed snapshot for every height and network.
    pub fn with_snapshot(self, snapshot: HashMap<NodeId, ValidatorRecord>) -> Self {
        self.with_validator_set(move |_, _| Ok(snapshot.clone()))
    }

    /// Answer `current_height` with `f`.
    pub fn with_current_height<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<u64, StateError> + Send + Sync + 'static,
    {
        self.current_height_fn = Some(Box::new(f));
        self
    }

    /// Answer `warp_validator_set` with `f`.
    pub fn with_warp_validator_set<F>(mut self, f: F) -> Self
    where
        F: Fn(u64, NetworkId) -> Result<WarpSet, StateError> + Send + Sync + 'static,
    {
        self.warp_validator_set_fn = Some(Box::new(f));
        self
    }

    /// Answer `warp_validator_sets` with `f`.
    pub fn with_warp_validator_sets<F>(mut self, f: F) -> Self
    where
        F: Fn(&[u64], &[NetworkId]) -> Result<HashMap<NetworkId, HashMap<u64, WarpSet>>, StateError>
            + Send
            + Sync
            + 'static,
    {
        self.warp_validator_sets_fn = Some(Box::new(f));
        self
    }
}

impl ValidatorState for TestState {
    fn validator_set(
        &self,
        height: u64,
        network: NetworkId,
    ) -> Result<HashMap<NodeId, ValidatorRecord>, StateError> {
        match &self.validator_set_fn {
            Some(f) => f(height, network),
            None => Ok(HashMap::new()),
        }
    }

    fn current_height(&self) -> Result<u64, StateError> {
        match &self.current_height_fn {
            Some(f) => f(),
            None => Ok(0),
        }
    }

    // Without an override the Warp set is empty, not derived from
    // `validator_set`, so the two can be stubbed independently.
    fn warp_validator_set(&self, height: u64, network: NetworkId) -> Result<WarpSet, StateError> {
        match &self.warp_validator_set_fn {
            Some(f) => f(height, network),
            None => Ok(WarpSet {
                height,
                validators: HashMap::new(),
            }),
        }
    }

    fn warp_validator_sets(
        &self,
        heights: &[u64],
        networks: &[NetworkId],
    ) -> Result<HashMap<NetworkId, HashMap<u64, WarpSet>>, StateError> {
        if let Some(f) = &self.warp_validator_sets_fn {
            return f(heights, networks);
        }
        Ok(networks
            .iter()
            .map(|&network| {
                let per_height = heights
                    .iter()
                    .map(|&height| {
                        (
                            height,
                            WarpSet {
                                height,
                                validators: HashMap::new(),
                            },
                        )
                    })
                    .collect();
                (network, per_height)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::make_snapshot;
    use warpset_validators::{canonical_validator_set, WarpSetError, WarpValidator};

    #[test]
    fn test_defaults() {
        let state = TestState::new();
        let net = NetworkId([1; 32]);

        assert!(state.validator_set(100, net).unwrap().is_empty());
        assert!(state.current_validators(100, net).unwrap().is_empty());
        assert_eq!(state.current_height(), Ok(0));
        assert_eq!(state.minimum_height(), Ok(0));
        assert_eq!(state.chain_id(net), Ok(net));
        assert_eq!(state.network_id(net), Ok(net));

        let warp = state.warp_validator_set(12, net).unwrap();
        assert_eq!(warp.height, 12);
        assert!(warp.validators.is_empty());
    }

    #[test]
    fn test_default_warp_sets_grid() {
        let state = TestState::new();
        let nets = [NetworkId([1; 32]), NetworkId([2; 32])];

        let sets = state.warp_validator_sets(&[100, 200], &nets).unwrap();
        assert_eq!(sets.len(), 2);
        for net in nets {
            assert_eq!(sets[&net].len(), 2);
            assert_eq!(sets[&net][&200].height, 200);
        }

        assert!(state.warp_validator_sets(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_validator_set_override_feeds_current_validators() {
        let node = NodeId([4; 20]);
        let state = TestState::new().with_snapshot(make_snapshot(&[(node, vec![], 100)]));

        let current = state.current_validators(100, NetworkId::PRIMARY).unwrap();
        assert_eq!(current[&node].light, 100);
    }

    #[test]
    fn test_height_override_and_error() {
        let state = TestState::new()
            .with_current_height(|| Ok(42))
            .with_validator_set(|_, net| Err(StateError::UnknownNetwork(net)));

        assert_eq!(state.current_height(), Ok(42));
        let err = canonical_validator_set(&state, 1, NetworkId([7; 32])).unwrap_err();
        assert_eq!(
            err,
            WarpSetError::State(StateError::UnknownNetwork(NetworkId([7; 32])))
        );
    }

    #[test]
    fn test_warp_set_override() {
        let node = NodeId([8; 20]);
        let state = TestState::new().with_warp_validator_set(move |height, _| {
            let mut validators = HashMap::new();
            validators.insert(
                node,
                WarpValidator {
                    node_id: node,
                    public_key: vec![1, 2, 3],
                    ringtail_public_key: vec![],
                    weight: 100,
                },
            );
            Ok(WarpSet { height, validators })
        });

        let warp = state.warp_validator_set(100, NetworkId::PRIMARY).unwrap();
        assert_eq!(warp.validators[&node].weight, 100);
    }

    #[test]
    fn test_warp_sets_override_error() {
        let state = TestState::new()
            .with_warp_validator_sets(|_, _| Err(StateError::Provider("unavailable".into())));
        assert!(state.warp_validator_sets(&[1], &[NetworkId::PRIMARY]).is_err());
    }
}
