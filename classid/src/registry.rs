// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Registry of the routes known to the updater and of their eligible next-hops

use crate::errors::ClassIdError;
use crate::keys::{NextHopKey, PrefixKey};
use ahash::RandomState;
use std::collections::HashMap;

/// For every registered route, the keys of its next-hops that are covered by
/// the subnet cache, in the order of the route's next-hops and without
/// duplicates. Routes without such next-hops are not registered.
#[derive(Debug, Clone)]
pub struct RouteRegistry(HashMap<PrefixKey, Vec<NextHopKey>, RandomState>);

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::with_hasher(RandomState::with_seed(0)))
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    #[must_use]
    pub fn contains(&self, prefix: &PrefixKey) -> bool {
        self.0.contains_key(prefix)
    }
    #[must_use]
    pub fn candidates(&self, prefix: &PrefixKey) -> Option<&[NextHopKey]> {
        self.0.get(prefix).map(Vec::as_slice)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&PrefixKey, &Vec<NextHopKey>)> {
        self.0.iter()
    }

    /// Register a route with its candidate next-hops
    ///
    /// # Errors
    ///
    /// Fails if the route is already registered
    pub fn register(
        &mut self,
        prefix: PrefixKey,
        candidates: Vec<NextHopKey>,
    ) -> Result<(), ClassIdError> {
        if self.0.contains_key(&prefix) {
            return Err(ClassIdError::DuplicateRoute(prefix));
        }
        if !candidates.is_empty() {
            self.0.insert(prefix, candidates);
        }
        Ok(())
    }

    /// Unregister a route, returning its candidates
    pub fn unregister(&mut self, prefix: &PrefixKey) -> Option<Vec<NextHopKey>> {
        self.0.remove(prefix)
    }

    /// Drop a candidate from a route. If the route has no candidates left it
    /// is unregistered. Returns the remaining candidates, if any.
    pub fn drop_candidate(&mut self, prefix: &PrefixKey, key: &NextHopKey) -> Option<&[NextHopKey]> {
        let candidates = self.0.get_mut(prefix)?;
        candidates.retain(|k| k != key);
        if candidates.is_empty() {
            self.0.remove(prefix);
            return None;
        }
        self.0.get(prefix).map(Vec::as_slice)
    }
}
