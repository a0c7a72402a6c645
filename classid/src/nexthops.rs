// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Index of the route prefixes that reference each next-hop

use crate::errors::ClassIdError;
use crate::keys::{NextHopKey, PrefixKey};
use ahash::RandomState;
use std::collections::{BTreeSet, HashMap};

/// The prefixes referencing a next-hop. A prefix that inherits its class-id
/// from this next-hop is in `with`. Any other referencing prefix is in `without`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NextHopPrefixes {
    pub with: BTreeSet<PrefixKey>,
    pub without: BTreeSet<PrefixKey>,
}

impl NextHopPrefixes {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with.is_empty() && self.without.is_empty()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.with.len() + self.without.len()
    }
    #[must_use]
    pub fn contains(&self, prefix: &PrefixKey) -> bool {
        self.with.contains(prefix) || self.without.contains(prefix)
    }
    /// All of the referencing prefixes, in order
    pub fn prefixes(&self) -> impl Iterator<Item = &PrefixKey> {
        self.with.iter().chain(self.without.iter())
    }
}

/// Map from next-hop keys to the prefixes that reference them. An entry
/// exists only for next-hops whose address lies in a cached subnet of their vlan.
#[derive(Debug, Clone)]
pub struct NextHopIndex(HashMap<NextHopKey, NextHopPrefixes, RandomState>);

impl Default for NextHopIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl NextHopIndex {
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
    pub fn contains(&self, key: &NextHopKey) -> bool {
        self.0.contains_key(key)
    }
    #[must_use]
    pub fn get(&self, key: &NextHopKey) -> Option<&NextHopPrefixes> {
        self.0.get(key)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&NextHopKey, &NextHopPrefixes)> {
        self.0.iter()
    }
    /// The keys of the entries, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<NextHopKey> {
        let mut keys: Vec<_> = self.0.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Create an empty entry for a key, if it does not exist.
    /// Returns true if the entry was created.
    pub fn ensure(&mut self, key: NextHopKey) -> bool {
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, NextHopPrefixes::default());
        true
    }

    /// Remove an entry, returning it
    pub fn remove(&mut self, key: &NextHopKey) -> Option<NextHopPrefixes> {
        self.0.remove(key)
    }

    /// Remove an entry only if no prefix references it
    pub fn remove_if_empty(&mut self, key: &NextHopKey) -> bool {
        if self.0.get(key).is_some_and(NextHopPrefixes::is_empty) {
            self.0.remove(key);
            return true;
        }
        false
    }

    /// Record that a prefix references a next-hop, in the `with` subset if
    /// `with` is true or in `without` otherwise. The prefix is removed from
    /// the other subset.
    ///
    /// # Errors
    ///
    /// Fails if the next-hop is not indexed.
    pub fn place(
        &mut self,
        key: &NextHopKey,
        prefix: PrefixKey,
        with: bool,
    ) -> Result<(), ClassIdError> {
        let entry = self
            .0
            .get_mut(key)
            .ok_or(ClassIdError::NextHopNotIndexed(*key))?;
        if with {
            entry.without.remove(&prefix);
            entry.with.insert(prefix);
        } else {
            entry.with.remove(&prefix);
            entry.without.insert(prefix);
        }
        Ok(())
    }

    /// Remove a prefix from the entry of a next-hop. Returns true if the
    /// prefix was in the `with` subset.
    ///
    /// # Errors
    ///
    /// Fails if the next-hop is not indexed, or if the prefix is not in
    /// exactly one of the subsets of its entry.
    pub fn remove_prefix(
        &mut self,
        key: &NextHopKey,
        prefix: &PrefixKey,
    ) -> Result<bool, ClassIdError> {
        let entry = self
            .0
            .get_mut(key)
            .ok_or(ClassIdError::NextHopNotIndexed(*key))?;
        match (entry.with.remove(prefix), entry.without.remove(prefix)) {
            (true, false) => Ok(true),
            (false, true) => Ok(false),
            (true, true) => Err(ClassIdError::PrefixInBothSets(*prefix, *key)),
            (false, false) => Err(ClassIdError::PrefixNotInNextHop(*prefix, *key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use state::{RouterId, VlanId};

    fn nhkey(addr: &str) -> NextHopKey {
        NextHopKey::new(addr.parse().unwrap(), VlanId::new(10).unwrap())
    }
    fn pfx(prefix: &str) -> PrefixKey {
        PrefixKey::new(RouterId::new(0), prefix.parse::<ipnet::IpNet>().unwrap())
    }

    #[test]
    fn test_place_and_remove() {
        let mut index = NextHopIndex::new();
        let key = nhkey("10.0.0.5");
        let p1 = pfx("10.1.0.0/16");
        let p2 = pfx("10.2.0.0/16");

        assert_eq!(
            index.place(&key, p1, true),
            Err(ClassIdError::NextHopNotIndexed(key))
        );
        assert!(index.ensure(key));
        assert!(!index.ensure(key));

        index.place(&key, p1, true).unwrap();
        index.place(&key, p2, false).unwrap();
        let entry = index.get(&key).unwrap();
        assert_eq!(entry.len(), 2);
        assert!(entry.with.contains(&p1));
        assert!(entry.without.contains(&p2));

        // moving a prefix to the other subset
        index.place(&key, p2, true).unwrap();
        index.place(&key, p1, false).unwrap();
        let entry = index.get(&key).unwrap();
        assert_eq!(entry.with.iter().collect::<Vec<_>>(), vec![&p2]);
        assert_eq!(entry.without.iter().collect::<Vec<_>>(), vec![&p1]);

        assert_eq!(index.remove_prefix(&key, &p2), Ok(true));
        assert_eq!(index.remove_prefix(&key, &p1), Ok(false));
        assert_eq!(
            index.remove_prefix(&key, &p1),
            Err(ClassIdError::PrefixNotInNextHop(p1, key))
        );
        assert!(index.remove_if_empty(&key));
        assert!(index.is_empty());
    }

    #[test]
    fn test_remove_if_empty_keeps_referenced() {
        let mut index = NextHopIndex::new();
        let key = nhkey("2001:db8::5");
        index.ensure(key);
        index.place(&key, pfx("2001:db8:1::/48"), false).unwrap();
        assert!(!index.remove_if_empty(&key));
        assert!(!index.remove_if_empty(&nhkey("2001:db8::6")));
        assert_eq!(index.keys(), vec![key]);
    }
}
