// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Cache of the subnets reachable over ports with per-host classification

use ahash::RandomState;
use ipnet::IpNet;
use state::VlanId;
use std::collections::{BTreeSet, HashMap};
use std::net::IpAddr;

/// Subnets per vlan. A vlan is only present if some port in it has
/// classification enabled, and its set of subnets is never empty.
#[derive(Debug, Clone)]
pub struct SubnetCache(HashMap<VlanId, BTreeSet<IpNet>, RandomState>);

impl Default for SubnetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SubnetCache {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::with_hasher(RandomState::with_seed(0)))
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn contains_vlan(&self, vlan: VlanId) -> bool {
        self.0.contains_key(&vlan)
    }
    #[must_use]
    pub fn get(&self, vlan: VlanId) -> Option<&BTreeSet<IpNet>> {
        self.0.get(&vlan)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&VlanId, &BTreeSet<IpNet>)> {
        self.0.iter()
    }

    /// Insert a subnet in the cache of a vlan. Host bits are cleared.
    /// Returns true if the subnet was not cached.
    pub fn insert(&mut self, vlan: VlanId, subnet: IpNet) -> bool {
        self.0.entry(vlan).or_default().insert(subnet.trunc())
    }

    /// Remove a subnet from the cache of a vlan, dropping the vlan if it has
    /// no subnets left. Returns true if the subnet was cached.
    pub fn remove(&mut self, vlan: VlanId, subnet: &IpNet) -> bool {
        let Some(subnets) = self.0.get_mut(&vlan) else {
            return false;
        };
        let removed = subnets.remove(&subnet.trunc());
        if subnets.is_empty() {
            self.0.remove(&vlan);
        }
        removed
    }

    /// Remove a vlan and return the subnets that were cached for it
    pub fn remove_vlan(&mut self, vlan: VlanId) -> BTreeSet<IpNet> {
        self.0.remove(&vlan).unwrap_or_default()
    }

    /// Tell if an address belongs to some subnet cached for a vlan
    #[must_use]
    pub fn covers(&self, vlan: VlanId, addr: &IpAddr) -> bool {
        self.0
            .get(&vlan)
            .is_some_and(|subnets| subnets.iter().any(|subnet| subnet.contains(addr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vid(id: u16) -> VlanId {
        VlanId::new(id).expect("Bad vlan")
    }
    fn net(s: &str) -> IpNet {
        s.parse().expect("Bad subnet")
    }
    fn addr(s: &str) -> IpAddr {
        s.parse().expect("Bad address")
    }

    #[test]
    fn test_subnet_cache() {
        let mut cache = SubnetCache::new();
        assert!(cache.is_empty());
        assert!(!cache.covers(vid(10), &addr("10.0.0.5")));

        // host bits are cleared on insertion
        assert!(cache.insert(vid(10), net("10.0.0.1/24")));
        assert!(!cache.insert(vid(10), net("10.0.0.0/24")));
        assert!(cache.insert(vid(10), net("2001:db8::1/64")));
        assert_eq!(cache.get(vid(10)).map(BTreeSet::len), Some(2));

        assert!(cache.covers(vid(10), &addr("10.0.0.5")));
        assert!(cache.covers(vid(10), &addr("2001:db8::5")));
        assert!(!cache.covers(vid(10), &addr("10.0.1.5")));
        assert!(!cache.covers(vid(20), &addr("10.0.0.5")));

        assert!(cache.remove(vid(10), &net("10.0.0.1/24")));
        assert!(!cache.remove(vid(10), &net("10.0.0.1/24")));
        assert!(cache.contains_vlan(vid(10)));

        // the last subnet takes the vlan with it
        assert!(cache.remove(vid(10), &net("2001:db8::/64")));
        assert!(!cache.contains_vlan(vid(10)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_subnet_cache_remove_vlan() {
        let mut cache = SubnetCache::new();
        cache.insert(vid(10), net("10.0.0.1/24"));
        cache.insert(vid(20), net("10.0.1.1/24"));
        let removed = cache.remove_vlan(vid(10));
        assert_eq!(removed.into_iter().collect::<Vec<_>>(), vec![net("10.0.0.0/24")]);
        assert!(cache.remove_vlan(vid(10)).is_empty());
        assert_eq!(cache.len(), 1);
    }
}
