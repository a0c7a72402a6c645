// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Keys of the class-id indices

use ipnet::IpNet;
use state::{RouterId, VlanId};
use std::fmt::Display;
use std::net::IpAddr;

/// A next-hop reachable on a specific vlan
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NextHopKey {
    pub addr: IpAddr,
    pub vlan: VlanId,
}
impl NextHopKey {
    #[must_use]
    pub fn new(addr: IpAddr, vlan: VlanId) -> Self {
        Self { addr, vlan }
    }
}

/// A routed prefix, unique within a router instance
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PrefixKey {
    pub router: RouterId,
    pub prefix: IpNet,
}
impl PrefixKey {
    #[must_use]
    pub fn new(router: RouterId, prefix: impl Into<IpNet>) -> Self {
        Self {
            router,
            prefix: prefix.into(),
        }
    }
}

impl Display for NextHopKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} vlan {}", self.addr, self.vlan)
    }
}
impl Display for PrefixKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (router {})", self.prefix, self.router)
    }
}
