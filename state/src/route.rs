// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Routes and per-router route tables

use crate::ids::{InterfaceId, RouterId};
use ipnet::{Ipv4Net, Ipv6Net};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;

/// A resolved next-hop: an address and the interface to reach it over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NextHop {
    pub addr: IpAddr,
    pub interface: InterfaceId,
    pub weight: u32,
}
impl NextHop {
    #[must_use]
    pub fn new(addr: IpAddr, interface: InterfaceId) -> Self {
        Self {
            addr,
            interface,
            weight: 0,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    #[default]
    Drop,
    ToCpu,
    Nexthops,
}

/// A route, as found in the forwarding table of a router. The order of the
/// next-hops is the order in which the forwarding layer resolved them and
/// must be preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<P> {
    pub prefix: P,
    pub action: RouteAction,
    pub nexthops: Vec<NextHop>,
    pub resolved: bool,
}

impl<P> Route<P> {
    /// Build a resolved route forwarding to the given next-hops
    #[must_use]
    pub fn resolved(prefix: P, nexthops: &[NextHop]) -> Self {
        Self {
            prefix,
            action: RouteAction::Nexthops,
            nexthops: nexthops.to_vec(),
            resolved: true,
        }
    }
    /// Build a route whose next-hops have not been resolved (yet)
    #[must_use]
    pub fn unresolved(prefix: P, nexthops: &[NextHop]) -> Self {
        Self {
            prefix,
            action: RouteAction::Nexthops,
            nexthops: nexthops.to_vec(),
            resolved: false,
        }
    }
    /// Build a resolved route punting to the control plane
    #[must_use]
    pub fn to_cpu(prefix: P) -> Self {
        Self {
            prefix,
            action: RouteAction::ToCpu,
            nexthops: vec![],
            resolved: true,
        }
    }
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }
    #[must_use]
    pub fn is_to_cpu(&self) -> bool {
        self.action == RouteAction::ToCpu
    }
    /// Tell if two routes forward the same way. Next-hop order matters.
    #[must_use]
    pub fn same_forwarding(&self, other: &Self) -> bool {
        self.action == other.action && self.nexthops == other.nexthops
    }
}

/// The routes of one address family in a router
#[derive(Debug, Clone, PartialEq)]
pub struct Rib<P: Ord>(BTreeMap<P, Arc<Route<P>>>);

impl<P: Ord> Default for Rib<P> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<P: Ord + Copy> Rib<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn add_route(&mut self, route: Route<P>) {
        self.0.insert(route.prefix, Arc::new(route));
    }
    pub fn del_route(&mut self, prefix: &P) -> Option<Arc<Route<P>>> {
        self.0.remove(prefix)
    }
    #[must_use]
    pub fn get_route(&self, prefix: &P) -> Option<&Arc<Route<P>>> {
        self.0.get(prefix)
    }
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route<P>>> {
        self.0.values()
    }
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<P, Arc<Route<P>>> {
        &self.0
    }
}

/// The forwarding tables of a router instance
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    pub id: RouterId,
    pub v4: Rib<Ipv4Net>,
    pub v6: Rib<Ipv6Net>,
}

impl RouteTable {
    #[must_use]
    pub fn new(id: RouterId) -> Self {
        Self {
            id,
            v4: Rib::new(),
            v6: Rib::new(),
        }
    }
}
