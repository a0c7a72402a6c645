// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vlans and their neighbor (ARP / NDP) tables

use crate::ids::{ClassId, InterfaceId, PortId, VlanId};
use crate::port::PortVlanInfo;
use mac_address::MacAddress;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// The port a neighbor was learnt on. Neighbors can be reached over a
/// physical port or over an aggregate (LAG).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PortDescriptor {
    Physical(PortId),
    Aggregate(u16),
}
impl PortDescriptor {
    #[must_use]
    pub fn is_physical(&self) -> bool {
        matches!(self, PortDescriptor::Physical(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Object that represents a resolved ARP or NDP entry
pub struct NeighborEntry<A> {
    pub ip: A,
    pub mac: MacAddress,
    pub port: PortDescriptor,
    pub interface: InterfaceId,
    pub class_id: Option<ClassId>,
}

impl<A> NeighborEntry<A> {
    #[must_use]
    pub fn new(ip: A, mac: MacAddress, port: PortDescriptor, interface: InterfaceId) -> Self {
        Self {
            ip,
            mac,
            port,
            interface,
            class_id: None,
        }
    }
    #[must_use]
    pub fn with_class_id(mut self, class_id: Option<ClassId>) -> Self {
        self.class_id = class_id;
        self
    }
}

/// The subset of a neighbor entry that is independent of its address family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborInfo {
    pub port: PortDescriptor,
    pub class_id: Option<ClassId>,
}

/// A table of neighbor entries of one address family, keyed by address
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborTable<A: Ord>(BTreeMap<A, Arc<NeighborEntry<A>>>);

impl<A: Ord> Default for NeighborTable<A> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<A: Ord + Copy> NeighborTable<A> {
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
    pub fn add_entry(&mut self, entry: NeighborEntry<A>) {
        self.0.insert(entry.ip, Arc::new(entry));
    }
    pub fn del_entry(&mut self, ip: &A) -> Option<Arc<NeighborEntry<A>>> {
        self.0.remove(ip)
    }
    #[must_use]
    pub fn get_entry(&self, ip: &A) -> Option<&Arc<NeighborEntry<A>>> {
        self.0.get(ip)
    }
    pub fn values(&self) -> impl Iterator<Item = &Arc<NeighborEntry<A>>> {
        self.0.values()
    }
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<A, Arc<NeighborEntry<A>>> {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vlan {
    pub id: VlanId,
    pub name: String,
    pub interface: Option<InterfaceId>,
    pub ports: BTreeMap<PortId, PortVlanInfo>,
    pub arp: NeighborTable<Ipv4Addr>,
    pub ndp: NeighborTable<Ipv6Addr>,
}

impl Vlan {
    #[must_use]
    pub fn new(id: VlanId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            interface: None,
            ports: BTreeMap::new(),
            arp: NeighborTable::new(),
            ndp: NeighborTable::new(),
        }
    }
    #[must_use]
    pub fn with_interface(mut self, interface: InterfaceId) -> Self {
        self.interface = Some(interface);
        self
    }
    #[must_use]
    pub fn with_port(mut self, port: PortId, tagged: bool) -> Self {
        self.ports.insert(port, PortVlanInfo { tagged });
        self
    }
    pub fn add_port(&mut self, port: PortId, tagged: bool) {
        self.ports.insert(port, PortVlanInfo { tagged });
    }
    pub fn del_port(&mut self, port: PortId) {
        self.ports.remove(&port);
    }

    /// Look up the neighbor entry of an address, in the table of its family
    #[must_use]
    pub fn get_neighbor(&self, ip: IpAddr) -> Option<NeighborInfo> {
        match ip {
            IpAddr::V4(a) => self.arp.get_entry(&a).map(|e| NeighborInfo {
                port: e.port,
                class_id: e.class_id,
            }),
            IpAddr::V6(a) => self.ndp.get_entry(&a).map(|e| NeighborInfo {
                port: e.port,
                class_id: e.class_id,
            }),
        }
    }
}
