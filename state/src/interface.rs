// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Routed interfaces

use crate::ids::{InterfaceId, RouterId, VlanId};
use ipnet::IpNet;
use std::collections::BTreeSet;

/// A layer-3 interface. Every interface is bound to a vlan and to a router
/// instance, and has zero or more addresses configured. Addresses are kept
/// with their host bits (e.g. 10.0.0.1/24).
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub id: InterfaceId,
    pub name: String,
    pub router: RouterId,
    pub vlan: VlanId,
    pub addresses: BTreeSet<IpNet>,
}

impl Interface {
    #[must_use]
    pub fn new(id: InterfaceId, name: &str, router: RouterId, vlan: VlanId) -> Self {
        Self {
            id,
            name: name.to_owned(),
            router,
            vlan,
            addresses: BTreeSet::new(),
        }
    }
    #[must_use]
    pub fn with_address(mut self, address: IpNet) -> Self {
        self.addresses.insert(address);
        self
    }
    pub fn add_address(&mut self, address: IpNet) -> bool {
        self.addresses.insert(address)
    }
    pub fn del_address(&mut self, address: &IpNet) -> bool {
        self.addresses.remove(address)
    }

    /// The subnets (addresses with host bits cleared) connected to this interface
    pub fn subnets(&self) -> impl Iterator<Item = IpNet> + '_ {
        self.addresses.iter().map(IpNet::trunc)
    }
}
