// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Switch ports and their vlan membership

use crate::ids::{ClassId, PortId, VlanId};
use std::collections::BTreeMap;

/// Membership details of a port in a vlan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PortVlanInfo {
    pub tagged: bool,
}

/// Port membership in vlans, keyed by vlan id
pub type VlanMembership = BTreeMap<VlanId, PortVlanInfo>;

#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub vlans: VlanMembership,
    /// Lookup classes to distribute the traffic of this port's hosts on. Only
    /// ports facing multi-host NICs have these configured.
    pub lookup_classes: Vec<ClassId>,
}

impl Port {
    #[must_use]
    pub fn new(id: PortId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            vlans: BTreeMap::new(),
            lookup_classes: Vec::new(),
        }
    }
    #[must_use]
    pub fn with_vlan(mut self, vlan: VlanId, tagged: bool) -> Self {
        self.vlans.insert(vlan, PortVlanInfo { tagged });
        self
    }
    #[must_use]
    pub fn with_lookup_classes(mut self, classes: &[ClassId]) -> Self {
        self.lookup_classes = classes.to_vec();
        self
    }
    pub fn set_lookup_classes(&mut self, classes: &[ClassId]) {
        self.lookup_classes = classes.to_vec();
    }

    /// Tell if per-host classification is enabled on this port
    #[must_use]
    pub fn has_lookup_classes(&self) -> bool {
        !self.lookup_classes.is_empty()
    }
    #[must_use]
    pub fn is_member(&self, vlan: VlanId) -> bool {
        self.vlans.contains_key(&vlan)
    }
}
