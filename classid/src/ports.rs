// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Processing of port and interface changes: maintenance of the subnet cache

use crate::errors::ClassIdError;
use crate::scheduler::ClassIdScheduler;
use crate::updater::LookupClassRouteUpdater;
use ipnet::IpNet;
use state::{DeltaValue, Interface, Port, StateDelta, SwitchState, VlanId};
use std::collections::BTreeSet;
use tracing::{debug, info};

impl<S: ClassIdScheduler> LookupClassRouteUpdater<S> {
    pub(crate) fn process_ports(&mut self, delta: &StateDelta) -> Result<(), ClassIdError> {
        let new = delta.new_state();
        for port_delta in delta.ports_delta() {
            match &port_delta {
                DeltaValue::Added(port) => self.port_added(new, port, false),
                DeltaValue::Removed(port) => self.port_removed(new, port)?,
                DeltaValue::Changed(old, port) => self.port_changed(new, old, port)?,
            }
        }
        Ok(())
    }

    /// Cache the subnets of the vlans of a port with lookup classes.
    /// A full pass is requested if some subnet is new and `rederive` is set
    /// (or configured).
    fn port_added(&mut self, state: &SwitchState, port: &Port, rederive: bool) {
        if !port.has_lookup_classes() {
            return;
        }
        debug!("Port {} with lookup classes added", port.name);
        let mut new_subnets = false;
        for vlan_id in port.vlans.keys() {
            let Some(vlan) = state.get_vlan(*vlan_id) else {
                debug!("Vlan {vlan_id} of port {} does not exist", port.name);
                continue;
            };
            let Some(interface) = vlan.interface.and_then(|id| state.get_interface(id)) else {
                debug!("Vlan {vlan_id} has no interface");
                continue;
            };
            for subnet in interface.subnets() {
                new_subnets |= self.subnets.insert(*vlan_id, subnet);
            }
        }
        if new_subnets && (rederive || self.params.rederive_on_port_add) {
            self.full_pass = true;
        }
    }

    /// Drop the subnets of the vlans of a port that no longer have any port
    /// with lookup classes.
    fn port_removed(&mut self, state: &SwitchState, port: &Port) -> Result<(), ClassIdError> {
        if !port.has_lookup_classes() {
            return Ok(());
        }
        debug!("Port {} with lookup classes removed", port.name);
        for vlan_id in port.vlans.keys() {
            if !self.subnets.contains_vlan(*vlan_id) {
                continue;
            }
            if vlan_has_lookup_classes(state, *vlan_id) {
                debug!("Vlan {vlan_id} still has ports with lookup classes");
                continue;
            }
            let subnets = self.subnets.remove_vlan(*vlan_id);
            info!("Vlan {vlan_id} loses {} subnets", subnets.len());
            self.purge_uncovered(state, *vlan_id)?;
        }
        Ok(())
    }

    fn port_changed(
        &mut self,
        state: &SwitchState,
        old: &Port,
        new: &Port,
    ) -> Result<(), ClassIdError> {
        match (old.has_lookup_classes(), new.has_lookup_classes()) {
            (false, false) => {}
            (false, true) => self.port_added(state, new, true),
            (true, false) => self.port_removed(state, old)?,
            (true, true) => {
                if old.vlans.keys().eq(new.vlans.keys()) {
                    return Ok(());
                }
                self.port_removed(state, old)?;
                self.port_added(state, new, true);
            }
        }
        Ok(())
    }

    //////////////////////////////////////////////////////////////////
    // Interfaces
    //////////////////////////////////////////////////////////////////

    pub(crate) fn process_interfaces(&mut self, delta: &StateDelta) -> Result<(), ClassIdError> {
        let new = delta.new_state();
        for iface_delta in delta.interfaces_delta() {
            let old = iface_delta
                .old()
                .map(|i| interface_subnets(i))
                .unwrap_or_default();
            let cur = iface_delta
                .new()
                .map(|i| interface_subnets(i))
                .unwrap_or_default();

            let removed: Vec<_> = old.difference(&cur).copied().collect();
            let added: Vec<_> = cur.difference(&old).copied().collect();
            self.interface_subnets_removed(new, &removed)?;
            self.interface_subnets_added(new, &added);
        }
        Ok(())
    }

    fn interface_subnets_removed(
        &mut self,
        state: &SwitchState,
        removed: &[(VlanId, IpNet)],
    ) -> Result<(), ClassIdError> {
        let mut touched = BTreeSet::new();
        for (vlan_id, subnet) in removed {
            if self.subnets.remove(*vlan_id, subnet) {
                debug!("Subnet {subnet} removed from vlan {vlan_id}");
                touched.insert(*vlan_id);
            }
        }
        for vlan_id in touched {
            self.purge_uncovered(state, vlan_id)?;
        }
        Ok(())
    }

    fn interface_subnets_added(&mut self, state: &SwitchState, added: &[(VlanId, IpNet)]) {
        for (vlan_id, subnet) in added {
            if !self.subnets.contains_vlan(*vlan_id) && !vlan_has_lookup_classes(state, *vlan_id) {
                continue;
            }
            if self.subnets.insert(*vlan_id, *subnet) {
                debug!("Subnet {subnet} added to vlan {vlan_id}");
                self.full_pass = true;
            }
        }
    }
}

/// The subnets of an interface, tagged with its vlan
fn interface_subnets(interface: &Interface) -> BTreeSet<(VlanId, IpNet)> {
    interface
        .subnets()
        .map(|subnet| (interface.vlan, subnet))
        .collect()
}

/// Tell if some port of a vlan has lookup classes
pub(crate) fn vlan_has_lookup_classes(state: &SwitchState, vlan: VlanId) -> bool {
    state
        .ports()
        .any(|port| port.is_member(vlan) && port.has_lookup_classes())
}
