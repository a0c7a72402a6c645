// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Switch state snapshots.
//!
//! A [`SwitchState`] is an immutable value once published (wrapped in an [`Arc`]).
//! Successor snapshots are built by cloning a published one (which only clones
//! the top-level maps of [`Arc`]s) and mutating the clone: objects are copied on
//! write, so unmodified objects stay shared between snapshots. This sharing is
//! what makes computing deltas between two snapshots cheap.

use crate::errors::StateError;
use crate::family::AddressFamily;
use crate::ids::{InterfaceId, PortId, RouterId, VlanId};
use crate::interface::Interface;
use crate::port::Port;
use crate::route::{Route, RouteTable};
use crate::vlan::{NeighborEntry, Vlan};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchState {
    pub(crate) ports: BTreeMap<PortId, Arc<Port>>,
    pub(crate) vlans: BTreeMap<VlanId, Arc<Vlan>>,
    pub(crate) interfaces: BTreeMap<InterfaceId, Arc<Interface>>,
    pub(crate) route_tables: BTreeMap<RouterId, Arc<RouteTable>>,
}

impl SwitchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze this state so that it can be shared
    #[must_use]
    pub fn publish(self) -> Arc<Self> {
        Arc::new(self)
    }

    //////////////////////////////////////////////////////////////////
    // Ports
    //////////////////////////////////////////////////////////////////
    #[must_use]
    pub fn get_port(&self, id: PortId) -> Option<&Arc<Port>> {
        self.ports.get(&id)
    }
    pub fn ports(&self) -> impl Iterator<Item = &Arc<Port>> {
        self.ports.values()
    }
    pub fn add_port(&mut self, port: Port) {
        self.ports.insert(port.id, Arc::new(port));
    }
    pub fn del_port(&mut self, id: PortId) -> Option<Arc<Port>> {
        self.ports.remove(&id)
    }
    /// Get a mutable reference to a [`Port`], copying it if shared
    ///
    /// # Errors
    ///
    /// Fails if the port does not exist
    pub fn port_mut(&mut self, id: PortId) -> Result<&mut Port, StateError> {
        self.ports
            .get_mut(&id)
            .map(Arc::make_mut)
            .ok_or(StateError::NoSuchPort(id))
    }

    //////////////////////////////////////////////////////////////////
    // Vlans
    //////////////////////////////////////////////////////////////////
    #[must_use]
    pub fn get_vlan(&self, id: VlanId) -> Option<&Arc<Vlan>> {
        self.vlans.get(&id)
    }
    pub fn vlans(&self) -> impl Iterator<Item = &Arc<Vlan>> {
        self.vlans.values()
    }
    pub fn add_vlan(&mut self, vlan: Vlan) {
        self.vlans.insert(vlan.id, Arc::new(vlan));
    }
    pub fn del_vlan(&mut self, id: VlanId) -> Option<Arc<Vlan>> {
        self.vlans.remove(&id)
    }
    /// Get a mutable reference to a [`Vlan`], copying it if shared
    ///
    /// # Errors
    ///
    /// Fails if the vlan does not exist
    pub fn vlan_mut(&mut self, id: VlanId) -> Result<&mut Vlan, StateError> {
        self.vlans
            .get_mut(&id)
            .map(Arc::make_mut)
            .ok_or(StateError::NoSuchVlan(id))
    }

    //////////////////////////////////////////////////////////////////
    // Interfaces
    //////////////////////////////////////////////////////////////////
    #[must_use]
    pub fn get_interface(&self, id: InterfaceId) -> Option<&Arc<Interface>> {
        self.interfaces.get(&id)
    }
    pub fn interfaces(&self) -> impl Iterator<Item = &Arc<Interface>> {
        self.interfaces.values()
    }
    pub fn add_interface(&mut self, interface: Interface) {
        self.interfaces.insert(interface.id, Arc::new(interface));
    }
    pub fn del_interface(&mut self, id: InterfaceId) -> Option<Arc<Interface>> {
        self.interfaces.remove(&id)
    }
    /// Get a mutable reference to an [`Interface`], copying it if shared
    ///
    /// # Errors
    ///
    /// Fails if the interface does not exist
    pub fn interface_mut(&mut self, id: InterfaceId) -> Result<&mut Interface, StateError> {
        self.interfaces
            .get_mut(&id)
            .map(Arc::make_mut)
            .ok_or(StateError::NoSuchInterface(id))
    }

    //////////////////////////////////////////////////////////////////
    // Route tables
    //////////////////////////////////////////////////////////////////
    #[must_use]
    pub fn get_route_table(&self, id: RouterId) -> Option<&Arc<RouteTable>> {
        self.route_tables.get(&id)
    }
    pub fn route_tables(&self) -> impl Iterator<Item = &Arc<RouteTable>> {
        self.route_tables.values()
    }
    pub fn del_route_table(&mut self, id: RouterId) -> Option<Arc<RouteTable>> {
        self.route_tables.remove(&id)
    }
    /// Get a mutable reference to the [`RouteTable`] of a router, creating it if needed
    pub fn route_table_mut(&mut self, id: RouterId) -> &mut RouteTable {
        let table = self
            .route_tables
            .entry(id)
            .or_insert_with(|| Arc::new(RouteTable::new(id)));
        Arc::make_mut(table)
    }

    //////////////////////////////////////////////////////////////////
    // Shortcuts to build successor states
    //////////////////////////////////////////////////////////////////

    /// Add or replace a neighbor entry in a vlan
    ///
    /// # Errors
    ///
    /// Fails if the vlan does not exist
    pub fn add_neighbor<F: AddressFamily>(
        &mut self,
        vlan: VlanId,
        entry: NeighborEntry<F::Addr>,
    ) -> Result<(), StateError> {
        F::neighbors_mut(self.vlan_mut(vlan)?).add_entry(entry);
        Ok(())
    }

    /// Remove a neighbor entry from a vlan
    ///
    /// # Errors
    ///
    /// Fails if the vlan does not exist
    pub fn del_neighbor<F: AddressFamily>(
        &mut self,
        vlan: VlanId,
        ip: F::Addr,
    ) -> Result<Option<Arc<NeighborEntry<F::Addr>>>, StateError> {
        Ok(F::neighbors_mut(self.vlan_mut(vlan)?).del_entry(&ip))
    }

    /// Add or replace a route in the table of a router
    pub fn add_route<F: AddressFamily>(&mut self, router: RouterId, route: Route<F::Prefix>) {
        F::rib_mut(self.route_table_mut(router)).add_route(route);
    }

    /// Remove a route from the table of a router
    ///
    /// # Errors
    ///
    /// Fails if the router has no route table.
    pub fn del_route<F: AddressFamily>(
        &mut self,
        router: RouterId,
        prefix: &F::Prefix,
    ) -> Result<Option<Arc<Route<F::Prefix>>>, StateError> {
        let table = self
            .route_tables
            .get_mut(&router)
            .ok_or(StateError::NoSuchRouteTable(router))?;
        Ok(F::rib_mut(Arc::make_mut(table)).del_route(prefix))
    }

    /// Get the vlan that an interface is bound to
    #[must_use]
    pub fn interface_vlan(&self, id: InterfaceId) -> Option<VlanId> {
        self.interfaces.get(&id).map(|iface| iface.vlan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::V4;
    use crate::route::NextHop;
    use std::sync::Arc;

    #[test]
    fn test_copy_on_write() {
        let vid = VlanId::new(10).unwrap();
        let mut state = SwitchState::new();
        state.add_vlan(Vlan::new(vid, "vlan10"));
        state.add_vlan(Vlan::new(VlanId::new(20).unwrap(), "vlan20"));
        let old = state.publish();

        let mut next = (*old).clone();
        next.vlan_mut(vid).unwrap().name = "renamed".to_owned();
        let new = next.publish();

        assert_eq!(old.get_vlan(vid).unwrap().name, "vlan10");
        assert_eq!(new.get_vlan(vid).unwrap().name, "renamed");

        // the untouched vlan is shared by both snapshots
        let vid20 = VlanId::new(20).unwrap();
        assert!(Arc::ptr_eq(
            old.get_vlan(vid20).unwrap(),
            new.get_vlan(vid20).unwrap()
        ));
    }

    #[test]
    fn test_missing_objects() {
        let mut state = SwitchState::new();
        let vid = VlanId::new(10).unwrap();
        assert_eq!(state.vlan_mut(vid).err(), Some(StateError::NoSuchVlan(vid)));
        assert_eq!(
            state.port_mut(PortId::new(3)).err(),
            Some(StateError::NoSuchPort(PortId::new(3)))
        );
        assert!(state.interface_vlan(InterfaceId::new(1)).is_none());
    }

    #[test]
    fn test_route_shortcuts() {
        let mut state = SwitchState::new();
        let rid = RouterId::new(0);
        let prefix = "10.1.0.0/16".parse().unwrap();
        let nh = NextHop::new("10.0.0.5".parse().unwrap(), InterfaceId::new(10));
        state.add_route::<V4>(rid, Route::resolved(prefix, &[nh]));
        assert_eq!(state.get_route_table(rid).unwrap().v4.len(), 1);
        assert!(state.del_route::<V4>(rid, &prefix).unwrap().is_some());
        assert_eq!(
            state.del_route::<V4>(RouterId::new(1), &prefix),
            Err(StateError::NoSuchRouteTable(RouterId::new(1)))
        );
    }
}
