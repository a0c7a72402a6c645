// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Deltas between two switch state snapshots

use crate::family::AddressFamily;
use crate::ids::RouterId;
use crate::interface::Interface;
use crate::port::Port;
use crate::route::{Route, RouteTable};
use crate::switch::SwitchState;
use crate::vlan::{NeighborEntry, Vlan};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A change to one object between two snapshots. Objects which did not
/// change are never represented.
#[derive(Debug, Clone)]
pub enum DeltaValue<T> {
    Added(Arc<T>),
    Removed(Arc<T>),
    Changed(Arc<T>, Arc<T>),
}

impl<T> DeltaValue<T> {
    /// The object in the old snapshot, if it existed
    #[must_use]
    pub fn old(&self) -> Option<&Arc<T>> {
        match self {
            DeltaValue::Added(_) => None,
            DeltaValue::Removed(old) | DeltaValue::Changed(old, _) => Some(old),
        }
    }
    /// The object in the new snapshot, if it exists
    #[must_use]
    pub fn new(&self) -> Option<&Arc<T>> {
        match self {
            DeltaValue::Removed(_) => None,
            DeltaValue::Added(new) | DeltaValue::Changed(_, new) => Some(new),
        }
    }
}

/// Compute the changes between two maps of shared objects, in key order.
/// Objects shared by both maps are skipped without being compared.
fn map_delta<K: Ord, V: PartialEq>(
    old: Option<&BTreeMap<K, Arc<V>>>,
    new: Option<&BTreeMap<K, Arc<V>>>,
) -> Vec<DeltaValue<V>> {
    let mut out = Vec::new();
    let mut old_it = old.into_iter().flat_map(BTreeMap::iter).peekable();
    let mut new_it = new.into_iter().flat_map(BTreeMap::iter).peekable();
    loop {
        let order = match (old_it.peek(), new_it.peek()) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((ko, _)), Some((kn, _))) => ko.cmp(kn),
        };
        match order {
            Ordering::Less => {
                if let Some((_, o)) = old_it.next() {
                    out.push(DeltaValue::Removed(o.clone()));
                }
            }
            Ordering::Greater => {
                if let Some((_, n)) = new_it.next() {
                    out.push(DeltaValue::Added(n.clone()));
                }
            }
            Ordering::Equal => {
                if let (Some((_, o)), Some((_, n))) = (old_it.next(), new_it.next()) {
                    if !Arc::ptr_eq(o, n) && o != n {
                        out.push(DeltaValue::Changed(o.clone(), n.clone()));
                    }
                }
            }
        }
    }
    out
}

/// The transition between an old and a new switch state
#[derive(Debug, Clone)]
pub struct StateDelta {
    old: Arc<SwitchState>,
    new: Arc<SwitchState>,
}

impl StateDelta {
    #[must_use]
    pub fn new(old: Arc<SwitchState>, new: Arc<SwitchState>) -> Self {
        Self { old, new }
    }
    #[must_use]
    pub fn old_state(&self) -> &Arc<SwitchState> {
        &self.old
    }
    #[must_use]
    pub fn new_state(&self) -> &Arc<SwitchState> {
        &self.new
    }
    #[must_use]
    pub fn ports_delta(&self) -> Vec<DeltaValue<Port>> {
        map_delta(Some(&self.old.ports), Some(&self.new.ports))
    }
    #[must_use]
    pub fn interfaces_delta(&self) -> Vec<DeltaValue<Interface>> {
        map_delta(Some(&self.old.interfaces), Some(&self.new.interfaces))
    }
    #[must_use]
    pub fn vlans_delta(&self) -> Vec<VlanDelta> {
        map_delta(Some(&self.old.vlans), Some(&self.new.vlans))
            .into_iter()
            .map(VlanDelta)
            .collect()
    }
    #[must_use]
    pub fn route_tables_delta(&self) -> Vec<RouteTableDelta> {
        map_delta(Some(&self.old.route_tables), Some(&self.new.route_tables))
            .into_iter()
            .map(RouteTableDelta)
            .collect()
    }
}

/// The change of one vlan. Gives access to the changes of its neighbor tables.
#[derive(Debug, Clone)]
pub struct VlanDelta(pub DeltaValue<Vlan>);

impl VlanDelta {
    #[must_use]
    pub fn old(&self) -> Option<&Arc<Vlan>> {
        self.0.old()
    }
    #[must_use]
    pub fn new(&self) -> Option<&Arc<Vlan>> {
        self.0.new()
    }
    /// The neighbor changes of the given family. If the vlan was added (removed)
    /// all of its neighbors are reported as added (removed).
    #[must_use]
    pub fn neighbor_delta<F: AddressFamily>(&self) -> Vec<DeltaValue<NeighborEntry<F::Addr>>> {
        map_delta(
            self.old().map(|v| F::neighbors(v).as_map()),
            self.new().map(|v| F::neighbors(v).as_map()),
        )
    }
}

/// The change of one route table. Gives access to the changes of its routes.
#[derive(Debug, Clone)]
pub struct RouteTableDelta(pub DeltaValue<RouteTable>);

impl RouteTableDelta {
    #[must_use]
    pub fn old(&self) -> Option<&Arc<RouteTable>> {
        self.0.old()
    }
    #[must_use]
    pub fn new(&self) -> Option<&Arc<RouteTable>> {
        self.0.new()
    }
    #[must_use]
    pub fn router(&self) -> RouterId {
        match &self.0 {
            DeltaValue::Added(t) | DeltaValue::Removed(t) | DeltaValue::Changed(_, t) => t.id,
        }
    }
    /// The route changes of the given family. If the table was added (removed)
    /// all of its routes are reported as added (removed).
    #[must_use]
    pub fn routes_delta<F: AddressFamily>(&self) -> Vec<DeltaValue<Route<F::Prefix>>> {
        map_delta(
            self.old().map(|t| F::rib(t).as_map()),
            self.new().map(|t| F::rib(t).as_map()),
        )
    }
}
