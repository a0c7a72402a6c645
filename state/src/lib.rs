// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Immutable switch state snapshots and the deltas between them.
//!
//! This is the view of the switch that the agent's processing stages consume:
//! ports and their vlan membership, vlans with their neighbor tables, routed
//! interfaces and the route tables of every router instance.

#![deny(clippy::all)]

pub mod delta;
mod errors;
pub mod family;
pub mod ids;
pub mod interface;
pub mod port;
pub mod route;
pub mod switch;
pub mod vlan;

// re-exports
pub use delta::{DeltaValue, RouteTableDelta, StateDelta, VlanDelta};
pub use errors::{InvalidVlanId, StateError};
pub use family::{AddressFamily, V4, V6};
pub use ids::{ClassId, InterfaceId, PortId, RouterId, VlanId};
pub use interface::Interface;
pub use port::{Port, PortVlanInfo};
pub use route::{NextHop, Rib, Route, RouteAction, RouteTable};
pub use switch::SwitchState;
pub use vlan::{NeighborEntry, NeighborInfo, NeighborTable, PortDescriptor, Vlan};
