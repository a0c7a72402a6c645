// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Address families. Consumers of the switch state implement their logic once,
//! generic over an [`AddressFamily`], instead of once per IP version.

use crate::route::{Rib, RouteTable};
use crate::vlan::{NeighborTable, Vlan};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::fmt::{Debug, Display};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub trait AddressFamily: 'static {
    /// The address type, e.g. [`Ipv4Addr`]
    type Addr: Copy + Ord + Debug + Display + Into<IpAddr>;
    /// The prefix type, e.g. [`Ipv4Net`]
    type Prefix: Copy + Ord + Debug + Display + Into<IpNet>;

    const NAME: &'static str;

    /// The neighbor table (ARP or NDP) of this family in a vlan
    fn neighbors(vlan: &Vlan) -> &NeighborTable<Self::Addr>;
    fn neighbors_mut(vlan: &mut Vlan) -> &mut NeighborTable<Self::Addr>;

    /// The routes of this family in a route table
    fn rib(table: &RouteTable) -> &Rib<Self::Prefix>;
    fn rib_mut(table: &mut RouteTable) -> &mut Rib<Self::Prefix>;
}

/// IPv4: ARP neighbors
#[derive(Debug)]
pub enum V4 {}

/// IPv6: NDP neighbors
#[derive(Debug)]
pub enum V6 {}

impl AddressFamily for V4 {
    type Addr = Ipv4Addr;
    type Prefix = Ipv4Net;
    const NAME: &'static str = "ipv4";

    fn neighbors(vlan: &Vlan) -> &NeighborTable<Ipv4Addr> {
        &vlan.arp
    }
    fn neighbors_mut(vlan: &mut Vlan) -> &mut NeighborTable<Ipv4Addr> {
        &mut vlan.arp
    }
    fn rib(table: &RouteTable) -> &Rib<Ipv4Net> {
        &table.v4
    }
    fn rib_mut(table: &mut RouteTable) -> &mut Rib<Ipv4Net> {
        &mut table.v4
    }
}

impl AddressFamily for V6 {
    type Addr = Ipv6Addr;
    type Prefix = Ipv6Net;
    const NAME: &'static str = "ipv6";

    fn neighbors(vlan: &Vlan) -> &NeighborTable<Ipv6Addr> {
        &vlan.ndp
    }
    fn neighbors_mut(vlan: &mut Vlan) -> &mut NeighborTable<Ipv6Addr> {
        &mut vlan.ndp
    }
    fn rib(table: &RouteTable) -> &Rib<Ipv6Net> {
        &table.v6
    }
    fn rib_mut(table: &mut RouteTable) -> &mut Rib<Ipv6Net> {
        &mut table.v6
    }
}
