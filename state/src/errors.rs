// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The error results used by this library.

use crate::ids::{InterfaceId, PortId, RouterId, VlanId};
use thiserror::Error;

/// Errors which can occur when converting a `u16` to a validated [`VlanId`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[must_use]
pub enum InvalidVlanId {
    /// 0 is a reserved VLAN id which means "the native vlan".
    #[error("Zero is a reserved vlan id")]
    Zero,
    #[error("4095 is a reserved vlan id")]
    Reserved,
    #[error("{0} is too large to be a legal vlan id ({MAX} is max legal value)", MAX = VlanId::MAX)]
    TooLarge(u16),
}

/// Errors raised when building switch state snapshots
#[derive(Error, Debug, PartialEq)]
pub enum StateError {
    #[error("No port with id {0}")]
    NoSuchPort(PortId),

    #[error("No vlan with id {0}")]
    NoSuchVlan(VlanId),

    #[error("No interface with id {0}")]
    NoSuchInterface(InterfaceId),

    #[error("No route table for router {0}")]
    NoSuchRouteTable(RouterId),

    #[error("Invalid vlan id: {0}")]
    InvalidVlan(#[from] InvalidVlanId),
}
