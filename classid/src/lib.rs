// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A library to derive the class-id of routes from the class-id of the
//! neighbors they resolve through, so that per-host traffic can be steered
//! to dedicated queues.
//!
//! The [`LookupClassRouteUpdater`] consumes [`state::StateDelta`]s and keeps
//! a few indices up to date incrementally:
//!   - a [`SubnetCache`] of the subnets reachable over ports with lookup classes,
//!   - a [`NextHopIndex`] of the prefixes that reference each next-hop,
//!   - the [`ClassifiedPrefixes`] and the [`RouteRegistry`].
//!
//! Whenever the class-id of a route changes, a [`RouteClassIdUpdate`] is handed
//! to a [`ClassIdScheduler`].

#![deny(clippy::all)]
#![allow(clippy::similar_names)]

mod classified;
mod display;
mod errors;
mod keys;
mod neighbors;
mod nexthops;
mod params;
mod ports;
mod pretty_utils;
mod registry;
mod routes;
mod scheduler;
mod subnets;
mod updater;
mod verify;


// re-exports
pub use classified::ClassifiedPrefixes;
pub use errors::ClassIdError;
pub use keys::{NextHopKey, PrefixKey};
pub use nexthops::{NextHopIndex, NextHopPrefixes};
pub use params::{ClassIdParams, ClassIdParamsBuilder};
pub use registry::RouteRegistry;
pub use scheduler::{ClassIdScheduler, ClassIdUpdateSender, RouteClassIdUpdate};
pub use subnets::SubnetCache;
pub use updater::LookupClassRouteUpdater;
