// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Consistency checks of the indices against a switch state

use crate::errors::ClassIdError;
use crate::ports::vlan_has_lookup_classes;
use crate::scheduler::ClassIdScheduler;
use crate::updater::{LookupClassRouteUpdater, has_neighbor, is_tracked, neighbor_class};
use ipnet::IpNet;
use state::SwitchState;
use tracing::error;

macro_rules! check {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            let msg = format!($($arg)+);
            error!("{msg}");
            return Err(ClassIdError::VerifyFailure(msg));
        }
    };
}

impl<S: ClassIdScheduler> LookupClassRouteUpdater<S> {
    /// Check that the indices are mutually consistent and agree with the
    /// given state, which should be the last state processed.
    ///
    /// # Errors
    ///
    /// Fails with [`ClassIdError::VerifyFailure`] describing the first
    /// inconsistency found.
    pub fn verify(&self, state: &SwitchState) -> Result<(), ClassIdError> {
        self.verify_subnets(state)?;
        self.verify_nexthops(state)?;
        self.verify_routes(state)?;
        self.verify_classified()
    }

    fn verify_subnets(&self, state: &SwitchState) -> Result<(), ClassIdError> {
        for (vlan, subnets) in self.subnets.iter() {
            check!(!subnets.is_empty(), "Vlan {vlan} is cached without subnets");
            check!(
                vlan_has_lookup_classes(state, *vlan),
                "Vlan {vlan} is cached but has no port with lookup classes"
            );
        }
        Ok(())
    }

    fn verify_nexthops(&self, state: &SwitchState) -> Result<(), ClassIdError> {
        for (key, entry) in self.nexthops.iter() {
            check!(
                self.subnets.covers(key.vlan, &key.addr),
                "Next-hop {key} is not in a cached subnet"
            );
            check!(
                !entry.is_empty() || has_neighbor(state, key),
                "Next-hop {key} has neither prefixes nor neighbor"
            );
            for pk in &entry.with {
                check!(
                    !entry.without.contains(pk),
                    "Prefix {pk} is with and without class-id at {key}"
                );
            }
            for pk in entry.prefixes() {
                let candidates = self.registry.candidates(pk).unwrap_or_default();
                check!(
                    candidates.contains(key),
                    "Prefix {pk} at {key} is not registered with that next-hop"
                );
            }
        }
        Ok(())
    }

    fn verify_routes(&self, state: &SwitchState) -> Result<(), ClassIdError> {
        for (pk, candidates) in self.registry.iter() {
            check!(!candidates.is_empty(), "Route {pk} has no candidates");
            let tracked = state
                .get_route_table(pk.router)
                .is_some_and(|table| match pk.prefix {
                    IpNet::V4(p) => table.v4.get_route(&p).is_some_and(|r| is_tracked(r.as_ref())),
                    IpNet::V6(p) => table.v6.get_route(&p).is_some_and(|r| is_tracked(r.as_ref())),
                });
            check!(tracked, "Route {pk} is registered but not in the state");

            let holder = candidates
                .iter()
                .position(|key| neighbor_class(state, key).is_some());
            for (n, key) in candidates.iter().enumerate() {
                check!(
                    !candidates[..n].contains(key),
                    "Route {pk} lists next-hop {key} twice"
                );
                let Some(entry) = self.nexthops.get(key) else {
                    return Err(ClassIdError::NextHopNotIndexed(*key));
                };
                if Some(n) == holder {
                    check!(entry.with.contains(pk), "Route {pk} should inherit from {key}");
                } else {
                    check!(entry.without.contains(pk), "Route {pk} should not inherit from {key}");
                }
            }
            let expected = holder.and_then(|n| neighbor_class(state, &candidates[n]));
            check!(
                self.classified.get(pk) == expected,
                "Route {pk} has class-id {:?} instead of {expected:?}",
                self.classified.get(pk)
            );
        }
        Ok(())
    }

    fn verify_classified(&self) -> Result<(), ClassIdError> {
        for (pk, _) in self.classified.iter() {
            check!(
                self.registry.contains(pk),
                "Classified prefix {pk} is not registered"
            );
        }
        Ok(())
    }
}
