// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Module that implements Display for the class-id indices

use crate::classified::ClassifiedPrefixes;
use crate::nexthops::{NextHopIndex, NextHopPrefixes};
use crate::pretty_utils::{Frame, Heading, line};
use crate::registry::RouteRegistry;
use crate::scheduler::ClassIdScheduler;
use crate::subnets::SubnetCache;
use crate::updater::LookupClassRouteUpdater;
use std::fmt::Display;

impl Display for SubnetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Heading(format!("Subnet cache ({} vlans)", self.len())).fmt(f)?;
        let mut vlans: Vec<_> = self.iter().collect();
        vlans.sort_by_key(|(vlan, _)| **vlan);
        for (vlan, subnets) in vlans {
            write!(f, "  vlan {vlan:>4}:")?;
            for subnet in subnets {
                write!(f, " {subnet}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for NextHopPrefixes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for pk in &self.with {
            writeln!(f, "      + {pk}")?;
        }
        for pk in &self.without {
            writeln!(f, "      - {pk}")?;
        }
        Ok(())
    }
}

impl Display for NextHopIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Heading(format!("Next-hops ({})", self.len())).fmt(f)?;
        for key in self.keys() {
            if let Some(entry) = self.get(&key) {
                writeln!(
                    f,
                    "  {key} with: {} without: {}",
                    entry.with.len(),
                    entry.without.len()
                )?;
                entry.fmt(f)?;
            }
        }
        Ok(())
    }
}

impl Display for RouteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Heading(format!("Routes ({})", self.len())).fmt(f)?;
        let mut routes: Vec<_> = self.iter().collect();
        routes.sort_by_key(|(pk, _)| **pk);
        for (pk, candidates) in routes {
            write!(f, "  {pk}:")?;
            for key in candidates {
                write!(f, " [{key}]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for ClassifiedPrefixes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Heading(format!("Classified prefixes ({})", self.len())).fmt(f)?;
        for (pk, class_id) in self.iter() {
            writeln!(f, "  {pk} -> {class_id}")?;
        }
        Ok(())
    }
}

impl<S: ClassIdScheduler> Display for LookupClassRouteUpdater<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Frame(format!("Class-id route updater '{}'", self.params.name)).fmt(f)?;
        self.subnets.fmt(f)?;
        self.nexthops.fmt(f)?;
        self.registry.fmt(f)?;
        self.classified.fmt(f)?;
        line(f)
    }
}
