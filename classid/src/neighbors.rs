// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Processing of neighbor (ARP / NDP) changes

use crate::errors::ClassIdError;
use crate::keys::NextHopKey;
use crate::scheduler::ClassIdScheduler;
use crate::updater::LookupClassRouteUpdater;
use state::{AddressFamily, DeltaValue, StateDelta, SwitchState, VlanId};
use tracing::{debug, trace};

impl<S: ClassIdScheduler> LookupClassRouteUpdater<S> {
    /// Process the neighbor changes of one address family, in every vlan
    pub(crate) fn process_neighbors<F: AddressFamily>(
        &mut self,
        delta: &StateDelta,
    ) -> Result<(), ClassIdError> {
        let new = delta.new_state();
        for vlan_delta in delta.vlans_delta() {
            let Some(vlan_id) = vlan_delta.new().or(vlan_delta.old()).map(|v| v.id) else {
                continue;
            };
            for nd in vlan_delta.neighbor_delta::<F>() {
                match &nd {
                    DeltaValue::Added(n) => {
                        if n.port.is_physical() {
                            self.neighbor_added(new, key(n.ip.into(), vlan_id))?;
                        }
                    }
                    DeltaValue::Removed(o) => {
                        if o.port.is_physical() {
                            self.neighbor_removed(new, key(o.ip.into(), vlan_id))?;
                        }
                    }
                    DeltaValue::Changed(o, n) => {
                        let nhkey = key(n.ip.into(), vlan_id);
                        match (o.port.is_physical(), n.port.is_physical()) {
                            (false, false) => {}
                            (false, true) => self.neighbor_added(new, nhkey)?,
                            (true, false) => self.neighbor_removed(new, nhkey)?,
                            (true, true) => {
                                if o.class_id != n.class_id {
                                    debug!(
                                        "{} neighbor {nhkey} class-id {:?} -> {:?}",
                                        F::NAME,
                                        o.class_id,
                                        n.class_id
                                    );
                                    self.neighbor_added(new, nhkey)?;
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// A neighbor appeared or changed class-id: index it if it is covered by
    /// the subnet cache and re-derive the prefixes that reference it.
    fn neighbor_added(&mut self, state: &SwitchState, key: NextHopKey) -> Result<(), ClassIdError> {
        if !self.subnets.covers(key.vlan, &key.addr) {
            trace!("Neighbor {key} is not in a cached subnet");
            return Ok(());
        }
        if self.nexthops.ensure(key) {
            debug!("Indexed next-hop {key}");
        }
        self.rederive_nexthop(state, &key)
    }

    /// A neighbor is gone: the prefixes that inherited from it look for
    /// another candidate.
    fn neighbor_removed(&mut self, state: &SwitchState, key: NextHopKey) -> Result<(), ClassIdError> {
        if !self.nexthops.contains(&key) {
            return Ok(());
        }
        self.rederive_nexthop(state, &key)?;
        if self.nexthops.remove_if_empty(&key) {
            debug!("Next-hop {key} is no longer indexed");
        }
        Ok(())
    }
}

fn key(addr: std::net::IpAddr, vlan: VlanId) -> NextHopKey {
    NextHopKey::new(addr, vlan)
}
