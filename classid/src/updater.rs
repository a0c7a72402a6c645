// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The class-id route updater: owns the indices and drives the processing
//! of every state transition.

use crate::classified::ClassifiedPrefixes;
use crate::errors::ClassIdError;
use crate::keys::{NextHopKey, PrefixKey};
use crate::nexthops::NextHopIndex;
use crate::params::ClassIdParams;
use crate::registry::RouteRegistry;
use crate::scheduler::{ClassIdScheduler, PendingUpdates};
use crate::subnets::SubnetCache;
use ipnet::IpNet;
use state::{ClassId, Route, RouterId, StateDelta, SwitchState, V4, V6, VlanId};
use tracing::{debug, info, instrument};

/// Derives the class-id of routes from the class-id of the neighbors they
/// resolve through and requests the corresponding hardware updates.
///
/// Only neighbors reachable over subnets of vlans with a port that has lookup
/// classes configured contribute. The first next-hop of a route (in the
/// route's order) whose neighbor has a class-id determines the class-id of
/// the route.
pub struct LookupClassRouteUpdater<S: ClassIdScheduler> {
    pub(crate) params: ClassIdParams,
    pub(crate) subnets: SubnetCache,
    pub(crate) nexthops: NextHopIndex,
    pub(crate) classified: ClassifiedPrefixes,
    pub(crate) registry: RouteRegistry,
    pub(crate) pending: PendingUpdates,
    pub(crate) full_pass: bool,
    scheduler: S,
}

/// Look up the class-id of the neighbor of a next-hop. Neighbors learnt over
/// aggregate ports never contribute.
pub(crate) fn neighbor_class(state: &SwitchState, key: &NextHopKey) -> Option<ClassId> {
    let info = state.get_vlan(key.vlan)?.get_neighbor(key.addr)?;
    if info.port.is_physical() {
        info.class_id
    } else {
        None
    }
}

/// Tell if a neighbor reachable over a physical port exists for a next-hop
pub(crate) fn has_neighbor(state: &SwitchState, key: &NextHopKey) -> bool {
    state
        .get_vlan(key.vlan)
        .and_then(|vlan| vlan.get_neighbor(key.addr))
        .is_some_and(|info| info.port.is_physical())
}

/// Tell if the updater cares about a route: only routes forwarding to
/// resolved next-hops can inherit a class-id.
pub(crate) fn is_tracked<P>(route: &Route<P>) -> bool {
    route.is_resolved() && !route.is_to_cpu()
}

impl<S: ClassIdScheduler> LookupClassRouteUpdater<S> {
    /// Create an updater delivering its updates to the given scheduler
    pub fn new(params: ClassIdParams, scheduler: S) -> Self {
        debug!("Creating class-id route updater '{}'", params.name);
        Self {
            params,
            subnets: SubnetCache::new(),
            nexthops: NextHopIndex::new(),
            classified: ClassifiedPrefixes::new(),
            registry: RouteRegistry::new(),
            pending: PendingUpdates::default(),
            full_pass: false,
            scheduler,
        }
    }
    #[must_use]
    pub fn params(&self) -> &ClassIdParams {
        &self.params
    }
    #[must_use]
    pub fn subnet_cache(&self) -> &SubnetCache {
        &self.subnets
    }
    #[must_use]
    pub fn nexthop_index(&self) -> &NextHopIndex {
        &self.nexthops
    }
    #[must_use]
    pub fn classified(&self) -> &ClassifiedPrefixes {
        &self.classified
    }
    #[must_use]
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Process a state transition: update every index so that it reflects
    /// the new state and hand the resulting class-id updates to the scheduler.
    ///
    /// # Errors
    ///
    /// Fails with a fatal error if an invariant between the indices is broken.
    /// Fails with a non-fatal error if the scheduler rejects the updates; the
    /// indices reflect the new state in that case.
    #[instrument(level = "debug", skip_all, fields(name = %self.params.name))]
    pub fn state_updated(&mut self, delta: &StateDelta) -> Result<(), ClassIdError> {
        let new = delta.new_state();

        self.process_ports(delta)?;
        self.process_interfaces(delta)?;

        if self.subnets.is_empty() {
            debug!("No port with lookup classes: nothing to do");
            self.full_pass = false;
            return self.flush();
        }

        let full_pass = std::mem::take(&mut self.full_pass);
        if full_pass {
            self.rederive_all(new)?;
        }

        self.process_neighbors::<V6>(delta)?;
        self.process_neighbors::<V4>(delta)?;

        self.process_routes::<V6>(delta, full_pass)?;
        self.process_routes::<V4>(delta, full_pass)?;

        let flushed = self.flush();
        if self.params.verify_invariants {
            self.verify(new)?;
        }
        flushed
    }

    fn flush(&mut self) -> Result<(), ClassIdError> {
        let count = self
            .pending
            .flush(&mut self.scheduler, self.params.max_batch_size)?;
        if count > 0 {
            debug!("Scheduled {count} class-id updates");
        }
        Ok(())
    }

    //////////////////////////////////////////////////////////////////
    // Index maintenance shared by the processors
    //////////////////////////////////////////////////////////////////

    /// The keys of the next-hops of a route that are covered by the subnet
    /// cache, in order and without duplicates
    pub(crate) fn candidates<P>(&self, state: &SwitchState, route: &Route<P>) -> Vec<NextHopKey> {
        let mut keys: Vec<NextHopKey> = Vec::with_capacity(route.nexthops.len());
        for nh in &route.nexthops {
            let Some(vlan) = state.interface_vlan(nh.interface) else {
                debug!("No interface {} for next-hop {}", nh.interface, nh.addr);
                continue;
            };
            if !self.subnets.covers(vlan, &nh.addr) {
                continue;
            }
            let key = NextHopKey::new(nh.addr, vlan);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Register a route and index it under its candidate next-hops.
    /// Returns the class-id that the route inherits.
    pub(crate) fn register_route<P: Copy + Into<IpNet>>(
        &mut self,
        state: &SwitchState,
        router: RouterId,
        route: &Route<P>,
    ) -> Result<Option<ClassId>, ClassIdError> {
        let pk = PrefixKey::new(router, route.prefix);
        if self.registry.contains(&pk) {
            return Err(ClassIdError::DuplicateRoute(pk));
        }
        let candidates = self.candidates(state, route);
        if candidates.is_empty() {
            return Ok(None);
        }
        let holder = candidates
            .iter()
            .position(|key| neighbor_class(state, key).is_some());
        let class_id = holder.and_then(|n| neighbor_class(state, &candidates[n]));
        for (n, key) in candidates.iter().enumerate() {
            self.nexthops.ensure(*key);
            self.nexthops.place(key, pk, Some(n) == holder)?;
        }
        self.registry.register(pk, candidates)?;
        if let Some(class_id) = class_id {
            self.classified.insert(pk, class_id)?;
            debug!("Route {pk} inherits class-id {class_id}");
        }
        Ok(class_id)
    }

    /// Unregister a route and remove it from the index. Next-hop entries left
    /// without prefixes or neighbor are erased. Returns the class-id that the
    /// route had.
    pub(crate) fn unregister_route(
        &mut self,
        state: &SwitchState,
        pk: &PrefixKey,
    ) -> Result<Option<ClassId>, ClassIdError> {
        let Some(candidates) = self.registry.unregister(pk) else {
            return Ok(None);
        };
        let mut held = false;
        for key in &candidates {
            held |= self.nexthops.remove_prefix(key, pk)?;
            if !has_neighbor(state, key) {
                self.nexthops.remove_if_empty(key);
            }
        }
        self.classified.remove(pk, held)
    }

    /// Recompute which candidate next-hop a registered prefix inherits its
    /// class-id from, and queue an update if the class-id changed.
    pub(crate) fn rederive_prefix(
        &mut self,
        state: &SwitchState,
        pk: &PrefixKey,
    ) -> Result<(), ClassIdError> {
        let candidates = self
            .registry
            .candidates(pk)
            .ok_or(ClassIdError::UnregisteredPrefix(*pk))?
            .to_vec();
        let holder = candidates
            .iter()
            .position(|key| neighbor_class(state, key).is_some());
        let class_id = holder.and_then(|n| neighbor_class(state, &candidates[n]));
        for (n, key) in candidates.iter().enumerate() {
            self.nexthops.place(key, *pk, Some(n) == holder)?;
        }
        let old = self.classified.set(*pk, class_id);
        if old != class_id {
            debug!("Class-id of {pk} changes from {old:?} to {class_id:?}");
            self.pending.queue(*pk, class_id);
        }
        Ok(())
    }

    /// Re-derive every prefix referencing a next-hop
    pub(crate) fn rederive_nexthop(
        &mut self,
        state: &SwitchState,
        key: &NextHopKey,
    ) -> Result<(), ClassIdError> {
        let Some(entry) = self.nexthops.get(key) else {
            return Ok(());
        };
        let prefixes: Vec<PrefixKey> = entry.prefixes().copied().collect();
        for pk in &prefixes {
            self.rederive_prefix(state, pk)?;
        }
        Ok(())
    }

    /// Erase the index entries of a vlan that the subnet cache no longer
    /// covers. The prefixes that referenced them lose that candidate and are
    /// re-derived from the remaining ones.
    pub(crate) fn purge_uncovered(
        &mut self,
        state: &SwitchState,
        vlan: VlanId,
    ) -> Result<(), ClassIdError> {
        let stale: Vec<NextHopKey> = self
            .nexthops
            .keys()
            .into_iter()
            .filter(|key| key.vlan == vlan && !self.subnets.covers(vlan, &key.addr))
            .collect();
        for key in &stale {
            self.purge_nexthop(state, key)?;
        }
        Ok(())
    }

    fn purge_nexthop(&mut self, state: &SwitchState, key: &NextHopKey) -> Result<(), ClassIdError> {
        let Some(entry) = self.nexthops.remove(key) else {
            return Ok(());
        };
        debug!("Purging next-hop {key} ({} prefixes)", entry.len());
        for pk in entry.prefixes() {
            if self.registry.drop_candidate(pk, key).is_some() {
                self.rederive_prefix(state, pk)?;
            } else if self.classified.set(*pk, None).is_some() {
                debug!("Route {pk} has no candidate next-hop left");
                self.pending.queue(*pk, None);
            }
        }
        Ok(())
    }

    /// Re-synchronize every route of a state with the indices. This is needed
    /// whenever the subnet cache gains subnets, since routes that were
    /// ignored so far may now have candidate next-hops.
    pub(crate) fn rederive_all(&mut self, state: &SwitchState) -> Result<(), ClassIdError> {
        info!("Re-deriving the class-id of all routes");
        for table in state.route_tables() {
            for route in table.v6.routes() {
                self.resync_route(state, table.id, route.as_ref())?;
            }
            for route in table.v4.routes() {
                self.resync_route(state, table.id, route.as_ref())?;
            }
        }
        Ok(())
    }

    fn resync_route<P: Copy + Into<IpNet>>(
        &mut self,
        state: &SwitchState,
        router: RouterId,
        route: &Route<P>,
    ) -> Result<(), ClassIdError> {
        let pk = PrefixKey::new(router, route.prefix);
        let old = self.unregister_route(state, &pk)?;
        if !is_tracked(route) {
            self.pending.cancel(&pk);
            return Ok(());
        }
        let new = self.register_route(state, router, route)?;
        if old != new {
            self.pending.queue(pk, new);
        }
        Ok(())
    }
}
