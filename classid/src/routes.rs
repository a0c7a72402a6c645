// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Processing of route changes

use crate::errors::ClassIdError;
use crate::keys::PrefixKey;
use crate::scheduler::ClassIdScheduler;
use crate::updater::{LookupClassRouteUpdater, is_tracked};
use state::{AddressFamily, DeltaValue, Route, RouterId, StateDelta, SwitchState};
use tracing::{debug, trace};

impl<S: ClassIdScheduler> LookupClassRouteUpdater<S> {
    /// Process the route changes of one address family, in every route table.
    /// If `removals_only` is set, added and changed routes are skipped: they
    /// have been accounted for already.
    pub(crate) fn process_routes<F: AddressFamily>(
        &mut self,
        delta: &StateDelta,
        removals_only: bool,
    ) -> Result<(), ClassIdError> {
        let new = delta.new_state();
        for table_delta in delta.route_tables_delta() {
            let router = table_delta.router();
            for rd in table_delta.routes_delta::<F>() {
                match &rd {
                    DeltaValue::Removed(route) => self.route_removed(new, router, route.as_ref())?,
                    _ if removals_only => {}
                    DeltaValue::Added(route) => self.route_added(new, router, route.as_ref())?,
                    DeltaValue::Changed(old, route) => {
                        self.route_changed(new, router, old.as_ref(), route.as_ref())?;
                    }
                }
            }
        }
        Ok(())
    }

    fn route_added<P: Copy + Into<ipnet::IpNet>>(
        &mut self,
        state: &SwitchState,
        router: RouterId,
        route: &Route<P>,
    ) -> Result<(), ClassIdError> {
        if !is_tracked(route) {
            return Ok(());
        }
        if let Some(class_id) = self.register_route(state, router, route)? {
            self.pending
                .queue(PrefixKey::new(router, route.prefix), Some(class_id));
        }
        Ok(())
    }

    fn route_removed<P: Copy + Into<ipnet::IpNet>>(
        &mut self,
        state: &SwitchState,
        router: RouterId,
        route: &Route<P>,
    ) -> Result<(), ClassIdError> {
        if !is_tracked(route) {
            return Ok(());
        }
        let pk = PrefixKey::new(router, route.prefix);
        if let Some(class_id) = self.unregister_route(state, &pk)? {
            trace!("Route {pk} with class-id {class_id} removed");
        }
        // the route is gone from hardware, together with its class-id
        self.pending.cancel(&pk);
        Ok(())
    }

    fn route_changed<P: Copy + Into<ipnet::IpNet>>(
        &mut self,
        state: &SwitchState,
        router: RouterId,
        old: &Route<P>,
        new: &Route<P>,
    ) -> Result<(), ClassIdError> {
        match (is_tracked(old), is_tracked(new)) {
            (false, false) => Ok(()),
            (true, false) => self.route_removed(state, router, old),
            (false, true) => self.route_added(state, router, new),
            (true, true) => {
                if old.same_forwarding(new) {
                    return Ok(());
                }
                let pk = PrefixKey::new(router, new.prefix);
                let before = self.unregister_route(state, &pk)?;
                // an earlier step of this transition may have queued a clear
                let queued = self.pending.cancel(&pk).is_some();
                let after = self.register_route(state, router, new)?;
                if after.is_some() {
                    self.pending.queue(pk, after);
                } else if before.is_some() || queued {
                    debug!("Route {pk} loses its class-id");
                    self.pending.queue(pk, None);
                }
                Ok(())
            }
        }
    }
}
