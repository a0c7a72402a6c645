// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Delivery of route class-id updates to the hardware programming layer

use crate::errors::ClassIdError;
use crate::keys::PrefixKey;
use ipnet::IpNet;
use ordermap::OrderMap;
use state::{ClassId, RouterId};
use std::fmt::Display;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, warn};

/// A request to set (or clear, if `class_id` is `None`) the class-id of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteClassIdUpdate {
    pub router: RouterId,
    pub prefix: IpNet,
    pub class_id: Option<ClassId>,
}

impl Display for RouteClassIdUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.class_id {
            Some(class_id) => write!(f, "{} router {} -> {class_id}", self.prefix, self.router),
            None => write!(f, "{} router {} -> none", self.prefix, self.router),
        }
    }
}

/// Consumer of batches of route class-id updates. Implementations must not block.
pub trait ClassIdScheduler {
    /// Hand over a batch of updates
    ///
    /// # Errors
    ///
    /// Fails if the batch could not be accepted
    fn schedule(&mut self, batch: Vec<RouteClassIdUpdate>) -> Result<(), ClassIdError>;
}

/// A scheduler that keeps every batch. Used for dry runs and tests.
impl ClassIdScheduler for Vec<Vec<RouteClassIdUpdate>> {
    fn schedule(&mut self, batch: Vec<RouteClassIdUpdate>) -> Result<(), ClassIdError> {
        self.push(batch);
        Ok(())
    }
}

/// A scheduler that forwards batches over a bounded tokio channel
#[derive(Debug, Clone)]
pub struct ClassIdUpdateSender(Sender<Vec<RouteClassIdUpdate>>);

impl ClassIdUpdateSender {
    #[must_use]
    pub fn new(tx: Sender<Vec<RouteClassIdUpdate>>) -> Self {
        Self(tx)
    }
}

impl ClassIdScheduler for ClassIdUpdateSender {
    fn schedule(&mut self, batch: Vec<RouteClassIdUpdate>) -> Result<(), ClassIdError> {
        match self.0.try_send(batch) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(batch)) => {
                warn!("Class-id channel full! {} updates not sent", batch.len());
                Err(ClassIdError::SchedulerFull)
            }
            Err(TrySendError::Closed(_)) => {
                error!("Class-id channel is closed");
                Err(ClassIdError::SchedulerClosed)
            }
        }
    }
}

/// The updates computed during one state transition, in the order they were
/// first requested. A prefix appears at most once with its latest class-id.
#[derive(Debug, Default)]
pub(crate) struct PendingUpdates(OrderMap<PrefixKey, Option<ClassId>>);

impl PendingUpdates {
    pub(crate) fn queue(&mut self, prefix: PrefixKey, class_id: Option<ClassId>) {
        self.0.insert(prefix, class_id);
    }
    /// Drop the update queued for a prefix, if any, and return it
    pub(crate) fn cancel(&mut self, prefix: &PrefixKey) -> Option<Option<ClassId>> {
        self.0.remove(prefix)
    }
    #[allow(unused)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Hand all of the pending updates to a scheduler, in batches of at most
    /// `max_batch_size` updates. Nothing remains pending afterwards, even on failure.
    pub(crate) fn flush<S: ClassIdScheduler>(
        &mut self,
        scheduler: &mut S,
        max_batch_size: usize,
    ) -> Result<usize, ClassIdError> {
        let updates: Vec<RouteClassIdUpdate> = std::mem::take(&mut self.0)
            .into_iter()
            .map(|(pk, class_id)| RouteClassIdUpdate {
                router: pk.router,
                prefix: pk.prefix,
                class_id,
            })
            .collect();
        let count = updates.len();
        for chunk in updates.chunks(max_batch_size.max(1)) {
            debug!("Scheduling {} class-id updates", chunk.len());
            scheduler.schedule(chunk.to_vec())?;
        }
        Ok(count)
    }
}
