// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The error results used by this library.

use crate::keys::{NextHopKey, PrefixKey};
use thiserror::Error;

/// Errors of the class-id route updater.
///
/// Most variants report a broken invariant between the indices the updater
/// maintains. Those are fatal: classification state is corrupt and the
/// agent must stop rather than misclassify traffic. See [`ClassIdError::is_fatal`].
#[derive(Error, Debug, PartialEq)]
pub enum ClassIdError {
    #[error("Prefix {0} is not referenced by next-hop {1}")]
    PrefixNotInNextHop(PrefixKey, NextHopKey),

    #[error("Prefix {0} is both with and without class-id at next-hop {1}")]
    PrefixInBothSets(PrefixKey, NextHopKey),

    #[error("Next-hop {0} is not indexed")]
    NextHopNotIndexed(NextHopKey),

    #[error("Prefix {0} already has a class-id")]
    DuplicateClassified(PrefixKey),

    #[error("Classified prefixes out of sync for {0}")]
    ClassifiedMismatch(PrefixKey),

    #[error("Route for {0} is already registered")]
    DuplicateRoute(PrefixKey),

    #[error("Prefix {0} is indexed but its route is not registered")]
    UnregisteredPrefix(PrefixKey),

    #[error("Verify failure: {0}")]
    VerifyFailure(String),

    #[error("Class-id update scheduler is full")]
    SchedulerFull,

    #[error("Class-id update scheduler is gone")]
    SchedulerClosed,
}

impl ClassIdError {
    /// Tell if the error reports corrupt classification state
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ClassIdError::SchedulerFull | ClassIdError::SchedulerClosed)
    }
}
