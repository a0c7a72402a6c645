// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The set of prefixes that currently carry an inherited class-id

use crate::errors::ClassIdError;
use crate::keys::PrefixKey;
use state::ClassId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedPrefixes(BTreeMap<PrefixKey, ClassId>);

impl ClassifiedPrefixes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    #[must_use]
    pub fn get(&self, prefix: &PrefixKey) -> Option<ClassId> {
        self.0.get(prefix).copied()
    }
    #[must_use]
    pub fn contains(&self, prefix: &PrefixKey) -> bool {
        self.0.contains_key(prefix)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&PrefixKey, &ClassId)> {
        self.0.iter()
    }
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<PrefixKey, ClassId> {
        &self.0
    }

    /// Insert a prefix that was not classified
    ///
    /// # Errors
    ///
    /// Fails if the prefix already has a class-id
    pub fn insert(&mut self, prefix: PrefixKey, class_id: ClassId) -> Result<(), ClassIdError> {
        if self.0.contains_key(&prefix) {
            return Err(ClassIdError::DuplicateClassified(prefix));
        }
        self.0.insert(prefix, class_id);
        Ok(())
    }

    /// Set, change or clear the class-id of a prefix. Returns the class-id it had.
    pub fn set(&mut self, prefix: PrefixKey, class_id: Option<ClassId>) -> Option<ClassId> {
        match class_id {
            Some(class_id) => self.0.insert(prefix, class_id),
            None => self.0.remove(&prefix),
        }
    }

    /// Remove a prefix whose classification state is known: `expected` tells
    /// if the prefix is supposed to be classified.
    ///
    /// # Errors
    ///
    /// Fails if the presence of the prefix does not match `expected`
    pub fn remove(
        &mut self,
        prefix: &PrefixKey,
        expected: bool,
    ) -> Result<Option<ClassId>, ClassIdError> {
        let removed = self.0.remove(prefix);
        if removed.is_some() != expected {
            return Err(ClassIdError::ClassifiedMismatch(*prefix));
        }
        Ok(removed)
    }
}
