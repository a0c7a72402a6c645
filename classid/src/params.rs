// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Configuration of the class-id route updater

use derive_builder::Builder;
use std::fmt::Display;

/// Struct to configure a [`crate::LookupClassRouteUpdater`]. N.B we derive a builder
/// type `ClassIdParamsBuilder` and provide defaults for each field.
#[derive(Builder, Debug, Clone)]
pub struct ClassIdParams {
    /// Name of the updater, used in logs
    #[builder(setter(into), default = "classid".to_string())]
    pub name: String,

    /// Re-derive the class-id of every route when a port addition brings new
    /// subnets into the cache. Ports are normally added before any route
    /// exists, so this is off by default.
    #[builder(default = false)]
    pub rederive_on_port_add: bool,

    /// Check every index against the new state after each transition
    #[builder(default = false)]
    pub verify_invariants: bool,

    /// Maximum number of route updates per request sent to the scheduler
    #[builder(default = 1024)]
    pub max_batch_size: usize,
}

impl Default for ClassIdParams {
    fn default() -> Self {
        Self {
            name: "classid".to_string(),
            rederive_on_port_add: false,
            verify_invariants: false,
            max_batch_size: 1024,
        }
    }
}

impl Display for ClassIdParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        writeln!(f, "Class-id route updater config")?;
        writeln!(f, "  name                 : {}", self.name)?;
        writeln!(f, "  rederive on port add : {}", self.rederive_on_port_add)?;
        writeln!(f, "  verify invariants    : {}", self.verify_invariants)?;
        writeln!(f, "  max batch size       : {}", self.max_batch_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = ClassIdParamsBuilder::default()
            .build()
            .expect("Should succeed");
        assert_eq!(params.name, "classid");
        assert!(!params.rederive_on_port_add);
        assert!(!params.verify_invariants);
        assert_eq!(params.max_batch_size, 1024);

        let params = ClassIdParamsBuilder::default()
            .name("rsw1")
            .verify_invariants(true)
            .max_batch_size(16_usize)
            .build()
            .expect("Should succeed");
        assert_eq!(params.name, "rsw1");
        assert!(params.verify_invariants);
        assert_eq!(params.max_batch_size, 16);
        println!("{params}");
    }
}
