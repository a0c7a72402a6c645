// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identifiers of the objects found in a switch state snapshot.

use crate::errors::InvalidVlanId;
use std::fmt::{Debug, Display, Formatter};
use std::num::NonZero;

#[allow(unused_imports)] // conditional re-export
#[cfg(any(test, feature = "testing"))]
pub use contract::*;

/// A VLAN identifier.
///
/// Like 802.1Q tags, legal values go from 1 to 4094. The type wraps a
/// [`NonZero<u16>`] so that `Option<VlanId>` costs no more than a `u16`.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VlanId(NonZero<u16>);

impl VlanId {
    /// The raw value of the reserved VLAN id
    pub const RESERVED: u16 = 4095;

    /// The minimum legal [`VlanId`] value (1).
    #[allow(clippy::unwrap_used)] // safe due to const eval
    pub const MIN: VlanId = VlanId(NonZero::new(1).unwrap());

    /// The maximum legal [`VlanId`] value (4094).
    #[allow(clippy::unwrap_used)] // safe due to const eval
    pub const MAX: VlanId = VlanId(NonZero::new(4094).unwrap());

    /// Create a new [`VlanId`] from a `u16`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is 0, 4095 (reserved), or greater than [`VlanId::MAX`].
    pub fn new(vid: u16) -> Result<Self, InvalidVlanId> {
        match NonZero::new(vid) {
            None => Err(InvalidVlanId::Zero),
            Some(val) if val.get() == Self::RESERVED => Err(InvalidVlanId::Reserved),
            Some(val) if val.get() > Self::RESERVED => Err(InvalidVlanId::TooLarge(val.get())),
            Some(val) => Ok(VlanId(val)),
        }
    }

    #[must_use]
    pub fn as_u16(self) -> u16 {
        self.0.get()
    }
}

impl TryFrom<u16> for VlanId {
    type Error = InvalidVlanId;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        VlanId::new(value)
    }
}
impl From<VlanId> for u16 {
    fn from(value: VlanId) -> Self {
        value.as_u16()
    }
}
impl Debug for VlanId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        <_ as Debug>::fmt(&self.0, f)
    }
}
impl Display for VlanId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        <_ as Display>::fmt(&self.0, f)
    }
}

/// Declare a plain numerical identifier. These carry no validation: any u32 is legal.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }
            #[must_use]
            pub const fn as_u32(self) -> u32 {
                self.0
            }
        }
        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a front-panel (or internal) switch port
    PortId
);
numeric_id!(
    /// Identifier of a routed (layer-3) interface
    InterfaceId
);
numeric_id!(
    /// Identifier of a router instance (VRF). The default router is 0.
    RouterId
);

/// The traffic-classification tags ("lookup classes") that configuration may
/// assign to a neighbor. The numerical values are the ones programmed in hardware.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ClassId {
    DstClassL3Local1 = 1,
    DstClassL3Local2 = 2,
    ClassQueuePerHostQueue0 = 10,
    ClassQueuePerHostQueue1 = 11,
    ClassQueuePerHostQueue2 = 12,
    ClassQueuePerHostQueue3 = 13,
    ClassQueuePerHostQueue4 = 14,
    ClassQueuePerHostQueue5 = 15,
    ClassQueuePerHostQueue6 = 16,
    ClassQueuePerHostQueue7 = 17,
    ClassQueuePerHostQueue8 = 18,
    ClassQueuePerHostQueue9 = 19,
    DstClassL3Dpr = 20,
}

impl ClassId {
    /// Get the queue-per-host class for the given queue (0-9)
    #[must_use]
    pub fn queue_per_host(queue: u8) -> Option<Self> {
        if queue > 9 {
            return None;
        }
        Self::try_from(10 + queue).ok()
    }
    #[must_use]
    pub fn is_queue_per_host(self) -> bool {
        (10..=19).contains(&(self as u8))
    }
}

impl TryFrom<u8> for ClassId {
    type Error = u8;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use strum::IntoEnumIterator;
        Self::iter().find(|c| *c as u8 == value).ok_or(value)
    }
}

#[cfg(any(test, feature = "testing"))]
mod contract {
    use super::{ClassId, VlanId};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for VlanId {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw = u.produce::<u16>()? % VlanId::MAX.as_u16();
            VlanId::new(raw + 1).ok()
        }
    }

    impl TypeGenerator for ClassId {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            ClassId::queue_per_host(u.produce::<u8>()? % 10)
        }
    }
}
