use crate::{Error, Result};
use core::fmt;

/// The fixed `(datacenter_id, worker_id)` pair of one node.
///
/// Each half occupies 5 bits of every [`SnowflakeId`] minted by the node, so
/// both are limited to `0..=31`. An identity is assigned once when a generator
/// is built and never changes afterwards.
///
/// [`SnowflakeId`]: crate::SnowflakeId
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    datacenter_id: u64,
    worker_id: u64,
}

impl Identity {
    /// Largest value either half may take.
    pub const MAX_ID: u64 = (1 << 5) - 1;

    /// Identity used when neither explicit IDs nor a store are configured.
    pub const DEFAULT: Self = Self {
        datacenter_id: 1,
        worker_id: 1,
    };

    /// Validates and builds an identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if either value is negative or
    /// greater than [`Identity::MAX_ID`]. Out-of-range values are never
    /// clamped.
    ///
    /// # Example
    ///
    /// ```
    /// use snowredis::Identity;
    ///
    /// let identity = Identity::new(3, 7).unwrap();
    /// assert_eq!(identity.datacenter_id(), 3);
    /// assert_eq!(identity.worker_id(), 7);
    ///
    /// assert!(Identity::new(32, 0).is_err());
    /// assert!(Identity::new(0, -1).is_err());
    /// ```
    pub fn new(datacenter_id: i64, worker_id: i64) -> Result<Self> {
        Ok(Self {
            datacenter_id: Self::check("datacenter_id", datacenter_id)?,
            worker_id: Self::check("worker_id", worker_id)?,
        })
    }

    fn check(field: &'static str, value: i64) -> Result<u64> {
        match u64::try_from(value) {
            Ok(id) if id <= Self::MAX_ID => Ok(id),
            _ => Err(Error::InvalidIdentity { field, value }),
        }
    }

    /// Builds an identity from values already known to fit; higher bits are
    /// discarded.
    pub(crate) const fn from_masked(datacenter_id: u64, worker_id: u64) -> Self {
        Self {
            datacenter_id: datacenter_id & Self::MAX_ID,
            worker_id: worker_id & Self::MAX_ID,
        }
    }

    pub const fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }

    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dc{}/w{}", self.datacenter_id, self.worker_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_five_bit_range() {
        for dc in 0..=31 {
            for worker in [0, 15, 31] {
                let identity = Identity::new(dc, worker).unwrap();
                assert_eq!(identity.datacenter_id(), dc as u64);
                assert_eq!(identity.worker_id(), worker as u64);
            }
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        for (dc, worker, field) in [
            (32, 0, "datacenter_id"),
            (-1, 0, "datacenter_id"),
            (i64::MAX, 1, "datacenter_id"),
            (0, 32, "worker_id"),
            (5, -7, "worker_id"),
            (1, 1_000, "worker_id"),
        ] {
            match Identity::new(dc, worker) {
                Err(Error::InvalidIdentity { field: got, .. }) => assert_eq!(got, field),
                other => panic!("expected InvalidIdentity for ({dc}, {worker}), got {other:?}"),
            }
        }
    }

    #[test]
    fn default_is_one_one() {
        assert_eq!(Identity::default(), Identity::new(1, 1).unwrap());
    }
}
