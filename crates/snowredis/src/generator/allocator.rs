use crate::{CoordinationStore, Error, Identity, Result};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Store counter handing out datacenter IDs.
pub const DATACENTER_COUNTER_KEY: &str = "snowflake:next_datacenter_id";

/// Store counter handing out worker IDs.
pub const WORKER_COUNTER_KEY: &str = "snowflake:next_worker_id";

/// Assigns a node identity from the store's atomic counters.
///
/// Each counter is incremented once and reduced modulo 32, so after 32
/// allocations the identities wrap around and start repeating. Counters are
/// never reset or reclaimed.
///
/// The two increments are not a transaction: if the worker counter fails
/// after the datacenter counter advanced, that datacenter slot is simply
/// skipped.
pub struct CoordinationAllocator<'a> {
    store: &'a dyn CoordinationStore,
}

impl<'a> CoordinationAllocator<'a> {
    pub fn new(store: &'a dyn CoordinationStore) -> Self {
        Self { store }
    }

    /// Allocates a `(datacenter_id, worker_id)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] naming the counter whose increment
    /// failed. There is no partial identity.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn allocate(&self) -> Result<Identity> {
        let datacenter_id = self.next_slot(DATACENTER_COUNTER_KEY)?;
        let worker_id = self.next_slot(WORKER_COUNTER_KEY)?;
        let identity = Identity::from_masked(datacenter_id, worker_id);

        #[cfg(feature = "tracing")]
        tracing::debug!(%identity, "allocated node identity from store");

        Ok(identity)
    }

    fn next_slot(&self, counter: &'static str) -> Result<u64> {
        let raw = self
            .store
            .increment(counter)
            .map_err(|source| Error::Allocation { counter, source })?;
        // `rem_euclid` keeps externally tampered negative counters in range.
        Ok(raw.rem_euclid(Identity::MAX_ID as i64 + 1) as u64)
    }
}
