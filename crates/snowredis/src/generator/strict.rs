use crate::{CoordinationStore, Error, Identity, Result, SnowflakeId, TimeSource};
use core::time::Duration;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Number of candidates tried before giving up.
pub const MAX_CLAIM_ATTEMPTS: u32 = 10;

/// Pause between two candidates after a lost claim.
pub const CLAIM_BACKOFF: Duration = Duration::from_millis(1);

/// Lifetime of a claim record in the store.
pub const CLAIM_TTL: Duration = Duration::from_secs(60 * 60);

/// Prefix of every claim record key.
pub const CLAIM_KEY_PREFIX: &str = "snowflake:id:";

/// Store key under which `id` is claimed.
///
/// ```
/// use snowredis::{SnowflakeId, claim_key};
///
/// assert_eq!(claim_key(SnowflakeId::from_raw(42)), "snowflake:id:42");
/// ```
pub fn claim_key(id: SnowflakeId) -> String {
    format!("{CLAIM_KEY_PREFIX}{id}")
}

/// Generates IDs whose uniqueness is verified by claiming them in the store.
///
/// Instead of a local sequence counter, the sequence field of each candidate
/// is `(now + attempt) mod 4096`. The candidate is claimed with a
/// create-if-absent write; a lost claim moves on to the next attempt after
/// [`CLAIM_BACKOFF`]. No local lock is taken, so concurrent callers only
/// contend in the store.
///
/// This trades throughput for store-verified uniqueness. Distinct processes
/// can still derive the same candidate; the claim is what keeps them from
/// both returning it.
pub struct StrictUniquenessGuard<T: TimeSource> {
    identity: Identity,
    time: T,
    store: Arc<dyn CoordinationStore>,
}

impl<T: TimeSource> StrictUniquenessGuard<T> {
    pub fn new(identity: Identity, time: T, store: Arc<dyn CoordinationStore>) -> Self {
        Self {
            identity,
            time,
            store,
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Generates and claims a new ID.
    ///
    /// # Errors
    ///
    /// - [`Error::Coordination`] as soon as a store call fails; the failure
    ///   does not count as an attempt and nothing is retried.
    /// - [`Error::GenerationExhausted`] once [`MAX_CLAIM_ATTEMPTS`] candidates
    ///   were all already claimed.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<SnowflakeId> {
        for attempt in 0..MAX_CLAIM_ATTEMPTS {
            let now = self.time.current_millis();
            let sequence = (now + u64::from(attempt)) & SnowflakeId::SEQUENCE_MASK;
            let candidate = SnowflakeId::from_parts(now, self.identity, sequence);

            if self
                .store
                .set_if_absent(&claim_key(candidate), "1", CLAIM_TTL)?
            {
                return Ok(candidate);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(attempt, %candidate, "candidate already claimed");

            if attempt + 1 < MAX_CLAIM_ATTEMPTS {
                std::thread::sleep(CLAIM_BACKOFF);
            }
        }

        Err(Error::GenerationExhausted {
            attempts: MAX_CLAIM_ATTEMPTS,
        })
    }
}
