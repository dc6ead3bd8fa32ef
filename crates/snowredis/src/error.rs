use crate::store::StoreError;

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `snowredis` can produce.
///
/// None of these are retried internally beyond the bounded envelopes of the
/// sequencer's overflow wait and the strict-mode claim loop. Every variant is
/// returned to the immediate caller of the constructor or of `generate`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A datacenter or worker ID does not fit its 5-bit field.
    #[error("invalid {field}: {value} is outside 0..={max}", max = crate::Identity::MAX_ID)]
    InvalidIdentity {
        /// Which half of the identity was rejected.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// The clock reported a time earlier than the last issued timestamp.
    ///
    /// The generator state is left untouched. Callers may retry once the clock
    /// has caught up with `last`.
    #[error("clock moved backwards: now {now}ms is behind last issued {last}ms")]
    ClockRollback {
        /// Milliseconds since the epoch observed by this call.
        now: u64,
        /// Milliseconds since the epoch of the last issued ID.
        last: u64,
    },

    /// A coordination counter could not be incremented while allocating the
    /// node identity. Construction is aborted.
    #[error("failed to allocate identity from `{counter}`")]
    Allocation {
        /// The counter key that failed.
        counter: &'static str,
        #[source]
        source: StoreError,
    },

    /// A store call failed while claiming a strict-mode candidate.
    #[error("coordination store call failed")]
    Coordination(#[from] StoreError),

    /// Every strict-mode candidate was already claimed.
    #[error("failed to generate a unique ID after {attempts} attempts")]
    GenerationExhausted {
        /// Number of claims attempted.
        attempts: u32,
    },
}
