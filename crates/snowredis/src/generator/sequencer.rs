use crate::{Error, IdGenStatus, Identity, Result, SnowflakeId, TimeSource};
use parking_lot::{Mutex, MutexGuard};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Mutable generation state of one node.
///
/// Only ever touched while holding the owning [`LocalSequencer`]'s lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationState {
    /// Timestamp (ms since the epoch) of the last issued ID, `None` before
    /// the first.
    pub last_timestamp: Option<u64>,
    /// Sequence of the last issued ID within `last_timestamp`.
    pub sequence: u64,
}

/// A lock-based Snowflake generator for one node identity.
///
/// Every call to [`generate`] runs under a single mutex, from the clock read
/// through the sequence-overflow wait to the composition of the ID. Successive
/// IDs from one instance are therefore strictly increasing, even across
/// threads, and at most 4096 IDs are minted per millisecond.
///
/// ## See Also
/// - [`SnowflakeGenerator`], which picks between this and the
///   [`StrictUniquenessGuard`]
///
/// [`generate`]: LocalSequencer::generate
/// [`SnowflakeGenerator`]: crate::SnowflakeGenerator
/// [`StrictUniquenessGuard`]: crate::StrictUniquenessGuard
pub struct LocalSequencer<T: TimeSource> {
    identity: Identity,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<GenerationState>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<GenerationState>,
    time: T,
}

impl<T: TimeSource> LocalSequencer<T> {
    /// Creates a sequencer with zeroed state.
    ///
    /// # Example
    /// ```
    /// use snowredis::{Identity, LocalSequencer, WallClock};
    ///
    /// let sequencer = LocalSequencer::new(Identity::new(1, 2).unwrap(), WallClock);
    /// let a = sequencer.generate().unwrap();
    /// let b = sequencer.generate().unwrap();
    /// assert!(a < b);
    /// ```
    pub fn new(identity: Identity, time: T) -> Self {
        Self::from_state(identity, GenerationState::default(), time)
    }

    /// Creates a sequencer preloaded with `state`.
    ///
    /// Mostly useful for restoring a known position or for tests; prefer
    /// [`Self::new`].
    pub fn from_state(identity: Identity, state: GenerationState, time: T) -> Self {
        debug_assert!(state.sequence <= SnowflakeId::SEQUENCE_MASK);
        Self {
            identity,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(state)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(state),
            time,
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// A snapshot of the current generation state.
    pub fn state(&self) -> GenerationState {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, GenerationState> {
        self.state.lock()
    }

    /// Generates the next ID, blocking while the current millisecond's
    /// sequence space is exhausted.
    ///
    /// The wait holds the lock and yields the thread between clock reads until
    /// the clock moves past the exhausted millisecond. It has no timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRollback`] if the clock reads earlier than the
    /// last issued timestamp. The state is left unchanged and nothing is
    /// retried.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<SnowflakeId> {
        let mut state = self.lock();
        let mut now = self.time.current_millis();

        let sequence = match state.last_timestamp {
            Some(last) if now < last => return Err(Self::cold_clock_behind(now, last)),
            Some(last) if now == last => {
                let next = (state.sequence + 1) & SnowflakeId::SEQUENCE_MASK;
                if next == 0 {
                    now = self.cold_wait_past(last);
                }
                next
            }
            _ => 0,
        };

        state.last_timestamp = Some(now);
        state.sequence = sequence;
        Ok(SnowflakeId::from_parts(now, self.identity, sequence))
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// Behaves like [`Self::generate`], except that an exhausted sequence
    /// returns [`IdGenStatus::Pending`] and leaves the state untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRollback`] if the clock reads earlier than the
    /// last issued timestamp.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let mut state = self.lock();
        let now = self.time.current_millis();

        let sequence = match state.last_timestamp {
            Some(last) if now < last => return Err(Self::cold_clock_behind(now, last)),
            Some(last) if now == last && state.sequence < SnowflakeId::SEQUENCE_MASK => {
                state.sequence + 1
            }
            Some(last) if now == last => {
                return Ok(IdGenStatus::Pending {
                    yield_until: last + 1,
                });
            }
            _ => 0,
        };

        state.last_timestamp = Some(now);
        state.sequence = sequence;
        Ok(IdGenStatus::Ready {
            id: SnowflakeId::from_parts(now, self.identity, sequence),
        })
    }

    #[cold]
    #[inline(never)]
    fn cold_wait_past(&self, last: u64) -> u64 {
        #[cfg(feature = "tracing")]
        tracing::trace!(last, "sequence exhausted, waiting for next millisecond");
        loop {
            let now = self.time.current_millis();
            if now > last {
                return now;
            }
            std::thread::yield_now();
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(now, last, "clock moved backwards, refusing to generate");
        Error::ClockRollback { now, last }
    }
}
