use crate::{
    CoordinationAllocator, GeneratorConfig, Identity, IdentitySource, LocalSequencer, Result,
    SnowflakeId, StrictUniquenessGuard, TimeSource, WallClock,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// The public entry point: one node's ID generator.
///
/// Built once from a [`GeneratorConfig`]; the identity is resolved at
/// construction and the generation mode is fixed from then on. Each call to
/// [`generate`] goes either to the [`LocalSequencer`] or, in strict mode with
/// a store, to the [`StrictUniquenessGuard`].
///
/// The generator is `Send + Sync` when its clock is; share it with an `Arc`
/// or scoped borrows.
///
/// # Example
///
/// ```
/// use snowredis::{GeneratorConfig, Identity, SnowflakeGenerator};
///
/// let generator = SnowflakeGenerator::new(GeneratorConfig::default()).unwrap();
/// assert_eq!(generator.identity(), Identity::DEFAULT);
/// assert!(!generator.is_strict());
///
/// let id = generator.generate().unwrap();
/// assert_eq!(id.datacenter_id(), 1);
/// assert_eq!(id.worker_id(), 1);
/// ```
///
/// [`generate`]: SnowflakeGenerator::generate
pub struct SnowflakeGenerator<T: TimeSource = WallClock> {
    sequencer: LocalSequencer<T>,
    strict: Option<StrictUniquenessGuard<T>>,
}

impl SnowflakeGenerator<WallClock> {
    /// Builds a generator reading the system wall clock.
    ///
    /// # Errors
    ///
    /// See [`Self::with_clock`].
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_clock(config, WallClock)
    }
}

impl<T: TimeSource + Clone> SnowflakeGenerator<T> {
    /// Builds a generator reading `time`.
    ///
    /// Resolves the identity per [`GeneratorConfig::identity_source`]; this is
    /// the only place the store's counters are touched.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIdentity`] if manual IDs are out of range.
    /// - [`Error::Allocation`] if auto-allocation cannot reach the store.
    ///
    /// [`Error::InvalidIdentity`]: crate::Error::InvalidIdentity
    /// [`Error::Allocation`]: crate::Error::Allocation
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(time)))]
    pub fn with_clock(config: GeneratorConfig, time: T) -> Result<Self> {
        let identity = match config.identity_source() {
            IdentitySource::Manual {
                datacenter_id,
                worker_id,
            } => Identity::new(datacenter_id, worker_id)?,
            IdentitySource::Allocate(store) => CoordinationAllocator::new(store).allocate()?,
            IdentitySource::Default => Identity::DEFAULT,
        };

        let strict = match config.store {
            Some(store) if config.strict_mode => {
                Some(StrictUniquenessGuard::new(identity, time.clone(), store))
            }
            _ => None,
        };

        #[cfg(feature = "tracing")]
        tracing::info!(%identity, strict = strict.is_some(), "snowflake generator ready");

        Ok(Self {
            sequencer: LocalSequencer::new(identity, time),
            strict,
        })
    }
}

impl<T: TimeSource> SnowflakeGenerator<T> {
    /// Generates the next ID.
    ///
    /// # Errors
    ///
    /// - Local mode: [`Error::ClockRollback`].
    /// - Strict mode: [`Error::Coordination`] or
    ///   [`Error::GenerationExhausted`].
    ///
    /// [`Error::ClockRollback`]: crate::Error::ClockRollback
    /// [`Error::Coordination`]: crate::Error::Coordination
    /// [`Error::GenerationExhausted`]: crate::Error::GenerationExhausted
    pub fn generate(&self) -> Result<SnowflakeId> {
        match &self.strict {
            Some(guard) => guard.generate(),
            None => self.sequencer.generate(),
        }
    }

    pub fn identity(&self) -> Identity {
        self.sequencer.identity()
    }

    /// Whether IDs are claimed in the store before being returned.
    pub fn is_strict(&self) -> bool {
        self.strict.is_some()
    }
}
