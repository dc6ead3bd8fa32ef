use crate::CoordinationStore;
use core::fmt;
use std::sync::Arc;

/// Everything a [`SnowflakeGenerator`] needs, fixed before it is built.
///
/// The value is immutable once handed to the constructor, which resolves the
/// node identity exactly once:
///
/// 1. `datacenter_id` and `worker_id` both non-zero: use them as given, even
///    if a `store` is present.
/// 2. Otherwise, if a `store` is present: allocate an identity from the
///    store's counters.
/// 3. Otherwise: [`Identity::DEFAULT`].
///
/// `strict_mode` only takes effect with a `store`; without one, generation
/// quietly stays local.
///
/// # Example
///
/// ```
/// use snowredis::{GeneratorConfig, MemoryStore, SnowflakeGenerator};
/// use std::sync::Arc;
///
/// let config = GeneratorConfig {
///     datacenter_id: 3,
///     worker_id: 4,
///     store: Some(Arc::new(MemoryStore::new())),
///     strict_mode: true,
/// };
/// let generator = SnowflakeGenerator::new(config).unwrap();
/// let id = generator.generate().unwrap();
/// assert_eq!(id.datacenter_id(), 3);
/// assert_eq!(id.worker_id(), 4);
/// ```
///
/// [`SnowflakeGenerator`]: crate::SnowflakeGenerator
/// [`Identity::DEFAULT`]: crate::Identity::DEFAULT
#[derive(Clone, Default)]
pub struct GeneratorConfig {
    /// Datacenter half of the identity; `0` means unset.
    pub datacenter_id: i64,
    /// Worker half of the identity; `0` means unset.
    pub worker_id: i64,
    /// Shared coordination store, if any.
    pub store: Option<Arc<dyn CoordinationStore>>,
    /// Claim every ID in the store before returning it.
    pub strict_mode: bool,
}

/// Where a generator's identity comes from, as decided by
/// [`GeneratorConfig::identity_source`].
#[derive(Clone, Copy)]
pub enum IdentitySource<'a> {
    /// Operator-supplied IDs, validated but otherwise used verbatim.
    Manual { datacenter_id: i64, worker_id: i64 },
    /// Allocated from the store's counters.
    Allocate(&'a dyn CoordinationStore),
    /// Neither IDs nor store were given.
    Default,
}

impl GeneratorConfig {
    /// Applies the identity priority rules without touching the store.
    pub fn identity_source(&self) -> IdentitySource<'_> {
        if self.datacenter_id != 0 && self.worker_id != 0 {
            IdentitySource::Manual {
                datacenter_id: self.datacenter_id,
                worker_id: self.worker_id,
            }
        } else if let Some(store) = &self.store {
            IdentitySource::Allocate(store.as_ref())
        } else {
            IdentitySource::Default
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("datacenter_id", &self.datacenter_id)
            .field("worker_id", &self.worker_id)
            .field("store", &self.store.as_ref().map(|_| "<store>"))
            .field("strict_mode", &self.strict_mode)
            .finish()
    }
}

impl fmt::Debug for IdentitySource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual {
                datacenter_id,
                worker_id,
            } => f
                .debug_struct("Manual")
                .field("datacenter_id", datacenter_id)
                .field("worker_id", worker_id)
                .finish(),
            Self::Allocate(_) => f.write_str("Allocate"),
            Self::Default => f.write_str("Default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn store() -> Option<Arc<dyn CoordinationStore>> {
        Some(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn manual_ids_win_over_store() {
        let config = GeneratorConfig {
            datacenter_id: 2,
            worker_id: 9,
            store: store(),
            strict_mode: true,
        };
        assert!(matches!(
            config.identity_source(),
            IdentitySource::Manual {
                datacenter_id: 2,
                worker_id: 9
            }
        ));
    }

    #[test]
    fn partial_ids_fall_through() {
        let with_store = GeneratorConfig {
            datacenter_id: 2,
            store: store(),
            ..Default::default()
        };
        assert!(matches!(
            with_store.identity_source(),
            IdentitySource::Allocate(_)
        ));

        let without_store = GeneratorConfig {
            worker_id: 9,
            ..Default::default()
        };
        assert!(matches!(
            without_store.identity_source(),
            IdentitySource::Default
        ));
    }

    #[test]
    fn debug_hides_store() {
        let config = GeneratorConfig {
            store: store(),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("<store>"));
        assert!(rendered.contains("strict_mode: false"));
    }
}
