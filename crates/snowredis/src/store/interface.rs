use crate::StoreError;
use core::time::Duration;

/// The operations `snowredis` needs from the shared key-value store.
///
/// Every call must be atomic with respect to every other process talking to
/// the same store; that atomicity is the only cross-process mutual exclusion
/// the generators rely on.
///
/// Implementations are shared behind an `Arc` and called from many threads at
/// once, hence the `Send + Sync` bound.
pub trait CoordinationStore: Send + Sync {
    /// Creates `key` with `value` and an expiry of `ttl` if it does not exist.
    ///
    /// Returns `true` if the key was newly created and `false` if it was
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on connectivity, timeout or protocol failures.
    fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Atomically increments the integer at `key` and returns the new value.
    ///
    /// A missing key counts as `0`, so the first call returns `1`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on connectivity, timeout or protocol failures.
    fn increment(&self, key: &str) -> Result<i64, StoreError>;

    /// Removes `keys` and returns how many of them existed.
    ///
    /// Not used while generating IDs; cleanup tooling uses it to release
    /// strict-mode claims early.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on connectivity, timeout or protocol failures.
    fn delete(&self, keys: &[&str]) -> Result<u64, StoreError>;
}
