/// Failure of a call against the shared coordination store.
///
/// Contention (a key that is already claimed) is never reported through this
/// type; it is the `false` result of
/// [`CoordinationStore::set_if_absent`].
///
/// [`CoordinationStore::set_if_absent`]: crate::CoordinationStore::set_if_absent
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The store could not be reached.
    #[error("connection to coordination store failed: {0}")]
    Connection(String),

    /// The store answered with something the contract does not allow, such
    /// as incrementing a key that does not hold an integer.
    #[error("unexpected reply from coordination store: {0}")]
    Protocol(String),

    /// Error raised by the Redis client.
    #[cfg_attr(docsrs, doc(cfg(feature = "redis")))]
    #[cfg(feature = "redis")]
    #[error(transparent)]
    Redis(#[from] ::redis::RedisError),
}
