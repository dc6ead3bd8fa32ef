use crate::SnowflakeId;

/// Outcome of a non-blocking generation attempt.
///
/// Returned by [`LocalSequencer::poll_id`]:
///
/// - [`IdGenStatus::Ready`] carries a freshly minted ID.
/// - [`IdGenStatus::Pending`] means all 4096 sequence values of the current
///   millisecond are spent; nothing can be minted before `yield_until`.
///
/// # Example
///
/// ```
/// use snowredis::{IdGenStatus, Identity, LocalSequencer, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let sequencer = LocalSequencer::new(Identity::DEFAULT, FixedTime);
/// match sequencer.poll_id().unwrap() {
///     IdGenStatus::Ready { id } => println!("ID: {}", id.timestamp()),
///     IdGenStatus::Pending { yield_until } => println!("Back off until: {yield_until}"),
/// }
/// ```
///
/// [`LocalSequencer::poll_id`]: crate::LocalSequencer::poll_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// The sequence is exhausted for the current millisecond.
    Pending {
        /// The first timestamp (ms since the epoch) at which generation can
        /// resume.
        yield_until: u64,
    },
}
