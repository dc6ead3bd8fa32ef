use core::time::Duration;
use std::sync::Arc;

/// Fixed epoch shared by every node: Saturday, January 1, 2022 00:00:00 UTC.
///
/// All timestamps embedded in a [`SnowflakeId`] are relative to this instant.
/// Nodes built with a different epoch silently break global ordering.
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub const SNOWREDIS_EPOCH: Duration = Duration::from_millis(1_640_995_200_000);

/// A source of millisecond timestamps relative to [`SNOWREDIS_EPOCH`].
///
/// The generators only ever read the clock through this trait, which lets
/// tests drive them with a scripted clock.
///
/// # Example
///
/// ```
/// use snowredis::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since [`SNOWREDIS_EPOCH`].
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
