use crate::{SNOWREDIS_EPOCH, TimeSource};
use std::time::{SystemTime, UNIX_EPOCH};

/// The system wall clock, read in milliseconds since [`SNOWREDIS_EPOCH`].
///
/// Unlike a monotonic ticker this reads `SystemTime::now()` on every call, so
/// backward jumps (NTP corrections, VM pauses) are visible to the caller. The
/// generators detect them and report [`Error::ClockRollback`] instead of
/// hiding them.
///
/// A system clock set earlier than the epoch reads as `0`.
///
/// [`Error::ClockRollback`]: crate::Error::ClockRollback
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WallClock;

impl WallClock {
    /// Milliseconds since the Unix epoch, saturating at zero.
    pub fn unix_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        Self::unix_millis().saturating_sub(SNOWREDIS_EPOCH.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_is_relative_to_epoch() {
        let unix = WallClock::unix_millis();
        let relative = WallClock.current_millis();
        let epoch = SNOWREDIS_EPOCH.as_millis() as u64;

        assert!(relative > 0);
        // Both reads happen within a generous window of each other.
        assert!((unix - epoch).abs_diff(relative) < 1_000);
    }
}
