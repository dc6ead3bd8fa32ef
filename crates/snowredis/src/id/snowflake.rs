use crate::{Identity, SNOWREDIS_EPOCH};
use core::fmt;

/// A 64-bit Snowflake ID with a datacenter/worker split machine field.
///
/// - 1 bit reserved (always zero, so the value also fits an `i64`)
/// - 41 bits timestamp (ms since [`SNOWREDIS_EPOCH`])
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21            17 16        12 11             0
///              +--------------+----------------+----------------+------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter (5) | worker (5) | sequence (12) |
///              +--------------+----------------+----------------+------------+---------------+
///              |<----------------- MSB ------------- 64 bits ------------ LSB --------------->|
/// ```
///
/// This layout is a durable contract: any reader can decode an ID with
/// `timestamp_ms = (id >> 22) + epoch_ms`, `datacenter = (id >> 17) & 0x1F`,
/// `worker = (id >> 12) & 0x1F` and `sequence = id & 0xFFF`.
///
/// # Example
///
/// ```
/// use snowredis::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 2, 3, 4);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.datacenter_id(), 2);
/// assert_eq!(id.worker_id(), 3);
/// assert_eq!(id.sequence(), 4);
/// assert_eq!(id.to_raw(), (1000 << 22) | (2 << 17) | (3 << 12) | 4);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for the 41-bit timestamp field. Occupies bits 22 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for the 5-bit datacenter ID field. Occupies bits 17 through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for the 5-bit worker ID field. Occupies bits 12 through 16.
    pub const WORKER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the datacenter ID to its position (bit 17).
    pub const DATACENTER_ID_SHIFT: u64 = 17;

    /// Number of bits to shift the worker ID to its position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the four fields into an ID. Values wider than their field are
    /// truncated to the field's width.
    pub const fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id = (datacenter_id & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter_id | worker_id | sequence,
        }
    }

    /// Packs a timestamp and sequence for the given node identity.
    pub fn from_parts(timestamp: u64, identity: Identity, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from_components(
            timestamp,
            identity.datacenter_id(),
            identity.worker_id(),
            sequence,
        )
    }

    /// Extracts the timestamp (ms since [`SNOWREDIS_EPOCH`]).
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID.
    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    /// Extracts the worker ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// The identity of the node that minted this ID.
    pub const fn identity(&self) -> Identity {
        Identity::from_masked(self.datacenter_id(), self.worker_id())
    }

    /// The absolute wall-clock time encoded in the ID, in milliseconds since
    /// the Unix epoch.
    pub const fn unix_millis(&self) -> u64 {
        self.timestamp() + SNOWREDIS_EPOCH.as_millis() as u64
    }

    /// Returns `true` if the reserved top bit is clear.
    ///
    /// Every ID produced by this crate is valid; raw values from elsewhere may
    /// not be.
    pub const fn is_valid(&self) -> bool {
        self.id >> 63 == 0
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// The ID as a signed integer, for storage in signed 64-bit columns.
    ///
    /// Lossless for every valid ID.
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Returns the ID as a zero-padded 20-digit string, which sorts
    /// lexicographically in the same order as the numeric value.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("raw", &format_args!("0x{:016x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
