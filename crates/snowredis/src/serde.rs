use crate::SnowflakeId;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Error reported when a deserialized integer is not a valid [`SnowflakeId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{raw} has the reserved bit set and is not a valid snowflake id")]
pub struct DecodeOverflow {
    pub raw: u64,
}

/// Serializes as the native `u64`.
impl Serialize for SnowflakeId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(s)
    }
}

/// Deserializes from a native `u64`, rejecting values with the reserved bit
/// set.
impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = u64::deserialize(d)?;
        let id = Self::from_raw(raw);
        if !id.is_valid() {
            return Err(de::Error::custom(DecodeOverflow { raw }));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_integer() {
        let id = SnowflakeId::from_components(5, 1, 2, 3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        assert_eq!(serde_json::from_str::<SnowflakeId>(&json).unwrap(), id);
    }

    #[test]
    fn rejects_reserved_bit() {
        let json = (1u64 << 63).to_string();
        let err = serde_json::from_str::<SnowflakeId>(&json).unwrap_err();
        assert!(err.to_string().contains("reserved bit"));
    }
}
