use std::{fmt, str::FromStr};

use std::num::NonZeroU64;

use time::{Duration, OffsetDateTime};

/**
    Snowflakes are 64-bit identifiers that embed their creation timestamp in the upper bits.

    Layout, from most significant bit:
    42 bits of milliseconds since [`EPOCH`], 5 bits worker id, 5 bits process id, 12 bits increment.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Snowflake(pub NonZeroU64);

/// First millisecond of 2015, the offset applied to every snowflake timestamp
pub const EPOCH: u64 = 1420070400000;

pub const EPOCH_ODT: OffsetDateTime = time::macros::datetime!(2015 - 01 - 01 00:00 UTC);

impl Snowflake {
    #[inline]
    pub const fn new(id: u64) -> Option<Snowflake> {
        match NonZeroU64::new(id) {
            Some(id) => Some(Snowflake(id)),
            None => None,
        }
    }

    /// Gets the number of milliseconds since the unix epoch
    #[inline]
    pub const fn epoch_ms(&self) -> u64 {
        self.raw_timestamp() + EPOCH
    }

    #[inline]
    pub const fn raw_timestamp(&self) -> u64 {
        self.0.get() >> 22
    }

    /// Creation time of whatever this snowflake identifies.
    pub fn created_at(&self) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::milliseconds(self.epoch_ms() as i64)
    }

    #[inline]
    pub const fn worker_id(&self) -> u8 {
        ((self.0.get() >> 17) & 0x1F) as u8
    }

    #[inline]
    pub const fn process_id(&self) -> u8 {
        ((self.0.get() >> 12) & 0x1F) as u8
    }

    #[inline]
    pub const fn increment(&self) -> u16 {
        (self.0.get() & 0xFFF) as u16
    }

    #[inline(always)]
    pub const fn to_u64(self) -> u64 {
        self.0.get()
    }
}

impl FromStr for Snowflake {
    type Err = <NonZeroU64 as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NonZeroU64::from_str(s).map(Snowflake)
    }
}

impl fmt::Display for Snowflake {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(itoa::Buffer::new().format(self.0.get()))
    }
}

mod serde_impl {
    use super::*;

    use serde::de::{Deserialize, Deserializer, Error, Visitor};
    use serde::ser::{Serialize, Serializer};

    impl Serialize for Snowflake {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            if serializer.is_human_readable() {
                serializer.collect_str(self)
            } else {
                self.0.serialize(serializer)
            }
        }
    }

    impl<'de> Deserialize<'de> for Snowflake {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct SnowflakeVisitor;

            impl<'de> Visitor<'de> for SnowflakeVisitor {
                type Value = Snowflake;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a 64-bit integer or numeric string")
                }

                fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
                    match NonZeroU64::new(v) {
                        Some(x) => Ok(Snowflake(x)),
                        None => Err(E::custom("expected a non-zero value")),
                    }
                }

                fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
                    match u64::try_from(v) {
                        Ok(v) => self.visit_u64(v),
                        Err(_) => Err(E::custom("expected a positive value")),
                    }
                }

                fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
                    Snowflake::from_str(v).map_err(|e| E::custom(format!("Invalid Snowflake: {e}")))
                }
            }

            deserializer.deserialize_any(SnowflakeVisitor)
        }
    }
}
