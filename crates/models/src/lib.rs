//! Local representations of remote chat users and the partial updates that keep them in sync.

#[macro_use]
extern crate serde;

use smol_str::SmolStr;

macro_rules! impl_serde_for_bitflags {
    ($name:ident: $repr:ty) => {
        impl serde::Serialize for $name {
            #[inline]
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&self.bits(), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            #[inline]
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                <$repr as serde::Deserialize<'de>>::deserialize(deserializer).map(Self::from_bits_retain)
            }
        }
    };
}

pub mod error;
pub mod merge;
pub mod naming;
pub mod nullable;
pub mod presence;
pub mod sf;
pub mod traits;
pub mod user;

pub use self::{error::*, naming::*, nullable::*, presence::*, sf::*, traits::*, user::*};

#[inline]
pub const fn is_false(value: &bool) -> bool {
    !*value
}
