//! Capability traits shared by every user flavour.

use smol_str::SmolStr;
use time::OffsetDateTime;

use crate::naming::{is_unique_username_valid, username_and_discriminator, uses_legacy_naming};
use crate::Snowflake;

pub trait UserIdentity {
    fn id(&self) -> Snowflake;

    #[inline]
    fn created_at(&self) -> OffsetDateTime {
        self.id().created_at()
    }
}

pub trait Mentionable: UserIdentity {
    /// `<@id>`
    fn mention(&self) -> String {
        format!("<@{}>", self.id())
    }
}

/// Names and badges needed to render a user
pub trait Presentable: UserIdentity {
    fn username(&self) -> SmolStr;
    fn discriminator(&self) -> Option<SmolStr>;
    fn global_name(&self) -> Option<SmolStr>;
    fn is_bot(&self) -> bool;

    /// Global name if set, otherwise the username
    fn display_name(&self) -> SmolStr {
        self.global_name().unwrap_or_else(|| self.username())
    }

    fn has_legacy_username(&self) -> bool {
        uses_legacy_naming(self.discriminator().as_deref())
    }

    fn has_unique_username(&self) -> bool {
        !self.has_legacy_username()
    }

    fn has_valid_unique_username(&self) -> bool {
        is_unique_username_valid(&self.username())
    }

    /// `username#discriminator` or `username`, see [`username_and_discriminator`]
    fn full_name(&self, bidirectional: bool) -> String {
        username_and_discriminator(&self.username(), self.discriminator().as_deref(), bidirectional)
    }
}
