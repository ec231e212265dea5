use super::*;

use std::fmt;

use crate::merge::{merge_nullable, merge_value};

bitflags::bitflags! {
    /// Public badges and account properties
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UserFlags: u32 {
        const STAFF                     = 1 << 0;
        const PARTNER                   = 1 << 1;
        const HYPESQUAD                 = 1 << 2;
        const BUG_HUNTER_LEVEL_1        = 1 << 3;
        const HYPESQUAD_BRAVERY         = 1 << 6;
        const HYPESQUAD_BRILLIANCE      = 1 << 7;
        const HYPESQUAD_BALANCE         = 1 << 8;
        const EARLY_SUPPORTER           = 1 << 9;
        const TEAM_USER                 = 1 << 10;
        const SYSTEM                    = 1 << 12;
        const BUG_HUNTER_LEVEL_2        = 1 << 14;
        const VERIFIED_BOT              = 1 << 16;
        const VERIFIED_BOT_DEVELOPER    = 1 << 17;
        const CERTIFIED_MODERATOR       = 1 << 18;
        const BOT_HTTP_INTERACTIONS     = 1 << 19;
        const ACTIVE_DEVELOPER          = 1 << 22;
    }
}

impl_serde_for_bitflags!(UserFlags: u32);

/// Local state of a remote user, kept in sync by merging [`PartialUser`] snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    pub username: SmolStr,

    /// Legacy 4-digit tag, `"0"` once the user migrated to a unique username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<SmolStr>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<SmolStr>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<SmolStr>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<SmolStr>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<u32>,

    #[serde(default, skip_serializing_if = "crate::is_false")]
    pub bot: bool,

    #[serde(default, skip_serializing_if = "crate::is_false")]
    pub system: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_flags: Option<UserFlags>,

    /// Not present until a presence update has been observed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<UserPresence>,
}

/// User snapshot as delivered by the network, any field may be missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialUser {
    pub id: Snowflake,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub username: Nullable<SmolStr>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub discriminator: Nullable<SmolStr>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub global_name: Nullable<SmolStr>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub avatar: Nullable<SmolStr>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub banner: Nullable<SmolStr>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub accent_color: Nullable<u32>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub bot: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub system: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub public_flags: Nullable<UserFlags>,
}

impl PartialUser {
    /// Snapshot with every field undefined
    pub const fn empty(id: Snowflake) -> PartialUser {
        PartialUser {
            id,
            username: Nullable::Undefined,
            discriminator: Nullable::Undefined,
            global_name: Nullable::Undefined,
            avatar: Nullable::Undefined,
            banner: Nullable::Undefined,
            accent_color: Nullable::Undefined,
            bot: Nullable::Undefined,
            system: Nullable::Undefined,
            public_flags: Nullable::Undefined,
        }
    }
}

/// Merges `update` into `current`, returning the new state and whether anything changed.
pub fn merge(mut current: User, update: &PartialUser) -> (User, bool) {
    let changed = current.merge(update);
    (current, changed)
}

impl User {
    /// Blank record, every optional field unset
    pub const fn new(id: Snowflake) -> User {
        User {
            id,
            username: SmolStr::new_inline(""),
            discriminator: None,
            global_name: None,
            avatar: None,
            banner: None,
            accent_color: None,
            bot: false,
            system: false,
            public_flags: None,
            presence: None,
        }
    }

    pub fn from_partial(update: &PartialUser) -> User {
        let mut user = User::new(update.id);
        user.merge(update);
        user
    }

    /// Applies a partial snapshot field by field, returning `true` if any field changed.
    ///
    /// Fields missing from the snapshot are never touched.
    pub fn merge(&mut self, update: &PartialUser) -> bool {
        debug_assert_eq!(self.id, update.id, "merging snapshot of a different user");

        let mut changed = false;

        changed |= merge_nullable(&mut self.avatar, &update.avatar);
        changed |= merge_nullable(&mut self.banner, &update.banner);
        changed |= merge_nullable(&mut self.accent_color, &update.accent_color);
        changed |= merge_nullable(&mut self.discriminator, &update.discriminator);
        changed |= merge_value(&mut self.bot, &update.bot);
        changed |= merge_value(&mut self.system, &update.system);
        changed |= merge_value(&mut self.username, &update.username);
        changed |= merge_nullable(&mut self.public_flags, &update.public_flags);
        changed |= merge_nullable(&mut self.global_name, &update.global_name);

        changed
    }

    /// Applies a partial presence, creating the presence on first sight.
    pub fn update_presence(&mut self, update: &PartialPresence) -> bool {
        let mut changed = false;

        let presence = self.presence.get_or_insert_with(|| {
            changed = true;
            UserPresence::default()
        });

        presence.merge(update) | changed
    }

    /// Numeric value of the legacy discriminator
    pub fn discriminator_value(&self) -> Result<u16, UserError> {
        let Some(ref discriminator) = self.discriminator else {
            return Err(UserError::DiscriminatorUnavailable);
        };

        discriminator.parse().map_err(|_| UserError::InvalidDiscriminator(discriminator.clone()))
    }

    /// Index of the built-in avatar shown when no custom avatar is set
    pub fn default_avatar_index(&self) -> Result<u16, UserError> {
        if self.has_legacy_username() {
            return Ok(self.discriminator_value()? % 5);
        }

        Ok(((self.id.to_u64() >> 22) % 6) as u16)
    }

    pub fn status(&self) -> UserStatus {
        self.presence.as_ref().map(|p| p.status).unwrap_or_default()
    }

    pub fn active_clients(&self) -> ClientTypes {
        self.presence.as_ref().map(|p| p.clients).unwrap_or_default()
    }

    pub fn activities(&self) -> &[Activity] {
        match self.presence {
            Some(ref presence) => &presence.activities,
            None => &[],
        }
    }
}

impl UserIdentity for User {
    #[inline]
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Mentionable for User {}

impl Presentable for User {
    fn username(&self) -> SmolStr {
        self.username.clone()
    }

    fn discriminator(&self) -> Option<SmolStr> {
        self.discriminator.clone()
    }

    fn global_name(&self) -> Option<SmolStr> {
        self.global_name.clone()
    }

    fn is_bot(&self) -> bool {
        self.bot
    }
}

/// Formats as `username#discriminator` for legacy users, bare `username` otherwise
impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&username_and_discriminator(&self.username, self.discriminator.as_deref(), false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sf(id: u64) -> Snowflake {
        Snowflake::new(id).unwrap()
    }

    fn snapshot(json: &str) -> PartialUser {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_merge_is_idempotent() {
        let user = User::new(sf(80351110224678912));
        let update = snapshot(
            r#"{"id": "80351110224678912", "username": "nelly", "discriminator": "1337", "avatar": "8342729096ea3675442027381ff50dfe", "public_flags": 64}"#,
        );

        let (user, changed) = merge(user, &update);
        assert!(changed);
        assert_eq!(user.username, "nelly");
        assert_eq!(user.public_flags, Some(UserFlags::HYPESQUAD_BRAVERY));

        let (_, changed) = merge(user, &update);
        assert!(!changed);
    }

    #[test]
    fn test_absent_fields_untouched() {
        let mut user = User::from_partial(&snapshot(
            r#"{"id": 1, "username": "abc", "discriminator": "0001", "global_name": "Abc", "avatar": "a1", "banner": "b1", "accent_color": 16711680, "bot": true}"#,
        ));
        let before = user.clone();

        assert!(!user.merge(&PartialUser::empty(user.id)));
        assert_eq!(user, before);

        assert!(user.merge(&snapshot(r#"{"id": 1, "global_name": "Renamed"}"#)));
        assert_eq!(user.global_name.as_deref(), Some("Renamed"));
        assert_eq!(user.discriminator, before.discriminator);
        assert_eq!(user.avatar, before.avatar);
        assert_eq!(user.banner, before.banner);
        assert_eq!(user.accent_color, before.accent_color);
        assert_eq!(user.username, before.username);
        assert!(user.bot);
    }

    #[test]
    fn test_null_clears() {
        let mut user = User::from_partial(&snapshot(r#"{"id": 1, "username": "abc", "avatar": "a1", "global_name": "A"}"#));

        assert!(user.merge(&snapshot(r#"{"id": 1, "avatar": null, "global_name": null, "username": null}"#)));
        assert_eq!(user.avatar, None);
        assert_eq!(user.global_name, None);

        // username cannot be cleared
        assert_eq!(user.username, "abc");
    }

    #[test]
    fn test_discriminator_states() {
        let mut user = User::new(sf(1));
        assert_eq!(user.discriminator_value(), Err(UserError::DiscriminatorUnavailable));
        assert!(!user.has_legacy_username());

        user.merge(&snapshot(r#"{"id": 1, "discriminator": "0"}"#));
        assert_eq!(user.discriminator_value(), Ok(0));
        assert!(!user.has_legacy_username());
        assert!(user.has_unique_username());

        user.merge(&snapshot(r#"{"id": 1, "discriminator": "4492"}"#));
        assert_eq!(user.discriminator_value(), Ok(4492));
        assert!(user.has_legacy_username());

        user.merge(&snapshot(r#"{"id": 1, "discriminator": "abcd"}"#));
        assert_eq!(user.discriminator_value(), Err(UserError::InvalidDiscriminator("abcd".into())));
    }

    #[test]
    fn test_default_avatar_index() {
        let mut user = User::from_partial(&snapshot(r#"{"id": "175928847299117063", "username": "a", "discriminator": "0007"}"#));
        assert_eq!(user.default_avatar_index(), Ok(2));

        user.merge(&snapshot(r#"{"id": "175928847299117063", "discriminator": "0"}"#));
        assert_eq!(user.default_avatar_index(), Ok((41944705796u64 % 6) as u16));
    }

    #[test]
    fn test_accessors() {
        let mut user = User::from_partial(&snapshot(r#"{"id": 80351110224678912, "username": "nelly", "discriminator": "1337"}"#));

        assert_eq!(user.mention(), "<@80351110224678912>");
        assert_eq!(user.display_name(), "nelly");
        assert_eq!(user.to_string(), "nelly#1337");
        assert_eq!(user.status(), UserStatus::Offline);
        assert!(user.activities().is_empty());

        user.merge(&snapshot(r#"{"id": 80351110224678912, "global_name": "Nelly", "discriminator": "0"}"#));
        assert_eq!(user.display_name(), "Nelly");
        assert_eq!(user.to_string(), "nelly");

        let presence = PartialPresence {
            status: Nullable::Some(UserStatus::Idle),
            ..Default::default()
        };

        assert!(user.update_presence(&presence));
        assert!(!user.update_presence(&presence));
        assert_eq!(user.status(), UserStatus::Idle);
    }
}
