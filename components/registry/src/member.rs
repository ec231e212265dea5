use smol_str::SmolStr;

use models::merge::{merge_nullable, merge_value};
use models::{Mentionable, Nullable, PartialUser, Presentable, Snowflake, UserIdentity};

use crate::{RegistryError, UserRef, UserRegistry};

/// A user's membership in a guild. Holds a reference to the shared user record,
/// so the user stays registered for as long as the member exists.
#[derive(Debug, Clone)]
pub struct GuildMember {
    pub guild_id: Snowflake,
    user: UserRef,
    pub nickname: Option<SmolStr>,
    pub guild_avatar: Option<SmolStr>,
    pub roles: Vec<Snowflake>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialMember {
    pub guild_id: Snowflake,
    pub user: PartialUser,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub nick: Nullable<SmolStr>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub avatar: Nullable<SmolStr>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub roles: Nullable<Vec<Snowflake>>,
}

impl GuildMember {
    /// Registers the member's user if needed and takes a reference to it.
    pub fn new(registry: &UserRegistry, update: &PartialMember) -> Result<GuildMember, RegistryError> {
        let mut member = GuildMember {
            guild_id: update.guild_id,
            user: registry.acquire(&update.user)?,
            nickname: None,
            guild_avatar: None,
            roles: Vec::new(),
        };

        member.merge_fields(update);

        Ok(member)
    }

    #[inline]
    pub fn user(&self) -> &UserRef {
        &self.user
    }

    /// Applies a member update, including the embedded user snapshot.
    pub fn merge(&mut self, update: &PartialMember) -> bool {
        debug_assert_eq!(self.guild_id, update.guild_id);

        self.user.update(&update.user) | self.merge_fields(update)
    }

    fn merge_fields(&mut self, update: &PartialMember) -> bool {
        let mut changed = merge_nullable(&mut self.nickname, &update.nick);
        changed |= merge_nullable(&mut self.guild_avatar, &update.avatar);

        changed |= match update.roles {
            Nullable::Null => merge_value(&mut self.roles, &Nullable::Some(Vec::new())),
            ref roles => merge_value(&mut self.roles, roles),
        };

        changed
    }
}

impl UserIdentity for GuildMember {
    #[inline]
    fn id(&self) -> Snowflake {
        self.user.id()
    }
}

impl Mentionable for GuildMember {}

impl Presentable for GuildMember {
    fn username(&self) -> SmolStr {
        self.user.username()
    }

    fn discriminator(&self) -> Option<SmolStr> {
        self.user.discriminator()
    }

    fn global_name(&self) -> Option<SmolStr> {
        self.user.global_name()
    }

    fn is_bot(&self) -> bool {
        self.user.is_bot()
    }

    /// Guild nickname, then global name, then username
    fn display_name(&self) -> SmolStr {
        match self.nickname {
            Some(ref nickname) => nickname.clone(),
            None => self.user.display_name(),
        }
    }
}
