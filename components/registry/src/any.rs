use smol_str::SmolStr;

use models::{Mentionable, Presentable, Snowflake, User, UserIdentity};

use crate::{GuildMember, UserHandle, WebhookUser};

/// Any user a message or event can refer to
#[derive(Debug, Clone)]
pub enum AnyUser {
    /// Registered user seen outside a guild context
    Global(UserHandle),
    Member(GuildMember),
    Webhook(WebhookUser),
    /// Standalone copy not tied to the registry, e.g. a profile fetched on demand
    Detached(User),
}

impl AnyUser {
    #[inline]
    pub fn is_webhook(&self) -> bool {
        matches!(self, AnyUser::Webhook(_))
    }

    pub fn guild_id(&self) -> Option<Snowflake> {
        match self {
            AnyUser::Member(member) => Some(member.guild_id),
            _ => None,
        }
    }

    fn presentable(&self) -> &dyn Presentable {
        match self {
            AnyUser::Global(handle) => handle,
            AnyUser::Member(member) => member,
            AnyUser::Webhook(hook) => hook,
            AnyUser::Detached(user) => user,
        }
    }
}

impl From<UserHandle> for AnyUser {
    fn from(handle: UserHandle) -> Self {
        AnyUser::Global(handle)
    }
}

impl From<GuildMember> for AnyUser {
    fn from(member: GuildMember) -> Self {
        AnyUser::Member(member)
    }
}

impl From<WebhookUser> for AnyUser {
    fn from(hook: WebhookUser) -> Self {
        AnyUser::Webhook(hook)
    }
}

impl From<User> for AnyUser {
    fn from(user: User) -> Self {
        AnyUser::Detached(user)
    }
}

impl UserIdentity for AnyUser {
    fn id(&self) -> Snowflake {
        self.presentable().id()
    }
}

impl Mentionable for AnyUser {}

impl Presentable for AnyUser {
    fn username(&self) -> SmolStr {
        self.presentable().username()
    }

    fn discriminator(&self) -> Option<SmolStr> {
        self.presentable().discriminator()
    }

    fn global_name(&self) -> Option<SmolStr> {
        self.presentable().global_name()
    }

    fn is_bot(&self) -> bool {
        self.presentable().is_bot()
    }

    fn display_name(&self) -> SmolStr {
        self.presentable().display_name()
    }
}
