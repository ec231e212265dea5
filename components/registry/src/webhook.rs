use smol_str::SmolStr;

use models::{Mentionable, PartialUser, Presentable, Snowflake, UserIdentity};

/// Author of a webhook message. Webhook authors are never registered, every message
/// carries its own copy of the name and avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookUser {
    pub id: Snowflake,
    pub webhook_id: Snowflake,
    pub username: SmolStr,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<SmolStr>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<SmolStr>,
}

impl WebhookUser {
    pub fn new(webhook_id: Snowflake, author: &PartialUser) -> WebhookUser {
        WebhookUser {
            id: author.id,
            webhook_id,
            username: author.username.as_ref().into_option().flatten().cloned().unwrap_or_default(),
            discriminator: author.discriminator.as_ref().into_option().flatten().cloned(),
            avatar: author.avatar.as_ref().into_option().flatten().cloned(),
        }
    }
}

impl UserIdentity for WebhookUser {
    #[inline]
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Mentionable for WebhookUser {}

impl Presentable for WebhookUser {
    fn username(&self) -> SmolStr {
        self.username.clone()
    }

    fn discriminator(&self) -> Option<SmolStr> {
        self.discriminator.clone()
    }

    fn global_name(&self) -> Option<SmolStr> {
        None
    }

    #[inline]
    fn is_bot(&self) -> bool {
        true
    }
}
