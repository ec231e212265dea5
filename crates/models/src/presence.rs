use super::*;

use crate::merge::merge_value;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Online,
    Idle,
    #[serde(rename = "dnd")]
    DoNotDisturb,
    Invisible,
    #[default]
    Offline,
}

bitflags::bitflags! {
    /// Clients a user is currently connected from
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClientTypes: u8 {
        const DESKTOP = 1 << 0;
        const MOBILE  = 1 << 1;
        const WEB     = 1 << 2;
    }
}

impl_serde_for_bitflags!(ClientTypes: u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde_repr::Serialize_repr, serde_repr::Deserialize_repr)]
#[repr(u8)]
pub enum ActivityKind {
    Playing = 0,
    Streaming = 1,
    Listening = 2,
    Watching = 3,
    Custom = 4,
    Competing = 5,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub name: SmolStr,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SmolStr>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPresence {
    pub status: UserStatus,

    #[serde(default)]
    pub clients: ClientTypes,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<Activity>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialPresence {
    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub status: Nullable<UserStatus>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub clients: Nullable<ClientTypes>,

    #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
    pub activities: Nullable<Vec<Activity>>,
}

impl UserPresence {
    /// Applies a partial presence, returning `true` if anything changed.
    ///
    /// A `null` client set or activity list clears it.
    pub fn merge(&mut self, update: &PartialPresence) -> bool {
        let mut changed = merge_value(&mut self.status, &update.status);

        changed |= match update.clients {
            Nullable::Null => merge_value(&mut self.clients, &Nullable::Some(ClientTypes::empty())),
            clients => merge_value(&mut self.clients, &clients),
        };

        changed |= match update.activities {
            Nullable::Null => merge_value(&mut self.activities, &Nullable::Some(Vec::new())),
            ref activities => merge_value(&mut self.activities, activities),
        };

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_merge() {
        let mut presence = UserPresence::default();

        let update: PartialPresence = serde_json::from_str(
            r#"{"status": "dnd", "clients": 5, "activities": [{"type": 0, "name": "chess"}]}"#,
        )
        .unwrap();

        assert!(presence.merge(&update));
        assert_eq!(presence.status, UserStatus::DoNotDisturb);
        assert_eq!(presence.clients, ClientTypes::DESKTOP | ClientTypes::WEB);
        assert_eq!(presence.activities[0].kind, ActivityKind::Playing);

        assert!(!presence.merge(&update));

        let clear: PartialPresence = serde_json::from_str(r#"{"clients": null, "activities": null}"#).unwrap();

        assert!(presence.merge(&clear));
        assert_eq!(presence.status, UserStatus::DoNotDisturb);
        assert!(presence.clients.is_empty());
        assert!(presence.activities.is_empty());
    }
}
