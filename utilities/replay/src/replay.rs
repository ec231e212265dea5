use hashbrown::{hash_map::Entry, HashMap};

use models::{PartialPresence, PartialUser, Presentable, Snowflake, UserIdentity};
use registry::{GuildMember, PartialMember, RegistryError, UserRegistry};

#[derive(Debug, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    UserUpdate(PartialUser),
    PresenceUpdate(PresenceUpdate),
    GuildMemberAdd(PartialMember),
    GuildMemberUpdate(PartialMember),
    GuildMemberRemove(MemberRemove),
}

#[derive(Debug, Deserialize)]
pub struct PresenceUpdate {
    pub user: PartialUser,

    #[serde(flatten)]
    pub presence: PartialPresence,
}

#[derive(Debug, Deserialize)]
pub struct MemberRemove {
    pub guild_id: Snowflake,
    pub user: PartialUser,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct Stats {
    pub events: usize,
    pub changed: usize,
    pub skipped: usize,
}

/// Applies events to a registry, holding one [`GuildMember`] per (guild, user) pair
pub struct Replay {
    registry: UserRegistry,
    members: HashMap<(Snowflake, Snowflake), GuildMember>,
    stats: Stats,
}

impl Replay {
    pub fn new(registry: UserRegistry) -> Self {
        Replay {
            registry,
            members: HashMap::new(),
            stats: Stats::default(),
        }
    }

    #[inline]
    pub fn stats(&self) -> Stats {
        self.stats
    }

    #[inline]
    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    #[inline]
    pub fn members(&self) -> usize {
        self.members.len()
    }

    /// Parses and applies one line of input. Bad lines are logged and counted as skipped.
    pub fn line(&mut self, line_no: usize, line: &str) {
        let event = match serde_json::from_str::<Event>(line) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Skipping line {line_no}: {e}");
                self.stats.skipped += 1;
                return;
            }
        };

        match self.apply(event) {
            Ok(changed) => {
                self.stats.events += 1;
                self.stats.changed += changed as usize;
            }
            Err(e) => {
                log::error!("Error applying line {line_no}: {e}");
                self.stats.skipped += 1;
            }
        }
    }

    pub fn apply(&mut self, event: Event) -> Result<bool, RegistryError> {
        Ok(match event {
            Event::UserUpdate(user) => self.update_user(&user),
            Event::PresenceUpdate(update) => {
                let changed = self.update_user(&update.user);

                match self.registry.update_presence(update.user.id, &update.presence) {
                    Some(presence_changed) => changed | presence_changed,
                    None => changed,
                }
            }
            Event::GuildMemberAdd(update) | Event::GuildMemberUpdate(update) => {
                match self.members.entry((update.guild_id, update.user.id)) {
                    Entry::Occupied(mut member) => member.get_mut().merge(&update),
                    Entry::Vacant(vacant) => {
                        let member = vacant.insert(GuildMember::new(&self.registry, &update)?);

                        log::debug!("{} joined guild {}", member.id(), member.guild_id);

                        true
                    }
                }
            }
            Event::GuildMemberRemove(remove) => {
                self.update_user(&remove.user);

                match self.members.remove(&(remove.guild_id, remove.user.id)) {
                    Some(member) => {
                        log::debug!("{} left guild {}", member.id(), member.guild_id);
                        true
                    }
                    None => {
                        log::debug!("Unknown member {} of guild {}", remove.user.id, remove.guild_id);
                        false
                    }
                }
            }
        })
    }

    fn update_user(&self, user: &PartialUser) -> bool {
        match self.registry.update(user) {
            Some(changed) => changed,
            None => {
                log::debug!("Ignoring update for unregistered user {}", user.id);
                false
            }
        }
    }

    pub fn summary(&self, bidirectional: bool) {
        let Stats { events, changed, skipped } = self.stats;

        log::info!("Replayed {events} events, {changed} changed state, {skipped} skipped");
        log::info!("{} users registered, {} guild members", self.registry.len(), self.members.len());

        for member in self.members.values() {
            log::debug!(
                "{} ({}) in guild {}, refs: {}",
                member.full_name(bidirectional),
                member.display_name(),
                member.guild_id,
                self.registry.ref_count(member.id()).unwrap_or(0),
            );
        }
    }

    /// Releases every member, returning how many users remain registered
    pub fn finish(self) -> usize {
        let Replay { registry, members, .. } = self;

        drop(members);

        let remaining = registry.len();

        if remaining > 0 {
            log::warn!("{remaining} users still registered after releasing all members");
        }

        remaining
    }
}
