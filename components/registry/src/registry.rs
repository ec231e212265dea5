use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use smol_str::SmolStr;

use models::{Mentionable, PartialPresence, PartialUser, Presentable, Snowflake, User, UserIdentity};
use util::cmap::{CHashMap, Entry};

use crate::{error::RegistryError, holder::UserRef};

/// Number of holders keeping a record alive
pub type RefCount = u16;

struct RegistryEntry {
    /// Never zero while the entry is in the table
    refs: RefCount,
    user: Arc<RwLock<User>>,
}

/// Outcome of [`UserRegistry::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upsert {
    /// The user was not registered, the caller holds its initial reference
    Created,
    /// An existing record was modified by the snapshot
    Changed,
    Unchanged,
}

/// Shared table of user records with reference-counted lifetimes.
///
/// Cloning the registry is cheap and every clone refers to the same table.
///
/// Locks are never nested. The shard lock guards a user's reference count and
/// table membership, and each record has its own lock for merges and reads.
/// A merge that races the final [`remove_ref`](Self::remove_ref) lands on the
/// evicted record, as if the merge happened just before eviction.
#[derive(Clone)]
pub struct UserRegistry {
    users: Arc<CHashMap<Snowflake, RegistryEntry>>,
}

/// Non-owning view of a registered user.
///
/// Holding a handle does not keep the record registered, use [`UserRef`] for that.
/// Reads copy out of the record, since other threads may merge into it at any time.
#[derive(Clone)]
pub struct UserHandle {
    id: Snowflake,
    user: Arc<RwLock<User>>,
}

#[cold]
#[inline(never)]
pub(crate) fn fault(err: RegistryError) -> ! {
    log::error!("User registry fault: {err}");
    panic!("{err}")
}

impl Default for UserRegistry {
    fn default() -> Self {
        UserRegistry {
            users: Arc::new(CHashMap::default()),
        }
    }
}

impl UserRegistry {
    pub fn new(config: &config::sections::registry::Registry) -> Self {
        Self::with_shards(config.shards)
    }

    pub fn with_shards(num_shards: usize) -> Self {
        UserRegistry {
            users: Arc::new(CHashMap::new(num_shards)),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, id: Snowflake) -> bool {
        self.users.contains_key(&id)
    }

    /// Current number of holders, `None` if not registered
    pub fn ref_count(&self, id: Snowflake) -> Option<RefCount> {
        self.users.get(&id).map(|entry| entry.refs)
    }

    /// Copy of the current record. Never affects the reference count.
    pub fn lookup(&self, id: Snowflake) -> Option<User> {
        self.handle(id).map(|handle| handle.get())
    }

    pub fn handle(&self, id: Snowflake) -> Option<UserHandle> {
        self.users.get(&id).map(|entry| UserHandle {
            id,
            user: entry.user.clone(),
        })
    }

    /// Registers an unseen user with a single reference, or merges the snapshot into the
    /// existing record without acquiring a reference.
    ///
    /// On [`Upsert::Created`] the caller owns that first reference and must release it
    /// with [`remove_ref`](Self::remove_ref).
    pub fn upsert(&self, snapshot: &PartialUser) -> (UserHandle, Upsert) {
        let id = snapshot.id;

        let (user, created) = self.users.entry(id, |entry| match entry {
            Entry::Occupied(occupied) => (occupied.get().user.clone(), false),
            Entry::Vacant(vacant) => {
                let user = Arc::new(RwLock::new(User::from_partial(snapshot)));

                vacant.insert(RegistryEntry {
                    refs: 1,
                    user: user.clone(),
                });

                (user, true)
            }
        });

        let handle = UserHandle { id, user };

        if created {
            log::debug!("Registered user {id}");

            return (handle, Upsert::Created);
        }

        let outcome = match handle.merge(snapshot) {
            true => Upsert::Changed,
            false => Upsert::Unchanged,
        };

        (handle, outcome)
    }

    /// See [`upsert`](Self::upsert)
    pub fn get_or_create(&self, snapshot: &PartialUser) -> UserHandle {
        self.upsert(snapshot).0
    }

    /// Registers or merges the snapshot and takes a reference to the user in one step.
    pub fn acquire(&self, snapshot: &PartialUser) -> Result<UserRef, RegistryError> {
        let id = snapshot.id;

        let (user, created) = self.users.entry(id, |entry| -> Result<_, RegistryError> {
            match entry {
                Entry::Occupied(mut occupied) => {
                    let entry = occupied.get_mut();
                    entry.refs = entry.refs.checked_add(1).ok_or(RegistryError::RefOverflow(id))?;

                    log::trace!("User {id} refs: {}", entry.refs);

                    Ok((entry.user.clone(), false))
                }
                Entry::Vacant(vacant) => {
                    let user = Arc::new(RwLock::new(User::from_partial(snapshot)));

                    vacant.insert(RegistryEntry {
                        refs: 1,
                        user: user.clone(),
                    });

                    Ok((user, true))
                }
            }
        })?;

        let handle = UserHandle { id, user };

        if created {
            log::debug!("Registered user {id}");
        } else {
            handle.merge(snapshot);
        }

        Ok(UserRef::new(self.clone(), handle))
    }

    /// Takes a reference to an already registered user.
    pub fn attach(&self, id: Snowflake) -> Result<UserRef, RegistryError> {
        let (handle, _) = self.increment(id)?;

        Ok(UserRef::new(self.clone(), handle))
    }

    fn increment(&self, id: Snowflake) -> Result<(UserHandle, RefCount), RegistryError> {
        self.users.entry(id, |entry| -> Result<_, RegistryError> {
            match entry {
                Entry::Vacant(_) => Err(RegistryError::NotRegistered(id)),
                Entry::Occupied(mut occupied) => {
                    let entry = occupied.get_mut();
                    entry.refs = entry.refs.checked_add(1).ok_or(RegistryError::RefOverflow(id))?;

                    log::trace!("User {id} refs: {}", entry.refs);

                    let handle = UserHandle {
                        id,
                        user: entry.user.clone(),
                    };

                    Ok((handle, entry.refs))
                }
            }
        })
    }

    /// Increments the reference count, returning the new count.
    pub fn try_add_ref(&self, id: Snowflake) -> Result<RefCount, RegistryError> {
        self.increment(id).map(|(_, refs)| refs)
    }

    /// Decrements the reference count, evicting the user when it reaches zero.
    ///
    /// Returns the remaining count.
    pub fn try_remove_ref(&self, id: Snowflake) -> Result<RefCount, RegistryError> {
        self.users.entry(id, |entry| match entry {
            Entry::Vacant(_) => Err(RegistryError::NotRegistered(id)),
            Entry::Occupied(occupied) if occupied.get().refs <= 1 => {
                occupied.remove();

                log::debug!("Evicted user {id}");

                Ok(0)
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.refs -= 1;

                log::trace!("User {id} refs: {}", entry.refs);

                Ok(entry.refs)
            }
        })
    }

    /// Like [`try_add_ref`](Self::try_add_ref), but an unregistered user or an overflowing
    /// count is a bug in the caller and panics.
    pub fn add_ref(&self, id: Snowflake) -> RefCount {
        self.try_add_ref(id).unwrap_or_else(|err| fault(err))
    }

    /// Like [`try_remove_ref`](Self::try_remove_ref), but releasing an unregistered user
    /// is a bug in the caller and panics.
    pub fn remove_ref(&self, id: Snowflake) -> RefCount {
        self.try_remove_ref(id).unwrap_or_else(|err| fault(err))
    }

    /// Merges a snapshot into a registered user without registering unseen ones.
    ///
    /// Returns `None` if the user isn't registered, otherwise whether anything changed.
    pub fn update(&self, snapshot: &PartialUser) -> Option<bool> {
        Some(self.handle(snapshot.id)?.merge(snapshot))
    }

    /// Merges a presence update into a registered user.
    ///
    /// Returns `None` if the user isn't registered, otherwise whether anything changed.
    pub fn update_presence(&self, id: Snowflake, presence: &PartialPresence) -> Option<bool> {
        let handle = self.handle(id)?;

        let changed = handle.user.write().update_presence(presence);

        if changed {
            log::trace!("Presence changed for user {id}");
        }

        Some(changed)
    }
}

impl fmt::Debug for UserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRegistry").field("len", &self.len()).finish()
    }
}

impl UserHandle {
    #[inline]
    pub fn id(&self) -> Snowflake {
        self.id
    }

    /// Copy of the current state
    pub fn get(&self) -> User {
        self.user.read().clone()
    }

    /// Reads the record under its lock. Do not merge into the same user from inside `f`.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&User) -> R,
    {
        f(&self.user.read())
    }

    /// Whether both handles refer to the same record instance
    pub fn ptr_eq(&self, other: &UserHandle) -> bool {
        Arc::ptr_eq(&self.user, &other.user)
    }

    pub(crate) fn merge(&self, snapshot: &PartialUser) -> bool {
        let changed = self.user.write().merge(snapshot);

        if changed {
            log::trace!("Merged update for user {}", self.id);
        }

        changed
    }
}

impl fmt::Debug for UserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|user| f.debug_tuple("UserHandle").field(user).finish())
    }
}

impl UserIdentity for UserHandle {
    #[inline]
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Mentionable for UserHandle {}

impl Presentable for UserHandle {
    fn username(&self) -> SmolStr {
        self.with(|user| user.username.clone())
    }

    fn discriminator(&self) -> Option<SmolStr> {
        self.with(|user| user.discriminator.clone())
    }

    fn global_name(&self) -> Option<SmolStr> {
        self.with(|user| user.global_name.clone())
    }

    fn is_bot(&self) -> bool {
        self.with(|user| user.bot)
    }

    fn display_name(&self) -> SmolStr {
        self.with(|user| user.display_name())
    }

    fn full_name(&self, bidirectional: bool) -> String {
        self.with(|user| user.full_name(bidirectional))
    }
}
