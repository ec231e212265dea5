use std::fmt;
use std::ops::Deref;

use models::{PartialUser, Snowflake};

use crate::registry::{fault, UserHandle, UserRegistry};

/// Owning reference to a registered user.
///
/// Created only by [`UserRegistry::acquire`] and [`UserRegistry::attach`], which makes
/// every site that extends a user's lifetime explicit. Cloning takes another reference,
/// dropping releases one. When the last one is dropped the user is evicted.
pub struct UserRef {
    registry: UserRegistry,
    handle: UserHandle,
}

impl UserRef {
    #[inline]
    pub(crate) fn new(registry: UserRegistry, handle: UserHandle) -> Self {
        UserRef { registry, handle }
    }

    #[inline]
    pub fn handle(&self) -> &UserHandle {
        &self.handle
    }

    #[inline]
    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    /// Merges a snapshot of this user through the registry, returning whether anything changed.
    pub fn update(&self, snapshot: &PartialUser) -> bool {
        debug_assert_eq!(self.handle.id(), snapshot.id);

        self.handle.merge(snapshot)
    }
}

impl Deref for UserRef {
    type Target = UserHandle;

    #[inline]
    fn deref(&self) -> &UserHandle {
        &self.handle
    }
}

impl Clone for UserRef {
    fn clone(&self) -> Self {
        self.registry.add_ref(self.handle.id());

        UserRef {
            registry: self.registry.clone(),
            handle: self.handle.clone(),
        }
    }
}

impl Drop for UserRef {
    fn drop(&mut self) {
        let id: Snowflake = self.handle.id();

        if let Err(err) = self.registry.try_remove_ref(id) {
            // a second panic while unwinding would abort
            if std::thread::panicking() {
                log::error!("User registry fault while unwinding: {err}");
            } else {
                fault(err);
            }
        }
    }
}

impl fmt::Debug for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserRef").field(&self.handle).finish()
    }
}
