use models::Snowflake;

/// Misuse of the registry by a caller. These indicate a reference held past its
/// lifetime or released twice, and are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("User {0} is not registered")]
    NotRegistered(Snowflake),

    #[error("Reference count overflow for user {0}")]
    RefOverflow(Snowflake),
}
