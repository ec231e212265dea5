use smol_str::SmolStr;

/// Recoverable failures when deriving values from a user record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    /// No discriminator has been observed for this user
    #[error("Discriminator is unavailable")]
    DiscriminatorUnavailable,

    #[error("Invalid discriminator: {0:?}")]
    InvalidDiscriminator(SmolStr),
}
