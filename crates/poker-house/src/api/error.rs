use thiserror::Error;

/// Construction-time failures for game objects.
///
/// These are data errors (a bad table layout, a typo in a spawn list), not
/// runtime conditions; callers are expected to fix the input rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// Chip value outside the fixed set of denominations.
    #[error("invalid chip denomination {0}, expected one of 1, 5, 10, 25, 100")]
    InvalidDenomination(u32),
}
