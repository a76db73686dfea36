//! Error types for configuration, table setup and storage.

use std::fmt;

/// Errors surfaced outside the per-tick physics.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolError {
    /// A settings value is out of its allowed range.
    InvalidSettings(&'static str),
    /// The viewport cannot fit a table whose pockets are larger than a ball
    /// and smaller than half the short side.
    TableTooSmall { width: f32, height: f32 },
    /// The key-value store rejected a read or write.
    Storage(String),
    /// The host page is missing something the game needs (canvas, 2D context).
    Platform(String),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidSettings(reason) => write!(f, "invalid settings: {}", reason),
            PoolError::TableTooSmall { width, height } => {
                write!(f, "viewport {}x{} is too small for a table", width, height)
            }
            PoolError::Storage(reason) => write!(f, "storage error: {}", reason),
            PoolError::Platform(reason) => write!(f, "platform error: {}", reason),
        }
    }
}

impl std::error::Error for PoolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            PoolError::TableTooSmall {
                width: 50.0,
                height: 28.0
            }
            .to_string(),
            "viewport 50x28 is too small for a table"
        );
        assert_eq!(
            PoolError::InvalidSettings("friction must be in (0, 1)").to_string(),
            "invalid settings: friction must be in (0, 1)"
        );
        assert_eq!(
            PoolError::Platform("no canvas".into()).to_string(),
            "platform error: no canvas"
        );
    }
}
