use crate::error::Error;

/// Result type alias used throughout colgather.
pub type Result<T> = std::result::Result<T, Error>;
