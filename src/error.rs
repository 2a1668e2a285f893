use std::fmt;

/// Error returned when a [`TinyLfu`](crate::TinyLfu) cannot be constructed.
///
/// Construction is the only fallible operation in this crate: once built,
/// every lookup and update takes its index modulo a fixed positive width
/// and cannot fail.  Neither variant is worth retrying automatically: an
/// invalid configuration stays invalid, and an allocation failure will not
/// clear without external memory-pressure relief.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A configuration parameter failed validation.  Raised before any
    /// backing array is allocated.
    InvalidConfig(String),
    /// A backing array could not be allocated.  No partially built
    /// structure is ever returned.
    AllocationFailed {
        /// Size of the allocation that failed, in bytes.
        bytes: usize,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            BuildError::AllocationFailed { bytes } => {
                write!(f, "failed to allocate {} bytes of backing storage", bytes)
            }
        }
    }
}

impl std::error::Error for BuildError {}
