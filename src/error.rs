use thiserror::Error;

/// Failure to allocate a projectile slot
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    #[error("projectile pool is full (capacity {capacity})")]
    Full { capacity: usize },
}

/// Failure to load or validate engine tuning
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
