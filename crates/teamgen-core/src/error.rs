use thiserror::Error;

/// Why an allocation run was rejected before touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no members")]
    NoMembers,

    #[error("team count must be at least 1")]
    TeamCountTooSmall,

    #[error("team count exceeds member count")]
    TeamCountExceedsMembers,
}

#[derive(Debug, Error)]
pub enum TeamError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, TeamError>;
