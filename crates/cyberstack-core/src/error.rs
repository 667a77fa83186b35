use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("certification not found: {0}")]
    CertificationNotFound(String),

    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("invalid store key '{0}': must be alphanumeric with dots, underscores, or hyphens")]
    InvalidKey(String),

    #[error("invalid column: {0}")]
    InvalidColumn(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid team: {0}")]
    InvalidTeam(String),

    #[error("invalid certification status: {0}")]
    InvalidCertStatus(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("capacity must be between 0 and 100: {0}")]
    InvalidCapacity(i64),

    #[error("efficiency must be between 0 and 100: {0}")]
    InvalidEfficiency(i64),

    #[error("duplicate team member: {0}")]
    DuplicateTeamMember(String),

    #[error("certification name is required")]
    CertificationNameRequired,

    #[error("message text is empty")]
    EmptyMessage,

    #[error("task text is empty")]
    EmptyTaskText,

    #[error("certification status '{0}' requires a date")]
    CertificationDateRequired(String),

    #[error("destination index {index} is out of bounds for a column of {len} tasks")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("cannot delete the primary admin account")]
    PrimaryAdmin,

    #[error("not signed in")]
    Unauthorized,

    #[error("admin role required")]
    Forbidden,

    #[error("Invalid email or password. Please try again.")]
    InvalidCredential,

    #[error("A user with this email already exists.")]
    EmailExists,

    #[error("Password should be at least 6 characters.")]
    WeakPassword,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
