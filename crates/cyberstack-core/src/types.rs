use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ColumnId
// ---------------------------------------------------------------------------

/// One of the three fixed Kanban lanes. A task's status is encoded by the
/// column path it is stored under, not by a field on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnId {
    Todo,
    InProgress,
    Done,
}

impl ColumnId {
    pub fn all() -> &'static [ColumnId] {
        &[ColumnId::Todo, ColumnId::InProgress, ColumnId::Done]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnId::Todo => "todo",
            ColumnId::InProgress => "in-progress",
            ColumnId::Done => "done",
        }
    }

    /// Display title shown above the lane.
    pub fn title(self) -> &'static str {
        match self {
            ColumnId::Todo => "To Do",
            ColumnId::InProgress => "In Progress",
            ColumnId::Done => "Done",
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColumnId {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(ColumnId::Todo),
            "in-progress" => Ok(ColumnId::InProgress),
            "done" => Ok(ColumnId::Done),
            _ => Err(crate::error::CoreError::InvalidColumn(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Critical,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::CoreError;

    /// Case-insensitive: generation-flow output arrives as free text
    /// ("high", "HIGH", "High") and is normalized at the store boundary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(crate::error::CoreError::InvalidPriority(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TeamColor
// ---------------------------------------------------------------------------

/// The team a board task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamColor {
    Red,
    Blue,
    Purple,
}

impl TeamColor {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamColor::Red => "Red",
            TeamColor::Blue => "Blue",
            TeamColor::Purple => "Purple",
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TeamColor {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(TeamColor::Red),
            "blue" => Ok(TeamColor::Blue),
            "purple" => Ok(TeamColor::Purple),
            _ => Err(crate::error::CoreError::InvalidTeam(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TeamName
// ---------------------------------------------------------------------------

/// Roster teams carry one of three fixed names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamName {
    #[serde(rename = "Red Team")]
    RedTeam,
    #[serde(rename = "Blue Team")]
    BlueTeam,
    #[serde(rename = "Purple Team")]
    PurpleTeam,
}

impl TeamName {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamName::RedTeam => "Red Team",
            TeamName::BlueTeam => "Blue Team",
            TeamName::PurpleTeam => "Purple Team",
        }
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TeamName {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red team" | "red" => Ok(TeamName::RedTeam),
            "blue team" | "blue" => Ok(TeamName::BlueTeam),
            "purple team" | "purple" => Ok(TeamName::PurpleTeam),
            _ => Err(crate::error::CoreError::InvalidTeam(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Platform-wide role. Store records hold free-text role strings, so this
/// type is the closed enumeration applied at the store boundary: anything
/// that is not a case-insensitive match for "admin" reads as `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Normalize a raw store value. Fail-closed: a missing or malformed
    /// value is an ordinary user, never an admin.
    pub fn normalize(raw: Option<&str>) -> Role {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("admin") => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(crate::error::CoreError::InvalidRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CertStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertStatus {
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl CertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CertStatus::Planned => "Planned",
            CertStatus::InProgress => "In Progress",
            CertStatus::Completed => "Completed",
        }
    }

    /// Planned and Completed certifications are pinned to a date; only
    /// In Progress carries a meaningful progress percentage.
    pub fn requires_date(self) -> bool {
        matches!(self, CertStatus::Planned | CertStatus::Completed)
    }
}

impl fmt::Display for CertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CertStatus {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "planned" => Ok(CertStatus::Planned),
            "in progress" | "in-progress" => Ok(CertStatus::InProgress),
            "completed" => Ok(CertStatus::Completed),
            _ => Err(crate::error::CoreError::InvalidCertStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
