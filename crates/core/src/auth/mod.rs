//! Authenticated principals and their roles.

use classiq_shared::types::UserId;
use serde::{Deserialize, Serialize};

/// Roles carried in the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Enrolled in classes, marks own attendance.
    Student,
    /// Teaches classes, controls windows and tokens for them.
    Faculty,
    /// Full access.
    Admin,
}

impl Role {
    /// Returns true if this role may run a class (windows, tokens, manual marks).
    #[must_use]
    pub const fn can_teach(&self) -> bool {
        matches!(self, Self::Faculty | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Faculty => write!(f, "faculty"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "faculty" => Ok(Self::Faculty),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The already-authenticated caller of an engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// User ID.
    pub id: UserId,
    /// Role.
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns true for admins.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Returns true if the caller may manage a class taught by `faculty_id`.
    #[must_use]
    pub fn manages(&self, faculty_id: UserId) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Faculty => self.id == faculty_id,
            Role::Student => false,
        }
    }
}
