//! Signed-in caller identity and role.
//!
//! Credentials are verified elsewhere; the core only consumes the verified
//! email and role for the current session.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{McetError, McetResult};
use crate::keys::IdentityKey;

/// Stored lowercase; parsed case-insensitively everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Student,
    Faculty,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
        }
    }
}

impl FromStr for Role {
    type Err = McetError;

    fn from_str(s: &str) -> McetResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            other => Err(McetError::InvalidArgument(format!(
                "unknown role '{}' (expected student or faculty)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = McetError;

    fn try_from(s: String) -> McetResult<Self> {
        s.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.name().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The verified caller for one app session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    email: String,
    role: Role,
    identity: IdentityKey,
}

impl Session {
    pub fn new(email: &str, role: Role) -> McetResult<Self> {
        let email = email.trim().to_string();
        let identity = IdentityKey::encode(&email)?;
        Ok(Session {
            email,
            role,
            identity,
        })
    }

    pub fn student(email: &str) -> McetResult<Self> {
        Self::new(email, Role::Student)
    }

    pub fn faculty(email: &str) -> McetResult<Self> {
        Self::new(email, Role::Faculty)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn identity(&self) -> &IdentityKey {
        &self.identity
    }

    pub fn is_faculty(&self) -> bool {
        self.role == Role::Faculty
    }

    /// Fails with `Unauthorized` unless the caller is faculty.
    pub fn require_faculty(&self, action: &str) -> McetResult<()> {
        if self.is_faculty() {
            Ok(())
        } else {
            Err(McetError::Unauthorized(format!(
                "{} requires the faculty role ({} is {})",
                action, self.email, self.role
            )))
        }
    }
}

/// Supplies the verified session, e.g. from a hosted auth service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_session(&self) -> McetResult<Session>;
}
