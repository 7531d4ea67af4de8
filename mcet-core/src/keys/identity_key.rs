use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{McetError, McetResult};

/// Backend-safe form of a user's email.
///
/// Store path segments cannot contain `.`, so every `.` becomes `_`. The
/// mapping is lossy: `a.b@x.edu` and `a_b@x.edu` share a key. Keep the email
/// around for display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn encode(email: &str) -> McetResult<Self> {
        let email = email.trim();
        if email.is_empty() {
            return Err(McetError::InvalidArgument("email is empty".into()));
        }
        Ok(IdentityKey(email.replace('.', "_")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IdentityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_dot() {
        let key = IdentityKey::encode("jane.doe@students.mcet.in").unwrap();
        assert_eq!(key.as_str(), "jane_doe@students_mcet_in");
    }

    #[test]
    fn test_other_characters_untouched() {
        let key = IdentityKey::encode("a+tag-1_x@host").unwrap();
        assert_eq!(key.as_str(), "a+tag-1_x@host");
    }

    #[test]
    fn test_output_never_contains_dot() {
        for email in [
            "a@b.c",
            "...@...",
            "first.middle.last@dept.school.edu",
            "x@y",
        ] {
            assert!(!IdentityKey::encode(email).unwrap().as_str().contains('.'));
        }
    }

    #[test]
    fn test_known_collision_is_lossy() {
        let dotted = IdentityKey::encode("a.b@x.edu").unwrap();
        let underscored = IdentityKey::encode("a_b@x_edu").unwrap();
        assert_eq!(dotted, underscored);
    }

    #[test]
    fn test_empty_email_rejected() {
        assert!(matches!(
            IdentityKey::encode("  "),
            Err(McetError::InvalidArgument(_))
        ));
    }
}
