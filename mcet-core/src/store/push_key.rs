//! Child keys for appends.

use uuid::Uuid;

/// A fresh UUIDv7 as lowercase hyphenated text.
///
/// Keys from one process sort in creation order; keys from different
/// clients sort by millisecond and never collide in practice.
pub fn new_push_key() -> String {
    Uuid::now_v7().to_string()
}
