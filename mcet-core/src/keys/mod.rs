//! Backend key encodings for dates and identities.

mod date_key;
mod identity_key;

pub use date_key::DateKey;
pub use identity_key::IdentityKey;
