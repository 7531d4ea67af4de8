//! Per-student attendance marks.
//!
//! Layout: `attendance/{IdentityKey}/{DateKey} = true`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::date::CalendarDate;
use crate::error::{McetError, McetResult};
use crate::keys::{DateKey, IdentityKey};
use crate::session::Session;
use crate::store::{Store, StorePath};

pub const ATTENDANCE_ROOT: &str = "attendance";

/// Attendance for one identity, sorted by date.
pub type AttendanceMap = BTreeMap<DateKey, bool>;

#[derive(Clone)]
pub struct AttendanceRepository {
    store: Arc<dyn Store>,
}

impl AttendanceRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        AttendanceRepository { store }
    }

    fn identity_path(identity: &IdentityKey) -> McetResult<StorePath> {
        StorePath::root().child(ATTENDANCE_ROOT)?.child(identity)
    }

    /// Every mark recorded for `identity`. No records is an empty map.
    pub async fn load_all(&self, identity: &IdentityKey) -> McetResult<AttendanceMap> {
        let path = Self::identity_path(identity)?;

        let marks: AttendanceMap = match self.store.get(&path).await? {
            None => AttendanceMap::new(),
            Some(Value::Object(children)) => children
                .iter()
                .map(|(key, value)| -> McetResult<(DateKey, bool)> {
                    let date = DateKey::parse(key)?;
                    let present = value.as_bool().ok_or_else(|| McetError::MalformedRecord {
                        path: format!("{}/{}", path, key),
                        reason: format!("expected a boolean, found {}", value),
                    })?;
                    Ok((date, present))
                })
                .collect::<McetResult<_>>()?,
            Some(other) => {
                return Err(McetError::MalformedRecord {
                    path: path.to_string(),
                    reason: format!("expected an object of dates, found {}", other),
                });
            }
        };

        debug!(identity = %identity, count = marks.len(), "loaded attendance");
        Ok(marks)
    }

    /// Record `identity` as present on `date`. Writing the same day again
    /// changes nothing. Only faculty callers may mark attendance.
    pub async fn mark_present(
        &self,
        caller: &Session,
        identity: &IdentityKey,
        date: CalendarDate,
    ) -> McetResult<()> {
        caller.require_faculty("marking attendance")?;

        let key = DateKey::from(date);
        let path = Self::identity_path(identity)?.child(&key)?;
        self.store.set(&path, Value::Bool(true)).await?;

        debug!(identity = %identity, date = %key, marked_by = caller.email(), "marked present");
        Ok(())
    }
}
