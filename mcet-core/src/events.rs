//! School-wide events, several per day.
//!
//! Layout: `events/{DateKey}/{pushKey}/title = string`. Titles for a day come
//! back in push-key order, which is the order they were added.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::date::CalendarDate;
use crate::error::{McetError, McetResult};
use crate::keys::DateKey;
use crate::session::Session;
use crate::store::{Store, StorePath};

pub const EVENTS_ROOT: &str = "events";

/// Event titles per day, sorted by date.
pub type EventMap = BTreeMap<DateKey, Vec<String>>;

#[derive(Clone)]
pub struct EventRepository {
    store: Arc<dyn Store>,
}

impl EventRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        EventRepository { store }
    }

    fn root_path() -> McetResult<StorePath> {
        StorePath::root().child(EVENTS_ROOT)
    }

    fn date_path(key: &DateKey) -> McetResult<StorePath> {
        Self::root_path()?.child(key)
    }

    /// Every event of every day.
    pub async fn load_all(&self) -> McetResult<EventMap> {
        let path = Self::root_path()?;

        let events: EventMap = match self.store.get(&path).await? {
            None => EventMap::new(),
            Some(Value::Object(days)) => days
                .iter()
                .map(|(key, entries)| -> McetResult<(DateKey, Vec<String>)> {
                    let date = DateKey::parse(key)?;
                    let titles = titles_from(&format!("{}/{}", path, key), entries)?;
                    Ok((date, titles))
                })
                .collect::<McetResult<_>>()?,
            Some(other) => return Err(not_an_object(&path.to_string(), &other)),
        };

        debug!(days = events.len(), "loaded events");
        Ok(events)
    }

    /// Titles recorded for one day, oldest first.
    pub async fn load_date(&self, date: CalendarDate) -> McetResult<Vec<String>> {
        let path = Self::date_path(&DateKey::from(date))?;
        match self.store.get(&path).await? {
            None => Ok(Vec::new()),
            Some(entries) => titles_from(&path.to_string(), &entries),
        }
    }

    /// Append `title` to `date` and return that day's full list as the
    /// store now has it, including events other sessions added meanwhile.
    ///
    /// The store assigns the child key, so two callers adding to the same
    /// day at once both keep their entry.
    pub async fn add_event(
        &self,
        caller: &Session,
        date: CalendarDate,
        title: &str,
    ) -> McetResult<Vec<String>> {
        caller.require_faculty("adding events")?;
        let title = validate_title(title)?;

        let key = DateKey::from(date);
        let path = Self::date_path(&key)?;
        let child = self.store.push(&path, json!({ "title": title })).await?;
        debug!(date = %key, child = %child, added_by = caller.email(), "added event");

        self.load_date(date).await
    }
}

pub fn validate_title(title: &str) -> McetResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        Err(McetError::InvalidArgument("event title is empty".into()))
    } else {
        Ok(title)
    }
}

fn titles_from(path: &str, entries: &Value) -> McetResult<Vec<String>> {
    let entries = entries
        .as_object()
        .ok_or_else(|| not_an_object(path, entries))?;

    let mut entries: Vec<(&String, &Value)> = entries.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    // Entries without a string title are skipped rather than failing the day.
    Ok(entries
        .into_iter()
        .filter_map(|(_, entry)| entry.get("title").and_then(Value::as_str))
        .map(String::from)
        .collect())
}

fn not_an_object(path: &str, found: &Value) -> McetError {
    McetError::MalformedRecord {
        path: path.to_string(),
        reason: format!("expected an object, found {}", found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    fn faculty() -> Session {
        Session::faculty("prof@mcet.in").unwrap()
    }

    #[tokio::test]
    async fn test_empty_store_has_no_events() {
        let repo = EventRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_event_returns_full_day() {
        let repo = EventRepository::new(Arc::new(MemoryStore::new()));
        let day = date(2025, 3, 7);

        assert_eq!(repo.add_event(&faculty(), day, "Expo").await.unwrap(), vec!["Expo"]);
        assert_eq!(
            repo.add_event(&faculty(), day, "  Guest lecture ").await.unwrap(),
            vec!["Expo", "Guest lecture"]
        );

        let all = repo.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&DateKey::from(day)], vec!["Expo", "Guest lecture"]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_both() {
        let store = Arc::new(MemoryStore::new());
        let a = EventRepository::new(store.clone());
        let b = EventRepository::new(store.clone());
        let day = date(2025, 3, 7);
        let (fa, fb) = (faculty(), Session::faculty("hod@mcet.in").unwrap());

        let (ra, rb) = tokio::join!(a.add_event(&fa, day, "A"), b.add_event(&fb, day, "B"));
        ra.unwrap();
        rb.unwrap();

        let titles = EventRepository::new(store).load_date(day).await.unwrap();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"A".to_string()));
        assert!(titles.contains(&"B".to_string()));
    }

    #[tokio::test]
    async fn test_empty_title_never_reaches_store() {
        let store = Arc::new(MemoryStore::new());
        // An offline store would turn any call into NetworkUnavailable.
        store.set_offline(true);
        let repo = EventRepository::new(store);

        let err = repo.add_event(&faculty(), date(2025, 3, 7), "   ").await.unwrap_err();
        assert!(matches!(err, McetError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_student_cannot_add_events() {
        let repo = EventRepository::new(Arc::new(MemoryStore::new()));
        let student = Session::student("s@mcet.in").unwrap();

        assert!(matches!(
            repo.add_event(&student, date(2025, 3, 7), "Party").await,
            Err(McetError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_entries_without_title_are_skipped() {
        let store = MemoryStore::with_document(json!({
            "events": {
                "2025-03-07": {
                    "-Na1": {"title": "Expo"},
                    "-Na2": {"note": "no title"},
                    "-Na3": {"title": "Sports day"}
                }
            }
        }));
        let repo = EventRepository::new(Arc::new(store));

        let all = repo.load_all().await.unwrap();
        assert_eq!(all[&DateKey::parse("2025-03-07").unwrap()], vec!["Expo", "Sports day"]);
    }

    #[tokio::test]
    async fn test_bad_date_key_is_malformed() {
        let store = MemoryStore::with_document(json!({
            "events": {"07-03-2025": {"-Na1": {"title": "Expo"}}}
        }));
        let repo = EventRepository::new(Arc::new(store));

        assert!(matches!(repo.load_all().await, Err(McetError::MalformedKey(_))));
    }

    #[test]
    fn test_titles_follow_push_key_order() {
        let mut entries = serde_json::Map::new();
        entries.insert("0198c2a0-0003-7000-8000-000000000000".into(), json!({"title": "Third"}));
        entries.insert("0198c2a0-0001-7000-8000-000000000000".into(), json!({"title": "First"}));
        entries.insert("0198c2a0-0002-7000-8000-000000000000".into(), json!({"title": "Second"}));

        let titles = titles_from("events/2025-03-07", &Value::Object(entries)).unwrap();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }
}
