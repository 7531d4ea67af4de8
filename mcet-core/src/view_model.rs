//! Month view state: loads, merges and edits one month at a time.
//!
//! ```text
//! Unloaded -> Loading(m) -> Ready(m) -> Loading(m') -> Ready(m') ... -> Disposed
//!                  \-> Failed(m) -> Loading(m) (reload)
//! ```
//!
//! Every load is tagged with a [`LoadTicket`]. A result is applied only if
//! its ticket is still the current one, so a slow fetch for a month the user
//! already navigated away from is dropped instead of overwriting newer data.

use std::collections::btree_map::Entry;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::attendance::{AttendanceMap, AttendanceRepository};
use crate::cell::{self, CalendarCell};
use crate::date::{CalendarDate, YearMonth};
use crate::error::{McetError, McetResult};
use crate::events::{self, EventMap, EventRepository};
use crate::keys::{DateKey, IdentityKey};
use crate::session::Session;
use crate::store::Store;

/// Identifies one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    month: YearMonth,
    generation: u64,
}

impl LoadTicket {
    pub fn month(&self) -> YearMonth {
        self.month
    }
}

/// Public view of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Unloaded,
    Loading(YearMonth),
    Ready(YearMonth),
    Failed(YearMonth),
    Disposed,
}

/// Both record sets as fetched for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthData {
    pub attendance: AttendanceMap,
    pub events: EventMap,
}

/// Whose attendance the view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Subject {
    email: String,
    key: IdentityKey,
}

enum State {
    Unloaded,
    Loading(LoadTicket),
    Ready { month: YearMonth, data: MonthData },
    Failed(YearMonth),
    Disposed,
}

/// Fetches a month's data without borrowing the view model, so callers can
/// run it on another task and hand the result back with
/// [`CalendarViewModel::apply_load`].
#[derive(Clone)]
pub struct MonthLoader {
    attendance: AttendanceRepository,
    events: EventRepository,
    subject: Option<IdentityKey>,
}

impl MonthLoader {
    /// Runs both fetches concurrently and returns once both are done.
    pub async fn fetch(&self, ticket: LoadTicket) -> McetResult<MonthData> {
        debug!(month = %ticket.month, generation = ticket.generation, "fetching month");

        let attendance = async {
            match &self.subject {
                Some(key) => self.attendance.load_all(key).await,
                None => Ok(AttendanceMap::new()),
            }
        };
        let (attendance, events) = tokio::try_join!(attendance, self.events.load_all())?;

        Ok(MonthData { attendance, events })
    }
}

pub struct CalendarViewModel {
    session: Session,
    subject: Option<Subject>,
    attendance: AttendanceRepository,
    events: EventRepository,
    state: State,
    generation: u64,
}

impl CalendarViewModel {
    /// A view for `session`. Students always see their own attendance;
    /// faculty start without a subject (events only).
    pub fn new(session: Session, store: Arc<dyn Store>) -> Self {
        let subject = (!session.is_faculty()).then(|| Subject {
            email: session.email().to_string(),
            key: session.identity().clone(),
        });

        CalendarViewModel {
            session,
            subject,
            attendance: AttendanceRepository::new(store.clone()),
            events: EventRepository::new(store),
            state: State::Unloaded,
            generation: 0,
        }
    }

    /// Show `email`'s attendance. Students may only view themselves. Takes
    /// effect on the next load.
    pub fn with_subject(mut self, email: &str) -> McetResult<Self> {
        let key = IdentityKey::encode(email)?;
        if !self.session.is_faculty() && &key != self.session.identity() {
            return Err(McetError::Unauthorized(format!(
                "{} may not view attendance of {}",
                self.session.email(),
                email
            )));
        }

        self.subject = Some(Subject {
            email: email.trim().to_string(),
            key,
        });
        Ok(self)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn subject_email(&self) -> Option<&str> {
        self.subject.as_ref().map(|s| s.email.as_str())
    }

    pub fn phase(&self) -> ViewPhase {
        match &self.state {
            State::Unloaded => ViewPhase::Unloaded,
            State::Loading(ticket) => ViewPhase::Loading(ticket.month),
            State::Ready { month, .. } => ViewPhase::Ready(*month),
            State::Failed(month) => ViewPhase::Failed(*month),
            State::Disposed => ViewPhase::Disposed,
        }
    }

    /// The month currently shown or being loaded.
    pub fn month(&self) -> Option<YearMonth> {
        match &self.state {
            State::Loading(ticket) => Some(ticket.month),
            State::Ready { month, .. } | State::Failed(month) => Some(*month),
            State::Unloaded | State::Disposed => None,
        }
    }

    // LOADING:

    /// Enter `Loading(month)` and return the ticket the result must carry.
    /// Any earlier outstanding ticket becomes stale.
    pub fn begin_load(&mut self, month: YearMonth) -> McetResult<LoadTicket> {
        if matches!(self.state, State::Disposed) {
            return Err(McetError::NotReady("view has been disposed".into()));
        }

        self.generation += 1;
        let ticket = LoadTicket {
            month,
            generation: self.generation,
        };
        self.state = State::Loading(ticket);
        Ok(ticket)
    }

    pub fn loader(&self) -> MonthLoader {
        MonthLoader {
            attendance: self.attendance.clone(),
            events: self.events.clone(),
            subject: self.subject.as_ref().map(|s| s.key.clone()),
        }
    }

    /// Hand back a finished fetch. Returns `Ok(false)` when the ticket is
    /// stale and the result was dropped. A failed fetch for the current
    /// ticket moves the view to `Failed` and returns the error.
    pub fn apply_load(&mut self, ticket: LoadTicket, result: McetResult<MonthData>) -> McetResult<bool> {
        let current = matches!(&self.state, State::Loading(t) if *t == ticket);
        if !current {
            debug!(month = %ticket.month, generation = ticket.generation, "dropping stale month load");
            return Ok(false);
        }

        match result {
            Ok(data) => {
                debug!(
                    month = %ticket.month,
                    attended = data.attendance.len(),
                    event_days = data.events.len(),
                    "month ready"
                );
                self.state = State::Ready {
                    month: ticket.month,
                    data,
                };
                Ok(true)
            }
            Err(e) => {
                warn!(month = %ticket.month, kind = e.label(), error = %e, "month load failed");
                self.state = State::Failed(ticket.month);
                Err(e)
            }
        }
    }

    /// Load `month` from scratch and wait for it.
    pub async fn load(&mut self, month: YearMonth) -> McetResult<()> {
        let ticket = self.begin_load(month)?;
        let result = self.loader().fetch(ticket).await;
        self.apply_load(ticket, result).map(|_| ())
    }

    pub async fn mount(&mut self, month: YearMonth) -> McetResult<()> {
        self.load(month).await
    }

    pub async fn navigate_to(&mut self, month: YearMonth) -> McetResult<()> {
        self.load(month).await
    }

    pub async fn next_month(&mut self) -> McetResult<()> {
        let month = self.require_month()?.next()?;
        self.load(month).await
    }

    pub async fn previous_month(&mut self) -> McetResult<()> {
        let month = self.require_month()?.previous()?;
        self.load(month).await
    }

    /// Fetch the current month again, e.g. after a failed load.
    pub async fn reload(&mut self) -> McetResult<()> {
        let month = self.require_month()?;
        self.load(month).await
    }

    pub fn dispose(&mut self) {
        self.state = State::Disposed;
    }

    fn require_month(&self) -> McetResult<YearMonth> {
        self.month()
            .ok_or_else(|| McetError::NotReady(format!("no month loaded ({:?})", self.phase())))
    }

    // READING:

    fn ready(&self) -> McetResult<(YearMonth, &MonthData)> {
        match &self.state {
            State::Ready { month, data } => Ok((*month, data)),
            _ => Err(McetError::NotReady(format!("{:?}", self.phase()))),
        }
    }

    fn ready_data_mut(&mut self) -> McetResult<&mut MonthData> {
        let phase = self.phase();
        match &mut self.state {
            State::Ready { data, .. } => Ok(data),
            _ => Err(McetError::NotReady(format!("{:?}", phase))),
        }
    }

    /// Grid cells for the loaded month.
    pub fn render(&self) -> McetResult<Vec<CalendarCell>> {
        let (month, data) = self.ready()?;
        Ok(cell::merge(month, &data.attendance, &data.events))
    }

    /// Days of the loaded month that have events, in date order.
    pub fn month_events(&self) -> McetResult<Vec<(CalendarDate, Vec<String>)>> {
        let (month, data) = self.ready()?;
        let first = DateKey::from(month.first_day());
        let last_day = CalendarDate::new(month.year(), month.month(), month.days_in_month())?;
        let last = DateKey::from(last_day);

        Ok(data
            .events
            .range(first..=last)
            .filter(|(_, titles)| !titles.is_empty())
            .map(|(key, titles)| (key.date(), titles.clone()))
            .collect())
    }

    // EDITING:

    /// Mark `student_email` present on `date`.
    ///
    /// When the student is the view's subject the grid updates right away;
    /// if the write then fails the mark is taken back and the error returned.
    pub async fn mark_attendance(&mut self, student_email: &str, date: CalendarDate) -> McetResult<()> {
        self.ready()?;
        self.session.require_faculty("marking attendance")?;
        let student = IdentityKey::encode(student_email)?;
        let key = DateKey::from(date);

        let shows_student = match &self.subject {
            Some(subject) if subject.key == student => {
                if !subject.email.eq_ignore_ascii_case(student_email.trim()) {
                    return Err(McetError::IdentityCollision {
                        key: student.to_string(),
                        existing: subject.email.clone(),
                        other: student_email.trim().to_string(),
                    });
                }
                true
            }
            _ => false,
        };

        let previous = if shows_student {
            self.ready_data_mut()?.attendance.insert(key.clone(), true)
        } else {
            None
        };

        let result = self.attendance.mark_present(&self.session, &student, date).await;

        if let Err(e) = &result {
            if shows_student {
                warn!(
                    identity = %student,
                    date = %key,
                    kind = e.label(),
                    error = %e,
                    "rolling back attendance mark"
                );
                if let Ok(data) = self.ready_data_mut() {
                    match previous {
                        Some(value) => data.attendance.insert(key, value),
                        None => data.attendance.remove(&key),
                    };
                }
            }
        }
        result
    }

    /// Add an event titled `title` on `date` and return that day's titles.
    ///
    /// The title shows up in the grid right away; on success the day is
    /// replaced with what the store returned, on failure it is put back.
    pub async fn add_event(&mut self, date: CalendarDate, title: &str) -> McetResult<Vec<String>> {
        self.ready()?;
        self.session.require_faculty("adding events")?;
        let title = events::validate_title(title)?.to_string();
        let key = DateKey::from(date);

        let previous = {
            let data = self.ready_data_mut()?;
            let previous = data.events.get(&key).cloned();
            data.events.entry(key.clone()).or_default().push(title.clone());
            previous
        };

        let result = self.events.add_event(&self.session, date, &title).await;
        let data = self.ready_data_mut()?;

        match result {
            Ok(titles) => {
                data.events.insert(key, titles.clone());
                Ok(titles)
            }
            Err(e) => {
                warn!(date = %key, kind = e.label(), error = %e, "rolling back added event");
                match (previous, data.events.entry(key)) {
                    (Some(titles), Entry::Occupied(mut entry)) => {
                        entry.insert(titles);
                    }
                    (None, Entry::Occupied(entry)) => {
                        entry.remove();
                    }
                    (_, Entry::Vacant(_)) => {}
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn march() -> YearMonth {
        YearMonth::new(2025, 3).unwrap()
    }

    fn day(d: u32) -> CalendarDate {
        CalendarDate::new(2025, 3, d).unwrap()
    }

    fn faculty_view(store: &Arc<MemoryStore>) -> CalendarViewModel {
        CalendarViewModel::new(Session::faculty("prof@mcet.in").unwrap(), store.clone())
    }

    #[tokio::test]
    async fn test_unloaded_view_is_not_ready() {
        let store = Arc::new(MemoryStore::new());
        let mut vm = faculty_view(&store);

        assert_eq!(vm.phase(), ViewPhase::Unloaded);
        assert!(matches!(vm.render(), Err(McetError::NotReady(_))));
        assert!(matches!(vm.add_event(day(1), "Expo").await, Err(McetError::NotReady(_))));
        assert!(matches!(vm.next_month().await, Err(McetError::NotReady(_))));
    }

    #[tokio::test]
    async fn test_mutation_while_loading_is_not_ready() {
        let store = Arc::new(MemoryStore::new());
        let mut vm = faculty_view(&store);
        vm.mount(march()).await.unwrap();

        let ticket = vm.begin_load(march().next().unwrap()).unwrap();
        assert_eq!(vm.phase(), ViewPhase::Loading(ticket.month()));

        let err = vm.mark_attendance("s@mcet.in", day(3)).await.unwrap_err();
        assert!(matches!(err, McetError::NotReady(_)));
        assert_eq!(store.snapshot().await, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_stale_load_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        let mut vm = faculty_view(&store);

        let stale = vm.begin_load(march()).unwrap();
        let stale_result = vm.loader().fetch(stale).await;

        let april = march().next().unwrap();
        let fresh = vm.begin_load(april).unwrap();
        let fresh_result = vm.loader().fetch(fresh).await;

        assert!(vm.apply_load(fresh, fresh_result).unwrap());
        assert!(!vm.apply_load(stale, stale_result).unwrap());
        assert_eq!(vm.phase(), ViewPhase::Ready(april));
    }

    #[tokio::test]
    async fn test_failed_load_then_reload() {
        let store = Arc::new(MemoryStore::new());
        let mut vm = faculty_view(&store);

        store.set_offline(true);
        assert!(matches!(vm.mount(march()).await, Err(McetError::NetworkUnavailable(_))));
        assert_eq!(vm.phase(), ViewPhase::Failed(march()));
        assert!(matches!(vm.add_event(day(1), "Expo").await, Err(McetError::NotReady(_))));

        store.set_offline(false);
        vm.reload().await.unwrap();
        assert_eq!(vm.phase(), ViewPhase::Ready(march()));
    }

    #[tokio::test]
    async fn test_disposed_view_refuses_loads() {
        let store = Arc::new(MemoryStore::new());
        let mut vm = faculty_view(&store);
        vm.mount(march()).await.unwrap();
        vm.dispose();

        assert_eq!(vm.phase(), ViewPhase::Disposed);
        assert!(matches!(vm.mount(march()).await, Err(McetError::NotReady(_))));
    }

    #[tokio::test]
    async fn test_student_cannot_pick_another_subject() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let session = Session::student("me@mcet.in").unwrap();

        let result = CalendarViewModel::new(session, store).with_subject("other@mcet.in");
        assert!(matches!(result, Err(McetError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_identity_collision_is_reported() {
        let store = Arc::new(MemoryStore::new());
        let mut vm = faculty_view(&store).with_subject("a.b@mcet.in").unwrap();
        vm.mount(march()).await.unwrap();

        let err = vm.mark_attendance("a_b@mcet.in", day(3)).await.unwrap_err();
        assert!(matches!(err, McetError::IdentityCollision { .. }));
        assert_eq!(store.snapshot().await, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_month_events_only_lists_loaded_month() {
        let store = Arc::new(MemoryStore::new());
        let mut vm = faculty_view(&store);
        vm.mount(march()).await.unwrap();

        vm.add_event(day(31), "Fest").await.unwrap();
        vm.add_event(CalendarDate::new(2025, 4, 1).unwrap(), "April fools").await.unwrap();
        vm.add_event(day(2), "Orientation").await.unwrap();

        let listed = vm.month_events().unwrap();
        assert_eq!(
            listed,
            vec![
                (day(2), vec!["Orientation".to_string()]),
                (day(31), vec!["Fest".to_string()]),
            ]
        );
    }
}
