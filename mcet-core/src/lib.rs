//! Core types and logic for the MCET school calendar.
//!
//! - `grid`, `date` and `keys` are pure date/key utilities
//! - `store` is the document store contract plus in-memory and file backends
//! - `attendance` and `events` read and write the two record sets
//! - `view_model` merges them onto a month grid and orchestrates edits

pub mod attendance;
pub mod cell;
pub mod config;
pub mod date;
pub mod error;
pub mod events;
pub mod grid;
pub mod keys;
pub mod session;
pub mod store;
pub mod view_model;

pub use cell::{CalendarCell, CellHighlight};
pub use date::{CalendarDate, YearMonth};
pub use error::{McetError, McetResult};
pub use keys::{DateKey, IdentityKey};
pub use session::{Role, Session};
pub use view_model::{CalendarViewModel, ViewPhase};
