pub mod add_event;
pub mod events;
pub mod mark;
pub mod month;
pub mod whoami;

use anyhow::Result;
use mcet_core::config::McetConfig;
use mcet_core::session::IdentityProvider;
use mcet_core::{CalendarViewModel, YearMonth};

use crate::open_store;
use crate::utils::tui::month_spinner;

/// Build a view for the configured user and load `month` into it.
async fn load_view(
    config: &McetConfig,
    month: YearMonth,
    student: Option<&str>,
) -> Result<CalendarViewModel> {
    let session = config.current_session().await?;
    let mut view = CalendarViewModel::new(session, open_store(config));
    if let Some(email) = student {
        view = view.with_subject(email)?;
    }

    let spinner = month_spinner(month);
    let result = view.mount(month).await;
    spinner.finish_and_clear();
    result?;

    Ok(view)
}
