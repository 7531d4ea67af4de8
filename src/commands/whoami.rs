use anyhow::Result;
use mcet_core::config::McetConfig;
use mcet_core::session::IdentityProvider;
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(config: &McetConfig) -> Result<()> {
    let session = config.current_session().await?;

    println!("{}", session.render());
    println!("{} {}", "identity key:".dimmed(), session.identity());
    println!("{} {}", "store:".dimmed(), config.store_file().display());

    Ok(())
}
