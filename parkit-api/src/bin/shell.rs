use std::sync::Arc;
use parkit_api::console::{self, ConsoleInput};
use parkit_api::{init_tracing, AppState};
use parkit_store::app_config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::load()?;
    let state = AppState::from_config(&config).await?;

    console::run(&state, Arc::new(ConsoleInput::stdin())).await;
    Ok(())
}
