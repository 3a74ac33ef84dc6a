pub mod cli;
pub mod models;
pub mod render;
pub mod tui;
pub mod webhook;

use cli::Args;
use log::info;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Webhook URL: {}", args.webhook_url);
    info!("Assistant Name: {}", args.assistant_name);
    info!("Example Queries: {}", args.example_queries.len());
    info!("-------------------------");

    tui::run(args).await
}
