use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use lurk::api::{Category, HnClient};
use lurk::app::{App, AppEvent};
use lurk::config::Config;
use lurk::ui;

/// Get the config directory path (~/.config/lurk/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("lurk"))
}

#[derive(Parser, Debug)]
#[command(name = "lurk", about = "Terminal Hacker News reader")]
struct Args {
    /// Feed category to open (top, new, best, ask, show, job)
    #[arg(long, short = 'c')]
    category: Option<Category>,

    /// 1-based listing page; malformed or out-of-range values fall back
    /// to page 1 instead of erroring
    #[arg(long, default_value = "1")]
    page: String,

    /// Skip the listing and open one story by id
    #[arg(long, value_name = "ID")]
    story: Option<u64>,

    /// Config file path (default: ~/.config/lurk/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging (RUST_LOG=lurk=debug lurk 2>log)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let http = reqwest::Client::builder()
        .user_agent(concat!("lurk/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;
    let client = HnClient::new(http, &config.api_base_url);

    let mut app = App::new(client, &config);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Kick off the initial view before the loop starts drawing.
    match args.story {
        Some(id) => app.open_story(id, &event_tx),
        None => {
            let category = args.category.unwrap_or(config.default_category);
            // Unparseable page text becomes 0, which normalizes to page 1.
            let page = args.page.trim().parse::<i64>().unwrap_or(0);
            app.open_listing(category, page, &event_tx);
        }
    }

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
