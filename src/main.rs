//! City Agent - Entry Point
//!
//! Plays one game on the requested map against the remote game service,
//! then prints the final score.

use std::path::PathBuf;

use city_agent::api::{GameApiClient, HttpGameService};
use city_agent::core::config::{load_env_file, AgentConfig};
use city_agent::core::error::Result;
use city_agent::core::interrupt::Interrupt;
use city_agent::driver::{GameOutcome, TurnDriver};
use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Rule-based player for the city-building game service
#[derive(Parser, Debug)]
#[command(name = "city_agent")]
#[command(about = "Play one game of the city-building challenge")]
struct Args {
    /// Map to play
    #[arg(long, default_value = "training1")]
    map: String,

    /// Agent tuning file (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game service base URL, overrides API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// File with API_KEY / API_URL settings; defaults to a `.env` if present
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Log every rule evaluation
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    load_env_file(args.env_file.as_deref())?;

    let default_filter = if args.verbose {
        "city_agent=debug"
    } else {
        "city_agent=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = match &args.config {
        Some(path) => AgentConfig::from_toml_file(path)?,
        None => AgentConfig::default(),
    };

    let client = match args.api_url {
        Some(url) => {
            let env_client = GameApiClient::from_env()?;
            GameApiClient::new(env_client.api_key().to_string(), url)?
        }
        None => GameApiClient::from_env()?,
    };
    tracing::info!(api_url = client.api_url(), map = %args.map, "City agent starting");

    let rt = Runtime::new()?;
    let interrupt = Interrupt::new();
    {
        let interrupt = interrupt.clone();
        rt.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, ending the session (Ctrl-C again to abort)");
                interrupt.raise();
            }
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        });
    }

    let service =
        HttpGameService::new(client, rt.handle().clone()).with_interrupt(interrupt.clone());
    let mut driver = TurnDriver::new(service, config).with_interrupt(interrupt);

    match driver.run(&args.map)? {
        GameOutcome::Completed {
            game_id,
            turns_played,
            score,
        } => {
            println!();
            println!("=== GAME {} ===", game_id);
            println!("Turns played: {}", turns_played);
            println!("Final score:  {:.2}", score.final_score);
            println!("Co2:          {:.2}", score.co2);
            println!("Happiness:    {:.2}", score.total_happiness);
            println!("Population:   {:.0}", score.final_pop);
        }
        GameOutcome::Interrupted {
            game_id,
            turns_played,
        } => {
            println!(
                "Game {} stopped after {} turns; session ended.",
                game_id, turns_played
            );
        }
    }
    Ok(())
}
