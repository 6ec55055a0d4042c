//! # Herald — scheduled AI message dispatcher
//!
//! Hourly (inside the active window) it picks a themed prompt, asks
//! the external AI agent, cleans the reply, and fans out to Slack and
//! Kakao. Manual triggers and the OAuth bootstrap are subcommands.
//!
//! Usage:
//!   herald run                      # start the hourly dispatch loop
//!   herald send-random              # one manual random-theme run
//!   herald send --prompt "..."      # custom prompt, Kakao only
//!   herald authorize --code <code>  # Kakao OAuth code exchange
//!   herald auth-url                 # print the Kakao authorize URL
//!   herald theme list               # show the effective catalog
//!   herald theme add --name n --prompt p [--agent]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use herald_catalog::ThemeCatalog;
use herald_channels::{KakaoChannel, SlackChannel};
use herald_core::HeraldConfig;
use herald_core::config::ThemeSeed;
use herald_dispatch::Dispatcher;
use herald_gateway::HttpAgentGateway;

#[derive(Parser)]
#[command(name = "herald", version, about = "Scheduled AI message dispatcher")]
struct Cli {
    /// Config file (default: ~/.herald/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the hourly dispatch loop
    Run,
    /// Trigger one dispatch run with a random theme
    SendRandom,
    /// Trigger one dispatch run with a custom prompt (Kakao only)
    Send {
        #[arg(long)]
        prompt: String,
    },
    /// Exchange a Kakao authorization code for a token pair
    Authorize {
        #[arg(long)]
        code: String,
    },
    /// Print the Kakao authorization URL
    AuthUrl,
    /// Manage the theme catalog
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
}

#[derive(Subcommand)]
enum ThemeCommand {
    /// List the effective catalog (built-ins + config themes)
    List,
    /// Add a theme to the config file
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        prompt: String,
        /// Run this theme's prompt in autonomous-agent mode
        #[arg(long)]
        agent: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "herald=debug,herald_core=debug,herald_channels=debug,herald_dispatch=debug,herald_gateway=debug"
    } else {
        "herald=info,herald_core=info,herald_channels=info,herald_dispatch=info,herald_gateway=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(HeraldConfig::default_path);
    let config = if config_path.exists() {
        HeraldConfig::load_from(&config_path).context("loading config")?
    } else {
        HeraldConfig::default()
    };

    match cli.command {
        Command::Run => {
            let (dispatcher, _kakao) = build_dispatcher(&config);
            tracing::info!(
                window = %format!(
                    "{:02}:00-{:02}:00",
                    config.schedule.active_start_hour, config.schedule.active_end_hour
                ),
                themes = dispatcher.catalog().len(),
                "herald starting"
            );
            herald_dispatch::run_hourly(dispatcher, config.schedule.check_interval_secs).await;
            Ok(())
        }
        Command::SendRandom => {
            let (dispatcher, _kakao) = build_dispatcher(&config);
            let report = dispatcher.run_random().await?;
            print_report(&report)
        }
        Command::Send { prompt } => {
            let (dispatcher, _kakao) = build_dispatcher(&config);
            let report = dispatcher.run_custom(&prompt).await?;
            print_report(&report)
        }
        Command::Authorize { code } => {
            let kakao = KakaoChannel::new(config.kakao.clone());
            kakao.authorize(&code).await?;
            println!("Kakao authorized; tokens saved to {}", kakao.store().path().display());
            Ok(())
        }
        Command::AuthUrl => {
            let kakao = KakaoChannel::new(config.kakao.clone());
            println!("{}", kakao.auth_url());
            Ok(())
        }
        Command::Theme { command } => handle_theme(command, config, &config_path),
    }
}

fn build_dispatcher(config: &HeraldConfig) -> (Arc<Dispatcher>, Arc<KakaoChannel>) {
    let catalog = Arc::new(ThemeCatalog::with_defaults(
        config.schedule.bands.clone(),
        &config.themes,
    ));
    let gateway = Arc::new(HttpAgentGateway::new(config.gateway.clone()));
    let slack = Arc::new(SlackChannel::new(config.slack.webhook_url.clone()));
    let kakao = Arc::new(KakaoChannel::new(config.kakao.clone()));

    let dispatcher = Arc::new(Dispatcher::new(
        catalog,
        gateway,
        slack,
        kakao.clone(),
        config.schedule.clone(),
    ));
    (dispatcher, kakao)
}

fn handle_theme(command: ThemeCommand, mut config: HeraldConfig, path: &PathBuf) -> Result<()> {
    match command {
        ThemeCommand::List => {
            let catalog =
                ThemeCatalog::with_defaults(config.schedule.bands.clone(), &config.themes);
            for entry in catalog.all() {
                let mode = if entry.agent_mode { " [agent]" } else { "" };
                println!("{}{}\n    {}", entry.theme, mode, entry.prompt);
            }
            Ok(())
        }
        ThemeCommand::Add {
            name,
            prompt,
            agent,
        } => {
            config.themes.retain(|t| t.name != name);
            config.themes.push(ThemeSeed {
                name: name.clone(),
                prompt,
                agent_mode: agent,
            });
            config.save_to(path).context("saving config")?;
            println!("theme '{name}' saved to {}", path.display());
            Ok(())
        }
    }
}

fn print_report(report: &herald_core::DispatchReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    if report.all_succeeded() {
        Ok(())
    } else {
        anyhow::bail!("one or more channels failed")
    }
}
