//! Bot-Warden command-line shell
//!
//! A thin shell over the library API, useful for poking at a configuration
//! before wiring the manager into a host: classify a User-Agent, render the
//! live robots.txt, or just check the config.

use bot_warden::action::Remediation;
use bot_warden::config::{load_config, Config};
use bot_warden::manager::BotManager;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bot-Warden: classify scraper traffic and serve a synthesized robots.txt
#[derive(Parser, Debug)]
#[command(name = "bot-warden")]
#[command(version = "0.1.0")]
#[command(about = "User-Agent warden for scraper and LLM-crawler traffic", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file; defaults apply when omitted
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a User-Agent string against the live bot index
    Classify {
        /// The User-Agent header value to classify
        user_agent: String,
    },
    /// Render the robots.txt for the live bot index to stdout
    Robots {
        /// Render fresh from the index instead of the cached text
        #[arg(long)]
        no_cache: bool,
    },
    /// Validate the configuration and print the effective settings
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration: {}", e);
                return Err(e.into());
            }
        },
        None => Config::default(),
    };

    setup_logging(&config, cli.verbose, cli.quiet);

    match cli.command {
        Command::Classify { user_agent } => handle_classify(&config, &user_agent).await?,
        Command::Robots { no_cache } => handle_robots(&config, no_cache).await?,
        Command::Check => handle_check(&config)?,
    }

    Ok(())
}

/// Sets up the tracing subscriber from the configured level and CLI flags
fn setup_logging(config: &Config, verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(format!("bot_warden={}", config.log_level.as_filter())),
            1 => EnvFilter::new("bot_warden=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(false)
        .init();
}

/// Handles `classify`: prints the verdict and the remediation decision
async fn handle_classify(
    config: &Config,
    user_agent: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = BotManager::new(config).await?;
    let result = manager.classify(user_agent).await?;

    match &result {
        Some(bot) => {
            println!("bot: {}", bot.name);
            if let Some(metadata) = &bot.entry.metadata {
                println!("operator: {}", metadata.operator);
                println!("respects robots.txt: {}", metadata.respects_robots_txt);
                println!("function: {}", metadata.function);
                println!("frequency: {}", metadata.frequency);
                println!("description: {}", metadata.description);
            }
        }
        None => println!("not a known bot"),
    }

    match Remediation::decide(config, result.as_ref()) {
        Remediation::Pass => println!("action: pass"),
        Remediation::Proxy { url } => println!("action: proxy -> {}", url),
        Remediation::Block { status, body } => {
            println!("action: block with status {}", status);
            if let Some(body) = body {
                println!("body: {}", serde_json::to_string(&body)?);
            }
        }
    }

    Ok(())
}

/// Handles `robots`: renders the exclusion list to stdout
async fn handle_robots(config: &Config, no_cache: bool) -> Result<(), Box<dyn std::error::Error>> {
    let manager = BotManager::new(config).await?;
    let mut stdout = std::io::stdout();
    manager.render_robots_txt(&mut stdout, !no_cache).await?;
    Ok(())
}

/// Handles `check`: validates and prints the effective configuration
fn handle_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    bot_warden::config::validate(config)?;

    println!("=== Bot-Warden Configuration ===\n");
    println!("Enabled: {}", config.enabled);
    println!("Bot action: {:?}", config.bot_action);
    println!("Block status code: {}", config.bot_block_http_code);
    println!("Cache size: {}", config.cache_size);
    println!("Cache update interval: {}", config.cache_update_interval);
    println!(
        "Source retry interval: {}",
        config.robots_source_retry_interval
    );
    println!("Fast match: {}", config.use_fast_match);

    println!("\nSources:");
    for url in config.source_urls() {
        println!("  - {}", url);
    }

    if config.robots_txt_disallow_all {
        println!("\nrobots.txt: disallow all user agents");
    } else if config.robots_txt_file_path.is_empty() {
        println!("\nrobots.txt: built-in template");
    } else {
        println!("\nrobots.txt: custom template at {}", config.robots_txt_file_path);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
