//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod analytics;
pub mod chat;
pub mod forecast;
pub mod map;
pub mod say;
pub mod serve;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::core::completion::ProxyCompletionClient;
use crate::core::config::Config;
use crate::core::controller::{ChatController, ControllerOptions};
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "geoai")]
#[command(about = "GeoAI chat client, chat proxy and urban-growth data tools")]
#[command(
    long_about = "GeoAI answers questions about Kolkata's urban expansion. The chat client \
talks to a GeoAI proxy, which answers well-known localities directly and forwards \
everything else to a generative model.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    API key used by 'geoai serve' for the upstream model\n\
  RUST_LOG          Overrides the diagnostic log filter\n\n\
Commands inside chat:\n\
  /log <filename>   Enable transcript logging to the specified file\n\
  /log              Toggle logging pause/resume\n\
  /quit             Leave the session"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable transcript logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Increase diagnostic output (-v debug, -vv trace)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Chat endpoint to use instead of the configured one
    #[arg(long, global = true, value_name = "URL")]
    pub proxy_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat,
    /// Send one message and print the reply
    Say {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Run the chat proxy service
    Serve {
        /// Address to listen on
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Fetch the urban growth forecast for a year
    Forecast {
        #[arg(long, allow_negative_numbers = true)]
        year: i32,
        /// Save the returned plots as PNG files in this directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Summarize an urban growth CSV file
    Analytics {
        /// CSV file (defaults to the configured dataset)
        path: Option<PathBuf>,
        /// Print the time series of one metric
        #[arg(long, value_name = "NAME")]
        metric: Option<String>,
    },
    /// Browse built-up area map images
    Map {
        #[command(subcommand)]
        command: MapCommands,
    },
    /// Print the current configuration
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

#[derive(Subcommand)]
pub enum MapCommands {
    /// List map years and whether each image is present
    List,
    /// Copy one year's image to a file or directory
    Export {
        year: i32,
        #[arg(long, value_name = "PATH")]
        out: PathBuf,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load()?;
            let controller = build_controller(&config, args.proxy_url.as_deref());
            chat::run_chat(controller, args.log).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let controller = build_controller(&config, args.proxy_url.as_deref());
            say::run_say(controller, prompt).await
        }
        Commands::Serve { bind } => {
            let config = Config::load()?;
            serve::run_serve(&config, bind).await
        }
        Commands::Forecast { year, out_dir } => {
            let config = Config::load()?;
            forecast::run_forecast(&config, year, out_dir).await
        }
        Commands::Analytics { path, metric } => {
            let config = Config::load()?;
            analytics::run_analytics(&config, path, metric)
        }
        Commands::Map { command } => {
            let config = Config::load()?;
            map::run_map(&config, command)
        }
        Commands::Config => {
            Config::load()?.print_all();
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let value = value.join(" ");
            if let Err(message) = config.set_value(&key, &value) {
                eprintln!("❌ {message}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(message) = config.unset_value(&key) {
                eprintln!("❌ {message}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
    }
}

/// Controller talking to `proxy_override`, or the configured proxy.
pub fn build_controller(config: &Config, proxy_override: Option<&str>) -> ChatController {
    let endpoint = proxy_override.unwrap_or_else(|| config.proxy_url());
    let client = ProxyCompletionClient::new(reqwest::Client::new(), endpoint);
    ChatController::new(Arc::new(client), controller_options(config))
}

pub fn controller_options(config: &Config) -> ControllerOptions {
    ControllerOptions {
        reveal_interval: config.reveal_interval(),
        request_timeout: config.request_timeout(),
        greeting: config.greeting.clone(),
    }
}
