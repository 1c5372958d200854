use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select};
use pogoda_core::{City, Config, ViewState, WeatherAcquisitionFlow};
use tokio::sync::watch;

use crate::render;

const RETRY_LABEL: &str = "🔄 Попробовать снова";
const EXIT_LABEL: &str = "Выход";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pogoda", version, about = "Погода в городах России")]
pub struct Cli {
    /// Verbose logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// WeatherAPI.com key; overrides the config file.
    #[arg(long, global = true, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Provider base URL; overrides the config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Return demo data immediately instead of simulating latency.
    #[arg(long, global = true)]
    pub no_delay: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List supported cities.
    Cities,

    /// Show current weather for a city.
    Show {
        /// City name or 1-based catalog index; defaults to the first city.
        city: Option<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Pick cities from a menu, with retry.
    Interactive,

    /// Store the WeatherAPI.com key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            Command::Cities => {
                print!("{}", render::cities(&City::catalog()));
            }
            Command::Show { city, json } => {
                let city = match city {
                    Some(input) => City::lookup(input)?,
                    None => City::default_city(),
                };
                let flow = WeatherAcquisitionFlow::from_config(&self.config()?)?;

                if !json {
                    eprintln!("{}", render::loading_line(&city));
                }
                let result = flow.select_city(city).await;

                if *json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print!("{}", render::result(&result, Local::now()));
                }
            }
            Command::Interactive => {
                let flow = WeatherAcquisitionFlow::from_config(&self.config()?)?;
                interactive(&flow).await?;
            }
            Command::Configure => configure()?,
        }

        Ok(())
    }

    /// Config file plus command-line overrides.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load()?;

        if let Some(key) = &self.api_key {
            config.set_api_key(key.clone());
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if self.no_delay {
            config.synthetic_delay_ms = 0;
        }
        if config.api_key().is_err() {
            tracing::warn!("No API key configured; live requests will fail and demo data will be shown");
        }

        Ok(config)
    }
}

enum MenuChoice {
    City(City),
    Retry,
    Exit,
}

async fn interactive(flow: &WeatherAcquisitionFlow) -> anyhow::Result<()> {
    let watcher = tokio::spawn(print_loading(flow.subscribe()));

    loop {
        let choice = tokio::task::spawn_blocking(prompt_menu)
            .await
            .context("Menu task failed")??;

        let result = match choice {
            MenuChoice::City(city) => flow.select_city(city).await,
            MenuChoice::Retry => flow.retry().await,
            MenuChoice::Exit => break,
        };

        println!("{}", render::result(&result, Local::now()));
    }

    watcher.abort();
    Ok(())
}

fn prompt_menu() -> anyhow::Result<MenuChoice> {
    let mut options: Vec<String> = City::catalog().into_iter().map(|c| c.name).collect();
    options.push(RETRY_LABEL.to_string());
    options.push(EXIT_LABEL.to_string());

    match Select::new("Выберите город:", options).prompt() {
        Ok(label) if label == RETRY_LABEL => Ok(MenuChoice::Retry),
        Ok(label) if label == EXIT_LABEL => Ok(MenuChoice::Exit),
        Ok(label) => Ok(MenuChoice::City(City::new(label))),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(MenuChoice::Exit)
        }
        Err(e) => Err(e).context("Failed to read menu selection"),
    }
}

async fn print_loading(mut rx: watch::Receiver<ViewState>) {
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if state.loading {
            eprintln!("{}", render::loading_line(&state.city));
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .with_help_message("Get one at https://www.weatherapi.com/my/")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
