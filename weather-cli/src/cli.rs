use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weather_core::{
    Config, Credential, LookupError, OpenWeatherProvider, Settings, config::API_KEY_ENV, lookup,
    verify_credential,
};

use crate::{render::render_summary, repl};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather from OpenWeatherMap")]
pub struct Cli {
    /// Without a subcommand, start the interactive prompt.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key in the config file.
    Configure,

    /// Show current weather for one city and exit.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => {
                let (settings, credential) = startup()?;
                let provider = OpenWeatherProvider::new(&settings.base_url);

                match lookup(&provider, &city, Some(&credential)).await {
                    Ok(summary) => {
                        print!("{}", render_summary(&summary));
                        Ok(())
                    }
                    Err(err) => bail!("❌ {err}"),
                }
            }
            None => {
                let (settings, credential) = startup()?;
                let provider = OpenWeatherProvider::new(&settings.base_url);

                if let Err(err) = verify_credential(&provider, &credential).await {
                    println!("❌ API Key Error: {err}");
                    println!("💡 New API keys can take 10-20 minutes to activate.");
                }

                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                let mut stdout = tokio::io::stdout();
                repl::run(&provider, &credential, stdin, &mut stdout)
                    .await
                    .context("Terminal I/O failed")
            }
        }
    }
}

/// Resolve settings and require a credential before any lookup runs.
fn startup() -> anyhow::Result<(Settings, Credential)> {
    let config = Config::load()?;
    let settings = Settings::resolve(&config);
    let credential = require_credential(&settings)?;

    tracing::debug!(base_url = %settings.base_url, "settings resolved");
    Ok((settings, credential))
}

/// The CLI cannot do anything useful without a key, so a missing one is fatal here.
fn require_credential(settings: &Settings) -> anyhow::Result<Credential> {
    match &settings.credential {
        Some(credential) => Ok(credential.clone()),
        None => bail!(
            "❌ {}\n\
             Hint: set {API_KEY_ENV} (environment or .env file) or run `weather configure`.",
            LookupError::MissingCredential
        ),
    }
}

fn configure() -> anyhow::Result<()> {
    let key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if Credential::new(key.as_str()).is_none() {
        bail!("API key must not be empty");
    }

    let mut config = Config::load()?;
    config.set_api_key(key.trim().to_string());
    let path = config.save()?;

    println!("Saved API key to {}", path.display());
    Ok(())
}
