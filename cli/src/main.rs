use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use ghosttype_engine::SettingsStore;
use ghosttype_engine::Tone;
use ghosttype_provider::OpenAiProvider;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "kebab-case")]
enum CliTone {
    Casual,
    Formal,
    Friendly,
    Professional,
}

impl From<CliTone> for Tone {
    fn from(tone: CliTone) -> Self {
        match tone {
            CliTone::Casual => Tone::Casual,
            CliTone::Formal => Tone::Formal,
            CliTone::Friendly => Tone::Friendly,
            CliTone::Professional => Tone::Professional,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Inline AI ghost-text completions for a terminal chat input"
)]
struct Cli {
    /// Override the configured completion tone for this run.
    #[arg(long, value_enum)]
    tone: Option<CliTone>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Inspect or edit the persistent settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print the current settings (the API key is only reported as set/unset).
    Show,
    /// Store the OpenAI API key used for completion requests.
    SetApiKey { key: String },
    /// Store the completion tone.
    SetTone {
        #[arg(value_enum)]
        tone: CliTone,
    },
    /// Store the model used for completion requests.
    SetModel { model: String },
}

/// Logs go to a file: the terminal itself belongs to the TUI.
fn init_tracing(settings: &SettingsStore) -> anyhow::Result<()> {
    let Some(home) = settings.path().parent() else {
        anyhow::bail!("invalid settings path: {}", settings.path().display());
    };
    let log_dir = home.join("log");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create {}", log_dir.display()))?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("ghosttype.log"))
        .context("open log file")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = SettingsStore::new_default()?;

    match cli.command {
        Some(CliCommand::Settings { action }) => run_settings(&settings, action),
        None => {
            init_tracing(&settings)?;
            let tone = match cli.tone {
                Some(tone) => tone.into(),
                None => settings.tone()?,
            };
            let provider = OpenAiProvider::from_settings(&settings)?;
            tracing::info!(%tone, "starting ghosttype");
            ghosttype_tui::run_app(provider, tone).await
        }
    }
}

fn run_settings(settings: &SettingsStore, action: SettingsAction) -> anyhow::Result<()> {
    match action {
        SettingsAction::Show => {
            let api_key = match settings.api_key()? {
                Some(_) => "set",
                None => "unset",
            };
            println!("config file: {}", settings.path().display());
            println!("api_key:     {api_key}");
            println!("tone:        {}", settings.tone()?);
            println!("model:       {}", settings.model()?);
        }
        SettingsAction::SetApiKey { key } => {
            settings.set_api_key(&key)?;
            println!("API key saved.");
        }
        SettingsAction::SetTone { tone } => {
            let tone: Tone = tone.into();
            settings.set_tone(tone)?;
            println!("Tone set to {tone}.");
        }
        SettingsAction::SetModel { model } => {
            settings.set_model(&model)?;
            println!("Model set to {model}.");
        }
    }
    Ok(())
}
