use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use panel_core::{ActionDispatcher, Control, FormFields, HttpTransport};
use shared::{
    domain::ContextField,
    protocol::{LifecyclePolicyInput, PanelAction},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, SettingsOverrides};

#[derive(Parser, Debug)]
#[command(about = "Storage lifecycle and tiering control panel")]
struct Cli {
    #[arg(long, default_value = "panel.toml")]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    access_key: Option<String>,
    #[arg(long)]
    secret_key: Option<String>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    bucket_name: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateBucket,
    UploadFile {
        #[arg(long)]
        file_key: Option<String>,
    },
    ApplyLifecycle {
        #[arg(long)]
        glacier_days: String,
        #[arg(long)]
        deep_archive_days: String,
        #[arg(long)]
        expiration_days: String,
    },
    EnableTiering,
    /// Only fetch and print the recent backend logs.
    Logs,
}

impl Command {
    fn action(self) -> Option<PanelAction> {
        match self {
            Command::CreateBucket => Some(PanelAction::CreateBucket),
            Command::UploadFile { file_key } => Some(PanelAction::UploadFile { file_key }),
            Command::ApplyLifecycle {
                glacier_days,
                deep_archive_days,
                expiration_days,
            } => Some(PanelAction::ApplyCustomLifecycle(LifecyclePolicyInput::new(
                glacier_days,
                deep_archive_days,
                expiration_days,
            ))),
            Command::EnableTiering => Some(PanelAction::EnableIntelligentTiering),
            Command::Logs => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings(&cli.config)?.apply(SettingsOverrides {
        server_url: cli.server_url,
        region: cli.region,
        bucket_name: cli.bucket_name,
        access_key: cli.access_key,
        secret_key: cli.secret_key,
    })?;
    info!(server_url = %settings.server_url, "tiering panel starting");

    let form = FormFields::new()
        .with(ContextField::AccessKey, settings.access_key.unwrap_or_default())
        .with(ContextField::SecretKey, settings.secret_key.unwrap_or_default())
        .with(ContextField::Region, settings.region.unwrap_or_default())
        .with(ContextField::BucketName, settings.bucket_name.unwrap_or_default());
    let transport = HttpTransport::new(&settings.server_url)
        .with_context(|| format!("failed to build backend client for {}", settings.server_url))?;
    let dispatcher = ActionDispatcher::new(Arc::new(form), Arc::new(transport));

    let action = cli.command.action();
    let control = action.as_ref().map(|action| Control::new(action.name()));
    let renderer = render::spawn(
        dispatcher.view().subscribe_status(),
        dispatcher.view().subscribe_logs(),
        control
            .as_ref()
            .map(|control| (control.name().to_string(), control.subscribe())),
    );

    dispatcher.refresh_logs().await;

    let outcome = match (&action, &control) {
        (Some(action), Some(control)) => Some(dispatcher.run(action, control).await),
        _ => None,
    };

    drop(control);
    drop(dispatcher);
    renderer.await.context("renderer task failed")?;

    if let Some(err) = outcome.as_ref().and_then(|outcome| outcome.error()) {
        bail!("action failed ({:?}): {err}", err.kind());
    }
    Ok(())
}
