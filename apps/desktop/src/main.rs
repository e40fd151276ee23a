use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{load_settings, Orchestrator, SubmitOutcome, ViewModel};
use tracing_subscriber::EnvFilter;

mod controller;
mod files;
mod render;

#[derive(Parser, Debug)]
#[command(about = "Predict the emotion in an audio clip and fetch matching recommendations")]
struct Args {
    /// Audio recording to analyze (WAV recommended).
    audio: Option<PathBuf>,
    /// Overrides `server_url` from emotion-client.toml / APP__SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Print the view model as JSON.
    #[arg(long)]
    json: bool,
    /// Read `select <path>` / `submit` / `show` / `quit` commands from stdin.
    #[arg(long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }
    settings.validate()?;

    let orchestrator = Arc::new(Orchestrator::from_settings(&settings)?);
    let format = render::OutputFormat::from_json_flag(args.json);

    if args.interactive {
        if let Some(path) = &args.audio {
            let file = files::load_selected_file(path).await?;
            orchestrator.select_file(file).await;
        }
        controller::run_interactive(orchestrator.clone(), format).await?;
        return Ok(exit_code(&orchestrator.view().await));
    }

    let Some(path) = args.audio else {
        bail!("no audio file given; pass a path or use --interactive");
    };
    let file = files::load_selected_file(&path).await?;
    orchestrator.select_file(file).await;

    match orchestrator.submit().await {
        Ok(SubmitOutcome::Finished(_)) => {}
        Ok(SubmitOutcome::Superseded) => bail!("analysis was superseded by another selection"),
        Err(rejected) => bail!("nothing submitted: {rejected}"),
    }

    let view = orchestrator.view().await;
    println!("{}", render::render_view(&view, format)?);

    Ok(exit_code(&view))
}

fn exit_code(view: &ViewModel) -> ExitCode {
    if view.error_banner.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
