//! Line-driven session: each stdin line is a UI event. `submit` runs in the
//! background so a new `select` can supersede an analysis still in flight.

use std::sync::Arc;

use anyhow::{Context, Result};
use client_core::{Orchestrator, SubmitOutcome};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
    task::{JoinHandle, JoinSet},
};

use super::commands::{UiCommand, HELP};
use crate::{
    files::load_selected_file,
    render::{render_view, OutputFormat},
};

pub async fn run_interactive(orchestrator: Arc<Orchestrator>, format: OutputFormat) -> Result<()> {
    run_session(orchestrator, format, BufReader::new(tokio::io::stdin())).await
}

/// Drives the session from `input` until `quit` or end of input. Submissions
/// still in flight at that point are awaited before returning.
pub async fn run_session<R>(
    orchestrator: Arc<Orchestrator>,
    format: OutputFormat,
    input: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let progress = spawn_progress_printer(&orchestrator);
    println!("{HELP}");

    let mut submissions = JoinSet::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        while submissions.try_join_next().is_some() {}

        let cmd = match UiCommand::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        tracing::debug!(command = cmd.name(), "ui command");

        match cmd {
            UiCommand::Select { path } => match load_selected_file(&path).await {
                Ok(file) => {
                    orchestrator.select_file(file).await;
                    print_view(&orchestrator, format).await;
                }
                Err(err) => eprintln!("{err:#}"),
            },
            UiCommand::Submit => {
                let orchestrator = orchestrator.clone();
                submissions.spawn(async move {
                    match orchestrator.submit().await {
                        Ok(SubmitOutcome::Finished(_)) => print_view(&orchestrator, format).await,
                        Ok(SubmitOutcome::Superseded) => {
                            println!("previous analysis discarded; a newer file was selected")
                        }
                        Err(rejected) => println!("{rejected}"),
                    }
                });
            }
            UiCommand::Show => print_view(&orchestrator, format).await,
            UiCommand::Help => println!("{HELP}"),
            UiCommand::Quit => break,
        }
    }

    if !submissions.is_empty() {
        tracing::info!(pending = submissions.len(), "waiting for analysis in flight");
    }
    while let Some(joined) = submissions.join_next().await {
        if let Err(err) = joined {
            tracing::warn!(error = %err, "submission task did not complete");
        }
    }

    progress.abort();
    Ok(())
}

async fn print_view(orchestrator: &Orchestrator, format: OutputFormat) {
    match render_view(&orchestrator.view().await, format) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render view: {err:#}"),
    }
}

fn spawn_progress_printer(orchestrator: &Orchestrator) -> JoinHandle<()> {
    let mut rx = orchestrator.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(change) => eprintln!("[cycle {}] {}", change.cycle, change.state.name()),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "progress printer lagged behind state changes")
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
