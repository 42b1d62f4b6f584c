use crate::bootstrap::AppContext;
use crate::render;
use anyhow::{Result, anyhow};
use sitescout_application::workflow::status_message;
use sitescout_application::{AnalysisService, AnalysisWorkflow};
use sitescout_core::history::HistoryEntry;
use std::time::Duration;

const STATUS_ROTATION: Duration = Duration::from_secs(3);

pub async fn run(ctx: &AppContext, domain: &str, fresh: bool, json: bool) -> Result<()> {
    let service = ctx.analysis_service().await?;
    let entry = obtain(&service, domain, fresh, !json).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry.data)?);
    } else {
        render::report(&entry.data);
    }
    Ok(())
}

/// Runs [`AnalysisService::analyze`] while rotating status messages.
///
/// A cache hit resolves on the first poll, before any status is shown.
pub async fn obtain(
    service: &AnalysisService,
    domain: &str,
    fresh: bool,
    show_progress: bool,
) -> Result<HistoryEntry> {
    let mut workflow = AnalysisWorkflow::new();
    let ticket = workflow.begin(domain.trim())?;

    let analysis = service.analyze(domain, fresh);
    tokio::pin!(analysis);
    let mut ticker = tokio::time::interval(STATUS_ROTATION);
    let mut tick = 0usize;
    let mut shown = false;

    let outcome = loop {
        tokio::select! {
            biased;
            outcome = &mut analysis => break outcome,
            _ = ticker.tick() => {
                if tick == 1 {
                    workflow.mark_analyzing(&ticket);
                }
                if show_progress {
                    render::progress(workflow.status(), status_message(tick));
                    shown = true;
                }
                tick += 1;
            }
        }
    };

    if shown {
        render::clear_progress();
    }

    match outcome {
        Ok(outcome) => {
            if show_progress && outcome.is_cached() {
                render::cached_notice(outcome.entry());
            }
            workflow.complete(&ticket, Ok(outcome.result().clone()));
            Ok(outcome.into_entry())
        }
        Err(err) => {
            workflow.fail(&ticket, err);
            Err(anyhow!(
                workflow
                    .error()
                    .unwrap_or("Analysis did not complete")
                    .to_string()
            ))
        }
    }
}
