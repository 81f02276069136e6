mod args;
mod artifact;
mod display;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use fraudcheck_core::export::{ASSESSMENT_PREFIX, PROCESS_PREFIX};
use fraudcheck_core::filter::search_values;
use fraudcheck_sync::{AssessmentDesk, ExtractOutcome, Gateway, HttpGateway, ReviewController};
use tracing::info;

use crate::args::{Cli, Command, ExtractArgs};
use crate::artifact::save_artifact;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    info!("fraudcheck v{}", env!("CARGO_PKG_VERSION"));

    let gateway: Arc<dyn Gateway> =
        Arc::new(HttpGateway::new(cli.base_url.clone()).context("building HTTP client")?);

    match cli.command {
        Command::Extract(args) => extract(gateway, &args).await,
        Command::Search(args) => {
            let desk = AssessmentDesk::new(gateway);
            let result = desk.search(&args.filters()).await;
            display::print_notices(&desk.drain_notices());
            result.context("searching assessments")?;
            display::print_assessments(&desk.rows());
            Ok(())
        }
        Command::Assess {
            external_id,
            result,
            reason,
        } => {
            let desk = AssessmentDesk::new(gateway);
            let filters = fraudcheck_core::SearchFilters {
                external_id: external_id.clone(),
                ..Default::default()
            };
            desk.search(&filters)
                .await
                .context("loading assessment row")?;
            let saved = desk.save(&external_id, result, reason).await;
            display::print_notices(&desk.drain_notices());
            let row = saved.context("saving assessment")?;
            display::print_assessments(std::slice::from_ref(&row));
            Ok(())
        }
        Command::Export { format, out } => {
            let desk = AssessmentDesk::new(gateway);
            let bytes = desk.export(format).await;
            display::print_notices(&desk.drain_notices());
            let bytes = bytes.context("downloading export")?;
            let path = save_artifact(&out, ASSESSMENT_PREFIX, format.extension(), today(), &bytes)?;
            println!("Saved {}", path.display());
            Ok(())
        }
        Command::Recertify => {
            let desk = AssessmentDesk::new(gateway);
            let report = desk.recertify().await;
            display::print_notices(&desk.drain_notices());
            let report = report.context("recertifying assessments")?;
            println!("{:#}", report.stats);
            Ok(())
        }
        Command::Watch => {
            let controller = Arc::new(ReviewController::new(gateway));
            let init = controller.initialize().await;
            display::print_notices(&controller.drain_notices());
            init.context("initialising backend session")?;

            let every = Duration::from_secs(cli.liveness_secs.max(1));
            info!(every_secs = every.as_secs(), "watching backend session");
            let liveness = controller.clone().spawn_liveness(every);
            tokio::signal::ctrl_c()
                .await
                .context("waiting for interrupt")?;
            liveness.abort();
            display::print_notices(&controller.drain_notices());
            info!(generation = controller.generation(), "stopped");
            Ok(())
        }
    }
}

async fn extract(gateway: Arc<dyn Gateway>, args: &ExtractArgs) -> anyhow::Result<()> {
    let controller = ReviewController::new(gateway);

    let init = controller.initialize().await;
    display::print_notices(&controller.drain_notices());
    init.context("initialising backend session")?;

    let outcome = controller.extract(&args.criteria()).await;
    display::print_notices(&controller.drain_notices());
    match outcome.context("extracting processes")? {
        ExtractOutcome::Loaded { records, elapsed } => {
            info!(records, elapsed_ms = elapsed.as_millis() as u64, "dataset loaded");
        }
        ExtractOutcome::Empty { .. } | ExtractOutcome::Stale => return Ok(()),
    }

    controller.with_engine(|engine| -> anyhow::Result<()> {
        for column in &args.sort {
            engine.click_sort(*column);
        }
        for (column, values) in &args.filters {
            engine.set_column_filter(*column, values.iter().cloned());
        }
        if let Some(fraud) = args.fraud {
            engine.set_fraud_filter(fraud);
        }

        display::print_table(engine);

        if let Some(column) = args.values {
            let values = engine.unique_values(column);
            let shown = search_values(&values, args.search.as_deref().unwrap_or(""));
            println!();
            display::print_unique_values(column, &shown);
        }

        if let Some(id) = &args.card {
            println!();
            display::print_detail_card(&engine.detail_card(id)?);
        }

        for id in &args.details {
            engine.open_detail(id)?;
        }
        if !engine.panels().is_empty() {
            println!();
            display::print_panels(engine.panels());
        }

        if let Some(format) = args.export {
            let bytes = engine.export_table(format)?;
            let path = save_artifact(
                &args.out,
                PROCESS_PREFIX,
                format.client_extension(),
                today(),
                &bytes,
            )?;
            println!("Saved {}", path.display());
        }
        Ok(())
    })
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
