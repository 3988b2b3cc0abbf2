mod enrich;
mod error_log;
mod glpi;
mod links;
mod pipeline;
mod report;
mod transform;
mod writer;

use std::sync::Arc;

use anyhow::Context;
use glpi_common::types::RunInfo;
use glpi_config::{init_tracing, MigrationConfig};
use glpi_identity::{IdentityMapping, IdentityResolver};
use tracing::Instrument;

use crate::error_log::{ErrorSink, FileErrorSink};
use crate::pipeline::Pipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loaded before tracing so LOG_LEVEL from .env applies.
    let _ = dotenvy::dotenv();
    init_tracing("info");

    let run = RunInfo::new("glpi-migrate");
    let span = tracing::info_span!("run", run_id = %run.run_id);
    migrate(&run).instrument(span).await
}

async fn migrate(run: &RunInfo) -> anyhow::Result<()> {
    tracing::info!(service = %run.name, version = %run.version, "starting");

    let config = MigrationConfig::from_env().context("failed to load configuration")?;
    tracing::info!(
        source = %config.source.base_url,
        destination = %config.destination.base_url,
        batch_size = config.batch_size,
        max_pages = config.max_pages,
        "configuration loaded"
    );

    let mapping = IdentityMapping::load(&config.users_mapping_path)
        .context("failed to load identity mapping")?;
    let resolver = IdentityResolver::new(mapping, config.default_user_id);
    let sink: Arc<dyn ErrorSink> = Arc::new(FileErrorSink::new(&config.error_log_path));

    let pipeline = Pipeline::new(&config, resolver, sink)?;
    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "migration aborted");
            return Err(e.into());
        }
    };

    tracing::info!(
        pages = report.pages_fetched,
        page_failures = report.page_failures,
        seen = report.tickets_seen,
        filtered = report.filtered,
        skipped_invalid = report.skipped_invalid,
        skipped_lookup = report.skipped_lookup,
        migrated = report.migrated,
        failed = report.failed,
        participants = report.participants_created,
        followups = report.followups_created,
        unresolved_authors = report.unresolved_authors,
        truncated = report.truncated,
        "migration completed"
    );
    Ok(())
}
