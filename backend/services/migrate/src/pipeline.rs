use std::sync::Arc;

use glpi_common::error::{MigrateError, MigrateResult};
use glpi_config::MigrationConfig;
use glpi_identity::IdentityResolver;

use crate::enrich::Enricher;
use crate::error_log::ErrorSink;
use crate::glpi::client::{GlpiClient, GlpiClientError};
use crate::glpi::models::{SessionToken, Ticket};
use crate::links::LinkRewriter;
use crate::report::MigrationReport;
use crate::writer::{DestinationWriter, WriteOutcome};

/// Sequential source → destination ticket migration.
///
/// One request is in flight at a time. Only authentication failures abort the
/// run; everything else is recorded and the next unit of work proceeds.
pub struct Pipeline {
    source: GlpiClient,
    destination: GlpiClient,
    resolver: Arc<IdentityResolver>,
    enricher: Enricher,
    writer: DestinationWriter,
    sink: Arc<dyn ErrorSink>,
    batch_size: u32,
    max_pages: u32,
}

impl Pipeline {
    pub fn new(
        config: &MigrationConfig,
        resolver: IdentityResolver,
        sink: Arc<dyn ErrorSink>,
    ) -> MigrateResult<Self> {
        let source = GlpiClient::new(config.source.clone(), config.http_timeout_secs)
            .map_err(|e| MigrateError::Config(format!("source http client: {e}")))?;
        let destination = GlpiClient::new(config.destination.clone(), config.http_timeout_secs)
            .map_err(|e| MigrateError::Config(format!("destination http client: {e}")))?;

        let resolver = Arc::new(resolver);
        let rewriter = LinkRewriter::new(source.base_url(), destination.base_url());

        let enricher = Enricher::new(
            source.clone(),
            Arc::clone(&resolver),
            rewriter.clone(),
            config.default_user_email.clone(),
            Arc::clone(&sink),
        );
        let writer = DestinationWriter::new(
            destination.clone(),
            Arc::clone(&resolver),
            rewriter,
            config.followup_itemtype.clone(),
            Arc::clone(&sink),
        );

        Ok(Self {
            source,
            destination,
            resolver,
            enricher,
            writer,
            sink,
            batch_size: config.batch_size,
            max_pages: config.max_pages,
        })
    }

    pub async fn run(&self) -> MigrateResult<MigrationReport> {
        let source_session = authenticate(&self.source, "source").await?;
        tracing::info!("source session created");
        let destination_session = authenticate(&self.destination, "destination").await?;
        tracing::info!("destination session created");

        let mut report = MigrationReport::default();
        let batch = u64::from(self.batch_size);
        let mut exhausted = false;

        for page in 0..self.max_pages {
            let start = u64::from(page) * batch;
            let end = start + batch - 1;

            let tickets = match self.source.fetch_tickets(&source_session, start, end).await {
                Ok(tickets) => tickets,
                Err(e) => {
                    tracing::error!(page, start, end, error = %e, "ticket page fetch failed");
                    self.sink
                        .record(&format!("Error fetching tickets {start}-{end}: {e}"));
                    report.page_failures += 1;
                    continue;
                }
            };

            report.pages_fetched += 1;
            let page_len = tickets.len();
            tracing::info!(page, tickets = page_len, "fetched ticket page");

            for ticket in tickets {
                self.migrate_ticket(ticket, &source_session, &destination_session, &mut report)
                    .await;
            }

            if page_len < self.batch_size as usize {
                exhausted = true;
                break;
            }
        }

        // Without a short page the source may still hold tickets past the cap.
        if !exhausted {
            report.truncated = true;
            tracing::warn!(
                max_pages = self.max_pages,
                "page limit reached without a short page, remaining tickets may not be fetched"
            );
        }

        close_session(&self.source, &source_session, "source").await;
        close_session(&self.destination, &destination_session, "destination").await;

        tracing::info!("tickets successfully transferred");
        Ok(report)
    }

    async fn migrate_ticket(
        &self,
        mut ticket: Ticket,
        source_session: &SessionToken,
        destination_session: &SessionToken,
        report: &mut MigrationReport,
    ) {
        report.tickets_seen += 1;

        let Some(status) = ticket.status() else {
            tracing::debug!(ticket_id = ticket.id, status = ticket.status, "status not migrated");
            report.filtered += 1;
            return;
        };
        tracing::debug!(ticket_id = ticket.id, status = status.as_str(), "migrating ticket");

        let Some(recipient_id) = ticket.users_id_recipient.filter(|id| *id != 0) else {
            tracing::warn!(ticket_id = ticket.id, "invalid recipient user id, skipping ticket");
            report.skipped_invalid += 1;
            return;
        };
        let recipient = match self.resolve_user(source_session, recipient_id).await {
            Ok(id) => id,
            Err(e) => {
                self.lookup_failed(&ticket, "recipient", recipient_id, &e, report);
                return;
            }
        };
        ticket.users_id_requester = Some(recipient);
        ticket.users_id_recipient = Some(recipient);

        let Some(updater_id) = ticket.users_id_lastupdater.filter(|id| *id != 0) else {
            tracing::warn!(ticket_id = ticket.id, "invalid last updater user id, skipping ticket");
            report.skipped_invalid += 1;
            return;
        };
        let updater = match self.resolve_user(source_session, updater_id).await {
            Ok(id) => id,
            Err(e) => {
                self.lookup_failed(&ticket, "last updater", updater_id, &e, report);
                return;
            }
        };
        ticket.users_id_lastupdater = Some(updater);

        let details = self.enricher.enrich(ticket.id, source_session).await;
        report.unresolved_authors += details.unresolved_authors;

        match self.writer.write(&ticket, &details, destination_session).await {
            WriteOutcome::Written {
                participants,
                followups,
            } => {
                report.migrated += 1;
                report.participants_created += participants;
                report.followups_created += followups;
            }
            WriteOutcome::Failed => report.failed += 1,
        }
    }

    /// Source user id → destination user id via the user's first email.
    async fn resolve_user(
        &self,
        session: &SessionToken,
        source_user_id: i64,
    ) -> Result<i64, GlpiClientError> {
        let email = self.source.fetch_user_email(session, source_user_id).await?;
        Ok(self
            .resolver
            .resolve(email.as_ref().and_then(|e| e.email.as_deref())))
    }

    fn lookup_failed(
        &self,
        ticket: &Ticket,
        role: &str,
        user_id: i64,
        error: &GlpiClientError,
        report: &mut MigrationReport,
    ) {
        tracing::error!(
            ticket_id = ticket.id,
            role,
            user_id,
            error = %error,
            "user email fetch failed, skipping ticket"
        );
        self.sink.record(&format!(
            "Error fetching {role} email (user {user_id}) for Ticket ID {}: {error}",
            ticket.id
        ));
        report.skipped_lookup += 1;
    }
}

async fn authenticate(client: &GlpiClient, system: &str) -> MigrateResult<SessionToken> {
    client.init_session().await.map_err(|e| MigrateError::Auth {
        system: system.to_owned(),
        reason: e.to_string(),
    })
}

async fn close_session(client: &GlpiClient, session: &SessionToken, system: &str) {
    if let Err(e) = client.kill_session(session).await {
        tracing::warn!(system, error = %e, "failed to close session");
    }
}
