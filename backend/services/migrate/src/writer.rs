use std::sync::Arc;

use glpi_identity::IdentityResolver;

use crate::enrich::TicketDetails;
use crate::error_log::ErrorSink;
use crate::glpi::client::{GlpiClient, GlpiClientError};
use crate::glpi::models::{SessionToken, Ticket};
use crate::links::LinkRewriter;
use crate::transform::{followup_input, ticket_input, ticket_user_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { participants: usize, followups: usize },
    Failed,
}

#[derive(Debug, thiserror::Error)]
enum WriteError {
    #[error("creating ticket: {0}")]
    Ticket(#[source] GlpiClientError),

    #[error("adding participant {users_id}: {source}")]
    Participant {
        users_id: i64,
        #[source]
        source: GlpiClientError,
    },

    #[error("adding follow-up {followup_id:?}: {source}")]
    Followup {
        followup_id: Option<i64>,
        #[source]
        source: GlpiClientError,
    },
}

/// Re-creates a ticket, then its participants, then its follow-ups.
pub struct DestinationWriter {
    destination: GlpiClient,
    resolver: Arc<IdentityResolver>,
    rewriter: LinkRewriter,
    followup_itemtype: String,
    sink: Arc<dyn ErrorSink>,
}

impl DestinationWriter {
    pub fn new(
        destination: GlpiClient,
        resolver: Arc<IdentityResolver>,
        rewriter: LinkRewriter,
        followup_itemtype: String,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            destination,
            resolver,
            rewriter,
            followup_itemtype,
            sink,
        }
    }

    /// The first failing step abandons the rest of this ticket; the error never escapes.
    pub async fn write(
        &self,
        ticket: &Ticket,
        details: &TicketDetails,
        session: &SessionToken,
    ) -> WriteOutcome {
        match self.try_write(ticket, details, session).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(ticket_id = ticket.id, error = %e, "failed to add ticket");
                self.sink
                    .record(&format!("Error adding Ticket ID {}: {e}", ticket.id));
                WriteOutcome::Failed
            }
        }
    }

    async fn try_write(
        &self,
        ticket: &Ticket,
        details: &TicketDetails,
        session: &SessionToken,
    ) -> Result<WriteOutcome, WriteError> {
        let body = ticket_input(ticket, &self.rewriter);
        self.destination
            .create_ticket(session, &body)
            .await
            .map_err(WriteError::Ticket)?;

        for participant in &details.participants {
            let users_id = self.resolver.resolve(participant.email.as_deref());
            let body = ticket_user_input(ticket.id, participant, users_id);
            self.destination
                .create_ticket_user(session, ticket.id, &body)
                .await
                .map_err(|source| WriteError::Participant { users_id, source })?;
        }

        for followup in &details.followups {
            let body = followup_input(followup);
            self.destination
                .create_followup(session, ticket.id, &self.followup_itemtype, &body)
                .await
                .map_err(|source| WriteError::Followup {
                    followup_id: followup.id,
                    source,
                })?;
        }

        tracing::debug!(
            ticket_id = ticket.id,
            participants = details.participants.len(),
            followups = details.followups.len(),
            "ticket written"
        );

        Ok(WriteOutcome::Written {
            participants: details.participants.len(),
            followups: details.followups.len(),
        })
    }
}
