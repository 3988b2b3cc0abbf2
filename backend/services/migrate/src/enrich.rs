use std::sync::Arc;

use glpi_identity::IdentityResolver;

use crate::error_log::ErrorSink;
use crate::glpi::client::GlpiClient;
use crate::glpi::models::{SessionToken, TicketFollowup, TicketUser};
use crate::links::LinkRewriter;

/// Sub-resources of one ticket, ready for the destination.
#[derive(Debug, Default)]
pub struct TicketDetails {
    pub participants: Vec<TicketUser>,
    pub followups: Vec<TicketFollowup>,
    /// Follow-ups whose author fell back to the default user.
    pub unresolved_authors: usize,
}

/// Fetches participants and follow-ups from the source and remaps their users.
pub struct Enricher {
    source: GlpiClient,
    resolver: Arc<IdentityResolver>,
    rewriter: LinkRewriter,
    default_email: String,
    sink: Arc<dyn ErrorSink>,
}

impl Enricher {
    pub fn new(
        source: GlpiClient,
        resolver: Arc<IdentityResolver>,
        rewriter: LinkRewriter,
        default_email: String,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            source,
            resolver,
            rewriter,
            default_email,
            sink,
        }
    }

    /// Never fails: a list fetch error degrades the ticket to no sub-resources.
    pub async fn enrich(&self, ticket_id: i64, session: &SessionToken) -> TicketDetails {
        let mut participants = match self.source.fetch_ticket_users(session, ticket_id).await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!(ticket_id, error = %e, "ticket participants fetch failed");
                self.sink.record(&format!(
                    "Error fetching participants for Ticket ID {ticket_id}: {e}"
                ));
                return TicketDetails::default();
            }
        };

        for participant in &mut participants {
            self.attach_email(ticket_id, participant, session).await;
        }

        let mut followups = match self.source.fetch_followups(session, ticket_id).await {
            Ok(followups) => followups,
            Err(e) => {
                tracing::error!(ticket_id, error = %e, "ticket follow-ups fetch failed");
                self.sink.record(&format!(
                    "Error fetching follow-ups for Ticket ID {ticket_id}: {e}"
                ));
                return TicketDetails::default();
            }
        };

        let mut unresolved_authors = 0;
        if followups.is_empty() {
            tracing::info!(ticket_id, "no follow-ups found");
        } else {
            for followup in &mut followups {
                if !self.remap_followup(ticket_id, followup, session).await {
                    unresolved_authors += 1;
                }
            }
        }

        TicketDetails {
            participants,
            followups,
            unresolved_authors,
        }
    }

    async fn attach_email(
        &self,
        ticket_id: i64,
        participant: &mut TicketUser,
        session: &SessionToken,
    ) {
        let user_id = match participant.users_id {
            Some(id) if id != 0 => id,
            _ => {
                tracing::warn!(ticket_id, "participant without user id, email lookup skipped");
                return;
            }
        };

        match self.source.fetch_user_email(session, user_id).await {
            Ok(Some(record)) => participant.email = record.email,
            Ok(None) => {
                tracing::warn!(ticket_id, user_id, "participant has no email, default email used");
                self.sink.record(&format!(
                    "Participant user {user_id} of Ticket ID {ticket_id} has no email, default used"
                ));
                participant.email = Some(self.default_email.clone());
            }
            Err(e) => {
                tracing::warn!(
                    ticket_id,
                    user_id,
                    error = %e,
                    "participant email fetch failed, default email used"
                );
                self.sink.record(&format!(
                    "Error fetching email of participant {user_id} for Ticket ID {ticket_id}: {e}"
                ));
                participant.email = Some(self.default_email.clone());
            }
        }
    }

    /// Returns `false` when the author could not be resolved and the default user was written.
    async fn remap_followup(
        &self,
        ticket_id: i64,
        followup: &mut TicketFollowup,
        session: &SessionToken,
    ) -> bool {
        self.rewriter.rewrite_in_place(&mut followup.links);

        let author_id = match followup.users_id {
            Some(id) if id != 0 => id,
            _ => {
                tracing::warn!(
                    ticket_id,
                    followup_id = ?followup.id,
                    "follow-up without author, skipped"
                );
                return true;
            }
        };

        let email = match self.source.fetch_user_email(session, author_id).await {
            Ok(Some(record)) => record.email,
            Ok(None) => {
                self.author_unresolved(ticket_id, followup, author_id, "no email on record");
                return false;
            }
            Err(e) => {
                self.author_unresolved(ticket_id, followup, author_id, &e.to_string());
                return false;
            }
        };

        followup.users_id = Some(self.resolver.resolve(email.as_deref()));
        true
    }

    // A source id must never reach the destination, so the author becomes the default user.
    fn author_unresolved(
        &self,
        ticket_id: i64,
        followup: &mut TicketFollowup,
        author_id: i64,
        reason: &str,
    ) {
        let fallback = self.resolver.default_user_id();
        tracing::warn!(
            ticket_id,
            followup_id = ?followup.id,
            source_user_id = author_id,
            fallback,
            reason,
            "follow-up author unresolved"
        );
        self.sink.record(&format!(
            "Follow-up author {author_id} unresolved for Ticket ID {ticket_id} ({reason}), \
             default user {fallback} used"
        ));
        followup.users_id = Some(fallback);
    }
}
