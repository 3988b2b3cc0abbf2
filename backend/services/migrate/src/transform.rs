use crate::glpi::models::{
    Envelope, FollowupInput, Ticket, TicketFollowup, TicketInput, TicketUser, TicketUserInput,
};
use crate::links::LinkRewriter;

/// Request type used for follow-ups that carry none.
pub const DEFAULT_REQUEST_TYPE_ID: i64 = 6;

/// Project a source ticket onto the destination creation body.
///
/// Values are copied as-is; the destination decides what it accepts.
pub fn ticket_input(ticket: &Ticket, rewriter: &LinkRewriter) -> Envelope<TicketInput> {
    Envelope::new(TicketInput {
        id: ticket.id,
        entities_id: ticket.entities_id,
        name: ticket.name.clone(),
        date: ticket.date.clone(),
        closedate: ticket.closedate.clone(),
        solvedate: ticket.solvedate.clone(),
        takeintoaccountdate: ticket.takeintoaccountdate.clone(),
        date_mod: ticket.date_mod.clone(),
        users_id_lastupdater: ticket.users_id_lastupdater,
        status: ticket.status,
        users_id_recipient: ticket.users_id_recipient,
        requesttypes_id: ticket.requesttypes_id,
        content: ticket.content.clone(),
        urgency: ticket.urgency,
        impact: ticket.impact,
        priority: ticket.priority,
        itilcategories_id: ticket.itilcategories_id,
        ticket_type: ticket.ticket_type,
        global_validation: ticket.global_validation,
        slas_id_ttr: ticket.slas_id_ttr,
        slas_id_tto: ticket.slas_id_tto,
        slalevels_id_ttr: ticket.slalevels_id_ttr,
        time_to_resolve: ticket.time_to_resolve.clone(),
        time_to_own: ticket.time_to_own.clone(),
        begin_waiting_date: ticket.begin_waiting_date.clone(),
        sla_waiting_duration: ticket.sla_waiting_duration,
        ola_waiting_duration: ticket.ola_waiting_duration,
        olas_id_tto: ticket.olas_id_tto,
        olas_id_ttr: ticket.olas_id_ttr,
        olalevels_id_ttr: ticket.olalevels_id_ttr,
        ola_ttr_begin_date: ticket.ola_ttr_begin_date.clone(),
        internal_time_to_resolve: ticket.internal_time_to_resolve.clone(),
        internal_time_to_own: ticket.internal_time_to_own.clone(),
        waiting_duration: ticket.waiting_duration,
        close_delay_stat: ticket.close_delay_stat,
        solve_delay_stat: ticket.solve_delay_stat,
        takeintoaccount_delay_stat: ticket.takeintoaccount_delay_stat,
        actiontime: ticket.actiontime,
        is_deleted: ticket.is_deleted,
        locations_id: ticket.locations_id,
        validation_percent: ticket.validation_percent,
        date_creation: ticket.date_creation.clone(),
        links: rewriter.rewrite(&ticket.links),
    })
}

/// Participant body; `users_id` must already be a destination id.
pub fn ticket_user_input(
    ticket_id: i64,
    user: &TicketUser,
    users_id: i64,
) -> Envelope<TicketUserInput> {
    Envelope::new(TicketUserInput {
        tickets_id: ticket_id.to_string(),
        users_id: users_id.to_string(),
        role: user.role.to_string(),
        use_notification: user.use_notification.to_string(),
    })
}

/// Follow-up body. The parent ticket comes from the follow-up's own `items_id`.
pub fn followup_input(followup: &TicketFollowup) -> Envelope<FollowupInput> {
    let requesttypes_id = followup
        .requesttypes_id
        .filter(|id| *id != 0)
        .unwrap_or(DEFAULT_REQUEST_TYPE_ID);

    Envelope::new(FollowupInput {
        date: followup.date.clone(),
        users_id: followup.users_id,
        tickets_id: followup.items_id.to_string(),
        is_private: followup.is_private,
        requesttypes_id,
        content: followup.content.clone(),
    })
}
