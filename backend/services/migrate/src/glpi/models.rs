use std::fmt;

use serde::{Deserialize, Serialize};

/// Ticket statuses carried over by the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    New,
    Assigned,
    Planned,
    Pending,
    Solved,
    Closed,
}

impl TicketStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::New),
            2 => Some(Self::Assigned),
            3 => Some(Self::Planned),
            4 => Some(Self::Pending),
            5 => Some(Self::Solved),
            6 => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Assigned => "assigned",
            Self::Planned => "planned",
            Self::Pending => "pending",
            Self::Solved => "solved",
            Self::Closed => "closed",
        }
    }
}

/// An embedded reference to a related resource (`links` array of GLPI items).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub rel: String,
    pub href: String,
}

/// A ticket as returned by `GET /Ticket`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub status: i64,
    pub entities_id: Option<i64>,
    pub name: Option<String>,
    pub date: Option<String>,
    pub closedate: Option<String>,
    pub solvedate: Option<String>,
    pub takeintoaccountdate: Option<String>,
    pub date_mod: Option<String>,
    pub users_id_lastupdater: Option<i64>,
    pub users_id_recipient: Option<i64>,
    /// Requester hint for ticket creation; never present on reads.
    #[serde(rename = "_users_id_requester", skip_serializing_if = "Option::is_none")]
    pub users_id_requester: Option<i64>,
    pub requesttypes_id: Option<i64>,
    pub content: Option<String>,
    pub urgency: Option<i64>,
    pub impact: Option<i64>,
    pub priority: Option<i64>,
    pub itilcategories_id: Option<i64>,
    #[serde(rename = "type")]
    pub ticket_type: Option<i64>,
    pub global_validation: Option<i64>,
    pub slas_id_ttr: Option<i64>,
    pub slas_id_tto: Option<i64>,
    pub slalevels_id_ttr: Option<i64>,
    pub time_to_resolve: Option<String>,
    pub time_to_own: Option<String>,
    pub begin_waiting_date: Option<String>,
    pub sla_waiting_duration: Option<i64>,
    pub ola_waiting_duration: Option<i64>,
    pub olas_id_tto: Option<i64>,
    pub olas_id_ttr: Option<i64>,
    pub olalevels_id_ttr: Option<i64>,
    pub ola_ttr_begin_date: Option<String>,
    pub internal_time_to_resolve: Option<String>,
    pub internal_time_to_own: Option<String>,
    pub waiting_duration: Option<i64>,
    pub close_delay_stat: Option<i64>,
    pub solve_delay_stat: Option<i64>,
    pub takeintoaccount_delay_stat: Option<i64>,
    pub actiontime: Option<i64>,
    pub is_deleted: Option<i64>,
    pub locations_id: Option<i64>,
    pub validation_percent: Option<i64>,
    pub date_creation: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Ticket {
    pub fn status(&self) -> Option<TicketStatus> {
        TicketStatus::from_code(self.status)
    }
}

/// A ticket participant from `GET /Ticket/{id}/Ticket_User`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketUser {
    pub id: Option<i64>,
    pub tickets_id: Option<i64>,
    pub users_id: Option<i64>,
    /// Actor role: 1 requester, 2 assignee, 3 observer.
    #[serde(rename = "type", default)]
    pub role: i64,
    #[serde(default)]
    pub use_notification: i64,
    pub alternative_email: Option<String>,
    /// Source-side email resolved during enrichment.
    #[serde(skip)]
    pub email: Option<String>,
}

/// A follow-up from `GET /Ticket/{id}/ITILFollowup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketFollowup {
    pub id: Option<i64>,
    pub itemtype: Option<String>,
    /// Id of the parent ticket.
    pub items_id: i64,
    pub date: Option<String>,
    pub users_id: Option<i64>,
    #[serde(default)]
    pub is_private: i64,
    pub requesttypes_id: Option<i64>,
    pub content: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// One entry of `GET /User/{id}/UserEmail`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEmail {
    pub id: Option<i64>,
    pub users_id: Option<i64>,
    pub email: Option<String>,
    pub is_default: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitSessionResponse {
    pub session_token: Option<String>,
}

/// Opaque credential returned by `initSession`, valid for the whole run.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Destination write bodies are wrapped in `{"input": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub input: T,
}

impl<T> Envelope<T> {
    pub fn new(input: T) -> Self {
        Self { input }
    }
}

/// Ticket creation body for `POST /Ticket`.
#[derive(Debug, Clone, Serialize)]
pub struct TicketInput {
    pub id: i64,
    pub entities_id: Option<i64>,
    pub name: Option<String>,
    pub date: Option<String>,
    pub closedate: Option<String>,
    pub solvedate: Option<String>,
    pub takeintoaccountdate: Option<String>,
    pub date_mod: Option<String>,
    pub users_id_lastupdater: Option<i64>,
    pub status: i64,
    pub users_id_recipient: Option<i64>,
    pub requesttypes_id: Option<i64>,
    pub content: Option<String>,
    pub urgency: Option<i64>,
    pub impact: Option<i64>,
    pub priority: Option<i64>,
    pub itilcategories_id: Option<i64>,
    #[serde(rename = "type")]
    pub ticket_type: Option<i64>,
    pub global_validation: Option<i64>,
    pub slas_id_ttr: Option<i64>,
    pub slas_id_tto: Option<i64>,
    pub slalevels_id_ttr: Option<i64>,
    pub time_to_resolve: Option<String>,
    pub time_to_own: Option<String>,
    pub begin_waiting_date: Option<String>,
    pub sla_waiting_duration: Option<i64>,
    pub ola_waiting_duration: Option<i64>,
    pub olas_id_tto: Option<i64>,
    pub olas_id_ttr: Option<i64>,
    pub olalevels_id_ttr: Option<i64>,
    pub ola_ttr_begin_date: Option<String>,
    pub internal_time_to_resolve: Option<String>,
    pub internal_time_to_own: Option<String>,
    pub waiting_duration: Option<i64>,
    pub close_delay_stat: Option<i64>,
    pub solve_delay_stat: Option<i64>,
    pub takeintoaccount_delay_stat: Option<i64>,
    pub actiontime: Option<i64>,
    pub is_deleted: Option<i64>,
    pub locations_id: Option<i64>,
    pub validation_percent: Option<i64>,
    pub date_creation: Option<String>,
    pub links: Vec<Link>,
}

/// Participant creation body. The destination API expects every field as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketUserInput {
    pub tickets_id: String,
    pub users_id: String,
    #[serde(rename = "type")]
    pub role: String,
    pub use_notification: String,
}

/// Follow-up creation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowupInput {
    pub date: Option<String>,
    pub users_id: Option<i64>,
    pub tickets_id: String,
    pub is_private: i64,
    pub requesttypes_id: i64,
    pub content: Option<String>,
}
