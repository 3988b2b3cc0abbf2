use std::time::Duration;

use glpi_config::EndpointConfig;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::models::{
    Envelope, FollowupInput, InitSessionResponse, SessionToken, Ticket, TicketFollowup,
    TicketInput, TicketUser, TicketUserInput, UserEmail,
};

/// GLPI answers a range that starts past the last item with HTTP 400 and this code.
const RANGE_EXCEED_TOTAL: &str = "ERROR_RANGE_EXCEED_TOTAL";

#[derive(Debug, thiserror::Error)]
pub enum GlpiClientError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("initSession response did not contain a session_token")]
    MissingSessionToken,
}

/// Thin client over one GLPI REST API instance.
///
/// Every call is a single attempt; nothing is retried.
#[derive(Clone)]
pub struct GlpiClient {
    client: Client,
    endpoint: EndpointConfig,
}

impl GlpiClient {
    pub fn new(endpoint: EndpointConfig, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn base_url(&self) -> &str {
        &self.endpoint.base_url
    }

    /// Open a session with the app token and authorization key.
    pub async fn init_session(&self) -> Result<SessionToken, GlpiClientError> {
        let url = format!("{}/initSession/", self.endpoint.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("expand_dropdowns", "true"),
                ("app_token", self.endpoint.app_token.as_str()),
            ])
            .header("Authorization", &self.endpoint.auth_key)
            .send()
            .await?;

        let body: InitSessionResponse = Self::check(response).await?.json().await?;
        match body.session_token {
            Some(token) if !token.is_empty() => Ok(SessionToken::new(token)),
            _ => Err(GlpiClientError::MissingSessionToken),
        }
    }

    pub async fn kill_session(&self, session: &SessionToken) -> Result<(), GlpiClientError> {
        let url = format!("{}/killSession", self.endpoint.base_url);
        let response = self.authed(self.client.get(&url), session).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Fetch tickets `start..=end` (zero-based, inclusive).
    ///
    /// A range past the end of the collection yields an empty page.
    pub async fn fetch_tickets(
        &self,
        session: &SessionToken,
        start: u64,
        end: u64,
    ) -> Result<Vec<Ticket>, GlpiClientError> {
        let url = format!("{}/Ticket", self.endpoint.base_url);
        let range = format!("{start}-{end}");
        let response = self
            .authed(self.client.get(&url), session)
            .query(&[("range", range.as_str())])
            .send()
            .await?;

        match Self::check(response).await {
            Ok(resp) => Ok(resp.json().await?),
            Err(GlpiClientError::HttpError { status, body })
                if status == StatusCode::BAD_REQUEST && body.contains(RANGE_EXCEED_TOTAL) =>
            {
                tracing::debug!(range = %range, "range past last ticket");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn fetch_ticket_users(
        &self,
        session: &SessionToken,
        ticket_id: i64,
    ) -> Result<Vec<TicketUser>, GlpiClientError> {
        let url = format!("{}/Ticket/{ticket_id}/Ticket_User", self.endpoint.base_url);
        self.get_json(&url, session).await
    }

    pub async fn fetch_followups(
        &self,
        session: &SessionToken,
        ticket_id: i64,
    ) -> Result<Vec<TicketFollowup>, GlpiClientError> {
        let url = format!("{}/Ticket/{ticket_id}/ITILFollowup", self.endpoint.base_url);
        self.get_json(&url, session).await
    }

    /// First entry of a user's email list, if the user has any.
    pub async fn fetch_user_email(
        &self,
        session: &SessionToken,
        user_id: i64,
    ) -> Result<Option<UserEmail>, GlpiClientError> {
        let url = format!("{}/User/{user_id}/UserEmail", self.endpoint.base_url);
        let emails: Vec<UserEmail> = self.get_json(&url, session).await?;
        Ok(emails.into_iter().next())
    }

    pub async fn create_ticket(
        &self,
        session: &SessionToken,
        body: &Envelope<TicketInput>,
    ) -> Result<(), GlpiClientError> {
        let url = format!("{}/Ticket", self.endpoint.base_url);
        self.post_json(&url, session, body).await
    }

    pub async fn create_ticket_user(
        &self,
        session: &SessionToken,
        ticket_id: i64,
        body: &Envelope<TicketUserInput>,
    ) -> Result<(), GlpiClientError> {
        let url = format!("{}/Ticket/{ticket_id}/Ticket_User", self.endpoint.base_url);
        self.post_json(&url, session, body).await
    }

    pub async fn create_followup(
        &self,
        session: &SessionToken,
        ticket_id: i64,
        itemtype: &str,
        body: &Envelope<FollowupInput>,
    ) -> Result<(), GlpiClientError> {
        let url = format!("{}/Ticket/{ticket_id}/{itemtype}", self.endpoint.base_url);
        self.post_json(&url, session, body).await
    }

    fn authed(&self, request: RequestBuilder, session: &SessionToken) -> RequestBuilder {
        request
            .header("App-Token", &self.endpoint.app_token)
            .header("Session-Token", session.as_str())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        session: &SessionToken,
    ) -> Result<T, GlpiClientError> {
        let response = self.authed(self.client.get(url), session).send().await?;
        Ok(Self::check(response).await?.json::<T>().await?)
    }

    async fn post_json<B: Serialize>(
        &self,
        url: &str,
        session: &SessionToken,
        body: &B,
    ) -> Result<(), GlpiClientError> {
        let response = self
            .authed(self.client.post(url), session)
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, GlpiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GlpiClientError::HttpError { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GlpiClient {
        let endpoint = EndpointConfig::new(&server.uri(), "app-tok", "user_token abc");
        GlpiClient::new(endpoint, 5).unwrap()
    }

    fn session() -> SessionToken {
        SessionToken::new("sess-1")
    }

    #[tokio::test]
    async fn init_session_sends_app_token_and_auth_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/initSession/"))
            .and(query_param("app_token", "app-tok"))
            .and(query_param("expand_dropdowns", "true"))
            .and(header("Authorization", "user_token abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "session_token": "s-123" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server).init_session().await.unwrap();
        assert_eq!(token.as_str(), "s-123");
    }

    #[tokio::test]
    async fn init_session_fails_on_401() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/initSession/"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(
                    r#"["ERROR_GLPI_LOGIN_USER_TOKEN","parameter user_token seems invalid"]"#,
                ),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).init_session().await.unwrap_err();
        match err {
            GlpiClientError::HttpError { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("ERROR_GLPI_LOGIN_USER_TOKEN"));
            }
            other => panic!("expected HttpError, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn init_session_without_token_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/initSession/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server).init_session().await.unwrap_err();
        assert!(matches!(err, GlpiClientError::MissingSessionToken));
    }

    #[tokio::test]
    async fn init_session_unreachable_is_request_error() {
        let endpoint = EndpointConfig::new("http://127.0.0.1:1", "app", "key");
        let client = GlpiClient::new(endpoint, 2).unwrap();

        let err = client.init_session().await.unwrap_err();
        assert!(matches!(err, GlpiClientError::RequestError(_)));
    }

    #[tokio::test]
    async fn fetch_tickets_sends_range_and_session_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/Ticket"))
            .and(query_param("range", "50-99"))
            .and(header("App-Token", "app-tok"))
            .and(header("Session-Token", "sess-1"))
            .respond_with(ResponseTemplate::new(206).set_body_json(serde_json::json!([
                { "id": 51, "status": 1 },
                { "id": 52, "status": 6 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let tickets = client_for(&server)
            .fetch_tickets(&session(), 50, 99)
            .await
            .unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[1].id, 52);
    }

    #[tokio::test]
    async fn fetch_tickets_past_the_end_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/Ticket"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"["ERROR_RANGE_EXCEED_TOTAL","Provided range exceed total count of data: 50"]"#,
            ))
            .mount(&server)
            .await;

        let tickets = client_for(&server)
            .fetch_tickets(&session(), 50, 99)
            .await
            .unwrap();
        assert!(tickets.is_empty());
    }

    #[tokio::test]
    async fn fetch_tickets_other_400_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/Ticket"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"["ERROR_BAD_ARRAY"]"#))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_tickets(&session(), 0, 9)
            .await
            .unwrap_err();
        assert!(matches!(err, GlpiClientError::HttpError { .. }));
    }

    #[tokio::test]
    async fn fetch_user_email_takes_first_entry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/User/7/UserEmail"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 1, "users_id": 7, "email": "first@x.com", "is_default": 1 },
                { "id": 2, "users_id": 7, "email": "second@x.com", "is_default": 0 }
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/User/8/UserEmail"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let email = client.fetch_user_email(&session(), 7).await.unwrap();
        assert_eq!(email.and_then(|e| e.email).as_deref(), Some("first@x.com"));

        let none = client.fetch_user_email(&session(), 8).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn create_followup_posts_envelope_to_itemtype() {
        let server = MockServer::start().await;
        let body = Envelope::new(FollowupInput {
            date: Some("2024-03-01 10:00:00".to_owned()),
            users_id: Some(42),
            tickets_id: "10".to_owned(),
            is_private: 0,
            requesttypes_id: 6,
            content: Some("done".to_owned()),
        });

        Mock::given(method("POST"))
            .and(path("/Ticket/10/TicketFollowup"))
            .and(header("Session-Token", "sess-1"))
            .and(body_json(serde_json::json!({
                "input": {
                    "date": "2024-03-01 10:00:00",
                    "users_id": 42,
                    "tickets_id": "10",
                    "is_private": 0,
                    "requesttypes_id": 6,
                    "content": "done"
                }
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": 900 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .create_followup(&session(), 10, "TicketFollowup", &body)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn kill_session_uses_session_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/killSession"))
            .and(header("Session-Token", "sess-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).kill_session(&session()).await.unwrap();
    }
}
