//! Blocking OpenReview v2 API client
//!
//! Thin wrapper over ureq with native-tls. Anonymous by default; `login`
//! exchanges credentials for a bearer token at the `/login` endpoint.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument};
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use ureq::Agent;

use crate::client::error::{ApiError, ApiResult};
use crate::domain::Post;

/// Global timeout for all HTTP operations.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum response body size (10 MB). Forums are text; anything larger is a
/// misbehaving server.
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// Page size for note listing. The server caps pages at 1000 entries.
const PAGE_LIMIT: usize = 1000;

const USER_AGENT: &str = concat!("orview/", env!("CARGO_PKG_VERSION"));

/// Wire shape of a `/notes` response page.
#[derive(Debug, Deserialize)]
struct NotesPage {
    #[serde(default)]
    notes: Vec<Post>,
}

/// Wire shape of a `/login` response.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Client for one OpenReview API host, optionally holding a bearer token.
pub struct ForumClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl ForumClient {
    /// Unauthenticated client. Public forums are readable without a token.
    pub fn anonymous(base_url: &str) -> Self {
        Self {
            agent: agent(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Exchange credentials for a bearer token.
    #[instrument(skip(password))]
    pub fn login(base_url: &str, username: &str, password: &str) -> ApiResult<Self> {
        let mut client = Self::anonymous(base_url);
        let url = format!("{}/login", client.base_url);

        let mut response = client
            .agent
            .post(&url)
            .header("User-Agent", USER_AGENT)
            .send_json(serde_json::json!({ "id": username, "password": password }))
            .map_err(|err| match err {
                ureq::Error::StatusCode(401 | 403 | 400) => ApiError::AuthFailed {
                    user: username.to_string(),
                },
                other => ApiError::Http(other),
            })?;

        let login: LoginResponse = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_SIZE)
            .read_json()?;

        let token = login
            .token
            .ok_or_else(|| ApiError::MalformedResponse("login response missing token".into()))?;
        debug!(user = username, "login succeeded");

        client.token = Some(token);
        Ok(client)
    }

    /// Fetch a single note by id.
    #[instrument(skip(self))]
    pub fn get_note(&self, note_id: &str) -> ApiResult<Post> {
        let url = format!("{}/notes?id={}", self.base_url, note_id);
        let page = self.fetch_page(&url)?;
        page.notes
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NoteNotFound(note_id.to_string()))
    }

    /// Fetch all notes belonging to a forum, following pagination until a
    /// short page. Server order is preserved; sorting is left to the caller.
    #[instrument(skip(self))]
    pub fn get_notes(&self, forum_id: &str) -> ApiResult<Vec<Post>> {
        let mut notes = Vec::new();
        let mut offset = 0usize;

        loop {
            let url = format!(
                "{}/notes?forum={}&offset={}&limit={}",
                self.base_url, forum_id, offset, PAGE_LIMIT
            );
            let page = self.fetch_page(&url)?;
            let fetched = page.notes.len();
            debug!(offset, fetched, "notes page fetched");
            notes.extend(page.notes);
            if fetched < PAGE_LIMIT {
                break;
            }
            offset += fetched;
        }

        Ok(notes)
    }

    fn fetch_page(&self, url: &str) -> ApiResult<NotesPage> {
        let mut request = self.agent.get(url).header("User-Agent", USER_AGENT);
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }

        let mut response = request.call().map_err(|err| match err {
            ureq::Error::StatusCode(code @ (401 | 403)) => ApiError::AuthRequired(code),
            other => ApiError::Http(other),
        })?;

        let page = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_SIZE)
            .read_json()?;
        Ok(page)
    }
}

/// HTTP agent configured with native-tls and a global timeout.
fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_page_parses_api_response() {
        let body = r#"{
            "notes": [
                {"id": "n1", "replyto": null, "cdate": 1, "content": {}},
                {"id": "n2", "replyto": "n1", "cdate": 2,
                 "content": {"comment": {"value": "hi"}}}
            ],
            "count": 2
        }"#;
        let page: NotesPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.notes.len(), 2);
        assert_eq!(page.notes[1].replyto.as_deref(), Some("n1"));
        assert_eq!(page.notes[1].text_field("comment"), Some("hi"));
    }

    #[test]
    fn login_response_without_token_is_detected() {
        let login: LoginResponse = serde_json::from_str(r#"{"user": {"id": "x"}}"#).unwrap();
        assert!(login.token.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ForumClient::anonymous("https://api2.openreview.net/");
        assert_eq!(client.base_url, "https://api2.openreview.net");
    }
}
