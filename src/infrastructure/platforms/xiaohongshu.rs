// src/infrastructure/platforms/xiaohongshu.rs
//
// Xiaohongshu adapter: web session sign-in, then publish the article as a
// long-form note. The note body is capped server-side, so the payload sends
// the markdown body as-is and lets the platform reject oversize content.
use crate::application::ports::platform::{PlatformError, PlatformPublisher};
use crate::domain::article::Article;
use crate::domain::syndication::{CredentialBundle, PlatformPostId};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE: &str = "https://edith.xiaohongshu.com";

pub struct XiaohongshuPublisher {
    client: Client,
    api_base: String,
}

impl XiaohongshuPublisher {
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
        }
    }
}

impl Default for XiaohongshuPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    session: Option<String>,
    code: Option<i64>,
    msg: Option<String>,
}

#[derive(Debug, Serialize)]
struct NotePayload<'a> {
    title: &'a str,
    desc: &'a str,
    #[serde(rename = "type")]
    note_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct NoteResponse {
    note_id: Option<String>,
    code: Option<i64>,
    msg: Option<String>,
}

fn transport(err: reqwest::Error) -> PlatformError {
    PlatformError::TransientNetwork(err.to_string())
}

fn check_status(response: Response) -> Result<Response, PlatformError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PlatformError::AuthFailure(format!("http {status}"))
        }
        StatusCode::TOO_MANY_REQUESTS => PlatformError::RateLimited,
        status if status.is_server_error() => {
            PlatformError::TransientNetwork(format!("http {status}"))
        }
        status => PlatformError::ContentRejected(format!("http {status}")),
    })
}

fn api_error(code: i64, msg: Option<String>) -> PlatformError {
    let msg = msg.unwrap_or_default();
    match code {
        -100 | -101 => PlatformError::AuthFailure(format!("code {code}: {msg}")),
        -461 => PlatformError::RateLimited,
        _ => PlatformError::ContentRejected(format!("code {code}: {msg}")),
    }
}

#[async_trait]
impl PlatformPublisher for XiaohongshuPublisher {
    fn id(&self) -> &str {
        "xiaohongshu"
    }

    async fn publish(
        &self,
        article: &Article,
        credentials: &CredentialBundle,
    ) -> Result<PlatformPostId, PlatformError> {
        let username = credentials
            .get("username")
            .ok_or_else(|| PlatformError::AuthFailure("missing username".into()))?;
        let password = credentials
            .get("password")
            .ok_or_else(|| PlatformError::AuthFailure("missing password".into()))?;

        let response = self
            .client
            .post(format!("{}/api/sns/web/v1/login", self.api_base))
            .json(&LoginPayload { username, password })
            .send()
            .await
            .map_err(transport)?;
        let login: LoginResponse = check_status(response)?.json().await.map_err(transport)?;
        if let Some(code) = login.code.filter(|&c| c != 0) {
            return Err(api_error(code, login.msg));
        }
        let session = login.session.ok_or_else(|| {
            PlatformError::TransientNetwork("login response without session".into())
        })?;

        let payload = NotePayload {
            title: article.title.as_str(),
            desc: &article.body,
            note_type: "normal",
            topic: article.category.as_deref(),
        };
        let response = self
            .client
            .post(format!("{}/api/sns/web/v1/note", self.api_base))
            .header("X-Session", &session)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        let note: NoteResponse = check_status(response)?.json().await.map_err(transport)?;
        if let Some(code) = note.code.filter(|&c| c != 0) {
            return Err(api_error(code, note.msg));
        }

        note.note_id.map(PlatformPostId::new).ok_or_else(|| {
            PlatformError::TransientNetwork("note response without note_id".into())
        })
    }
}
