// src/infrastructure/platforms/zhihu.rs
//
// Zhihu column adapter: password sign-in, then create the article as a
// column draft. Zhihu has no app-credential flow for columns, hence the
// username/password bundle.
use crate::application::ports::platform::{PlatformError, PlatformPublisher};
use crate::domain::article::Article;
use crate::domain::syndication::{CredentialBundle, PlatformPostId};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE: &str = "https://www.zhihu.com";

pub struct ZhihuPublisher {
    client: Client,
    api_base: String,
}

impl ZhihuPublisher {
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

impl Default for ZhihuPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct SignInPayload<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    access_token: Option<String>,
    error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
struct ArticlePayload<'a> {
    title: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ArticleResponse {
    id: Option<i64>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    message: String,
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

fn api_error(error: ApiError) -> PlatformError {
    match error.code {
        100 | 120 | 4039 => PlatformError::AuthFailure(error.message),
        4036 => PlatformError::RateLimited,
        _ => PlatformError::ContentRejected(format!("code {}: {}", error.code, error.message)),
    }
}

#[async_trait]
impl PlatformPublisher for ZhihuPublisher {
    fn id(&self) -> &str {
        "zhihu"
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
            .post(format!("{}/api/v3/oauth/sign_in", self.api_base))
            .json(&SignInPayload { username, password })
            .send()
            .await
            .map_err(transport)?;
        let signed_in: SignInResponse = check_status(response)?.json().await.map_err(transport)?;
        if let Some(error) = signed_in.error {
            return Err(api_error(error));
        }
        let access_token = signed_in.access_token.ok_or_else(|| {
            PlatformError::TransientNetwork("sign-in response without access_token".into())
        })?;

        let payload = ArticlePayload {
            title: article.title.as_str(),
            content: &article.body,
            column: article.category.as_deref(),
        };
        let response = self
            .client
            .post(format!("{}/api/articles", self.api_base))
            .bearer_auth(&access_token)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        let created: ArticleResponse = check_status(response)?.json().await.map_err(transport)?;
        if let Some(error) = created.error {
            return Err(api_error(error));
        }

        created
            .id
            .map(|id| PlatformPostId::new(id.to_string()))
            .ok_or_else(|| {
                PlatformError::TransientNetwork("article response without id".into())
            })
    }
}
