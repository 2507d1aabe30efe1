// src/infrastructure/platforms/wechat.rs
//
// WeChat Official Account adapter: exchange app credentials for an access
// token, then push the article into the account's draft box.
use crate::application::ports::platform::{PlatformError, PlatformPublisher};
use crate::domain::article::Article;
use crate::domain::syndication::{CredentialBundle, PlatformPostId};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE: &str = "https://api.weixin.qq.com";

pub struct WeChatPublisher {
    client: Client,
    api_base: String,
}

impl WeChatPublisher {
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Base URL override, used by tests to point at a local mock server.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
        }
    }
}

impl Default for WeChatPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    errcode: Option<i64>,
    errmsg: Option<String>,
}

#[derive(Debug, Serialize)]
struct DraftPayload<'a> {
    articles: Vec<DraftArticle<'a>>,
}

#[derive(Debug, Serialize)]
struct DraftArticle<'a> {
    title: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    digest: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct DraftResponse {
    media_id: Option<String>,
    errcode: Option<i64>,
    errmsg: Option<String>,
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

// Error code taxonomy per the official account platform docs.
fn api_error(errcode: i64, errmsg: Option<String>) -> PlatformError {
    let errmsg = errmsg.unwrap_or_default();
    match errcode {
        40001 | 40013 | 40125 | 41002 | 42001 => {
            PlatformError::AuthFailure(format!("errcode {errcode}: {errmsg}"))
        }
        45009 | 45011 => PlatformError::RateLimited,
        -1 => PlatformError::TransientNetwork(format!("errcode {errcode}: {errmsg}")),
        _ => PlatformError::ContentRejected(format!("errcode {errcode}: {errmsg}")),
    }
}

#[async_trait]
impl PlatformPublisher for WeChatPublisher {
    fn id(&self) -> &str {
        "wechat"
    }

    async fn publish(
        &self,
        article: &Article,
        credentials: &CredentialBundle,
    ) -> Result<PlatformPostId, PlatformError> {
        let app_id = credentials
            .get("app_id")
            .ok_or_else(|| PlatformError::AuthFailure("missing app_id".into()))?;
        let app_secret = credentials
            .get("app_secret")
            .ok_or_else(|| PlatformError::AuthFailure("missing app_secret".into()))?;

        let response = self
            .client
            .get(format!("{}/cgi-bin/token", self.api_base))
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", app_id),
                ("secret", app_secret),
            ])
            .send()
            .await
            .map_err(transport)?;
        let token: TokenResponse = check_status(response)?.json().await.map_err(transport)?;
        if let Some(errcode) = token.errcode.filter(|&c| c != 0) {
            return Err(api_error(errcode, token.errmsg));
        }
        let access_token = token.access_token.ok_or_else(|| {
            PlatformError::TransientNetwork("token response without access_token".into())
        })?;

        let payload = DraftPayload {
            articles: vec![DraftArticle {
                title: article.title.as_str(),
                content: &article.body,
                digest: article.category.as_deref(),
            }],
        };
        let response = self
            .client
            .post(format!("{}/cgi-bin/draft/add", self.api_base))
            .query(&[("access_token", access_token.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        let draft: DraftResponse = check_status(response)?.json().await.map_err(transport)?;
        if let Some(errcode) = draft.errcode.filter(|&c| c != 0) {
            return Err(api_error(errcode, draft.errmsg));
        }

        draft.media_id.map(PlatformPostId::new).ok_or_else(|| {
            PlatformError::TransientNetwork("draft response without media_id".into())
        })
    }
}
