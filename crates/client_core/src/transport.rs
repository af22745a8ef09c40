//! HTTP binding of [`PostStore`] against the post service.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{domain::Post, error::ApiError, protocol::CreatePostRequest, protocol::POSTS_ROUTE};
use url::Url;

use crate::{
    config::ClientSettings,
    error::{CreateError, FetchError},
    PostStore,
};

#[derive(Debug, Clone)]
pub struct HttpPostStore {
    http: Client,
    posts_url: Url,
}

impl HttpPostStore {
    pub fn new(settings: &ClientSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        let posts_url = settings
            .server_url
            .join(POSTS_ROUTE.trim_start_matches('/'))?;
        Ok(Self { http, posts_url })
    }

    pub fn posts_url(&self) -> &Url {
        &self.posts_url
    }
}

#[async_trait]
impl PostStore for HttpPostStore {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        let response = self
            .http
            .get(self.posts_url.clone())
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match read_error(response).await {
                ErrorBody::Api(err) => err.message,
                ErrorBody::Text(text) => text,
            };
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| FetchError::Decode(err.to_string()))
    }

    async fn create_post(&self, title: &str, body: &str, author: &str) -> Result<(), CreateError> {
        let request = CreatePostRequest {
            title: title.to_string(),
            body: body.to_string(),
            author: author.to_string(),
        };
        let response = self
            .http
            .post(self.posts_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| CreateError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(match read_error(response).await {
            ErrorBody::Api(err) => CreateError::Rejected {
                code: err.code,
                message: err.message,
            },
            ErrorBody::Text(message) => CreateError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}

enum ErrorBody {
    Api(ApiError),
    Text(String),
}

async fn read_error(response: Response) -> ErrorBody {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    if let Ok(err) = serde_json::from_str::<ApiError>(&text) {
        return ErrorBody::Api(err);
    }
    if text.trim().is_empty() {
        return ErrorBody::Text(reason(status));
    }
    ErrorBody::Text(text)
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_string()
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
