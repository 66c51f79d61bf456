use autokit_core::{CoreError, TwitterApiError, TwitterCredentials};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const TWITTER_API_BASE: &str = "https://api.twitter.com";

#[derive(Debug, Clone, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<TweetMedia>,
}

#[derive(Debug, Clone, Serialize)]
struct TweetMedia {
    media_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TweetData {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateTweetResponse {
    data: TweetData,
}

#[derive(Debug, Clone, Deserialize)]
struct MediaUploadResponse {
    data: MediaUploadData,
}

#[derive(Debug, Clone, Deserialize)]
struct MediaUploadData {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug)]
pub struct TwitterApiClient {
    http_client: Client,
    credentials: TwitterCredentials,
    base_url: String,
    user_agent: String,
}

impl TwitterApiClient {
    pub fn new(credentials: TwitterCredentials, user_agent: String) -> Self {
        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            credentials,
            base_url: TWITTER_API_BASE.to_string(),
            user_agent,
        }
    }

    /// Point the client at a different endpoint. Used by tests to talk to
    /// a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    async fn execute(
        &self,
        request_builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<Response, CoreError> {
        info!("Making Twitter API request: {}", endpoint);
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for {}: {}", endpoint, e);
                if e.is_timeout() {
                    return Err(CoreError::TwitterApi(TwitterApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        if response.status().is_success() {
            debug!("Request successful: {} {}", response.status(), endpoint);
            return Ok(response);
        }

        error!(
            "Request failed with status: {} for {}",
            response.status(),
            endpoint
        );

        let status = response.status().as_u16();
        match status {
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                warn!("Rate limited, retry after {} seconds", retry_after);
                Err(CoreError::TwitterApi(TwitterApiError::RateLimitExceeded {
                    retry_after,
                }))
            }
            401 => Err(CoreError::TwitterApi(TwitterApiError::InvalidToken)),
            403 => Err(CoreError::TwitterApi(TwitterApiError::Forbidden {
                resource: endpoint.to_string(),
            })),
            404 => Err(CoreError::TwitterApi(TwitterApiError::InvalidResponse {
                details: "Resource not found".to_string(),
            })),
            code if code >= 500 => Err(CoreError::TwitterApi(TwitterApiError::ServerError {
                status_code: code,
            })),
            code => Err(CoreError::TwitterApi(TwitterApiError::InvalidResponse {
                details: format!("Unexpected status {}", code),
            })),
        }
    }

    /// Submit a tweet, optionally referencing previously uploaded media.
    pub async fn create_tweet(
        &self,
        text: &str,
        media_ids: &[String],
    ) -> Result<TweetData, CoreError> {
        let endpoint = "/2/tweets";
        let url = format!("{}{}", self.base_url, endpoint);

        let request = CreateTweetRequest {
            text,
            media: if media_ids.is_empty() {
                None
            } else {
                Some(TweetMedia {
                    media_ids: media_ids.to_vec(),
                })
            },
        };

        let response = self
            .execute(
                self.http_client
                    .post(&url)
                    .bearer_auth(&self.credentials.access_token)
                    .json(&request),
                endpoint,
            )
            .await?;

        let created: CreateTweetResponse = response.json().await.map_err(|e| {
            error!("Failed to parse tweet creation response: {}", e);
            CoreError::TwitterApi(TwitterApiError::InvalidResponse {
                details: "Failed to parse tweet creation response".to_string(),
            })
        })?;

        debug!("Created tweet {}", created.data.id);
        Ok(created.data)
    }

    /// Upload a local image and return the media id to attach to a tweet.
    pub async fn upload_media(&self, image_path: &Path) -> Result<String, CoreError> {
        let endpoint = "/2/media/upload";
        let url = format!("{}{}", self.base_url, endpoint);

        let bytes = tokio::fs::read(image_path).await?;
        let file_name = image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());

        debug!("Uploading media {} ({} bytes)", file_name, bytes.len());
        let form = Form::new()
            .part("media", Part::bytes(bytes).file_name(file_name))
            .text("media_category", "tweet_image");

        let response = self
            .execute(
                self.http_client
                    .post(&url)
                    .bearer_auth(&self.credentials.access_token)
                    .multipart(form),
                endpoint,
            )
            .await?;

        let uploaded: MediaUploadResponse = response.json().await.map_err(|e| {
            error!("Failed to parse media upload response: {}", e);
            CoreError::TwitterApi(TwitterApiError::MediaUploadFailed {
                details: "Failed to parse media upload response".to_string(),
            })
        })?;

        info!("Uploaded media id {}", uploaded.data.id);
        Ok(uploaded.data.id)
    }

    /// Exchange the configured refresh token for a fresh access token.
    ///
    /// Runs once at startup when a refresh token is configured; failures
    /// here are startup failures, not in-flight retries.
    pub async fn refresh_access_token(&mut self) -> Result<(), CoreError> {
        let endpoint = "/2/oauth2/token";
        let url = format!("{}{}", self.base_url, endpoint);

        let refresh_token = self.credentials.refresh_token.clone().ok_or_else(|| {
            CoreError::TwitterApi(TwitterApiError::AuthenticationFailed {
                reason: "no refresh token configured".to_string(),
            })
        })?;

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
        ];

        let response = self
            .execute(
                self.http_client
                    .post(&url)
                    .basic_auth(
                        &self.credentials.client_id,
                        Some(&self.credentials.client_secret),
                    )
                    .form(&params),
                endpoint,
            )
            .await?;

        let token: TokenResponse = response.json().await.map_err(|e| {
            error!("Failed to parse token response: {}", e);
            CoreError::TwitterApi(TwitterApiError::AuthenticationFailed {
                reason: "unreadable token response".to_string(),
            })
        })?;

        info!("Refreshed Twitter access token");
        self.credentials.access_token = token.access_token;
        if token.refresh_token.is_some() {
            self.credentials.refresh_token = token.refresh_token;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> TwitterCredentials {
        TwitterCredentials {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            access_token: "token".to_string(),
            refresh_token: None,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = TwitterApiClient::new(test_credentials(), "autokit/0.1".to_string());
        assert_eq!(client.user_agent(), "autokit/0.1");
    }

    #[test]
    fn test_tweet_request_omits_media_when_absent() {
        let request = CreateTweetRequest {
            text: "hello",
            media: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hello"}));
    }

    #[test]
    fn test_tweet_request_includes_media_ids() {
        let request = CreateTweetRequest {
            text: "hello",
            media: Some(TweetMedia {
                media_ids: vec!["123".to_string()],
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["media"]["media_ids"][0], "123");
    }

    #[tokio::test]
    async fn test_refresh_without_token_fails() {
        let mut client = TwitterApiClient::new(test_credentials(), "autokit/0.1".to_string());
        let result = client.refresh_access_token().await;
        assert!(matches!(
            result,
            Err(CoreError::TwitterApi(
                TwitterApiError::AuthenticationFailed { .. }
            ))
        ));
    }
}
