use crate::api::TwitterApiClient;
use autokit_core::CoreError;
use chrono::Local;
use std::path::Path;
use tracing::info;

/// Proof of a successful post.
#[derive(Debug, Clone)]
pub struct PostReceipt {
    pub tweet_id: String,
    pub text: String,
}

/// Publishes message text, uploading an optional image first.
///
/// Publishing is not idempotent: calling twice with the same text produces
/// two posts.
#[derive(Debug)]
pub struct Publisher {
    client: TwitterApiClient,
}

impl Publisher {
    pub fn new(client: TwitterApiClient) -> Self {
        Self { client }
    }

    pub async fn publish(
        &self,
        text: &str,
        image_path: Option<&Path>,
    ) -> Result<PostReceipt, CoreError> {
        let media_ids = match image_path {
            Some(path) => vec![self.client.upload_media(path).await?],
            None => Vec::new(),
        };

        let tweet = self.client.create_tweet(text, &media_ids).await?;

        let preview: String = text.chars().take(50).collect();
        info!("Posted at {}: {}...", Local::now(), preview);

        Ok(PostReceipt {
            tweet_id: tweet.id,
            text: tweet.text,
        })
    }
}
