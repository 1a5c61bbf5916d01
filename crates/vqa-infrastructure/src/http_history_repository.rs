//! HTTP client for the chat history API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use vqa_core::chat::Turn;
use vqa_core::config::HistoryConfig;
use vqa_core::error::{ChatError, Result};
use vqa_core::history::{ConversationSummary, HistoryRepository};

use crate::dto::{ChatDetailResponse, ConversationListResponse};

const HISTORY_PATH: &str = "/api/user/chat-history";

#[derive(Clone)]
pub struct HttpHistoryRepository {
    client: Client,
    base_url: String,
    timeout: Duration,
    token: Option<String>,
}

impl HttpHistoryRepository {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            token: None,
        }
    }

    /// Attaches a bearer token obtained elsewhere to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, session_id: Option<&str>) -> String {
        match session_id {
            Some(id) => format!("{}{}/{}", self.base_url, HISTORY_PATH, id),
            None => format!("{}{}", self.base_url, HISTORY_PATH),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, session_id: Option<&str>) -> Result<T> {
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChatError::history(format!("GET {} failed: {}", url, e)))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| ChatError::history(format!("Invalid response from {}: {}", url, e))),
            StatusCode::NOT_FOUND => Err(ChatError::not_found(
                "Conversation",
                session_id.unwrap_or(HISTORY_PATH),
            )),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(ChatError::history(format!(
                    "GET {} returned {}: {}",
                    url, status, body
                )))
            }
        }
    }
}

#[async_trait]
impl HistoryRepository for HttpHistoryRepository {
    async fn find_turns(&self, session_id: &str) -> Result<Vec<Turn>> {
        let url = self.url(Some(session_id));
        let response: ChatDetailResponse = self.get_json(&url, Some(session_id)).await?;
        let turns = response.into_turns();
        tracing::debug!(
            "[HttpHistoryRepository] Loaded {} turns for {}",
            turns.len(),
            session_id
        );
        Ok(turns)
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        let url = self.url(None);
        let response: ConversationListResponse = self.get_json(&url, None).await?;
        Ok(response.into_summaries())
    }
}
