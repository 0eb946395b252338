use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ForumError, Result};
use crate::message::{project_collection, Message, MessageBody};

/// Built-in location of the message collection.
pub const DEFAULT_ENDPOINT: &str = "https://hacker-forum-123-default-rtdb.firebaseio.com/messages.json";

#[derive(Deserialize)]
struct CreateResponse {
    name: String,
}

/// Client for the remote document store. Full-collection reads, single-message
/// creates, nothing else.
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    endpoint: String,
}

impl StoreClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim().to_string(),
        }
    }

    /// Like [`StoreClient::new`] but every request gives up after `timeout`.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Read every message in the store, in the order the store lists them.
    pub async fn fetch_all(&self) -> Result<Vec<Message>> {
        debug!(endpoint = %self.endpoint, "fetching message collection");

        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "message fetch rejected");
            return Err(ForumError::Status(response.status()));
        }

        let text = response.text().await?;
        let data: Option<Map<String, Value>> = serde_json::from_str(&text)?;
        Ok(project_collection(data))
    }

    /// Create one message and return the key the store assigned to it.
    pub async fn create(&self, body: &MessageBody) -> Result<String> {
        debug!(endpoint = %self.endpoint, username = %body.username, "posting message");

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "message create rejected");
            return Err(ForumError::Status(response.status()));
        }

        let created: CreateResponse = response.json().await?;
        Ok(created.name)
    }
}
