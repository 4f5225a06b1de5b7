//! tsuru API client service
//!
//! Thin authenticated client over the orchestrator REST API. Every call takes
//! the caller's [`SessionToken`] explicitly and forwards it as the
//! `Authorization` header.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use anyhow::Context;
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::TsuruConfig;
use crate::models::{Container, Deploy, HealingEvent, Node, NodeList};

/// Longest response body echoed into decode errors
const MAX_LOGGED_BODY: usize = 500;

/// Orchestrator token of the current session, sent verbatim upstream
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Errors raised while talking to the orchestrator
#[derive(Debug, Error)]
pub enum TsuruError {
    /// The request never produced a response (connect failure, timeout, ...)
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The orchestrator answered with an error status
    #[error("tsuru responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON we expected
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Body of the node removal call
#[derive(Debug, Clone, Serialize)]
pub struct RemoveNodeRequest {
    pub address: String,
    /// `"true"` or `"false"`; the upstream handler parses string parameters
    pub remove_iaas: String,
}

#[derive(Serialize)]
struct TeamBody<'a> {
    name: &'a str,
}

/// tsuru API client
#[derive(Clone)]
pub struct TsuruClient {
    client: Client,
    base_url: String,
}

impl TsuruClient {
    /// Create a new client for the configured API endpoint
    pub fn new(config: &TsuruConfig) -> anyhow::Result<Self> {
        info!("Initializing tsuru API client for {}", config.url);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ==================== Node Endpoints ====================

    /// List every docker node known to the orchestrator
    pub async fn list_nodes(&self, token: &SessionToken) -> Result<Vec<Node>, TsuruError> {
        let url = format!("{}/docker/node", self.base_url);
        let response = self.send(&url, self.request(Method::GET, &url, token)).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(vec![]);
        }

        let list: Option<NodeList> = self.decode(&url, response).await?;
        Ok(list.and_then(|l| l.nodes).unwrap_or_default())
    }

    /// List the containers running on a node, addressed by bare hostname
    pub async fn list_node_containers(
        &self,
        token: &SessionToken,
        host: &str,
    ) -> Result<Vec<Container>, TsuruError> {
        let url = format!(
            "{}/docker/node/{}/containers",
            self.base_url,
            urlencoding::encode(host)
        );
        self.get_list(&url, token).await
    }

    /// Remove a node from its pool
    pub async fn remove_node(
        &self,
        token: &SessionToken,
        request: &RemoveNodeRequest,
        no_rebalance: bool,
    ) -> Result<(), TsuruError> {
        let url = format!(
            "{}/docker/node?no-rebalance={}",
            self.base_url, no_rebalance
        );
        let builder = self.request(Method::DELETE, &url, token).json(request);
        let response = self.send(&url, builder).await?;
        Self::ensure_accepted(response).await
    }

    // ==================== Deploy Endpoints ====================

    /// List a slice of deploys, newest first
    pub async fn list_deploys(
        &self,
        token: &SessionToken,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Deploy>, TsuruError> {
        let url = format!("{}/deploys?skip={}&limit={}", self.base_url, skip, limit);
        self.get_list(&url, token).await
    }

    /// List every deploy, newest first
    pub async fn list_all_deploys(&self, token: &SessionToken) -> Result<Vec<Deploy>, TsuruError> {
        let url = format!("{}/deploys", self.base_url);
        self.get_list(&url, token).await
    }

    /// Fetch a single deploy; any error status means it does not exist
    pub async fn get_deploy(
        &self,
        token: &SessionToken,
        id: &str,
    ) -> Result<Option<Deploy>, TsuruError> {
        let url = format!("{}/deploys/{}", self.base_url, urlencoding::encode(id));
        let response = self.send(&url, self.request(Method::GET, &url, token)).await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            debug!(%status, "Deploy lookup failed for {}", url);
            return Ok(None);
        }

        self.decode(&url, response).await.map(Some)
    }

    // ==================== Healing Endpoints ====================

    /// List node healing events
    pub async fn list_healing_events(
        &self,
        token: &SessionToken,
    ) -> Result<Vec<HealingEvent>, TsuruError> {
        let url = format!("{}/docker/healing", self.base_url);
        self.get_list(&url, token).await
    }

    // ==================== Team Endpoints ====================

    /// Create a team owned by the session user
    pub async fn create_team(&self, token: &SessionToken, name: &str) -> Result<(), TsuruError> {
        let url = format!("{}/teams", self.base_url);
        let builder = self
            .request(Method::POST, &url, token)
            .json(&TeamBody { name });
        let response = self.send(&url, builder).await?;
        Self::ensure_accepted(response).await
    }

    // ==================== Helper Methods ====================

    fn request(&self, method: Method, url: &str, token: &SessionToken) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, token.as_str())
    }

    /// Send a request, logging transport failures
    async fn send(&self, url: &str, builder: RequestBuilder) -> Result<Response, TsuruError> {
        debug!("tsuru: sending request to {}", url);

        builder.send().await.map_err(|e| {
            error!("tsuru ERROR: HTTP request failed to {}: {}", url, e);
            if e.is_connect() {
                error!("tsuru ERROR: connection failed, check that tsuru.url is reachable");
            }
            if e.is_timeout() {
                error!("tsuru ERROR: request timed out, consider raising tsuru.timeout_secs");
            }
            if let Some(source) = e.source() {
                error!("tsuru ERROR: underlying cause: {}", source);
            }
            TsuruError::Request {
                url: url.to_string(),
                source: e,
            }
        })
    }

    /// GET a JSON array; `204 No Content` and `null` both mean empty
    async fn get_list<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &SessionToken,
    ) -> Result<Vec<T>, TsuruError> {
        let response = self.send(url, self.request(Method::GET, url, token)).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(vec![]);
        }

        let items: Option<Vec<T>> = self.decode(url, response).await?;
        Ok(items.unwrap_or_default())
    }

    /// Check the status and parse the JSON body
    async fn decode<T: DeserializeOwned>(
        &self,
        url: &str,
        response: Response,
    ) -> Result<T, TsuruError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "tsuru: request to {} was rejected", url);
            return Err(TsuruError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| TsuruError::Request {
            url: url.to_string(),
            source: e,
        })?;
        let raw = if body.trim().is_empty() { "null" } else { body.as_str() };

        serde_json::from_str::<T>(raw).map_err(|e| {
            let truncated: String = body.chars().take(MAX_LOGGED_BODY).collect();
            error!("tsuru ERROR: failed to parse response from {}: {}", url, truncated);
            TsuruError::Decode {
                url: url.to_string(),
                source: e,
            }
        })
    }

    /// Turn an error status on a write call into [`TsuruError::Status`]
    async fn ensure_accepted(response: Response) -> Result<(), TsuruError> {
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(TsuruError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
