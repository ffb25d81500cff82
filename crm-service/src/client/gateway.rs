//! Persistence call behind a board transition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use thiserror::Error;
use uuid::Uuid;

use crate::models::LeadStatus;

/// Path of the status update endpoint, relative to the API base URL.
pub const UPDATE_LEAD_STATUS_PATH: &str = "/api/v1/lead/updateLeadStatus";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub lead_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unreadable response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait LeadStatusGateway: Send + Sync {
    async fn update_status(
        &self,
        lead_id: Uuid,
        status: LeadStatus,
    ) -> Result<StatusUpdateResponse, GatewayError>;
}

/// Talks to a running crm-service over HTTP.
#[derive(Clone)]
pub struct HttpLeadStatusGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLeadStatusGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LeadStatusGateway for HttpLeadStatusGateway {
    #[tracing::instrument(skip(self), fields(lead_id = %lead_id, status = %status))]
    async fn update_status(
        &self,
        lead_id: Uuid,
        status: LeadStatus,
    ) -> Result<StatusUpdateResponse, GatewayError> {
        let url = format!("{}{}", self.base_url, UPDATE_LEAD_STATUS_PATH);
        let body = StatusUpdateRequest {
            lead_id: lead_id.to_string(),
            status: status.to_string(),
        };

        let response = self
            .client
            .traced_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        // Rejections arrive as non-2xx with a `{success: false}` body.
        response
            .json::<StatusUpdateResponse>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
