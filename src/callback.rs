//! Terminal-summary callback delivery.
//!
//! When an engagement ends, the full session summary is posted to the
//! collaborator endpoint. Delivery is at-most-once with a bounded timeout:
//! failures are logged and never retried or surfaced to the caller that
//! triggered termination.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::detect::ScamIntent;
use crate::error::CallbackError;
use crate::intel::IntelligenceReport;
use crate::session::model::{MessageEntry, Session};

/// Final summary of a completed engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub message_count: usize,
    pub scam_intents: Vec<ScamIntent>,
    pub confidence: f64,
    pub intelligence: IntelligenceReport,
    pub conversation_history: Vec<MessageEntry>,
    pub engagement_duration_seconds: f64,
    pub completed_at: DateTime<Utc>,
    pub termination_reason: String,
}

impl SessionSummary {
    /// Build a summary from a terminated (or terminating) session.
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            message_count: session.message_count(),
            scam_intents: session.scam_intents.clone(),
            confidence: session.average_confidence(),
            intelligence: session.intelligence.clone(),
            conversation_history: session.messages.clone(),
            engagement_duration_seconds: session.duration_seconds(),
            completed_at: Utc::now(),
            termination_reason: session
                .termination_reason
                .map(|r| r.to_string())
                .unwrap_or_else(|| "completed".to_string()),
        }
    }

    /// Log the summary locally. Runs whether or not delivery succeeds.
    pub fn log(&self) {
        info!(
            session_id = %self.session_id,
            message_count = self.message_count,
            scam_intents = ?self.scam_intents,
            confidence = format!("{:.2}", self.confidence).as_str(),
            duration_secs = format!("{:.2}", self.engagement_duration_seconds).as_str(),
            upi_ids = ?self.intelligence.upi_ids,
            phone_numbers = ?self.intelligence.phone_numbers,
            urls = ?self.intelligence.urls,
            termination_reason = %self.termination_reason,
            "Session summary"
        );
    }
}

/// Wire payload posted to the callback endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    pub session_id: String,
    pub summary: SessionSummary,
    pub status: String,
}

impl CallbackRequest {
    pub fn completed(summary: SessionSummary) -> Self {
        Self {
            session_id: summary.session_id.clone(),
            summary,
            status: "completed".to_string(),
        }
    }
}

/// Delivery capability for terminal summaries. Mockable for tests.
#[async_trait]
pub trait CallbackSink: Send + Sync {
    async fn deliver(&self, request: &CallbackRequest) -> Result<(), CallbackError>;
}

/// HTTP sink: POSTs the callback JSON with a bounded timeout.
pub struct HttpCallbackSink {
    client: reqwest::Client,
    url: Option<String>,
    timeout: Duration,
}

impl HttpCallbackSink {
    pub fn new(url: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            timeout,
        }
    }
}

#[async_trait]
impl CallbackSink for HttpCallbackSink {
    async fn deliver(&self, request: &CallbackRequest) -> Result<(), CallbackError> {
        let Some(url) = &self.url else {
            info!(
                session_id = %request.session_id,
                "No callback URL configured, skipping delivery"
            );
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CallbackError::Timeout(self.timeout)
                } else {
                    CallbackError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            info!(session_id = %request.session_id, "Callback delivered");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!(
                session_id = %request.session_id,
                status = status.as_u16(),
                "Callback endpoint rejected summary"
            );
            Err(CallbackError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
