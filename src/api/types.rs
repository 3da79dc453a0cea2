//! Wire types for the honeypot API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detect::ScamIntent;
use crate::engage::EngagementOutcome;
use crate::intel::IntelligenceReport;

/// Incoming scam message event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Response to a message event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub session_id: String,
    pub reply: String,
    pub scam_detected: bool,
    pub scam_intents: Vec<ScamIntent>,
    pub confidence: f64,
    pub should_continue: bool,
    pub extracted_intelligence: IntelligenceReport,
}

impl From<EngagementOutcome> for MessageResponse {
    fn from(outcome: EngagementOutcome) -> Self {
        // Presentation rule: an empty intent set is shown as `none`
        let scam_intents = if outcome.scam_intents.is_empty() {
            vec![ScamIntent::None]
        } else {
            outcome.scam_intents
        };

        Self {
            session_id: outcome.session_id,
            reply: outcome.reply,
            scam_detected: outcome.scam_detected,
            scam_intents,
            confidence: outcome.confidence,
            should_continue: outcome.should_continue,
            extracted_intelligence: outcome.extracted,
        }
    }
}
