//! Session model — one engagement with one scammer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detect::ScamIntent;
use crate::intel::IntelligenceReport;

/// Who authored a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Scammer,
    Agent,
}

/// One entry in the append-only conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Why an engagement ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    MessageCapReached,
    MaxDurationExceeded,
    IntelligenceGoalMet,
    ManuallyEnded,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MessageCapReached => "message_cap_reached",
            Self::MaxDurationExceeded => "max_duration_exceeded",
            Self::IntelligenceGoalMet => "intelligence_goal_met",
            Self::ManuallyEnded => "manually_ended",
        };
        f.write_str(s)
    }
}

/// A single engagement session, keyed by an externally supplied id.
///
/// The message log is append-only and time-ordered; intelligence only grows;
/// intents are kept unique in first-occurrence order. Once terminated a
/// session accepts no further messages and is purged from the store after
/// its callback attempt completes.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    pub messages: Vec<MessageEntry>,
    pub intelligence: IntelligenceReport,
    pub scam_intents: Vec<ScamIntent>,
    pub confidence_samples: Vec<f64>,
    pub active: bool,
    pub termination_reason: Option<TerminationReason>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Vec::new(),
            intelligence: IntelligenceReport::default(),
            scam_intents: Vec::new(),
            confidence_samples: Vec::new(),
            active: true,
            termination_reason: None,
            created_at: now,
            last_activity: now,
        }
    }

    /// Append a message stamped with the current time.
    pub fn add_message(&mut self, role: Role, content: impl Into<String>) {
        self.add_message_at(role, content, Utc::now());
    }

    /// Append a message with a caller-supplied timestamp. The stamp is
    /// clamped so the log stays monotonically ordered.
    pub fn add_message_at(&mut self, role: Role, content: impl Into<String>, at: DateTime<Utc>) {
        let timestamp = self
            .messages
            .last()
            .map(|m| m.timestamp.max(at))
            .unwrap_or(at);

        self.messages.push(MessageEntry {
            role,
            content: content.into(),
            timestamp,
        });
        // Activity is tracked on the server clock; a backdated message
        // stamp must not make a live session look idle to the sweep
        self.last_activity = Utc::now().max(timestamp);
    }

    /// Record an intent tag, keeping first-occurrence order and uniqueness.
    pub fn record_intent(&mut self, intent: ScamIntent) {
        if !self.scam_intents.contains(&intent) {
            self.scam_intents.push(intent);
        }
    }

    pub fn record_confidence(&mut self, confidence: f64) {
        self.confidence_samples.push(confidence);
    }

    /// Running average over all confidence samples (0.0 when empty).
    pub fn average_confidence(&self) -> f64 {
        if self.confidence_samples.is_empty() {
            return 0.0;
        }
        self.confidence_samples.iter().sum::<f64>() / self.confidence_samples.len() as f64
    }

    /// Total messages in the log, both roles.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Messages from the scammer only.
    pub fn scammer_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Scammer)
            .count()
    }

    /// Wall-clock engagement duration so far, in seconds.
    pub fn duration_seconds(&self) -> f64 {
        (Utc::now() - self.created_at).num_milliseconds() as f64 / 1000.0
    }

    /// Mark the session terminated. Idempotent: the first reason wins.
    pub fn terminate(&mut self, reason: TerminationReason) {
        if self.active {
            self.active = false;
            self.termination_reason = Some(reason);
        }
    }
}
