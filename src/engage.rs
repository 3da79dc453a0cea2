//! Engagement orchestrator — the `process_message` entry point.
//!
//! Coordinates detection, extraction, reply staging, and the
//! ACTIVE → TERMINATED transition with exactly-once callback delivery.
//! Per-message order matters for correct accumulation: append incoming,
//! detect, extract, merge, sample confidence, evaluate termination, reply,
//! append reply.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::callback::{CallbackRequest, CallbackSink, SessionSummary};
use crate::config::HoneypotConfig;
use crate::detect::{ScamDetector, ScamIntent};
use crate::error::SessionError;
use crate::intel::{IntelligenceExtractor, IntelligenceReport};
use crate::reply::ReplyStrategy;
use crate::session::model::{Role, Session, TerminationReason};
use crate::session::store::{SessionHandle, SessionStore};

/// Result of processing one inbound message.
#[derive(Debug, Clone)]
pub struct EngagementOutcome {
    pub session_id: String,
    pub reply: String,
    pub scam_detected: bool,
    /// Intents detected on this message; may be empty (the API layer
    /// presents an empty set as `none`).
    pub scam_intents: Vec<ScamIntent>,
    pub confidence: f64,
    pub should_continue: bool,
    /// Intelligence extracted from this message alone.
    pub extracted: IntelligenceReport,
}

/// Composes the session store, detector, extractor, reply strategy, and
/// callback sink into the honeypot's single processing operation.
pub struct Orchestrator {
    config: HoneypotConfig,
    store: Arc<dyn SessionStore>,
    detector: ScamDetector,
    extractor: IntelligenceExtractor,
    strategy: ReplyStrategy,
    sink: Arc<dyn CallbackSink>,
}

impl Orchestrator {
    pub fn new(
        config: HoneypotConfig,
        store: Arc<dyn SessionStore>,
        strategy: ReplyStrategy,
        sink: Arc<dyn CallbackSink>,
    ) -> Self {
        Self {
            config,
            store,
            detector: ScamDetector::new(),
            extractor: IntelligenceExtractor::new(),
            strategy,
            sink,
        }
    }

    /// Process one scammer message: accumulate intelligence, decide whether
    /// the engagement continues, and produce the agent's reply.
    ///
    /// `timestamp` is the caller-supplied receipt time; absent, the server
    /// clock stamps the message.
    pub async fn process_message(
        &self,
        session_id: &str,
        message: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> EngagementOutcome {
        let handle = self.store.get_or_create(session_id).await;
        let mut session = handle.lock().await;

        session.add_message_at(Role::Scammer, message, timestamp.unwrap_or_else(Utc::now));

        let detection = self.detector.detect(message);
        let fragment = self.extractor.extract(message);

        session.intelligence.merge(&fragment);
        for intent in &detection.intents {
            session.record_intent(*intent);
        }
        session.record_confidence(detection.confidence);

        let outcome = match self.evaluate_termination(&session) {
            Some(reason) => {
                let reply = self.strategy.goodbye();
                session.add_message(Role::Agent, reply.clone());
                session.terminate(reason);
                info!(
                    session_id = %session_id,
                    reason = %reason,
                    messages = session.message_count(),
                    "Engagement terminated"
                );

                let summary = SessionSummary::from_session(&session);
                self.spawn_delivery(Arc::clone(&handle), summary);

                (reply, false)
            }
            None => {
                let prior_count = session.scammer_message_count().saturating_sub(1);
                let reply = self
                    .strategy
                    .select(message, &session.scam_intents, prior_count);
                session.add_message(Role::Agent, reply.clone());
                (reply, true)
            }
        };

        let (reply, should_continue) = outcome;
        EngagementOutcome {
            session_id: session_id.to_string(),
            reply,
            scam_detected: detection.is_scam,
            scam_intents: detection.intents,
            confidence: detection.confidence,
            should_continue,
            extracted: fragment,
        }
    }

    /// Manually end an active session, with the same delivery path as an
    /// orchestrated termination.
    pub async fn end_session(&self, session_id: &str) -> Result<(), SessionError> {
        let handle = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| SessionError::NotFound {
                id: session_id.to_string(),
            })?;

        let mut session = handle.lock().await;
        if !session.active {
            return Err(SessionError::AlreadyTerminated {
                id: session_id.to_string(),
            });
        }

        session.terminate(TerminationReason::ManuallyEnded);
        info!(session_id = %session_id, "Session ended manually");

        let summary = SessionSummary::from_session(&session);
        self.spawn_delivery(Arc::clone(&handle), summary);
        Ok(())
    }

    /// Snapshot an existing session for introspection.
    pub async fn session_snapshot(&self, session_id: &str) -> Result<Session, SessionError> {
        let handle = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| SessionError::NotFound {
                id: session_id.to_string(),
            })?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    pub async fn active_sessions(&self) -> usize {
        self.store.active_count().await
    }

    pub async fn sweep_idle(&self) -> usize {
        self.store.sweep_idle(self.config.session_idle_timeout).await
    }

    /// Evaluate the termination predicate after accumulation for the
    /// current message.
    fn evaluate_termination(&self, session: &Session) -> Option<TerminationReason> {
        if session.scammer_message_count() >= self.config.message_cap {
            return Some(TerminationReason::MessageCapReached);
        }

        let age = Utc::now() - session.created_at;
        if age.to_std().unwrap_or_default() > self.config.max_session_duration {
            return Some(TerminationReason::MaxDurationExceeded);
        }

        if let Some(goal) = self.config.intel_goal_per_category {
            if session.intelligence.meets_goal(goal) {
                return Some(TerminationReason::IntelligenceGoalMet);
            }
        }

        None
    }

    /// Hand the summary to an asynchronous delivery task. The session is
    /// removed from the store only after the attempt and its logging
    /// complete, so the summary is never lost while still deliverable.
    /// Removal goes through the terminated session's own handle: if the id
    /// has meanwhile been re-created for a new engagement, the fresh session
    /// is left untouched.
    fn spawn_delivery(&self, handle: SessionHandle, summary: SessionSummary) {
        let sink = Arc::clone(&self.sink);
        let store = Arc::clone(&self.store);
        let session_id = summary.session_id.clone();

        tokio::spawn(async move {
            summary.log();
            let request = CallbackRequest::completed(summary);
            if let Err(e) = sink.deliver(&request).await {
                warn!(session_id = %session_id, error = %e, "Callback delivery failed");
            }
            store.remove_if(&session_id, &handle).await;
        });
    }
}
