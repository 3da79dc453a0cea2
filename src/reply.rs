//! Stage-based reply selection.
//!
//! Picks a human-like template from the pool matching the conversation
//! stage. Selection is uniformly random by design; the RNG is injected and
//! seedable so tests stay deterministic.

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::detect::ScamIntent;

const INITIAL_RESPONSES: &[&str] = &[
    "Hi, I received your message. Can you tell me more?",
    "Hello! What is this about?",
    "I'm interested. Please explain.",
    "Yes, I'm here. What do you need?",
    "Got your message. What should I do next?",
];

const CURIOUS_RESPONSES: &[&str] = &[
    "That sounds interesting. How does it work?",
    "Can you provide more details?",
    "I want to know more about this.",
    "What are the next steps?",
    "How do I proceed with this?",
];

const VERIFICATION_REQUESTS: &[&str] = &[
    "Can you send me the link?",
    "What's the website?",
    "Where should I make the payment?",
    "What's your UPI ID?",
    "Can you share your contact number?",
    "How can I reach you?",
];

const HESITANT_RESPONSES: &[&str] = &[
    "Is this legitimate? How do I know?",
    "I'm not sure about this. Can you verify?",
    "This seems unusual. Are you sure?",
    "I need some time to think about it.",
    "Can you prove this is real?",
];

const ENGAGED_RESPONSES: &[&str] = &[
    "Okay, I'm ready. What should I do?",
    "Yes, I want to proceed. Guide me.",
    "I'm interested. Let's do this.",
    "Alright, tell me what to do next.",
    "I'm convinced. How do we continue?",
];

const STALLING_RESPONSES: &[&str] = &[
    "Just a moment, I need to check something.",
    "Can you wait? I'm busy right now.",
    "Let me get back to you in a few minutes.",
    "I need to talk to my family first.",
    "Hold on, I'm having network issues.",
];

/// Always available, never gated by stage rules.
pub(crate) const GOODBYE_RESPONSES: &[&str] = &[
    "Sorry, I have to go now. Maybe another time.",
    "I can't continue this right now. Goodbye.",
    "Something came up, I'll stop here. Bye.",
    "I don't think this is for me after all. Goodbye.",
    "My family needs me, I have to leave. Bye.",
];

/// Vocabulary that signals the scammer is pushing for a payment action.
const PAYMENT_WORDS: &[&str] = &["pay", "payment", "transfer", "send", "money"];

/// Vocabulary that signals the scammer is handing over links or credentials.
const CREDENTIAL_WORDS: &[&str] = &["link", "website", "click", "upi", "account"];

/// Stage-based template selector with an injected RNG.
pub struct ReplyStrategy {
    rng: Mutex<StdRng>,
}

impl ReplyStrategy {
    /// Create a strategy seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a deterministically seeded strategy (for tests).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Select a stage-appropriate reply.
    ///
    /// `prior_count` is the number of scammer messages before the current
    /// one. Intents are logged for context but the stage is driven by the
    /// count and the last message's vocabulary.
    pub fn select(&self, last_message: &str, intents: &[ScamIntent], prior_count: usize) -> String {
        let lower = last_message.to_lowercase();

        let pool = if prior_count <= 1 {
            INITIAL_RESPONSES
        } else if PAYMENT_WORDS.iter().any(|w| lower.contains(w)) {
            if prior_count < 4 {
                VERIFICATION_REQUESTS
            } else {
                HESITANT_RESPONSES
            }
        } else if CREDENTIAL_WORDS.iter().any(|w| lower.contains(w)) {
            ENGAGED_RESPONSES
        } else if prior_count <= 3 {
            CURIOUS_RESPONSES
        } else if prior_count <= 6 {
            VERIFICATION_REQUESTS
        } else if prior_count <= 9 {
            ENGAGED_RESPONSES
        } else {
            STALLING_RESPONSES
        };

        debug!(prior_count, intents = ?intents, "Selecting staged reply");
        self.pick(pool)
    }

    /// Select a goodbye reply for a terminating session.
    pub fn goodbye(&self) -> String {
        self.pick(GOODBYE_RESPONSES)
    }

    fn pick(&self, pool: &[&str]) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        pool.choose(&mut *rng)
            .copied()
            .unwrap_or(pool[0])
            .to_string()
    }
}

impl Default for ReplyStrategy {
    fn default() -> Self {
        Self::new()
    }
}
