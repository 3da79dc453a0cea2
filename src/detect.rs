//! Rule-based scam detection.
//!
//! Pure keyword/regex scoring over the raw message text. No model calls,
//! no state: identical input always yields identical output.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Confidence above this threshold marks a message as a scam.
const SCAM_THRESHOLD: f64 = 0.3;

/// Weighted matches are normalized against this divisor.
const CONFIDENCE_DIVISOR: f64 = 5.0;

/// Scam intent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamIntent {
    FinancialFraud,
    Phishing,
    UpiScam,
    FakePrize,
    JobScam,
    RomanceScam,
    TechSupport,
    None,
}

/// Outcome of running the detector over one message.
#[derive(Debug, Clone)]
pub struct Detection {
    pub is_scam: bool,
    /// Intents in rule order; may be empty (the API layer substitutes
    /// `none` for presentation).
    pub intents: Vec<ScamIntent>,
    /// Normalized confidence in [0, 1], rounded to 2 decimals.
    pub confidence: f64,
}

/// Keywords that indicate scam messages. Each match contributes weight 1.
const SCAM_KEYWORDS: &[&str] = &[
    "urgent",
    "verify",
    "account",
    "suspended",
    "blocked",
    "lottery",
    "winner",
    "prize",
    "congratulations",
    "click here",
    "verify now",
    "update",
    "confirm",
    "bank",
    "credit card",
    "debit card",
    "otp",
    "password",
    "refund",
    "tax",
    "customs",
    "delivery",
    "won",
    "selected",
    "claim",
    "expires",
    "pay",
    "payment",
    "transfer",
    "fund",
    "kbc",
    "kaun banega crorepati",
];

/// A keyword/pattern cluster mapped to one intent category.
struct IntentRule {
    intent: ScamIntent,
    keywords: &'static [&'static str],
    pattern: Option<Regex>,
}

/// Rule-based scam detector with compiled patterns.
pub struct ScamDetector {
    /// Each regex match contributes weight 2.
    patterns: Vec<Regex>,
    intent_rules: Vec<IntentRule>,
}

impl ScamDetector {
    /// Create a detector with the default keyword and pattern rules.
    pub fn new() -> Self {
        let patterns = vec![
            Regex::new(r"\b(?:click|tap)\s+(?:here|link|below)\b").unwrap(),
            Regex::new(r"\bverify\s+(?:your|now|immediately)\b").unwrap(),
            Regex::new(r"\baccount\s+(?:suspended|blocked|locked)\b").unwrap(),
            Regex::new(r"\bcongratulations.*won\b").unwrap(),
            Regex::new(r"\bclaim.*prize\b").unwrap(),
            Regex::new(r"\bexpires?\s+(?:today|soon|in)\b").unwrap(),
            Regex::new(r"\bact\s+(?:now|fast|immediately)\b").unwrap(),
            Regex::new(r"\breply\s+(?:yes|no|stop)\b").unwrap(),
        ];

        let intent_rules = vec![
            IntentRule {
                intent: ScamIntent::FakePrize,
                keywords: &[
                    "prize",
                    "won",
                    "congratulations",
                    "lottery",
                    "winner",
                    "kbc",
                ],
                pattern: None,
            },
            IntentRule {
                intent: ScamIntent::Phishing,
                keywords: &["verify", "suspended", "blocked", "otp", "password", "bank"],
                pattern: Some(Regex::new(r"\baccount\s+(?:suspended|blocked|locked)\b").unwrap()),
            },
            IntentRule {
                intent: ScamIntent::UpiScam,
                keywords: &["upi"],
                pattern: Some(Regex::new(r"\b[\w.\-]+@\w+\b").unwrap()),
            },
            IntentRule {
                intent: ScamIntent::FinancialFraud,
                keywords: &["payment", "transfer", "fund", "refund", "money"],
                pattern: None,
            },
            IntentRule {
                intent: ScamIntent::JobScam,
                keywords: &["job", "work from home", "salary", "hiring", "part time"],
                pattern: None,
            },
            IntentRule {
                intent: ScamIntent::RomanceScam,
                keywords: &["love", "lonely", "relationship", "marriage", "my dear"],
                pattern: None,
            },
            IntentRule {
                intent: ScamIntent::TechSupport,
                keywords: &[
                    "virus",
                    "tech support",
                    "remote access",
                    "microsoft",
                    "your computer",
                ],
                pattern: None,
            },
        ];

        Self {
            patterns,
            intent_rules,
        }
    }

    /// Score a message against the keyword and pattern rules.
    pub fn detect(&self, message: &str) -> Detection {
        let lower = message.to_lowercase();

        let keyword_matches = SCAM_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();
        let pattern_matches = self.patterns.iter().filter(|p| p.is_match(&lower)).count();

        // Patterns are stronger signals than bare keywords
        let total_weight = keyword_matches + pattern_matches * 2;
        let confidence = (total_weight as f64 / CONFIDENCE_DIVISOR).min(1.0);
        let confidence = (confidence * 100.0).round() / 100.0;

        let intents = self
            .intent_rules
            .iter()
            .filter(|rule| {
                rule.keywords.iter().any(|k| lower.contains(k))
                    || rule.pattern.as_ref().is_some_and(|p| p.is_match(&lower))
            })
            .map(|rule| rule.intent)
            .collect();

        Detection {
            is_scam: confidence > SCAM_THRESHOLD,
            intents,
            confidence,
        }
    }
}

impl Default for ScamDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_prize_scam() {
        let detector = ScamDetector::new();
        let det = detector.detect(
            "Congratulations! You won a prize of Rs 50,000. Send your UPI ID to winner@paytm",
        );

        assert!(det.is_scam);
        assert!(det.intents.contains(&ScamIntent::FakePrize));
        assert!(det.intents.contains(&ScamIntent::UpiScam));
        assert!(det.confidence > 0.3);
    }

    #[test]
    fn benign_greeting_is_clean() {
        let detector = ScamDetector::new();
        let det = detector.detect("Hello, how are you?");

        assert!(!det.is_scam);
        assert!(det.intents.is_empty());
        assert_eq!(det.confidence, 0.0);
    }

    #[test]
    fn confidence_threshold_is_strict() {
        let detector = ScamDetector::new();

        // One keyword: 1/5 = 0.2, at or below the 0.3 threshold
        let low = detector.detect("please confirm");
        assert_eq!(low.confidence, 0.2);
        assert!(!low.is_scam);

        // Two keywords: 2/5 = 0.4, above the threshold
        let high = detector.detect("urgent, please confirm");
        assert_eq!(high.confidence, 0.4);
        assert!(high.is_scam);
    }

    #[test]
    fn patterns_weigh_double() {
        let detector = ScamDetector::new();

        // Keywords "click here", "verify", "verify now" (3) plus the
        // click-here and verify-now patterns (4) -> 7, capped at 1.0
        let det = detector.detect("Click here and verify now");
        assert_eq!(det.confidence, 1.0);
        assert!(det.is_scam);
    }

    #[test]
    fn confidence_never_exceeds_one() {
        let detector = ScamDetector::new();
        let det = detector.detect(
            "URGENT: your bank account suspended, verify now, click here, \
             claim your lottery prize before it expires today, pay the tax refund",
        );
        assert_eq!(det.confidence, 1.0);
    }

    #[test]
    fn phishing_cluster_tagged() {
        let detector = ScamDetector::new();
        let det = detector.detect("Your bank account has been suspended. Verify immediately.");
        assert!(det.intents.contains(&ScamIntent::Phishing));
    }

    #[test]
    fn job_scam_cluster_tagged() {
        let detector = ScamDetector::new();
        let det = detector.detect("Earn 5000 daily, work from home job, limited seats");
        assert!(det.intents.contains(&ScamIntent::JobScam));
    }

    #[test]
    fn multiple_intents_allowed() {
        let detector = ScamDetector::new();
        let det = detector.detect("You won the lottery! Pay the transfer fee via UPI now");
        assert!(det.intents.contains(&ScamIntent::FakePrize));
        assert!(det.intents.contains(&ScamIntent::UpiScam));
        assert!(det.intents.contains(&ScamIntent::FinancialFraud));
    }

    #[test]
    fn detection_is_deterministic() {
        let detector = ScamDetector::new();
        let msg = "Verify your account at http://fake-bank.com or call 9876543210";
        let a = detector.detect(msg);
        let b = detector.detect(msg);
        assert_eq!(a.is_scam, b.is_scam);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.intents, b.intents);
    }
}
