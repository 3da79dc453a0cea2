//! Intelligence extraction from scam messages.
//!
//! Pure regex passes over the raw text. Payment-handle and email extraction
//! run independently over the whole message; a token may land in both
//! categories, dedup is per-category only.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Intelligence accumulated from one or more messages. Set semantics per
/// category: values are unique and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceReport {
    pub upi_ids: BTreeSet<String>,
    pub phone_numbers: BTreeSet<String>,
    pub urls: BTreeSet<String>,
    pub bank_details: BTreeSet<String>,
    pub email_addresses: BTreeSet<String>,
}

impl IntelligenceReport {
    /// Merge another report into this one. Accumulation is monotone: the
    /// merged report contains every value either side had.
    pub fn merge(&mut self, other: &IntelligenceReport) {
        self.upi_ids.extend(other.upi_ids.iter().cloned());
        self.phone_numbers.extend(other.phone_numbers.iter().cloned());
        self.urls.extend(other.urls.iter().cloned());
        self.bank_details.extend(other.bank_details.iter().cloned());
        self.email_addresses
            .extend(other.email_addresses.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.upi_ids.is_empty()
            && self.phone_numbers.is_empty()
            && self.urls.is_empty()
            && self.bank_details.is_empty()
            && self.email_addresses.is_empty()
    }

    /// True when every category holds at least `goal` values.
    pub fn meets_goal(&self, goal: usize) -> bool {
        self.upi_ids.len() >= goal
            && self.phone_numbers.len() >= goal
            && self.urls.len() >= goal
            && self.bank_details.len() >= goal
            && self.email_addresses.len() >= goal
    }
}

/// Regex-based extractor for payment handles, phone numbers, URLs, bank
/// account references, and email addresses.
pub struct IntelligenceExtractor {
    upi: Regex,
    phone: Regex,
    url: Regex,
    bank: Regex,
    email: Regex,
}

impl IntelligenceExtractor {
    pub fn new() -> Self {
        Self {
            // name@provider payment handles (UPI-style)
            upi: Regex::new(r"\b[\w.\-]+@\w+\b").unwrap(),
            // Indian mobile numbers, optional +91 prefix
            phone: Regex::new(r"\b(?:\+91[\-\s]?)?[6-9]\d{9}\b").unwrap(),
            url: Regex::new(r"https?://\S+|www\.\S+").unwrap(),
            // Labelled account numbers: "a/c 123456789012", "account no: ..."
            bank: Regex::new(r"(?i)\b(?:a/?c|acc(?:oun)?t)(?:\s*(?:no|number))?\.?\s*[:\-]?\s*(\d{9,18})\b")
                .unwrap(),
            email: Regex::new(r"(?i)\b[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}\b").unwrap(),
        }
    }

    /// Extract an intelligence fragment from a single message.
    ///
    /// Pure and total: same text yields the same report, any string is
    /// accepted.
    pub fn extract(&self, message: &str) -> IntelligenceReport {
        let mut report = IntelligenceReport::default();

        for m in self.upi.find_iter(message) {
            report.upi_ids.insert(m.as_str().to_string());
        }
        for m in self.phone.find_iter(message) {
            report.phone_numbers.insert(m.as_str().to_string());
        }
        for m in self.url.find_iter(message) {
            report.urls.insert(m.as_str().to_string());
        }
        for cap in self.bank.captures_iter(message) {
            report.bank_details.insert(cap[1].to_string());
        }
        for m in self.email.find_iter(message) {
            report.email_addresses.insert(m.as_str().to_string());
        }

        report
    }
}

impl Default for IntelligenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_payment_handle() {
        let extractor = IntelligenceExtractor::new();
        let report = extractor.extract("Send your UPI ID to winner@paytm");
        assert!(report.upi_ids.contains("winner@paytm"));
    }

    #[test]
    fn extracts_phone_number() {
        let extractor = IntelligenceExtractor::new();
        let report = extractor.extract("Call me at 9876543210");
        assert!(report.phone_numbers.contains("9876543210"));
    }

    #[test]
    fn extracts_number_behind_country_code() {
        let extractor = IntelligenceExtractor::new();
        // No word boundary before '+', so the match anchors on the digits
        let report = extractor.extract("WhatsApp +91-9876543210 now");
        assert!(report.phone_numbers.contains("9876543210"));
    }

    #[test]
    fn rejects_invalid_phone_prefix() {
        let extractor = IntelligenceExtractor::new();
        // 10 digits starting with 5 is not a valid mobile number
        let report = extractor.extract("ref 5876543210");
        assert!(report.phone_numbers.is_empty());
    }

    #[test]
    fn extracts_urls() {
        let extractor = IntelligenceExtractor::new();
        let report =
            extractor.extract("Visit http://fake-bank.com/verify or www.claim-prize.in today");
        assert!(report.urls.contains("http://fake-bank.com/verify"));
        assert!(report.urls.contains("www.claim-prize.in"));
    }

    #[test]
    fn extracts_bank_account_reference() {
        let extractor = IntelligenceExtractor::new();
        let report = extractor.extract("Deposit to a/c no: 123456789012 immediately");
        assert!(report.bank_details.contains("123456789012"));
    }

    #[test]
    fn email_and_handle_passes_are_independent() {
        let extractor = IntelligenceExtractor::new();
        let report = extractor.extract("Mail scammer@fraud.com or pay victim@upi");

        assert!(report.email_addresses.contains("scammer@fraud.com"));
        assert!(report.upi_ids.contains("victim@upi"));
        // The email also matches the looser handle pattern; per-category
        // dedup only, cross-category duplication is allowed
        assert!(report.upi_ids.contains("scammer@fraud"));
    }

    #[test]
    fn duplicates_collapse_within_category() {
        let extractor = IntelligenceExtractor::new();
        let report = extractor.extract("pay winner@paytm, I said winner@paytm");
        assert_eq!(report.upi_ids.len(), 1);
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = IntelligenceExtractor::new();
        let msg = "winner@paytm 9876543210 http://x.in a/c 123456789 b@c.org";
        assert_eq!(extractor.extract(msg), extractor.extract(msg));
    }

    #[test]
    fn clean_text_yields_empty_report() {
        let extractor = IntelligenceExtractor::new();
        assert!(extractor.extract("Hello, how are you?").is_empty());
    }

    #[test]
    fn merge_is_monotone() {
        let extractor = IntelligenceExtractor::new();
        let mut total = extractor.extract("pay winner@paytm");
        let before = total.upi_ids.len();

        total.merge(&extractor.extract("call 9876543210"));
        assert_eq!(total.upi_ids.len(), before);
        assert!(total.phone_numbers.contains("9876543210"));

        // Re-merging the same fragment changes nothing
        let snapshot = total.clone();
        total.merge(&extractor.extract("call 9876543210"));
        assert_eq!(total, snapshot);
    }
}
