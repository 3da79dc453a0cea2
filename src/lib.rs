//! Scamtrap — conversational scam honeypot.
//!
//! Receives messages from suspected scammers, classifies intent with static
//! rules, extracts structured intelligence, and keeps the scammer engaged
//! with human-like replies until the engagement terminates and a summary
//! callback fires.

pub mod api;
pub mod callback;
pub mod config;
pub mod detect;
pub mod engage;
pub mod error;
pub mod intel;
pub mod reply;
pub mod session;
