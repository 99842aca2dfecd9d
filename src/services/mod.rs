//! External service clients

pub mod insight;

pub use insight::{InsightClient, MemberSummary, FALLBACK_INSIGHT, MISSING_KEY_INSIGHT};
