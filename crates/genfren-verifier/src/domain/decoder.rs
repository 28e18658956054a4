//! # Result Decoder
//!
//! Turns the contract's raw return bytes into a [`VerificationOutcome`].
//!
//! Two stages, selected explicitly rather than by unwinding:
//!
//! 1. **Strict**: the bytes decode as calldata. A map yields `verified`,
//!    `verdict` and `reason` from whichever keys are present.
//! 2. **Heuristic**: anything else is read as lossy UTF-8 text and scanned
//!    for verdict words and a `reason` fragment.
//!
//! Decoding is total. Both stages normalise so the verdict decides
//! `verified`.

use super::calldata::{self, CalldataValue};
use super::entities::{Verdict, VerificationOutcome};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

static REASON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)reason[^0-9A-Za-z_]*([0-9A-Za-z_\s:]+)").expect("invalid reason pattern")
});

/// Decode result tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Payload was well-formed calldata
    Strict(VerificationOutcome),
    /// Payload was scanned as text
    Heuristic(VerificationOutcome),
}

impl Decoded {
    pub fn outcome(&self) -> &VerificationOutcome {
        match self {
            Decoded::Strict(outcome) | Decoded::Heuristic(outcome) => outcome,
        }
    }

    pub fn into_outcome(self) -> VerificationOutcome {
        match self {
            Decoded::Strict(outcome) | Decoded::Heuristic(outcome) => outcome,
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Decoded::Strict(_))
    }

    /// Label for logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            Decoded::Strict(_) => "strict",
            Decoded::Heuristic(_) => "heuristic",
        }
    }
}

/// Stateless decoder. See module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultDecoder;

impl ResultDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, raw: &[u8]) -> Decoded {
        match calldata::decode(raw) {
            Ok(value) => Decoded::Strict(from_value(&value)),
            Err(err) => {
                debug!(error = %err, len = raw.len(), "Strict decode failed, scanning as text");
                Decoded::Heuristic(from_text(&String::from_utf8_lossy(raw)))
            }
        }
    }
}

/// Shorthand for `ResultDecoder::new().decode(raw)`.
pub fn decode(raw: &[u8]) -> Decoded {
    ResultDecoder.decode(raw)
}

fn from_value(value: &CalldataValue) -> VerificationOutcome {
    match value.as_map() {
        Some(map) => from_map(map),
        None => VerificationOutcome::default(),
    }
}

fn from_map(map: &BTreeMap<String, CalldataValue>) -> VerificationOutcome {
    let verified = map.get("verified").and_then(CalldataValue::as_bool);
    let label = map.get("verdict").and_then(CalldataValue::as_str);
    let reason = map
        .get("reason")
        .and_then(CalldataValue::as_str)
        .unwrap_or("");

    let verdict = match (label, verified) {
        (Some(label), _) => Verdict::from_label(label),
        (None, Some(true)) => Verdict::Verified,
        (None, Some(false)) => Verdict::Rejected,
        (None, None) => Verdict::Unknown,
    };

    VerificationOutcome::new(verdict, reason)
}

fn from_text(text: &str) -> VerificationOutcome {
    let upper = text.to_uppercase();

    // "REJECTED" dominates "verified", which the verdict then carries
    let verdict = if upper.contains("REJECTED") {
        Verdict::Rejected
    } else if upper.contains("VERIFIED") {
        Verdict::Verified
    } else {
        Verdict::Unknown
    };

    let reason = REASON_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or("");

    VerificationOutcome::new(verdict, reason)
}
