//! # Domain Entities
//!
//! Requests, outcomes and the closed role set.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// =============================================================================
// ROLE
// =============================================================================

/// The six accepted card roles.
///
/// Wire names are lowercase and may contain a space (`"synapse intern"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "neuron")]
    Neuron,
    #[serde(rename = "synapse intern")]
    SynapseIntern,
    #[serde(rename = "synapse")]
    Synapse,
    #[serde(rename = "brain intern")]
    BrainIntern,
    #[serde(rename = "brain")]
    Brain,
    #[serde(rename = "singularity")]
    Singularity,
}

impl Role {
    /// Every role, in ladder order.
    pub const ALL: [Role; 6] = [
        Role::Neuron,
        Role::SynapseIntern,
        Role::Synapse,
        Role::BrainIntern,
        Role::Brain,
        Role::Singularity,
    ];

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Neuron => "neuron",
            Role::SynapseIntern => "synapse intern",
            Role::Synapse => "synapse",
            Role::BrainIntern => "brain intern",
            Role::Brain => "brain",
            Role::Singularity => "singularity",
        }
    }

    /// Exact-match lookup. No trimming, no case folding.
    pub fn parse(label: &str) -> Option<Role> {
        Self::ALL.into_iter().find(|role| role.as_str() == label)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// VERDICT
// =============================================================================

/// Three-way classification of a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Verified,
    Rejected,
    #[default]
    Unknown,
}

impl Verdict {
    /// Map a verdict label from the remote contract.
    ///
    /// The contract may emit labels outside the closed set (e.g. `SIMILAR`);
    /// those collapse to `Unknown`.
    pub fn from_label(label: &str) -> Verdict {
        let label = label.trim();
        if label.eq_ignore_ascii_case("VERIFIED") {
            Verdict::Verified
        } else if label.eq_ignore_ascii_case("REJECTED") {
            Verdict::Rejected
        } else {
            Verdict::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Verified => "VERIFIED",
            Verdict::Rejected => "REJECTED",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// A single card submission.
///
/// The role is kept as submitted; membership in the accepted set is checked
/// by whoever consumes the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    name: String,
    role: String,
}

impl VerificationRequest {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The role label exactly as submitted.
    pub fn role_label(&self) -> &str {
        &self.role
    }

    /// The role, if it belongs to the accepted set.
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of resolving a [`VerificationRequest`].
///
/// Invariant: `verified == (verdict == Verdict::Verified)`. Every constructor
/// derives `verified` from the verdict, including deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OutcomeWire")]
pub struct VerificationOutcome {
    verified: bool,
    verdict: Verdict,
    reason: String,
    #[serde(serialize_with = "nickname_or_empty")]
    nickname: Option<String>,
}

impl VerificationOutcome {
    pub fn new(verdict: Verdict, reason: impl Into<String>) -> Self {
        Self {
            verified: verdict == Verdict::Verified,
            verdict,
            reason: reason.into(),
            nickname: None,
        }
    }

    pub fn verified(reason: impl Into<String>) -> Self {
        Self::new(Verdict::Verified, reason)
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::new(Verdict::Rejected, reason)
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::new(Verdict::Unknown, reason)
    }

    /// Attach a nickname. Replaces any previous one.
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }
}

impl Default for VerificationOutcome {
    fn default() -> Self {
        Self::unknown(String::new())
    }
}

/// Presentation layer expects `nickname: ""` rather than a missing key.
fn nickname_or_empty<S>(nickname: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(nickname.as_deref().unwrap_or(""))
}

#[derive(Deserialize)]
struct OutcomeWire {
    #[serde(default)]
    verdict: Verdict,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    nickname: Option<String>,
}

impl From<OutcomeWire> for VerificationOutcome {
    fn from(wire: OutcomeWire) -> Self {
        let outcome = VerificationOutcome::new(wire.verdict, wire.reason);
        match wire.nickname.filter(|n| !n.is_empty()) {
            Some(nickname) => outcome.with_nickname(nickname),
            None => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_exact() {
        assert_eq!(Role::parse("neuron"), Some(Role::Neuron));
        assert_eq!(Role::parse("synapse intern"), Some(Role::SynapseIntern));
        assert_eq!(Role::parse("Neuron"), None);
        assert_eq!(Role::parse(" brain"), None);
        assert_eq!(Role::parse("molecule"), None);
    }

    #[test]
    fn test_role_wire_names_roundtrip_through_serde() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::from_label("VERIFIED"), Verdict::Verified);
        assert_eq!(Verdict::from_label("rejected"), Verdict::Rejected);
        assert_eq!(Verdict::from_label("SIMILAR"), Verdict::Unknown);
        assert_eq!(Verdict::from_label(""), Verdict::Unknown);
    }

    #[test]
    fn test_outcome_invariant() {
        assert!(VerificationOutcome::verified("ok").is_verified());
        assert!(!VerificationOutcome::rejected("no").is_verified());
        assert!(!VerificationOutcome::unknown("").is_verified());
    }

    #[test]
    fn test_outcome_serializes_empty_nickname() {
        let outcome = VerificationOutcome::rejected("Invalid name or role provided.");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["verified"], false);
        assert_eq!(json["verdict"], "REJECTED");
        assert_eq!(json["nickname"], "");
    }

    #[test]
    fn test_outcome_deserialize_recomputes_verified() {
        let outcome: VerificationOutcome = serde_json::from_str(
            r#"{"verified": true, "verdict": "REJECTED", "reason": "spam", "nickname": ""}"#,
        )
        .unwrap();
        assert!(!outcome.is_verified());
        assert_eq!(outcome.nickname(), None);
    }
}
