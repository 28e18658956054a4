//! # Mock Resolver
//!
//! Local stand-in for the remote verifier. Used as the fallback whenever the
//! gateway fails, and by the standalone mock endpoint.
//!
//! Selection is random on every call. That is card flavour, not a security
//! property; tests pass a seeded `Rng`.

use super::entities::{Role, Verdict, VerificationOutcome, VerificationRequest};
use super::nicknames::NicknameTable;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Reason attached to every rejected mock outcome.
pub const INVALID_INPUT_REASON: &str = "Invalid name or role provided.";

const REASON_PHRASES: [&str; 4] = [
    "is original and appropriate",
    "looks good",
    "verified successfully",
    "seems legitimate",
];

/// Deterministic-rule resolver with random flavour text.
#[derive(Debug, Clone, Default)]
pub struct MockResolver {
    nicknames: NicknameTable,
}

impl MockResolver {
    pub fn new(nicknames: NicknameTable) -> Self {
        Self { nicknames }
    }

    pub fn nicknames(&self) -> &NicknameTable {
        &self.nicknames
    }

    /// Resolve with the thread-local RNG.
    pub fn resolve(&self, name: &str, role: &str) -> VerificationOutcome {
        self.resolve_with(name, role, &mut rand::thread_rng())
    }

    pub fn resolve_request(&self, request: &VerificationRequest) -> VerificationOutcome {
        self.resolve(request.name(), request.role_label())
    }

    /// Nickname for an outcome produced elsewhere, drawn from the same table.
    /// `None` yields the generic nickname.
    pub fn nickname_for(&self, role: Option<Role>) -> String {
        self.nicknames.pick(role, &mut rand::thread_rng())
    }

    /// Resolve with an explicit random source.
    ///
    /// Rejected when `name` is empty or `role` is outside the accepted set;
    /// otherwise verified with a nickname from the role's list and a reason of
    /// the form `"{name} {phrase}."`.
    pub fn resolve_with<R: Rng + ?Sized>(
        &self,
        name: &str,
        role: &str,
        rng: &mut R,
    ) -> VerificationOutcome {
        let role = match Role::parse(role) {
            Some(role) if !name.is_empty() => role,
            _ => return VerificationOutcome::rejected(INVALID_INPUT_REASON),
        };

        let nickname = self.nicknames.pick(Some(role), rng);
        let phrase = REASON_PHRASES
            .choose(rng)
            .copied()
            .unwrap_or(REASON_PHRASES[0]);

        VerificationOutcome::verified(format!("{} {}.", name, phrase)).with_nickname(nickname)
    }
}

// =============================================================================
// SIMPLE MOCK ENDPOINT RULE
// =============================================================================

/// Body of the standalone mock endpoint. No nickname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleVerdict {
    pub verified: bool,
    pub verdict: Verdict,
    pub reason: String,
}

impl SimpleVerdict {
    fn rejected(reason: &str) -> Self {
        Self {
            verified: false,
            verdict: Verdict::Rejected,
            reason: reason.to_string(),
        }
    }
}

/// Minimum trimmed name length accepted by the simple rule.
const MIN_NAME_CHARS: usize = 3;

/// Simple rule: reject a missing or blank name, reject a trimmed name shorter
/// than three characters, otherwise verify.
pub fn simple_mock_verdict(name: Option<&str>) -> SimpleVerdict {
    let trimmed = name.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return SimpleVerdict::rejected("Empty name");
    }
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return SimpleVerdict::rejected("Name too short");
    }
    SimpleVerdict {
        verified: true,
        verdict: Verdict::Verified,
        reason: "Mock verified".to_string(),
    }
}
