//! # Nickname Table
//!
//! Role → candidate nicknames. Shared by the mock resolver and by callers
//! that decorate a remote outcome, so both paths draw from the same lists.

use super::entities::Role;
use super::errors::ConfigError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Used when the role is outside the accepted set.
pub const GENERIC_NICKNAME: &str = "GenFren Champion";

const DEFAULT_NICKNAMES: [(Role, [&str; 5]); 6] = [
    (
        Role::Neuron,
        [
            "Neural Ninja",
            "Net Navigator",
            "Neuron Knight",
            "Signal Sender",
            "Brain Cell Boss",
        ],
    ),
    (
        Role::SynapseIntern,
        [
            "Synapse Starter",
            "Connection Cadet",
            "Link Learner",
            "Junction Junior",
            "Gap Guru",
        ],
    ),
    (
        Role::Synapse,
        [
            "Synapse Surfer",
            "Connection Commander",
            "Bridge Builder",
            "Gap Guardian",
            "Link Legend",
        ],
    ),
    (
        Role::BrainIntern,
        [
            "Brain Buddy",
            "Cortex Cadet",
            "Think Tank Trainee",
            "Mind Mender",
            "Neuron Newbie",
        ],
    ),
    (
        Role::Brain,
        [
            "Brain Boss",
            "Cortex Captain",
            "Mind Master",
            "Think Tank",
            "Neural Network",
        ],
    ),
    (
        Role::Singularity,
        [
            "Singularity Sage",
            "AI Architect",
            "Future Fusion",
            "Ultimate Unified",
            "Omega Operator",
        ],
    ),
];

/// Validated role → nickname mapping.
///
/// Construction fails unless every [`Role`] has at least one candidate.
#[derive(Debug, Clone)]
pub struct NicknameTable {
    entries: BTreeMap<Role, Vec<String>>,
}

impl NicknameTable {
    /// Build from explicit entries. Later entries for the same role replace
    /// earlier ones.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (Role, Vec<S>)>,
        S: Into<String>,
    {
        let entries: BTreeMap<Role, Vec<String>> = entries
            .into_iter()
            .map(|(role, names)| (role, names.into_iter().map(Into::into).collect()))
            .collect();

        for role in Role::ALL {
            match entries.get(&role) {
                Some(names) if !names.is_empty() => {}
                _ => return Err(ConfigError::MissingNicknames(role.as_str().to_string())),
            }
        }

        Ok(Self { entries })
    }

    /// Candidates for a role, in table order.
    pub fn candidates(&self, role: Role) -> &[String] {
        // Construction guarantees every role is present
        self.entries.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pick uniformly from the role's list; `None` yields [`GENERIC_NICKNAME`].
    pub fn pick<R: Rng + ?Sized>(&self, role: Option<Role>, rng: &mut R) -> String {
        role.and_then(|role| self.candidates(role).choose(rng))
            .cloned()
            .unwrap_or_else(|| GENERIC_NICKNAME.to_string())
    }
}

impl Default for NicknameTable {
    fn default() -> Self {
        let entries = DEFAULT_NICKNAMES
            .iter()
            .map(|(role, names)| (*role, names.iter().map(|n| n.to_string()).collect()))
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_table_covers_every_role() {
        let table = NicknameTable::default();
        for role in Role::ALL {
            assert_eq!(table.candidates(role).len(), 5, "role {}", role);
        }
    }

    #[test]
    fn test_default_entries_pass_validation() {
        let entries = DEFAULT_NICKNAMES
            .iter()
            .map(|(role, names)| (*role, names.to_vec()));
        assert!(NicknameTable::from_entries(entries).is_ok());
    }

    #[test]
    fn test_missing_role_fails_construction() {
        let entries = vec![(Role::Neuron, vec!["Only Neuron"])];
        let err = NicknameTable::from_entries(entries).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingNicknames("synapse intern".to_string())
        );
    }

    #[test]
    fn test_empty_list_fails_construction() {
        let entries = Role::ALL.into_iter().map(|role| {
            let names: Vec<&str> = if role == Role::Brain { vec![] } else { vec!["X"] };
            (role, names)
        });
        assert!(matches!(
            NicknameTable::from_entries(entries),
            Err(ConfigError::MissingNicknames(r)) if r == "brain"
        ));
    }

    #[test]
    fn test_pick_draws_from_role_list() {
        let table = NicknameTable::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let nick = table.pick(Some(Role::Singularity), &mut rng);
            assert!(table.candidates(Role::Singularity).contains(&nick));
        }
    }

    #[test]
    fn test_pick_unknown_role_is_generic() {
        let table = NicknameTable::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(table.pick(None, &mut rng), GENERIC_NICKNAME);
    }
}
