//! Seed resolution
//!
//! Seeds control every deterministic strategy: the same value under the same
//! resolved seed anonymizes identically everywhere it appears, which is what
//! keeps foreign keys joinable after anonymization. Resolution is strictly
//! ordered so operators can opt a single column out of the shared seed by
//! setting a rule-level seed.
//!
//! Precedence, highest to lowest:
//! 1. Seed set on the individual rule/strategy config
//! 2. The profile's `global_seed`
//! 3. The run-supplied seed from an environment variable
//!
//! When no tier produces a seed, resolution fails. There is no quiet
//! fallback to randomness: a nondeterministic "anonymization" would silently
//! break cross-table consistency.

use crate::config::{secret_from_env, SecretString};
use crate::domain::{CloakError, Result};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

/// Resolves a seed from the three precedence tiers.
///
/// This function is total and side-effect-free: it either returns the
/// highest-precedence seed present or a definite `SeedUnavailable` error.
///
/// # Examples
///
/// ```
/// use cloak::anonymization::seed::resolve_seed;
///
/// assert_eq!(resolve_seed(Some(1), Some(2), Some(3)).unwrap(), 1);
/// assert_eq!(resolve_seed(None, Some(2), Some(3)).unwrap(), 2);
/// assert_eq!(resolve_seed(None, None, Some(3)).unwrap(), 3);
/// assert!(resolve_seed(None, None, None).is_err());
/// ```
pub fn resolve_seed(
    rule_seed: Option<i64>,
    profile_seed: Option<i64>,
    run_seed: Option<i64>,
) -> Result<i64> {
    rule_seed
        .or(profile_seed)
        .or(run_seed)
        .ok_or_else(|| {
            CloakError::SeedUnavailable(
                "no rule seed, profile global_seed, or run-supplied seed was provided".to_string(),
            )
        })
}

/// The three seed tiers visible when a strategy is constructed.
///
/// Strategies that require determinism call [`SeedContext::require`], which
/// applies the precedence order and fails when every tier is empty.
/// Strategies that don't need a seed simply never ask for one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedContext {
    pub rule_seed: Option<i64>,
    pub profile_seed: Option<i64>,
    pub run_seed: Option<i64>,
}

impl SeedContext {
    /// Resolves the seed, failing when no tier provides one.
    pub fn require(&self) -> Result<i64> {
        resolve_seed(self.rule_seed, self.profile_seed, self.run_seed)
    }

    /// Resolves the seed if any tier provides one.
    pub fn resolve(&self) -> Option<i64> {
        self.rule_seed.or(self.profile_seed).or(self.run_seed)
    }
}

/// Derives an i64 seed from arbitrary text.
///
/// Used when the environment supplies a passphrase-style seed rather than
/// an integer. The derivation is a SHA-256 digest truncated to 8 bytes, so
/// the same text always yields the same seed.
pub fn derive_seed(text: &str) -> i64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(bytes)
}

/// The run-supplied seed tier, read once per run from the environment.
///
/// The raw value is held as a secret and never serialized or logged; only
/// its resolved effect (the anonymized output) is observable externally.
pub struct SeedSource {
    value: Option<SecretString>,
}

impl SeedSource {
    /// Reads the seed source from an environment variable.
    ///
    /// An unset or empty variable yields an empty source, which simply
    /// leaves the run tier unavailable.
    pub fn from_env(var: &str) -> Self {
        Self {
            value: secret_from_env(var),
        }
    }

    /// A source with no seed, for runs that rely on profile seeds alone.
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Resolves the run seed: an integer value parses directly, anything
    /// else is hash-derived via [`derive_seed`].
    pub fn resolve(&self) -> Option<i64> {
        self.value.as_ref().map(|secret| {
            let raw = secret.expose_secret();
            raw.parse::<i64>().unwrap_or_else(|_| derive_seed(raw.as_ref()))
        })
    }
}
