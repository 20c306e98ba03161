//! # Expiry Policy
//!
//! Bounds the registration lifetime a client may ask for. A compromised
//! credential can at most keep its machine registered until `now + max`.

use chrono::{DateTime, Duration, Utc};
use shared_types::{is_zero_time, Machine};

use crate::config::RegistryConfig;

/// Which rule produced a new expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryDecision {
    /// The request exceeded the maximum and was clamped.
    Max,
    /// No expiry was requested; the default lifetime applies.
    Default,
    /// The request was within bounds and used as is.
    Requested,
}

impl ExpiryDecision {
    /// Metric label for this decision.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Default => "default",
            Self::Requested => "requested",
        }
    }
}

/// Registration lifetime bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    max: Duration,
    default: Duration,
}

impl ExpiryPolicy {
    /// Policy with explicit bounds.
    pub fn new(max: Duration, default: Duration) -> Self {
        Self { max, default }
    }

    /// Policy from registry configuration.
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.max_registration(), config.default_registration())
    }

    /// Compute the expiry for a client that asked for `requested` at `now`.
    ///
    /// An absent or zero request gets the default lifetime.
    pub fn decide(
        &self,
        requested: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> (DateTime<Utc>, ExpiryDecision) {
        let max_expiry = offset(now, self.max);
        let default_expiry = offset(now, self.default);

        match requested {
            Some(req) if req > max_expiry => (max_expiry, ExpiryDecision::Max),
            Some(req) if !is_zero_time(&req) => (req, ExpiryDecision::Requested),
            _ => (default_expiry, ExpiryDecision::Default),
        }
    }

    /// Recompute `machine.expiry` if the registration has lapsed.
    ///
    /// Returns `None`, leaving the machine untouched, when it is still valid.
    pub fn apply(&self, machine: &mut Machine, now: DateTime<Utc>) -> Option<ExpiryDecision> {
        if !machine.is_expired(now) {
            return None;
        }
        let (expiry, decision) = self.decide(machine.requested_expiry, now);
        machine.expiry = Some(expiry);
        Some(decision)
    }
}

fn offset(now: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    now.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
