//! # Translation Configuration
//!
//! Network-wide context the translator needs: the base domain and the part of
//! the DNS configuration that affects node naming.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// DNS settings pushed to clients.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    /// Whether clients resolve peers by qualified name (MagicDNS).
    pub proxied: bool,
    /// Upstream resolvers.
    pub nameservers: Vec<IpAddr>,
    /// Search domains.
    pub domains: Vec<String>,
}

/// Per-network translation context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationContext {
    /// Suffix of qualified node names.
    pub base_domain: String,
    /// DNS settings, if any are configured.
    pub dns_config: Option<DnsConfig>,
}

impl TranslationContext {
    /// Create a context.
    pub fn new(base_domain: impl Into<String>, dns_config: Option<DnsConfig>) -> Self {
        Self {
            base_domain: base_domain.into(),
            dns_config,
        }
    }

    /// Create a context for testing (proxied DNS under `example.com`).
    pub fn for_testing() -> Self {
        Self::new(
            "example.com",
            Some(DnsConfig {
                proxied: true,
                ..DnsConfig::default()
            }),
        )
    }

    /// Whether node names are qualified with namespace and base domain.
    pub fn magic_dns(&self) -> bool {
        self.dns_config.as_ref().is_some_and(|dns| dns.proxied)
    }
}
