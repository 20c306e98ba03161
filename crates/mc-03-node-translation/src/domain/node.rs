//! # Wire Node Descriptor
//!
//! The peer advertisement clients receive in their network map. Field names
//! and encodings follow the client protocol exactly.

use chrono::{DateTime, Utc};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use shared_types::{DiscoKey, HostInfo, MachineKey, NodeKey};

/// Address prefix of the relay hint; not a routable address.
pub const DERP_MAGIC_IP: &str = "127.3.3.40";

/// Capability granting file sharing between nodes.
pub const CAPABILITY_FILE_SHARING: &str = "https://tailscale.com/cap/file-sharing";

/// Relay hint for a preferred relay region; `0` means unknown.
pub fn derp_hint(region: i64) -> String {
    format!("{DERP_MAGIC_IP}:{region}")
}

/// A machine as advertised to peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Node {
    /// Numeric machine id.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Decimal rendering of the id; ids never change.
    #[serde(rename = "StableID")]
    pub stable_id: String,
    /// Plain or DNS-qualified name.
    pub name: String,
    /// Owning namespace id.
    pub user: u64,
    /// Session key.
    pub key: NodeKey,
    /// Registration expiry; the zero time when unset.
    pub key_expiry: DateTime<Utc>,
    /// Identity key.
    pub machine: MachineKey,
    /// Discovery key; zero when the client has not sent one.
    pub disco_key: DiscoKey,
    /// Overlay host prefixes (IPv4 only).
    pub addresses: Vec<IpNet>,
    /// Host prefix followed by any propagated routes.
    #[serde(rename = "AllowedIPs")]
    pub allowed_ips: Vec<IpNet>,
    /// Observed endpoints, "ip:port".
    pub endpoints: Vec<String>,
    /// Relay hint.
    #[serde(rename = "DERP")]
    pub derp: String,
    /// Host metadata.
    pub hostinfo: HostInfo,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last poll, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_seen: Option<DateTime<Utc>>,
    /// Always true.
    pub keep_alive: bool,
    /// Mirrors the registration flag.
    pub machine_authorized: bool,
    /// Granted capabilities.
    pub capabilities: Vec<String>,
}
