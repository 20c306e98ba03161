//! # Administrative Views
//!
//! Transfer objects for the management API. Optional timestamps are left
//! out of the encoding when unset rather than zero-filled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{routes_to_strings, Machine, MeshResult, Namespace, PreAuthKey};

/// Namespace as reported by the management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceView {
    /// Decimal id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Namespace> for NamespaceView {
    fn from(ns: &Namespace) -> Self {
        Self {
            id: ns.id.to_string(),
            name: ns.name.clone(),
            created_at: ns.created_at,
        }
    }
}

/// Pre-authorised key as reported by the management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreAuthKeyView {
    /// Owning namespace name.
    pub namespace: String,
    /// Decimal id.
    pub id: String,
    /// Key text.
    pub key: String,
    /// Multi-use key.
    pub reusable: bool,
    /// Ephemeral registrations.
    pub ephemeral: bool,
    /// Consumed.
    pub used: bool,
    /// Expiry, when set.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expiration: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&PreAuthKey> for PreAuthKeyView {
    fn from(key: &PreAuthKey) -> Self {
        Self {
            namespace: key.namespace.name.clone(),
            id: key.id.to_string(),
            key: key.key.clone(),
            reusable: key.reusable,
            ephemeral: key.ephemeral,
            used: key.used,
            expiration: key.expiration,
            created_at: key.created_at,
        }
    }
}

/// Machine as reported by the management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineView {
    /// Numeric id.
    pub id: u64,
    /// Hex identity key.
    pub machine_key: String,
    /// Hex session key.
    pub node_key: String,
    /// Hex discovery key.
    pub disco_key: String,
    /// Overlay address.
    pub ip_address: String,
    /// Name.
    pub name: String,
    /// Owning namespace.
    pub namespace: NamespaceView,
    /// Registration flag.
    pub registered: bool,
    /// How registration happened; empty when unregistered.
    pub register_method: String,
    /// Credential used at registration.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pre_auth_key: Option<PreAuthKeyView>,
    /// Last poll.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_seen: Option<DateTime<Utc>>,
    /// Last delivered map.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_successful_update: Option<DateTime<Utc>>,
    /// Registration expiry.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expiry: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Machine> for MachineView {
    fn from(m: &Machine) -> Self {
        Self {
            id: m.id,
            machine_key: m.machine_key.clone(),
            node_key: m.node_key.clone(),
            disco_key: m.disco_key.clone(),
            ip_address: m.ip_address.clone(),
            name: m.name.clone(),
            namespace: NamespaceView::from(&m.namespace),
            registered: m.registered,
            register_method: m.register_method.as_str().to_string(),
            pre_auth_key: m.auth_key.as_ref().map(PreAuthKeyView::from),
            last_seen: m.last_seen,
            last_successful_update: m.last_successful_update,
            expiry: m.expiry,
            created_at: m.created_at,
        }
    }
}

/// Advertised and enabled routes of one machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesView {
    /// Routes offered in host metadata.
    pub advertised_routes: Vec<String>,
    /// Routes propagated to peers.
    pub enabled_routes: Vec<String>,
}

impl RoutesView {
    /// Decode both route sets of `machine`.
    pub fn from_machine(machine: &Machine) -> MeshResult<Self> {
        Ok(Self {
            advertised_routes: routes_to_strings(&machine.advertised_routes()?),
            enabled_routes: routes_to_strings(&machine.enabled_route_prefixes()?),
        })
    }
}
