//! # Core Domain Entities
//!
//! The records the coordination core reads and mutates.
//!
//! ## Clusters
//!
//! - **Tenancy**: `Namespace`, `SharedMachine`
//! - **Endpoints**: `Machine`, `RegisterMethod`
//! - **Credentials**: `PreAuthKey`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::host_info::HostInfo;
use crate::json_column::JsonColumn;

/// Unix seconds of `0001-01-01T00:00:00Z`, the wire protocol's zero time.
pub const ZERO_TIME_UNIX_SECS: i64 = -62_135_596_800;

/// The zero timestamp used where the wire format forbids an absent time.
#[must_use]
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_UNIX_SECS, 0).unwrap_or_default()
}

/// Whether `t` is the wire zero time.
#[must_use]
pub fn is_zero_time(t: &DateTime<Utc>) -> bool {
    t.timestamp() == ZERO_TIME_UNIX_SECS
}

// =============================================================================
// CLUSTER A: TENANCY
// =============================================================================

/// An isolation boundary grouping machines and sharing grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Stable numeric identity.
    pub id: u64,
    /// Unique name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Namespace {
    /// Create a namespace record.
    pub fn new(id: u64, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at,
        }
    }
}

/// A directed grant making `machine` visible to every machine in `namespace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedMachine {
    /// Grant identity.
    pub id: u64,
    /// The shared machine, with its own namespace loaded.
    pub machine: Machine,
    /// The namespace the machine is shared into.
    pub namespace: Namespace,
}

// =============================================================================
// CLUSTER B: CREDENTIALS
// =============================================================================

/// A pre-authorised registration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreAuthKey {
    /// Stable numeric identity.
    pub id: u64,
    /// Secret key text.
    pub key: String,
    /// Namespace machines registered with this key join.
    pub namespace: Namespace,
    /// Whether the key may be used more than once.
    pub reusable: bool,
    /// Whether machines registered with it are removed when they go offline.
    pub ephemeral: bool,
    /// Whether a single-use key has been consumed.
    pub used: bool,
    /// When the key stops being accepted.
    pub expiration: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// CLUSTER C: ENDPOINTS
// =============================================================================

/// How a machine was registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegisterMethod {
    /// Not registered yet.
    #[default]
    Unspecified,
    /// Registered with a pre-authorised key.
    AuthKey,
    /// Registered by an operator from the command line.
    Cli,
    /// Registered through an OpenID Connect login.
    Oidc,
}

impl RegisterMethod {
    /// Storage text for this method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::AuthKey => "authKey",
            Self::Cli => "cli",
            Self::Oidc => "oidc",
        }
    }
}

/// A registered network endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    /// Stable numeric identity.
    pub id: u64,
    /// Long-lived identity key, hex encoded. Globally unique.
    pub machine_key: String,
    /// Rotating session key, hex encoded.
    pub node_key: String,
    /// Discovery key, hex encoded; empty when the client has not sent one.
    pub disco_key: String,
    /// Assigned overlay address; empty until registered.
    pub ip_address: String,
    /// Name, unique within the namespace.
    pub name: String,
    /// Owning namespace.
    pub namespace: Namespace,
    /// Whether registration has completed.
    pub registered: bool,
    /// How registration happened.
    pub register_method: RegisterMethod,
    /// Credential used at registration.
    pub auth_key: Option<PreAuthKey>,
    /// Last poll.
    pub last_seen: Option<DateTime<Utc>>,
    /// Last network map successfully delivered to this machine.
    pub last_successful_update: Option<DateTime<Utc>>,
    /// When the registration expires.
    pub expiry: Option<DateTime<Utc>>,
    /// Expiry asked for by the client.
    pub requested_expiry: Option<DateTime<Utc>>,
    /// Client-reported host metadata.
    pub host_info: JsonColumn<HostInfo>,
    /// Observed network endpoints ("ip:port").
    pub endpoints: JsonColumn<Vec<String>>,
    /// Administratively enabled routes, as prefix strings.
    pub enabled_routes: JsonColumn<Vec<String>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Machine {
    /// A fresh, unregistered machine as created by the registration handshake.
    pub fn new(
        id: u64,
        machine_key: impl Into<String>,
        name: impl Into<String>,
        namespace: Namespace,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            machine_key: machine_key.into(),
            node_key: String::new(),
            disco_key: String::new(),
            ip_address: String::new(),
            name: name.into(),
            namespace,
            registered: false,
            register_method: RegisterMethod::Unspecified,
            auth_key: None,
            last_seen: None,
            last_successful_update: None,
            expiry: None,
            requested_expiry: None,
            host_info: JsonColumn::empty(),
            endpoints: JsonColumn::empty(),
            enabled_routes: JsonColumn::empty(),
            created_at,
            updated_at: created_at,
            deleted_at: None,
        }
    }

    /// Identity of the owning namespace.
    #[must_use]
    pub fn namespace_id(&self) -> u64 {
        self.namespace.id
    }

    /// Whether registration has already completed.
    #[must_use]
    pub fn is_already_registered(&self) -> bool {
        self.registered
    }

    /// Whether the registration has lapsed at `now`.
    ///
    /// A machine without a recorded expiry counts as expired so the expiry
    /// policy assigns it a bounded one.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now > expiry,
            None => true,
        }
    }

    /// Whether the row carries a soft-delete marker.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Renders a machine list as `[ a, b ](2)` for logs.
pub struct MachineNames<'a>(pub &'a [Machine]);

impl fmt::Display for MachineNames<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|m| m.name.as_str()).collect();
        write!(f, "[ {} ]({})", names.join(", "), names.len())
    }
}
