//! # Host Metadata
//!
//! The host description a client reports on every poll. Field names follow
//! the client's JSON encoding; keys this crate does not model are kept in
//! `extra` so a decoded record re-encodes without loss.

use ipnet::IpNet;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// An explicit `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Client-reported host metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostInfo {
    /// Client version string.
    #[serde(rename = "IPNVersion", skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub ipn_version: String,
    /// Frontend log identifier.
    #[serde(rename = "FrontendLogID", skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub frontend_log_id: String,
    /// Backend log identifier.
    #[serde(rename = "BackendLogID", skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub backend_log_id: String,
    /// Operating system.
    #[serde(rename = "OS", deserialize_with = "null_as_default")]
    pub os: String,
    /// Operating system version.
    #[serde(rename = "OSVersion", skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub os_version: String,
    /// Host name as seen by the client.
    #[serde(rename = "Hostname", deserialize_with = "null_as_default")]
    pub hostname: String,
    /// Runtime architecture.
    #[serde(rename = "GoArch", skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub arch: String,
    /// Subnets this host offers to route.
    #[serde(rename = "RoutableIPs", skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub routable_ips: Vec<IpNet>,
    /// ACL tags the host asks for.
    #[serde(rename = "RequestTags", skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub request_tags: Vec<String>,
    /// Services listening on the host.
    #[serde(rename = "Services", skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub services: Vec<Service>,
    /// Network conditions observed by the client.
    #[serde(rename = "NetInfo", skip_serializing_if = "Option::is_none")]
    pub net_info: Option<NetInfo>,
    /// Keys not modelled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A listening service advertised in host metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    /// "tcp" or "udp".
    #[serde(rename = "Proto", deserialize_with = "null_as_default")]
    pub proto: String,
    /// Listening port.
    #[serde(rename = "Port", deserialize_with = "null_as_default")]
    pub port: u16,
    /// Free-form description.
    #[serde(rename = "Description", skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub description: String,
    /// Keys not modelled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Network conditions reported by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetInfo {
    /// Whether NAT mappings vary by destination.
    #[serde(rename = "MappingVariesByDestIP", skip_serializing_if = "Option::is_none")]
    pub mapping_varies_by_dest_ip: Option<bool>,
    /// Whether the router supports hairpinning.
    #[serde(rename = "HairPinning", skip_serializing_if = "Option::is_none")]
    pub hair_pinning: Option<bool>,
    /// Whether IPv6 works.
    #[serde(rename = "WorkingIPv6", skip_serializing_if = "Option::is_none")]
    pub working_ipv6: Option<bool>,
    /// Whether UDP works.
    #[serde(rename = "WorkingUDP", skip_serializing_if = "Option::is_none")]
    pub working_udp: Option<bool>,
    /// Preferred relay region, 0 when unknown.
    #[serde(rename = "PreferredDERP", deserialize_with = "null_as_default")]
    pub preferred_derp: i64,
    /// Link type ("wired", "wifi", ...).
    #[serde(rename = "LinkType", skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub link_type: String,
    /// Measured latency per relay region, in seconds.
    #[serde(rename = "DERPLatency", skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "null_as_default")]
    pub derp_latency: BTreeMap<String, f64>,
    /// Keys not modelled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}
