//! # Node Translator
//!
//! Converts stored machine records into the wire node descriptor.
//!
//! Every key, address and JSON column is decoded up front; any failure aborts
//! the translation of that machine, and of the whole list in `to_nodes`.

use ipnet::IpNet;
use mesh_telemetry::metric_inc;
use mesh_telemetry::metrics::NODE_TRANSLATIONS;
use shared_types::{
    zero_time, DiscoKey, Machine, MachineKey, MeshError, MeshResult, NodeKey,
};
use tracing::{trace, warn};

use crate::config::{DnsConfig, TranslationContext};
use crate::domain::{derp_hint, Node, CAPABILITY_FILE_SHARING};

/// Name a machine is advertised under: `name.namespace.base_domain` when DNS
/// is proxied, the bare name otherwise.
pub fn node_name(machine: &Machine, base_domain: &str, dns_config: Option<&DnsConfig>) -> String {
    match dns_config {
        Some(dns) if dns.proxied => {
            format!("{}.{}.{}", machine.name, machine.namespace.name, base_domain)
        }
        _ => machine.name.clone(),
    }
}

fn host_prefix(ip_address: &str) -> MeshResult<IpNet> {
    format!("{ip_address}/32").parse::<IpNet>().map_err(|e| {
        trace!(ip = ip_address, "Failed to parse IP prefix from IP");
        MeshError::InvalidAddress(format!("{ip_address:?}: {e}"))
    })
}

/// Translate one machine.
///
/// With `include_routes` the enabled routes follow the host prefix in
/// `allowed_ips`; without it only the host prefix is allowed.
pub fn to_node(
    machine: &Machine,
    base_domain: &str,
    dns_config: Option<&DnsConfig>,
    include_routes: bool,
) -> MeshResult<Node> {
    let key = NodeKey::from_hex(&machine.node_key)?;
    let machine_key = MachineKey::from_hex(&machine.machine_key)?;
    let disco_key = if machine.disco_key.is_empty() {
        DiscoKey::default()
    } else {
        DiscoKey::from_hex(&machine.disco_key)?
    };

    let address = host_prefix(&machine.ip_address)?;
    let mut allowed_ips = vec![address];
    if include_routes {
        allowed_ips.extend(machine.enabled_route_prefixes()?);
    }

    let endpoints = machine.endpoint_list()?;
    let hostinfo = machine.host_info()?;
    let derp = derp_hint(hostinfo.net_info.as_ref().map_or(0, |n| n.preferred_derp));

    Ok(Node {
        id: machine.id,
        stable_id: machine.id.to_string(),
        name: node_name(machine, base_domain, dns_config),
        user: machine.namespace_id(),
        key,
        key_expiry: machine.expiry.unwrap_or_else(zero_time),
        machine: machine_key,
        disco_key,
        addresses: vec![address],
        allowed_ips,
        endpoints,
        derp,
        hostinfo,
        created: machine.created_at,
        last_seen: machine.last_seen,
        keep_alive: true,
        machine_authorized: machine.registered,
        capabilities: vec![CAPABILITY_FILE_SHARING.to_string()],
    })
}

/// Translate a list of machines, failing on the first bad record.
pub fn to_nodes(
    machines: &[Machine],
    base_domain: &str,
    dns_config: Option<&DnsConfig>,
    include_routes: bool,
) -> MeshResult<Vec<Node>> {
    machines
        .iter()
        .map(|m| to_node(m, base_domain, dns_config, include_routes))
        .collect()
}

/// Translator bound to one network's naming context.
#[derive(Clone, Debug)]
pub struct NodeTranslator {
    ctx: TranslationContext,
}

impl NodeTranslator {
    /// Create a translator for `ctx`.
    pub fn new(ctx: TranslationContext) -> Self {
        Self { ctx }
    }

    /// The naming context.
    pub fn context(&self) -> &TranslationContext {
        &self.ctx
    }

    /// Translate one machine, recording the outcome.
    pub fn translate(&self, machine: &Machine, include_routes: bool) -> MeshResult<Node> {
        let result = to_node(
            machine,
            &self.ctx.base_domain,
            self.ctx.dns_config.as_ref(),
            include_routes,
        );
        match &result {
            Ok(_) => metric_inc!(NODE_TRANSLATIONS, &["ok"]),
            Err(e) => {
                metric_inc!(NODE_TRANSLATIONS, &["error"]);
                warn!(machine = %machine.name, error = %e, "Cannot translate machine");
            }
        }
        result
    }

    /// Translate a peer list, failing on the first bad record.
    pub fn translate_all(&self, machines: &[Machine], include_routes: bool) -> MeshResult<Vec<Node>> {
        machines
            .iter()
            .map(|m| self.translate(m, include_routes))
            .collect()
    }
}
