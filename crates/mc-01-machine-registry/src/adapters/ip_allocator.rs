//! Sequential IP Allocator
//!
//! Hands out the lowest host address in the prefix not held by any machine.
//! Network and broadcast addresses are never assigned.

use async_trait::async_trait;
use ipnet::IpNet;
use shared_types::{MeshError, MeshResult};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::trace;

use crate::ports::outbound::{IpAllocator, MachineStore};

/// Allocator scanning the prefix in address order.
pub struct SequentialIpAllocator {
    prefix: IpNet,
    store: Arc<dyn MachineStore>,
}

impl SequentialIpAllocator {
    /// Allocate from `prefix`, treating addresses in `store` as taken.
    pub fn new(prefix: IpNet, store: Arc<dyn MachineStore>) -> Self {
        Self { prefix, store }
    }
}

#[async_trait]
impl IpAllocator for SequentialIpAllocator {
    async fn allocate(&self) -> MeshResult<IpAddr> {
        let used: HashSet<IpAddr> = self
            .store
            .list_machines()
            .await?
            .iter()
            .filter_map(|m| m.ip_address.parse().ok())
            .collect();

        let ip = self
            .prefix
            .hosts()
            .find(|ip| !used.contains(ip))
            .ok_or_else(|| MeshError::AddressExhausted(self.prefix.to_string()))?;

        trace!(%ip, prefix = %self.prefix, in_use = used.len(), "Allocated address");
        Ok(ip)
    }
}
