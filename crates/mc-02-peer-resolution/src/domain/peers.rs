//! # Peer Set Rules
//!
//! How the three visibility channels combine and when a delivered map is
//! out of date.

use chrono::{DateTime, Utc};
use shared_types::Machine;
use std::collections::BTreeSet;

/// Sort machines ascending by id.
pub fn sort_by_id(machines: &mut [Machine]) {
    machines.sort_by_key(|m| m.id);
}

/// Concatenate channel results in fixed order, then sort by id.
///
/// A machine reachable through two channels is listed twice.
pub fn merge_channels(
    direct: Vec<Machine>,
    shared: Vec<Machine>,
    shared_to: Vec<Machine>,
) -> Vec<Machine> {
    let mut peers = direct;
    peers.extend(shared);
    peers.extend(shared_to);
    sort_by_id(&mut peers);
    peers
}

/// Namespace names whose changes a machine must observe: its own plus the
/// owning namespace of every machine shared into it.
pub fn staleness_scope(machine: &Machine, shared: &[Machine]) -> BTreeSet<String> {
    std::iter::once(&machine.namespace.name)
        .chain(shared.iter().map(|m| &m.namespace.name))
        .cloned()
        .collect()
}

/// Whether a map delivered at `last_update` misses a change at `last_change`.
///
/// A machine that never received a map is always stale; with no recorded
/// change there is nothing to miss.
pub fn is_stale(last_update: Option<DateTime<Utc>>, last_change: Option<DateTime<Utc>>) -> bool {
    match (last_update, last_change) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(update), Some(change)) => update < change,
    }
}
