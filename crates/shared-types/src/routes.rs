//! # Machine Column Accessors
//!
//! Decoding of a machine's JSON columns and the route sets derived from them.
//! Advertised routes come from host metadata; enabled routes are the stored
//! administrative subset.

use ipnet::IpNet;

use crate::entities::Machine;
use crate::errors::{MeshError, MeshResult};
use crate::host_info::HostInfo;

/// Parse a prefix string such as `10.0.0.0/24`.
pub fn parse_route(route: &str) -> MeshResult<IpNet> {
    route
        .parse::<IpNet>()
        .map_err(|e| MeshError::InvalidRoute(format!("{route:?}: {e}")))
}

/// Render prefixes the way the administrative API reports them.
#[must_use]
pub fn routes_to_strings(routes: &[IpNet]) -> Vec<String> {
    routes.iter().map(ToString::to_string).collect()
}

impl Machine {
    /// Decoded host metadata; an empty column yields the default record.
    pub fn host_info(&self) -> MeshResult<HostInfo> {
        self.host_info.decode("host_info")
    }

    /// Decoded endpoint list; an empty column yields no endpoints.
    pub fn endpoint_list(&self) -> MeshResult<Vec<String>> {
        self.endpoints.decode("endpoints")
    }

    /// Routes the machine itself offers, from its host metadata.
    pub fn advertised_routes(&self) -> MeshResult<Vec<IpNet>> {
        Ok(self.host_info()?.routable_ips)
    }

    /// Administratively enabled routes. Any malformed entry fails the call.
    pub fn enabled_route_prefixes(&self) -> MeshResult<Vec<IpNet>> {
        self.enabled_routes
            .decode("enabled_routes")?
            .iter()
            .map(|route| parse_route(route))
            .collect()
    }

    /// Whether `route` is in the enabled set. Malformed input is `false`.
    #[must_use]
    pub fn is_route_enabled(&self, route: &str) -> bool {
        let Ok(route) = parse_route(route) else {
            return false;
        };
        self.enabled_route_prefixes()
            .map(|enabled| enabled.contains(&route))
            .unwrap_or(false)
    }
}
