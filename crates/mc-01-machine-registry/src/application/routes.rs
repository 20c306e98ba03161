//! # Route Authority Service
//!
//! Decides which advertised subnets a machine may propagate. Enabling is
//! all-or-nothing and replaces the previous enabled set.

use async_trait::async_trait;
use ipnet::IpNet;
use mesh_telemetry::metrics::ROUTE_CHANGES;
use shared_bus::MeshEvent;
use shared_types::{parse_route, routes_to_strings, JsonColumn, Machine, MeshError, MeshResult};
use tracing::{info, warn};

use super::context::RegistryContext;
use crate::ports::inbound::RouteAuthorityApi;

/// Route Authority - validates and stores enabled routes.
#[derive(Clone)]
pub struct RouteAuthority {
    ctx: RegistryContext,
}

impl RouteAuthority {
    /// Create a route authority over `ctx`.
    pub fn new(ctx: RegistryContext) -> Self {
        Self { ctx }
    }

    fn record(outcome: &str) {
        ROUTE_CHANGES.with_label_values(&[outcome]).inc();
    }
}

#[async_trait]
impl RouteAuthorityApi for RouteAuthority {
    fn get_advertised_routes(&self, machine: &Machine) -> MeshResult<Vec<IpNet>> {
        machine.advertised_routes()
    }

    fn get_enabled_routes(&self, machine: &Machine) -> MeshResult<Vec<IpNet>> {
        machine.enabled_route_prefixes()
    }

    fn is_routes_enabled(&self, machine: &Machine, route: &str) -> bool {
        machine.is_route_enabled(route)
    }

    async fn enable_routes(&self, machine: &mut Machine, routes: &[String]) -> MeshResult<()> {
        let requested = routes
            .iter()
            .map(|route| parse_route(route))
            .collect::<MeshResult<Vec<IpNet>>>()
            .inspect_err(|_| Self::record("invalid"))?;

        let advertised = machine.advertised_routes()?;
        if let Some(missing) = requested.iter().find(|r| !advertised.contains(*r)) {
            warn!(machine = %machine.name, route = %missing, "Route is not advertised");
            Self::record("not_advertised");
            return Err(MeshError::RouteNotAdvertised {
                route: missing.to_string(),
                machine: machine.name.clone(),
            });
        }

        let enabled = routes_to_strings(&requested);
        machine.enabled_routes = JsonColumn::encode(&enabled, "enabled_routes")?;
        machine.updated_at = self.ctx.now();
        self.ctx.store.save(machine).await?;

        Self::record("applied");
        info!(machine = %machine.name, routes = ?enabled, "Enabled routes");

        self.ctx
            .emit(MeshEvent::RoutesEnabled {
                machine_id: machine.id,
                namespace_id: machine.namespace.id,
                routes: enabled,
            })
            .await;
        self.ctx.notifier.request_map_update(&machine.namespace).await;
        Ok(())
    }
}
