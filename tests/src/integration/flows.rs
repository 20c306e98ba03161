//! # Integration Test Flows
//!
//! Registry, route authority, peer resolution and node translation sharing
//! one store.
//!
//! ## Flows Tested:
//!
//! 1. **Register → Resolve**: registered machines see each other, pending
//!    ones stay invisible on the direct channel
//! 2. **Share → Resolve**: sharing grants open the shared and shared-to
//!    channels
//! 3. **Enable routes → Translate**: enabled routes reach `allowed_ips`
//! 4. **Delete → Resolve**: removed machines and their grants disappear

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use mc_01_machine_registry::testing::machine_key;
    use mc_01_machine_registry::{ExpiryDecision, MachineRegistryApi, RouteAuthorityApi, TimeSource};
    use mc_02_peer_resolution::PeerResolutionApi;
    use mc_03_node_translation::{MachineView, NodeTranslationApi, RoutesView};
    use shared_types::{Machine, MeshError};

    use crate::integration::fixtures::Mesh;

    fn mesh() -> Mesh {
        Mesh::new(Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap())
    }

    fn ids(machines: &[Machine]) -> Vec<u64> {
        machines.iter().map(|m| m.id).collect()
    }

    // =========================================================================
    // REGISTRATION AND RESOLUTION
    // =========================================================================

    #[tokio::test]
    async fn test_registered_machines_see_each_other() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let a = mesh.enroll(1, "alpha", &eng).await.unwrap();
        let b = mesh.enroll(2, "beta", &eng).await.unwrap();
        mesh.pending(3, "gamma", &eng).await.unwrap();

        assert!(a.registered && !a.ip_address.is_empty());
        assert_ne!(a.ip_address, b.ip_address);

        assert_eq!(ids(&mesh.resolver.peers(&a).await.unwrap()), vec![b.id]);
        assert_eq!(ids(&mesh.resolver.peers(&b).await.unwrap()), vec![a.id]);
    }

    #[tokio::test]
    async fn test_second_registration_is_rejected() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        mesh.enroll(1, "alpha", &eng).await.unwrap();

        let err = mesh
            .registry
            .register_machine(&machine_key(1), "eng")
            .await
            .unwrap_err();
        assert_eq!(err, MeshError::AlreadyRegistered("alpha".to_string()));
    }

    #[tokio::test]
    async fn test_sharing_opens_both_directions() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let ops = mesh.namespace("ops");
        let a = mesh.enroll(1, "alpha", &eng).await.unwrap();
        let b = mesh.enroll(2, "beta", &eng).await.unwrap();
        let c = mesh.enroll(3, "gamma", &ops).await.unwrap();
        let d = mesh.pending(4, "delta", &ops).await.unwrap();

        mesh.store.share_machine(c.id, eng.id).unwrap();

        // alpha: direct beta, shared gamma.
        assert_eq!(ids(&mesh.resolver.peers(&a).await.unwrap()), vec![b.id, c.id]);

        // gamma: no registered neighbours, the whole eng roster via shared-to.
        assert_eq!(ids(&mesh.resolver.peers(&c).await.unwrap()), vec![a.id, b.id]);

        // delta never appears on the direct channel.
        assert!(!ids(&mesh.resolver.peers(&c).await.unwrap()).contains(&d.id));
    }

    #[tokio::test]
    async fn test_machine_seen_through_two_channels_appears_twice() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let ops = mesh.namespace("ops");
        let a = mesh.enroll(1, "alpha", &eng).await.unwrap();
        let c = mesh.enroll(3, "gamma", &ops).await.unwrap();

        mesh.store.share_machine(c.id, eng.id).unwrap();
        mesh.store.share_machine(a.id, ops.id).unwrap();

        // Shared into ops and member of the eng roster.
        assert_eq!(ids(&mesh.resolver.peers(&c).await.unwrap()), vec![a.id, a.id]);
    }

    // =========================================================================
    // ROUTES AND TRANSLATION
    // =========================================================================

    #[tokio::test]
    async fn test_enabled_routes_reach_allowed_ips() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let a = mesh.enroll(1, "alpha", &eng).await.unwrap();
        let mut gw = mesh.enroll(2, "gateway", &eng).await.unwrap();
        mesh.advertise(&mut gw, &["10.0.0.0/24", "10.1.0.0/16"])
            .await
            .unwrap();

        mesh.routes
            .enable_routes(&mut gw, &["10.1.0.0/16".to_string()])
            .await
            .unwrap();

        let peers = mesh.resolver.peers(&a).await.unwrap();
        let nodes = mesh.translator.nodes(&peers, true).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name, "gateway.eng.example.com");

        let allowed: Vec<String> = nodes[0].allowed_ips.iter().map(ToString::to_string).collect();
        assert_eq!(allowed, vec![format!("{}/32", gw.ip_address), "10.1.0.0/16".to_string()]);

        let view = mesh.translator.routes_view(&peers[0]).unwrap();
        assert_eq!(
            view,
            RoutesView {
                advertised_routes: vec!["10.0.0.0/24".to_string(), "10.1.0.0/16".to_string()],
                enabled_routes: vec!["10.1.0.0/16".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_unadvertised_route_leaves_stored_set_alone() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut gw = mesh.enroll(2, "gateway", &eng).await.unwrap();
        mesh.advertise(&mut gw, &["10.0.0.0/24"]).await.unwrap();
        mesh.routes
            .enable_routes(&mut gw, &["10.0.0.0/24".to_string()])
            .await
            .unwrap();

        let err = mesh
            .routes
            .enable_routes(
                &mut gw,
                &["10.0.0.0/24".to_string(), "192.168.0.0/24".to_string()],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MeshError::RouteNotAdvertised { .. }));

        let stored = mesh.registry.get_machine_by_id(gw.id).await.unwrap();
        assert!(mesh.routes.is_routes_enabled(&stored, "10.0.0.0/24"));
        assert!(!mesh.routes.is_routes_enabled(&stored, "192.168.0.0/24"));
    }

    #[tokio::test]
    async fn test_admin_view_of_registered_machine() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let a = mesh.enroll(1, "alpha", &eng).await.unwrap();

        let view: MachineView = mesh.translator.machine_view(&a);
        assert_eq!(view.namespace.name, "eng");
        assert_eq!(view.register_method, "cli");
        assert!(view.registered);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("expiry").is_none());
    }

    // =========================================================================
    // EXPIRY AND DELETION
    // =========================================================================

    #[tokio::test]
    async fn test_expiry_assigned_then_kept() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut a = mesh.enroll(1, "alpha", &eng).await.unwrap();

        let decision = mesh.registry.update_machine_expiry(&mut a).await.unwrap();
        assert_eq!(decision, Some(ExpiryDecision::Default));
        assert_eq!(a.expiry, Some(mesh.clock.now() + Duration::days(1)));

        mesh.clock.advance(Duration::hours(1));
        assert_eq!(mesh.registry.update_machine_expiry(&mut a).await.unwrap(), None);

        let stored = mesh.registry.get_machine_by_id(a.id).await.unwrap();
        assert_eq!(stored.expiry, a.expiry);
    }

    #[tokio::test]
    async fn test_deleted_machine_and_grants_disappear() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let ops = mesh.namespace("ops");
        let a = mesh.enroll(1, "alpha", &eng).await.unwrap();
        let mut b = mesh.enroll(2, "beta", &eng).await.unwrap();
        let c = mesh.enroll(3, "gamma", &ops).await.unwrap();
        mesh.store.share_machine(b.id, ops.id).unwrap();

        assert_eq!(ids(&mesh.resolver.peers(&c).await.unwrap()), vec![b.id]);

        mesh.registry.delete_machine(&mut b).await.unwrap();

        assert!(mesh.resolver.peers(&a).await.unwrap().is_empty());
        assert!(mesh.resolver.peers(&c).await.unwrap().is_empty());
        assert_eq!(mesh.store.share_count(), 0);
        assert!(mesh.registry.get_machine_by_id(b.id).await.unwrap_err().is_not_found());
    }
}
