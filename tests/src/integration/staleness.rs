//! # Map Staleness Flows
//!
//! Every map-update request lands in the change ledger through the notifier
//! chain; the staleness detector reads it back.

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use mc_01_machine_registry::{MachineRegistryApi, RouteAuthorityApi, TimeSource};
    use mc_02_peer_resolution::StalenessApi;
    use shared_types::Machine;

    use crate::integration::fixtures::Mesh;

    fn mesh() -> Mesh {
        Mesh::new(Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap())
    }

    /// Record a successful map delivery to `machine` at the current time.
    async fn delivered(mesh: &Mesh, machine: &mut Machine) {
        machine.last_successful_update = Some(mesh.clock.now());
        mesh.registry.save_machine(machine).await.unwrap();
    }

    #[tokio::test]
    async fn test_never_updated_machine_is_stale() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut a = mesh.enroll(1, "alpha", &eng).await.unwrap();

        assert!(mesh.staleness.is_outdated(&mut a).await);
    }

    #[tokio::test]
    async fn test_registration_is_recorded_as_change() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        mesh.enroll(1, "alpha", &eng).await.unwrap();

        assert_eq!(mesh.ledger.last_change_of("eng"), Some(mesh.clock.now()));
    }

    #[tokio::test]
    async fn test_change_after_delivery_makes_stale() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut a = mesh.enroll(1, "alpha", &eng).await.unwrap();
        let mut gw = mesh.enroll(2, "gateway", &eng).await.unwrap();
        mesh.advertise(&mut gw, &["10.0.0.0/24"]).await.unwrap();

        mesh.clock.advance(Duration::seconds(10));
        delivered(&mesh, &mut a).await;
        assert!(!mesh.staleness.is_outdated(&mut a).await);

        mesh.clock.advance(Duration::seconds(10));
        mesh.routes
            .enable_routes(&mut gw, &["10.0.0.0/24".to_string()])
            .await
            .unwrap();
        assert!(mesh.staleness.is_outdated(&mut a).await);
    }

    #[tokio::test]
    async fn test_shared_namespace_changes_count() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let ops = mesh.namespace("ops");
        let mut a = mesh.enroll(1, "alpha", &eng).await.unwrap();
        let c = mesh.enroll(3, "gamma", &ops).await.unwrap();
        let mut d = mesh.enroll(4, "delta", &ops).await.unwrap();

        mesh.clock.advance(Duration::seconds(10));
        delivered(&mesh, &mut a).await;

        // Not yet shared: a change in ops is invisible to alpha.
        mesh.clock.advance(Duration::seconds(10));
        mesh.registry.delete_machine(&mut d).await.unwrap();
        assert!(!mesh.staleness.is_outdated(&mut a).await);

        // Once gamma is shared into eng, ops is in alpha's scope.
        mesh.store.share_machine(c.id, eng.id).unwrap();
        assert!(mesh.staleness.is_outdated(&mut a).await);
    }

    #[tokio::test]
    async fn test_refresh_pulls_latest_delivery_time() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut a = mesh.enroll(1, "alpha", &eng).await.unwrap();

        mesh.clock.advance(Duration::seconds(10));
        let mut stored = mesh.registry.get_machine_by_id(a.id).await.unwrap();
        delivered(&mesh, &mut stored).await;

        // The caller's copy predates the delivery; the check reloads it.
        assert!(a.last_successful_update.is_none());
        assert!(!mesh.staleness.is_outdated(&mut a).await);
        assert_eq!(a.last_successful_update, Some(mesh.clock.now()));
    }

    #[tokio::test]
    async fn test_unavailable_store_is_stale() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut a = mesh.enroll(1, "alpha", &eng).await.unwrap();
        mesh.clock.advance(Duration::seconds(10));
        delivered(&mesh, &mut a).await;

        mesh.store.set_unavailable(true);
        assert!(mesh.staleness.is_outdated(&mut a).await);
    }
}
