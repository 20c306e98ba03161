//! # Event Bus Flows
//!
//! Lifecycle events and map-update requests as observed by bus subscribers.
//!
//! Every mutation publishes its lifecycle event first and its map-update
//! request second.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mc_01_machine_registry::{MachineRegistryApi, RouteAuthorityApi};
    use shared_bus::{EventFilter, EventTopic, MeshEvent, Subscription};

    use crate::integration::fixtures::Mesh;

    fn mesh() -> Mesh {
        Mesh::new(Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap())
    }

    fn drain(sub: &mut Subscription) -> Vec<MeshEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = sub.try_recv() {
            events.push(event);
        }
        events
    }

    fn map_update(namespace_id: u64, namespace: &str) -> MeshEvent {
        MeshEvent::MapUpdateRequested {
            namespace_id,
            namespace: namespace.to_string(),
        }
    }

    #[tokio::test]
    async fn test_registration_events() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut sub = mesh.bus.subscribe(EventFilter::all());

        let a = mesh.enroll(1, "alpha", &eng).await.unwrap();

        assert_eq!(
            drain(&mut sub),
            vec![
                MeshEvent::MachineRegistered {
                    machine_id: a.id,
                    namespace_id: eng.id,
                },
                map_update(eng.id, "eng"),
            ]
        );
    }

    #[tokio::test]
    async fn test_route_events() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut gw = mesh.enroll(2, "gateway", &eng).await.unwrap();
        mesh.advertise(&mut gw, &["10.0.0.0/24"]).await.unwrap();
        let mut sub = mesh.bus.subscribe(EventFilter::topics(vec![EventTopic::Routes]));

        mesh.routes
            .enable_routes(&mut gw, &["10.0.0.0/24".to_string()])
            .await
            .unwrap();

        assert_eq!(
            drain(&mut sub),
            vec![MeshEvent::RoutesEnabled {
                machine_id: gw.id,
                namespace_id: eng.id,
                routes: vec!["10.0.0.0/24".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn test_rejected_route_change_publishes_nothing() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut gw = mesh.enroll(2, "gateway", &eng).await.unwrap();
        let mut sub = mesh.bus.subscribe(EventFilter::all());

        assert!(mesh
            .routes
            .enable_routes(&mut gw, &["10.0.0.0/24".to_string()])
            .await
            .is_err());
        assert!(drain(&mut sub).is_empty());
    }

    #[tokio::test]
    async fn test_soft_and_hard_deletion_events() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let mut a = mesh.enroll(1, "alpha", &eng).await.unwrap();
        let b = mesh.enroll(2, "beta", &eng).await.unwrap();
        let mut sub = mesh
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::MachineLifecycle]));

        mesh.registry.delete_machine(&mut a).await.unwrap();
        mesh.registry.hard_delete_machine(&b).await.unwrap();

        assert_eq!(
            drain(&mut sub),
            vec![
                MeshEvent::MachineDeleted {
                    machine_id: a.id,
                    namespace_id: eng.id,
                    hard: false,
                },
                MeshEvent::MachineDeleted {
                    machine_id: b.id,
                    namespace_id: eng.id,
                    hard: true,
                },
            ]
        );
        assert!(mesh.store.find_unscoped(a.id).is_some());
        assert!(mesh.store.find_unscoped(b.id).is_none());
    }

    #[tokio::test]
    async fn test_namespace_filter_keeps_other_namespaces_out() {
        let mesh = mesh();
        let eng = mesh.namespace("eng");
        let ops = mesh.namespace("ops");
        let mut sub = mesh.bus.subscribe(EventFilter {
            topics: vec![EventTopic::MapUpdates],
            namespaces: vec![ops.id],
        });

        mesh.enroll(1, "alpha", &eng).await.unwrap();
        mesh.enroll(2, "beta", &ops).await.unwrap();

        assert_eq!(drain(&mut sub), vec![map_update(ops.id, "ops")]);
    }
}
