//! # Mesh Coordination Subsystem Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | mc-02 Peer Resolution | peers of one machine, 200-machine namespace | < 1ms |
//! | mc-02 Peer Resolution | staleness check | < 1ms |
//! | mc-03 Node Translation | translate 200 peers | < 5ms |

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mc_01_machine_registry::RegistryConfig;
use mc_02_peer_resolution::{PeerResolutionApi, StalenessApi};
use mc_03_node_translation::NodeTranslationApi;
use mc_tests::integration::fixtures::Mesh;
use shared_types::Machine;
use tokio::runtime::Runtime;

/// A mesh with one namespace of `size` registered machines.
fn populated(rt: &Runtime, size: u8) -> (Mesh, Vec<Machine>) {
    let mesh = Mesh::with_config(
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap(),
        RegistryConfig::default(),
    );
    let eng = mesh.namespace("eng");
    let machines = rt.block_on(async {
        let mut machines = Vec::new();
        for seed in 1..=size {
            let name = format!("node-{seed}");
            machines.push(mesh.enroll(seed, &name, &eng).await.unwrap());
        }
        machines
    });
    (mesh, machines)
}

// ============================================================================
// MC-02: Peer Resolution
// ============================================================================

fn bench_peer_resolution(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("mc-02-peer-resolution");

    for size in [10u8, 50, 200] {
        let (mesh, machines) = populated(&rt, size);
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("peers", size), &machines[0], |b, m| {
            b.iter(|| rt.block_on(async { black_box(mesh.resolver.peers(m).await.unwrap()) }))
        });
    }

    let (mesh, machines) = populated(&rt, 50);
    group.bench_function("is_outdated", |b| {
        b.iter(|| {
            let mut m = machines[0].clone();
            rt.block_on(async { black_box(mesh.staleness.is_outdated(&mut m).await) })
        })
    });

    group.finish();
}

// ============================================================================
// MC-03: Node Translation
// ============================================================================

fn bench_node_translation(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("mc-03-node-translation");

    for size in [10u8, 200] {
        let (mesh, machines) = populated(&rt, size);
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("nodes", size), &machines, |b, ms| {
            b.iter(|| black_box(mesh.translator.nodes(ms, true).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_peer_resolution, bench_node_translation);
criterion_main!(benches);
