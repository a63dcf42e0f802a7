use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use vigilant_health::application::services::HealthCheckRegistry;
use vigilant_health::domain::check::{Check, CheckError};
use vigilant_health::domain::heartbeat::HeartbeatStore;
use vigilant_health::domain::status::{CheckResult, Status};
use vigilant_health::domain::SCHEDULER_SOURCE;
use vigilant_health::infrastructure::checks::SchedulerCheck;
use vigilant_health::infrastructure::InMemoryHeartbeatStore;

struct StaticCheck(String);

#[async_trait]
impl Check for StaticCheck {
    fn name(&self) -> &str {
        &self.0
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        Ok(CheckResult::ok(self.0.clone(), "fine"))
    }
}

fn registry_run_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("Registry Run");

    for size in [1usize, 10, 100] {
        let mut registry = HealthCheckRegistry::new();
        for i in 0..size {
            registry.register_check(StaticCheck(format!("check_{}", i)));
        }

        group.bench_with_input(BenchmarkId::new("static checks", size), &registry, |b, registry| {
            b.to_async(&runtime).iter(|| async {
                let report = registry.run().await;
                assert_eq!(black_box(report).status, Status::Ok);
            });
        });
    }

    group.finish();
}

fn liveness_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryHeartbeatStore::new();
    runtime
        .block_on(store.write(SCHEDULER_SOURCE, chrono::Utc::now()))
        .unwrap();

    let mut registry = HealthCheckRegistry::new();
    registry.register_check(SchedulerCheck::new(Arc::new(store)));

    c.bench_function("scheduler liveness check (in-memory store)", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(registry.run().await);
        });
    });
}

criterion_group!(benches, registry_run_benchmark, liveness_benchmark);
criterion_main!(benches);
