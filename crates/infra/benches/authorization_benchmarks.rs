use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use warden_auth::{
    AuthSnapshot, Capabilities, CanRequest, PasswordHasher, PermissionName, RoleInput, UserInput,
};
use warden_core::DomainResult;
use warden_infra::config::AuthConfig;
use warden_infra::{InMemoryAuthStore, RoleAdmin, UserAdmin, seed};

struct NoopHasher;

impl PasswordHasher for NoopHasher {
    fn hash(&self, password: &str) -> DomainResult<String> {
        Ok(password.to_string())
    }
}

fn seeded_store() -> Arc<InMemoryAuthStore> {
    let store = Arc::new(InMemoryAuthStore::new());
    seed(&store, &AuthConfig::default(), &NoopHasher).unwrap();
    store
}

fn bench_role_permission_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("role_permission_sync");

    let store = seeded_store();
    let roles = RoleAdmin::new(store.clone());
    let editor = roles
        .create(&RoleInput {
            name: "editor".to_string(),
            permissions: None,
        })
        .unwrap();

    for size in [1usize, 4, 12] {
        let names: Vec<String> = PermissionName::ALL
            .iter()
            .take(size)
            .map(|p| p.as_str().to_string())
            .collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &names, |b, names| {
            b.iter(|| {
                let input = RoleInput {
                    name: "editor".to_string(),
                    permissions: Some(names.clone()),
                };
                black_box(roles.update(editor.role.id, &input).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_snapshot_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_resolution");

    let store = seeded_store();
    let users = UserAdmin::new(store, NoopHasher);

    for count in [10usize, 100, 1000] {
        let mut last = None;
        for i in users.index().unwrap().len()..count {
            let input = UserInput {
                name: format!("User {i}"),
                email: format!("user{i}@example.com"),
                password: Some("secret".to_string()),
                roles: Some(vec!["user".to_string(), "admin".to_string()]),
            };
            last = Some(users.create(&input).unwrap().user.id);
        }
        let Some(target) = last else { continue };

        group.bench_with_input(BenchmarkId::from_parameter(count), &target, |b, id| {
            b.iter(|| black_box(users.snapshot_for(*id).unwrap()));
        });
    }

    group.finish();
}

fn bench_evaluator(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluator");
    group.sample_size(1000);

    let snapshot = AuthSnapshot::for_user(
        warden_core::UserId::new(),
        ["admin", "user"],
        PermissionName::ALL.iter().map(|p| p.as_str()),
    );
    let caps = Capabilities::new(&snapshot);

    group.bench_function("has_all_permissions", |b| {
        b.iter(|| black_box(caps.has_all_permissions(black_box(PermissionName::ALL))));
    });

    let request = CanRequest::new()
        .role(vec!["admin", "editor"])
        .permission(vec!["user.delete", "role.delete"])
        .require_all(true);
    group.bench_function("can_require_all", |b| {
        b.iter(|| black_box(caps.can(black_box(&request))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_role_permission_sync,
    bench_snapshot_resolution,
    bench_evaluator
);
criterion_main!(benches);
