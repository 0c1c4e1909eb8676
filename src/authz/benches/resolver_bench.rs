//! Authorization resolver benchmarks
//!
//! Request-time checks are lookups into the prebuilt index, so they should
//! stay flat as the number of entities and roles grows.

use authz_resolver::claims::{Identity, Principal};
use authz_resolver::config::{ActionConfig, EntityConfig, EntityMap, FieldsConfig, PermissionConfig};
use authz_resolver::{AuthorizationResolver, Operation, RequestContext, ResolverConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_entities(count: usize, roles: usize) -> EntityMap {
    (0..count)
        .map(|i| {
            let mut entity = EntityConfig::table((0..20).map(|c| format!("col{}", c)));
            for r in 0..roles {
                entity = entity.with_permission(PermissionConfig::new(
                    format!("role-{}", r),
                    vec![ActionConfig::new(Operation::All)
                        .with_fields(FieldsConfig::new(["*"], [format!("col{}", r % 20)]))],
                ));
            }
            (format!("entity-{}", i), entity)
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for entity_count in [10, 100, 1000].iter() {
        let entities = create_entities(*entity_count, 5);
        group.bench_with_input(BenchmarkId::new("entities", entity_count), &entities, |b, entities| {
            b.iter(|| {
                let resolver = AuthorizationResolver::new(black_box(entities), ResolverConfig::default()).unwrap();
                black_box(resolver);
            });
        });
    }

    group.finish();
}

fn bench_is_defined(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_defined");

    for entity_count in [10, 100, 1000].iter() {
        let resolver = AuthorizationResolver::new(&create_entities(*entity_count, 10), ResolverConfig::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("entities", entity_count), &resolver, |b, resolver| {
            b.iter(|| {
                black_box(resolver.is_defined(black_box("entity-7"), black_box("ROLE-3"), Operation::Update));
            });
        });
    }

    group.finish();
}

fn bench_columns_allowed(c: &mut Criterion) {
    let resolver = AuthorizationResolver::new(&create_entities(100, 10), ResolverConfig::default()).unwrap();
    let fields: Vec<String> = (0..10).map(|c| format!("col{}", c + 10)).collect();

    c.bench_function("columns_allowed_10_fields", |b| {
        b.iter(|| {
            black_box(resolver.columns_allowed("entity-42", "role-3", Operation::Read, black_box(&fields)));
        });
    });
}

fn bench_processed_user_claims(c: &mut Criterion) {
    let resolver = AuthorizationResolver::new(&EntityMap::new(), ResolverConfig::default()).unwrap();
    let identity = (0..20).fold(
        Identity::authenticated()
            .with_claim("roles", "Writer")
            .with_claim("scp", "openid profile")
            .with_claim("groups", serde_json::json!(["g1", "g2", "g3"])),
        |identity, i| identity.with_claim(format!("claim{}", i), format!("value{}", i)),
    );
    let request = RequestContext::new(Principal::new(vec![identity])).with_role_header("Writer");

    c.bench_function("processed_user_claims", |b| {
        b.iter(|| {
            black_box(resolver.processed_user_claims(black_box(&request)));
        });
    });
}

criterion_group!(
    benches,
    bench_index_build,
    bench_is_defined,
    bench_columns_allowed,
    bench_processed_user_claims
);
criterion_main!(benches);
