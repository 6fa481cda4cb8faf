use criterion::{criterion_group, criterion_main, Criterion};
use routewire::di::{ConfigDocument, DependencyContainer};
use routewire::router::{RouteResolver, RouteTable};
use routewire::{Settings, TypeRegistry};
use std::hint::black_box;
use std::sync::Arc;

fn example_routes() -> &'static str {
    r#"
index:
  controller: Home::index
animals:
  regexp: "^/zoo/animals$"
  controller: Zoo::animals
animal:
  regexp: "^/zoo/animals/{id}$"
  vars: { id: "@id" }
  controller: Zoo::animal
animal_toy:
  regexp: "^/zoo/animals/{id}/toys/{id}$"
  vars: { id: "@id" }
  controller: Zoo::toy
habitat_section:
  regexp: "^/zoo/{category}/animals/{id}/habitats/{id}/sections/{id}$"
  vars: { category: "([a-z]+)", id: "@id" }
  controller: Zoo::section
batch:
  regexp: "^/inventory/{id}/feeds/{id}/items/{id}/batches/{id}$"
  vars: { id: "@id" }
  controller: Inventory::batch
complex:
  regexp: "^/complex/{p}/{p}/{p}/{p}/{p}/{p}/{p}/{p}/{p}$"
  vars: { p: "([^/]+)" }
  controller: Complex::many
health:
  regexp: "^/zoo/health$"
  controller: Zoo::health
vars:
  id: "([0-9]+)"
"#
}

fn bench_route_throughput(c: &mut Criterion) {
    let table = RouteTable::from_yaml_str(example_routes()).expect("failed to parse routes");
    let resolver = RouteResolver::new(Arc::new(table));
    c.bench_function("route_match", |b| {
        let test_paths = [
            "/",
            "/zoo/animals/123",
            "/zoo/animals/123/toys/456",
            "/zoo/cats/animals/123/habitats/88/sections/5",
            "/inventory/1/feeds/2/items/3/batches/4",
            "/complex/1/2/3/4/5/6/7/8/9",
            "/zoo/health",
        ];
        b.iter(|| {
            for path in test_paths.iter() {
                let res = resolver.resolve(path);
                black_box(&res);
            }
        })
    });
}

struct Pool {
    size: i64,
}

struct Repo {
    pool: Arc<Pool>,
}

fn bench_container_build(c: &mut Criterion) {
    let document = ConfigDocument::from_yaml_str(
        r##"
class:
  pool: { class: Pool, param: ["#pool_size"] }
  users: { class: Repo, param: ["@pool"] }
  posts: { class: Repo, param: ["@pool"] }
raw:
  pool_size: 8
"##,
    )
    .expect("failed to parse dependencies");
    let mut registry = TypeRegistry::new();
    registry
        .register_service("Pool", |args| Ok(Pool { size: args.int(0)? }))
        .register_service("Repo", |args| Ok(Repo { pool: args.object::<Pool>(0)? }));
    let registry = Arc::new(registry);
    let settings = Arc::new(Settings::new("/srv/site", "localhost", "/"));

    c.bench_function("container_build", |b| {
        b.iter(|| {
            let mut di = DependencyContainer::from_document(
                document.clone(),
                Arc::clone(&settings),
                "prod",
                Arc::clone(&registry),
            );
            let users = di.get::<Repo>("users").expect("users");
            let posts = di.get::<Repo>("posts").expect("posts");
            black_box(users.pool.size + posts.pool.size);
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_container_build);
criterion_main!(benches);
