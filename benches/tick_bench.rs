use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecs_core::{ComponentType, World};

struct Noop;
impl ecs_core::System for Noop {
    fn name(&self) -> &str {
        "noop"
    }
    fn update(&mut self, world: &mut World, _dt: f64) -> ecs_core::Result<()> {
        let position: ComponentType = ComponentType::from("position");
        let query = world.query(&[position.clone()]);
        query.for_each::<f32>(world, &position, |_, p| *p += 1.0);
        Ok(())
    }
}

fn bench_tick_1000_entities(c: &mut Criterion) {
    c.bench_function("tick_1000_entities_one_system", |b| {
        let position: ComponentType = ComponentType::from("position");
        let mut world = World::with_capacity(1000, 1);
        for _ in 0..1000 {
            let e = world.spawn_entity();
            world.add_component(e, &position, 0.0f32).unwrap();
        }
        world.add_system(Box::new(Noop)).unwrap();

        b.iter(|| {
            world.tick(black_box(0.016)).unwrap();
        });
    });
}

fn bench_spawn_and_destroy(c: &mut Criterion) {
    c.bench_function("spawn_and_destroy_1000", |b| {
        b.iter(|| {
            let mut world = World::new();
            let mut ids = Vec::with_capacity(1000);
            for _ in 0..1000 {
                ids.push(world.spawn_entity());
            }
            for id in ids {
                world.destroy_entity(black_box(id)).unwrap();
            }
        });
    });
}

criterion_group!(benches, bench_tick_1000_entities, bench_spawn_and_destroy);
criterion_main!(benches);
