use chemmisol_bridge::{entry, Bridge};
use chemmisol_engine::Phase;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

#[path = "../tests/common/mod.rs"]
mod common;

use common::Fixture;

fn bench_allocate_dispose(c: &mut Criterion) {
    let bridge = Bridge::default();
    let fx = Fixture::new();

    c.bench_function("allocate_dispose", |b| {
        b.iter(|| {
            let handle = entry::allocate(&bridge, &fx.host);
            entry::dispose(&bridge, &fx.host, black_box(handle));
        });
    });
}

fn bench_add_reaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_reaction");
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = entry::allocate(&bridge, &fx.host);

    for size in [1usize, 4, 16] {
        let reagents: Vec<(String, Phase, i32)> = (0..size)
            .map(|i| (format!("X{i}"), Phase::Aqueous, 1))
            .collect();
        let reagents: Vec<(&str, Phase, i32)> = reagents
            .iter()
            .map(|(name, phase, coefficient)| (name.as_str(), *phase, *coefficient))
            .collect();
        let reaction = fx.reaction("r", 1.0, &reagents);
        group.bench_with_input(BenchmarkId::new("reagents", size), &reaction, |b, reaction| {
            b.iter(|| {
                entry::add_reaction(&bridge, &fx.host, handle, black_box(*reaction));
                fx.host.clear_calls();
            });
        });
    }

    group.finish();
}

fn bench_water(c: &mut Criterion) {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let h2o = fx.component("H2O", Phase::Solvent, 1.0);
    let h = fx.component("H+", Phase::Aqueous, 0.0);
    let water = fx.reaction(
        "water",
        -14.0,
        &[
            ("H2O", Phase::Solvent, 1),
            ("OH-", Phase::Aqueous, -1),
            ("H+", Phase::Aqueous, -1),
        ],
    );
    let species = fx.string("H+");

    c.bench_function("water_equilibrium", |b| {
        b.iter(|| {
            let handle = entry::allocate(&bridge, &fx.host);
            entry::add_component(&bridge, &fx.host, handle, h2o);
            entry::add_component(&bridge, &fx.host, handle, h);
            entry::add_reaction(&bridge, &fx.host, handle, water);
            entry::set_up(&bridge, &fx.host, handle);
            entry::solve(&bridge, &fx.host, handle);
            let value = entry::concentration(&bridge, &fx.host, handle, species);
            entry::dispose(&bridge, &fx.host, handle);
            fx.host.clear_calls();
            black_box(value)
        });
    });
}

criterion_group!(benches, bench_allocate_dispose, bench_add_reaction, bench_water);
criterion_main!(benches);
