//! Tick throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use soul_arena::sim::enemy::EnemyStats;
use soul_arena::{fixed_tick, frame_tick, ArenaState, SessionId, SimConfig, Vec3, FIXED_DT};

fn populated_state(config: &SimConfig, enemies: u32) -> ArenaState {
    let mut state = ArenaState::new(SessionId([42u8; 16]), 7, config);
    // Hold the spawner back so the population stays fixed
    state.wave.wave_timer = f32::MAX;

    for i in 0..enemies {
        let angle = i as f32 * 0.37;
        let stats = if i % 3 == 0 {
            EnemyStats::flyer()
        } else {
            EnemyStats::chaser()
        };
        let position = Vec3::new(angle.cos() * 12.0, 0.0, angle.sin() * 12.0);
        state.spawn_enemy(stats, position, -position.normalize());
    }
    state.take_events();
    state
}

fn bench_fixed_tick(c: &mut Criterion) {
    let config = SimConfig::default();

    for &count in &[8u32, 32, 128] {
        c.bench_function(&format!("fixed_tick/{count}_enemies"), |b| {
            let mut state = populated_state(&config, count);
            b.iter(|| {
                fixed_tick(black_box(&mut state), &config, FIXED_DT);
                state.pending_events.clear();
            });
        });
    }
}

fn bench_full_frame(c: &mut Criterion) {
    let config = SimConfig::default();

    c.bench_function("frame_and_fixed_tick/32_enemies", |b| {
        let mut state = populated_state(&config, 32);
        b.iter(|| {
            frame_tick(black_box(&mut state), &config, FIXED_DT);
            fixed_tick(black_box(&mut state), &config, FIXED_DT);
            state.pending_events.clear();
        });
    });
}

criterion_group!(benches, bench_fixed_tick, bench_full_frame);
criterion_main!(benches);
