//! Criterion micro-benchmarks for penalty bookkeeping and deconfliction.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use hive_core::{AgentId, BlockId, Timestep};
use hive_penalty::{PenaltyLedger, ResourceKey, Waveform, WaveformConfig, WaveformKind};

fn sine() -> Waveform {
    Waveform::new(WaveformConfig {
        kind: WaveformKind::Sine,
        amplitude: 5.0,
        period: 50.0,
        offset: 10.0,
        ..WaveformConfig::default()
    })
    .unwrap()
}

/// Every agent contends for the nest on the same timestep, so each
/// begin scans past all earlier completions.
fn bench_nest_rush(c: &mut Criterion) {
    let mut group = c.benchmark_group("nest_rush");
    for n in [16u32, 64, 256] {
        group.bench_function(format!("{n}_agents"), |b| {
            b.iter(|| {
                let ledger = PenaltyLedger::new("nest", Waveform::null());
                for i in 0..n {
                    black_box(ledger.begin(AgentId(i), ResourceKey::Nest, Timestep(100)));
                }
            });
        });
    }
    group.finish();
}

/// Non-exclusive pickups: no deconfliction, one record per agent.
fn bench_block_pickups(c: &mut Criterion) {
    let waveform = sine();
    c.bench_function("block_pickups_256", |b| {
        b.iter(|| {
            let ledger = PenaltyLedger::new("block", waveform.clone());
            for i in 0..256u32 {
                ledger.begin(AgentId(i), ResourceKey::Block(BlockId(i)), Timestep(u64::from(i)));
            }
            black_box(ledger.len());
        });
    });
}

fn bench_poll_and_take(c: &mut Criterion) {
    c.bench_function("poll_and_take_256", |b| {
        b.iter(|| {
            let ledger = PenaltyLedger::new("nest", Waveform::null());
            for i in 0..256u32 {
                ledger.begin(AgentId(i), ResourceKey::Nest, Timestep(0));
            }
            let mut now = Timestep(0);
            while !ledger.is_empty() {
                now = now + 1;
                for i in 0..256u32 {
                    black_box(ledger.take_satisfied(AgentId(i), now));
                }
            }
        });
    });
}

criterion_group!(benches, bench_nest_rush, bench_block_pickups, bench_poll_and_take);
criterion_main!(benches);
