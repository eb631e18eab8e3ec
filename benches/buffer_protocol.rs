//! Benchmarks for the buffer protocol
//!
//! Measures what the binding adds around an engine call: buffer allocation,
//! status dispatch and output decoding. The mock engine stands in for the
//! prover, so the numbers are overhead only.

use circom_bridge::protocol::{call_checked, call_with_output, ERR_NONE};
use circom_bridge::{Binding, MockEngine, VerifierFormat, WitnessInputs};
use criterion::{black_box, BatchSize, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use tempfile::TempDir;

fn bench_call_with_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_with_output");

    for capacity in [256usize, 4_096, 1 << 20] {
        let payload = "x".repeat(capacity / 2);
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    call_with_output(black_box(capacity), |result, _error| {
                        result.writer().put(&payload).map(|()| ERR_NONE).unwrap_or(1)
                    })
                })
            },
        );
    }

    group.finish();
}

fn bench_call_checked(c: &mut Criterion) {
    c.bench_function("call_checked_success", |b| {
        b.iter(|| call_checked(black_box(4_000), |_error| ERR_NONE))
    });
}

fn bench_mock_verify(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let circuit = dir.path().join("circuit.circom");
    let proving_key = dir.path().join("proving.key");
    fs::write(&circuit, "template M() { signal input p; } component main = M();").unwrap();

    let engine = MockEngine::new();
    let binding = Binding::new(engine.clone());
    let vk = binding
        .setup(&circuit, &proving_key, VerifierFormat::Json, 4_000)
        .unwrap();
    let inputs = WitnessInputs::new().with("p", "2").with("q", "3");
    let proof = binding.prove(&circuit, &proving_key, &inputs, 4_000).unwrap();

    c.bench_function("mock_verify", |b| {
        b.iter_batched(
            || engine.take_calls(),
            |_| binding.verify(black_box(&vk), black_box(&proof), 4_000),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_call_with_output,
    bench_call_checked,
    bench_mock_verify
);
criterion_main!(benches);
