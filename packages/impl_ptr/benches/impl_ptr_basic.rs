//! Basic benchmarks for the `impl_ptr` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use impl_ptr::{ImplPtr, make_impl};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

type TestItem = [u64; 8];
const TEST_VALUE: TestItem = [0xdead_beef; 8];

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("impl_ptr_basic");

    let allocs_op = allocs.operation("make_impl");
    group.bench_function("make_impl", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(make_impl(black_box(TEST_VALUE))));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("clone");
    group.bench_function("clone", |b| {
        b.iter_custom(|iters| {
            let original = make_impl(TEST_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(black_box(&original).clone()));
            }

            start.elapsed()
        });
    });

    // Assigning into a live payload is expected to allocate nothing.
    let allocs_op = allocs.operation("clone_from_live");
    group.bench_function("clone_from_live", |b| {
        b.iter_custom(|iters| {
            let source = make_impl(TEST_VALUE);

            let mut destinations = iter::repeat_with(|| make_impl([0_u64; 8]))
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for destination in &mut destinations {
                black_box(destination).clone_from(black_box(&source));
            }

            start.elapsed()
        });
    });

    // Assigning into an empty pointer is expected to allocate exactly one payload.
    let allocs_op = allocs.operation("clone_from_empty");
    group.bench_function("clone_from_empty", |b| {
        b.iter_custom(|iters| {
            let source = make_impl(TEST_VALUE);

            let mut destinations = iter::repeat_with(|| {
                let mut destination = make_impl([0_u64; 8]);
                drop(destination.take());
                destination
            })
            .take(usize::try_from(iters).unwrap())
            .collect::<Vec<ImplPtr<TestItem>>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for destination in &mut destinations {
                black_box(destination).clone_from(black_box(&source));
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
