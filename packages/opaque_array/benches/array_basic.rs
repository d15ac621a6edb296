//! Basic benchmarks for the `opaque_array` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use opaque_array::{ArrayFlags, OpaqueArray};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

type TestItem = u64;
const TEST_VALUE: TestItem = 1024;
const INITIAL_CAPACITY: usize = 16;

fn new_array(flags: ArrayFlags) -> OpaqueArray {
    OpaqueArray::builder()
        .element_of::<TestItem>()
        .capacity(INITIAL_CAPACITY)
        .flags(flags)
        .build()
        .unwrap()
}

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("array_basic");

    let allocs_op = allocs.operation("build");
    group.bench_function("build", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(new_array(ArrayFlags::NONE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("set_one");
    group.bench_function("set_one", |b| {
        b.iter_custom(|iters| {
            let mut array = new_array(ArrayFlags::NONE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                // SAFETY: The array was built for TestItem elements.
                _ = black_box(unsafe { array.set_value(black_box(3), &black_box(TEST_VALUE)) });
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("get_one");
    group.bench_function("get_one", |b| {
        b.iter_custom(|iters| {
            let mut array = new_array(ArrayFlags::NONE);

            // SAFETY: The array was built for TestItem elements.
            unsafe { array.set_value(3, &TEST_VALUE) }.unwrap();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                // SAFETY: The array was built for TestItem elements.
                _ = black_box(unsafe { array.get_value::<TestItem>(black_box(3)) });
            }

            start.elapsed()
        });
    });

    group.finish();

    let mut group = c.benchmark_group("array_growth");

    let allocs_op = allocs.operation("grow_once");
    group.bench_function("grow_once", |b| {
        b.iter_custom(|iters| {
            let mut arrays = iter::repeat_with(|| new_array(ArrayFlags::AUTO_GROW))
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for array in &mut arrays {
                // SAFETY: The array was built for TestItem elements.
                _ = black_box(unsafe { array.set_value(INITIAL_CAPACITY, &TEST_VALUE) });
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("fill_10k_sequential");
    group.bench_function("fill_10k_sequential", |b| {
        b.iter_custom(|iters| {
            let mut arrays = iter::repeat_with(|| new_array(ArrayFlags::AUTO_GROW))
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for array in &mut arrays {
                for index in 0..10_000 {
                    // SAFETY: The array was built for TestItem elements.
                    _ = black_box(unsafe { array.set_value(index, &black_box(TEST_VALUE)) });
                }
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
