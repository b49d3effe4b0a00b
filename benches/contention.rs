use std::hint::black_box;
use std::thread;

use criterion::{Criterion, criterion_group, criterion_main};
use respool::{BoxError, Pool, PoolConfig, Resource};

struct Buffer(Vec<u8>);

impl Resource for Buffer {
    fn close(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

fn buffer_pool(max_open: usize) -> Pool<Buffer> {
    Pool::new(
        || Ok(Buffer(vec![0u8; 4096])),
        PoolConfig::new().with_max_open(max_open).with_max_idle(max_open),
    )
}

fn bench_get_put(c: &mut Criterion) {
    let pool = buffer_pool(8);
    c.bench_function("get_put_uncontended", |b| {
        b.iter(|| {
            let buffer = pool.get().unwrap();
            black_box(buffer.0.len());
        })
    });
}

fn bench_contended(c: &mut Criterion) {
    c.bench_function("get_put_4_threads", |b| {
        b.iter(|| {
            let pool = buffer_pool(4);
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    let pool = pool.clone();
                    thread::spawn(move || {
                        for _ in 0..100 {
                            let buffer = pool.get().unwrap();
                            black_box(buffer.0.len());
                        }
                    })
                })
                .collect();
            for worker in workers {
                worker.join().unwrap();
            }
        })
    });
}

criterion_group!(benches, bench_get_put, bench_contended);
criterion_main!(benches);
