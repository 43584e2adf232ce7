use criterion::{black_box, criterion_group, criterion_main, Criterion};
use esox_resourcepool::Pool;

fn acquire_return(c: &mut Criterion) {
    let pool: Pool<Vec<u8>> = Pool::new();
    for _ in 0..16 {
        pool.add(Box::new(vec![0u8; 4096]));
    }

    c.bench_function("acquire_return", |b| {
        b.iter(|| {
            let buf = pool.acquire().unwrap();
            black_box(buf.len());
        })
    });

    c.bench_function("acquire_empty", |b| {
        let empty: Pool<Vec<u8>> = Pool::new();
        b.iter(|| black_box(empty.acquire().is_none()))
    });
}

criterion_group!(benches, acquire_return);
criterion_main!(benches);
