use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use tiered_ring::{Channel, Config};

const RECORDS_PER_PRODUCER: u64 = 2_000_000;
const BATCH_SIZE: usize = 4096;

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    group.throughput(Throughput::Elements(RECORDS_PER_PRODUCER));

    group.bench_function("single_producer_consumer", |b| {
        b.iter(|| {
            let channel = Arc::new(Channel::<u64>::new(Config::default()));
            let producer = channel.register().unwrap();

            let ch = Arc::clone(&channel);
            let producer_handle = thread::spawn(move || {
                let mut sent = 0u64;
                while sent < RECORDS_PER_PRODUCER {
                    let want = BATCH_SIZE.min((RECORDS_PER_PRODUCER - sent) as usize);
                    if let Some(mut r) = producer.reserve(want) {
                        let len = {
                            let slice = r.as_mut_slice();
                            for (i, item) in slice.iter_mut().enumerate() {
                                item.write(sent + i as u64);
                            }
                            slice.len()
                        };
                        r.commit();
                        sent += len as u64;
                    } else {
                        std::hint::spin_loop();
                    }
                }
                let _ = ch;
            });

            let mut count = 0u64;
            while count < RECORDS_PER_PRODUCER {
                count += channel.consume_all(|item| {
                    black_box(item);
                }) as u64;
                if count < RECORDS_PER_PRODUCER {
                    std::hint::spin_loop();
                }
            }

            producer_handle.join().unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_spsc);
criterion_main!(benches);
