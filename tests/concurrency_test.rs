//! Concurrency Test - SPMC dan MPMC lewat satu `Arc<RingBuffer>`
//!
//! Usage:
//!   cargo test --release --test concurrency_test

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use cbuf::RingBuffer;

/// Producer `id` menulis `items` nilai unik: id * items + 1 ..= (id + 1) * items
fn spawn_producers(
    rb: &Arc<RingBuffer<u32>>,
    done: &Arc<AtomicUsize>,
    producers: u32,
    items: u32,
) -> Vec<thread::JoinHandle<()>> {
    (0..producers)
        .map(|id| {
            let rb = Arc::clone(rb);
            let done = Arc::clone(done);
            thread::spawn(move || {
                for i in 0..items {
                    rb.put(id * items + i + 1);
                }
                done.fetch_add(1, Ordering::Release);
            })
        })
        .collect()
}

/// Consumer mengumpulkan semua nilai yang berhasil di-get, berhenti
/// setelah semua producer selesai dan buffer kosong.
fn spawn_consumers(
    rb: &Arc<RingBuffer<u32>>,
    done: &Arc<AtomicUsize>,
    consumers: usize,
    producers: usize,
) -> Vec<thread::JoinHandle<Vec<u32>>> {
    (0..consumers)
        .map(|_| {
            let rb = Arc::clone(rb);
            let done = Arc::clone(done);
            thread::spawn(move || {
                let mut seen = Vec::new();
                loop {
                    let finished = done.load(Ordering::Acquire) == producers;
                    match rb.get() {
                        Some(v) => seen.push(v),
                        None if finished => break,
                        None => thread::yield_now(),
                    }
                }
                seen
            })
        })
        .collect()
}

#[test]
fn test_multiple_readers_drain_prefilled() {
    const ITEMS: u32 = 100_000;
    const READERS: usize = 8;

    let rb = Arc::new(RingBuffer::<u32>::new(ITEMS as usize).unwrap());
    for i in 1..=ITEMS {
        rb.put(i);
    }
    assert!(rb.is_full());

    // Semua producer "sudah selesai"
    let done = Arc::new(AtomicUsize::new(0));
    let readers = spawn_consumers(&rb, &done, READERS, 0);

    let mut all = HashSet::new();
    let mut total = 0;
    for handle in readers {
        let seen = handle.join().unwrap();
        // Urutan per reader tetap naik (FIFO)
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        total += seen.len();
        all.extend(seen);
    }

    assert_eq!(total, ITEMS as usize);
    assert_eq!(all.len(), ITEMS as usize);
    assert_eq!(rb.overwrite_count(), 0);
    assert!(rb.is_empty());
}

#[test]
fn test_mpmc_conservation_with_overwrites() {
    const PRODUCERS: u32 = 4;
    const CONSUMERS: usize = 4;
    const ITEMS: u32 = 20_000;

    const CAPACITY: usize = 64;
    const PREFILL: u32 = 100;

    let rb = Arc::new(RingBuffer::<u32>::new(CAPACITY).unwrap());
    let done = Arc::new(AtomicUsize::new(0));

    // Prefill melebihi kapasitas sebelum consumer jalan: overwrite pasti terjadi.
    // Nilai prefill di luar rentang semua producer.
    let prefill_base = PRODUCERS * ITEMS;
    for i in 1..=PREFILL {
        rb.put(prefill_base + i);
    }
    assert_eq!(rb.overwrite_count(), (PREFILL as usize - CAPACITY) as u64);

    let producers = spawn_producers(&rb, &done, PRODUCERS, ITEMS);
    let consumers = spawn_consumers(&rb, &done, CONSUMERS, PRODUCERS as usize);

    for handle in producers {
        handle.join().unwrap();
    }

    let mut all = HashSet::new();
    let mut total = 0u64;
    for handle in consumers {
        let seen = handle.join().unwrap();

        // Nilai dari producer yang sama harus naik di setiap consumer
        for producer in 0..PRODUCERS {
            let own: Vec<_> = seen
                .iter()
                .filter(|&&v| (v - 1) / ITEMS == producer)
                .collect();
            assert!(own.windows(2).all(|w| w[0] < w[1]));
        }

        total += seen.len() as u64;
        for v in seen {
            assert!(all.insert(v), "value {} dequeued twice", v);
        }
    }

    let produced = (PRODUCERS * ITEMS + PREFILL) as u64;
    assert!(rb.is_empty());
    assert!(rb.overwrite_count() >= (PREFILL as usize - CAPACITY) as u64);
    assert_eq!(total + rb.overwrite_count(), produced);
}

#[test]
fn test_resize_under_load() {
    const PRODUCERS: u32 = 2;
    const ITEMS: u32 = 50_000;

    let rb = Arc::new(RingBuffer::<u32>::new(16).unwrap());
    let done = Arc::new(AtomicUsize::new(0));
    let producers = spawn_producers(&rb, &done, PRODUCERS, ITEMS);

    let resizer = {
        let rb = Arc::clone(&rb);
        thread::spawn(move || {
            let mut capacity = 16;
            while capacity < 4096 {
                capacity *= 2;
                rb.resize(capacity).unwrap();
                thread::yield_now();
            }
        })
    };

    for handle in producers {
        handle.join().unwrap();
    }
    resizer.join().unwrap();
    assert_eq!(rb.capacity(), 4096);

    let mut drained = Vec::new();
    while let Some(v) = rb.get() {
        drained.push(v);
    }

    let unique: HashSet<_> = drained.iter().copied().collect();
    assert_eq!(unique.len(), drained.len());
    assert_eq!(
        drained.len() as u64 + rb.overwrite_count(),
        (PRODUCERS * ITEMS) as u64
    );

    for producer in 0..PRODUCERS {
        let own: Vec<_> = drained
            .iter()
            .filter(|&&v| (v - 1) / ITEMS == producer)
            .collect();
        assert!(own.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_lock_free_polling_stays_consistent() {
    let rb = Arc::new(RingBuffer::<u64>::new(8).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let poller = {
        let rb = Arc::clone(&rb);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut last_capacity = rb.capacity();
            let mut last_overwrites = rb.overwrite_count();
            while !stop.load(Ordering::Acquire) {
                let capacity = rb.capacity();
                let overwrites = rb.overwrite_count();
                // Grow-only dan monotonic
                assert!(capacity >= last_capacity);
                assert!(overwrites >= last_overwrites);
                let _ = rb.is_full();
                last_capacity = capacity;
                last_overwrites = overwrites;
            }
        })
    };

    for i in 0..10_000u64 {
        rb.put(i);
        if i % 1000 == 0 {
            rb.resize(rb.capacity() + 1).unwrap();
        }
        if i % 3 == 0 {
            rb.get();
        }
    }

    stop.store(true, Ordering::Release);
    poller.join().unwrap();

    assert!(rb.len() <= rb.capacity());
}
