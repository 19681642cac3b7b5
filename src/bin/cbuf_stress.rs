//! cbuf Stress - multi-producer / multi-consumer conservation run
//!
//! K producer thread menulis M elemen masing-masing, J consumer thread
//! drain secara bersamaan. Di akhir dicek:
//!   total dequeued == K × M − overwrite_count
//!
//! Usage:
//!   cargo run --release --bin cbuf_stress [OPTIONS]

use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use cbuf::RingBuffer;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Stress run configuration
struct StressConfig {
    producers: usize,
    consumers: usize,
    items_per_producer: u32,
    capacity: usize,
    // Producer tidur sebentar setiap `pace_every` put (0 = tidak pernah)
    pace_every: u32,
    pace_micros: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            producers: 12,
            consumers: 12,
            items_per_producer: 9000,
            capacity: 1 << 20,
            pace_every: 10,
            pace_micros: 100,
        }
    }
}

impl StressConfig {
    /// Total nilai unik yang ditulis semua producer.
    ///
    /// Returns `None` jika tidak muat di u32 (nilai elemen akan wrap dan duplikat).
    fn total_items(&self) -> Option<u32> {
        u32::try_from(self.producers)
            .ok()?
            .checked_mul(self.items_per_producer)
    }

    fn validate(&self) -> Result<(), String> {
        if self.total_items().is_none() {
            return Err(format!(
                "{} producers x {} items exceeds {} distinct values",
                self.producers,
                self.items_per_producer,
                u32::MAX
            ));
        }
        Ok(())
    }
}

/// Hasil satu run
struct StressReport {
    produced: Vec<u64>,
    consumed: Vec<u64>,
    overwrites: u64,
    remaining: usize,
    elapsed: Duration,
}

impl StressReport {
    fn total_produced(&self) -> u64 {
        self.produced.iter().sum()
    }

    fn total_consumed(&self) -> u64 {
        self.consumed.iter().sum()
    }

    fn is_conserved(&self) -> bool {
        self.total_consumed() + self.remaining as u64 + self.overwrites == self.total_produced()
    }

    fn print_report(&self) {
        let produced = self.total_produced().max(1);
        let consumed = self.total_consumed().max(1);

        println!("\n📊 STRESS RESULTS");
        println!("=================");
        for (i, count) in self.produced.iter().enumerate() {
            println!(
                "  Producer {:>2}: {:>9} ({:>3}%)",
                i,
                count,
                count * 100 / produced
            );
        }
        for (i, count) in self.consumed.iter().enumerate() {
            println!(
                "  Consumer {:>2}: {:>9} ({:>3}%)",
                i,
                count,
                count * 100 / consumed
            );
        }
        println!("\n  Produced:   {}", self.total_produced());
        println!("  Consumed:   {}", self.total_consumed());
        println!("  Overwrites: {}", self.overwrites);
        println!("  Remaining:  {}", self.remaining);
        println!("  Elapsed:    {:.4}s", self.elapsed.as_secs_f64());
        println!(
            "  Rate:       {:.2} M ops/sec",
            (self.total_produced() + self.total_consumed()) as f64
                / self.elapsed.as_secs_f64()
                / 1_000_000.0
        );

        if self.is_conserved() {
            println!("\n✅ CONSERVED - no element lost or duplicated by locking");
        } else {
            println!("\n❌ CONSERVATION VIOLATED");
        }
    }
}

fn spawn_producer(
    id: usize,
    rb: Arc<RingBuffer<u32>>,
    done: Arc<AtomicUsize>,
    config: &StressConfig,
) -> JoinHandle<u64> {
    let items = config.items_per_producer;
    let pace_every = config.pace_every;
    let pace = Duration::from_micros(config.pace_micros);
    // validate() menjamin producers * items muat di u32
    let base = id as u32 * items;

    thread::spawn(move || {
        let mut count = 0u64;
        for i in 0..items {
            rb.put(base + i + 1);
            count += 1;

            // Producer sengaja diperlambat supaya consumer sempat mengejar
            if pace_every > 0 && count % pace_every as u64 == 0 {
                thread::sleep(pace);
            }
        }
        done.fetch_add(1, Ordering::Release);
        debug!(producer = id, count, "producer finished");
        count
    })
}

fn spawn_consumer(
    id: usize,
    rb: Arc<RingBuffer<u32>>,
    done: Arc<AtomicUsize>,
    producers: usize,
) -> JoinHandle<u64> {
    thread::spawn(move || {
        let mut count = 0u64;
        loop {
            // Baca flag SEBELUM get: jika semua producer selesai dan get
            // tetap kosong, tidak akan ada data lagi.
            let finished = done.load(Ordering::Acquire) == producers;
            match rb.get() {
                Some(_) => count += 1,
                None if finished => break,
                None => thread::yield_now(),
            }
        }
        debug!(consumer = id, count, "consumer finished");
        count
    })
}

fn run_stress(config: &StressConfig) -> cbuf::Result<StressReport> {
    let rb = Arc::new(RingBuffer::<u32>::new(config.capacity)?);
    let done = Arc::new(AtomicUsize::new(0));

    info!(
        producers = config.producers,
        consumers = config.consumers,
        items = config.items_per_producer,
        capacity = config.capacity,
        "starting stress run"
    );

    let start = Instant::now();

    let producers: Vec<_> = (0..config.producers)
        .map(|id| spawn_producer(id, Arc::clone(&rb), Arc::clone(&done), config))
        .collect();
    let consumers: Vec<_> = (0..config.consumers)
        .map(|id| spawn_consumer(id, Arc::clone(&rb), Arc::clone(&done), config.producers))
        .collect();

    let produced = producers
        .into_iter()
        .map(|h| h.join().unwrap_or(0))
        .collect();
    let consumed = consumers
        .into_iter()
        .map(|h| h.join().unwrap_or(0))
        .collect();

    Ok(StressReport {
        produced,
        consumed,
        overwrites: rb.overwrite_count(),
        remaining: rb.len(),
        elapsed: start.elapsed(),
    })
}

fn parse_args() -> StressConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = StressConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--producers" | "-p" => {
                if i + 1 < args.len() {
                    config.producers = args[i + 1].parse().unwrap_or(12);
                    i += 1;
                }
            }
            "--consumers" | "-c" => {
                if i + 1 < args.len() {
                    config.consumers = args[i + 1].parse().unwrap_or(12);
                    i += 1;
                }
            }
            "--items" | "-n" => {
                if i + 1 < args.len() {
                    config.items_per_producer = args[i + 1].parse().unwrap_or(9000);
                    i += 1;
                }
            }
            "--capacity" => {
                if i + 1 < args.len() {
                    config.capacity = args[i + 1].parse().unwrap_or(1 << 20);
                    i += 1;
                }
            }
            "--no-pace" => {
                config.pace_every = 0;
            }
            "--help" | "-h" => {
                println!("cbuf Stress - MPMC conservation run\n");
                println!("Usage: cbuf_stress [OPTIONS]\n");
                println!("Options:");
                println!("  -p, --producers <N>   Producer threads (default: 12)");
                println!("  -c, --consumers <N>   Consumer threads (default: 12)");
                println!("  -n, --items <N>       Items per producer (default: 9000)");
                println!("      --capacity <N>    Buffer capacity (default: 1048576)");
                println!("      --no-pace         Producers never sleep");
                println!("  -h, --help            Show this help");
                process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = parse_args();
    if let Err(e) = config.validate() {
        eprintln!("❌ Invalid arguments: {}", e);
        process::exit(2);
    }

    match run_stress(&config) {
        Ok(report) => {
            report.print_report();
            if !report.is_conserved() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("❌ Stress error: {}", e);
            process::exit(1);
        }
    }
}
