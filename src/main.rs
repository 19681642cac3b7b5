//! cbuf Demo - self-check, payload demo dan micro-benchmark
//!
//! Semua interaksi lewat public API `cbuf::RingBuffer` saja.
//!
//! Usage:
//!   cargo run --release --bin cbuf_demo

use std::process;
use std::time::Instant;

use cbuf::{Result, RingBuffer};
use tracing_subscriber::EnvFilter;

const OK: &str = "\x1b[32;1;4m[OK]\x1b[0m";
const NOK: &str = "\x1b[31;1;4m[NOK]\x1b[0m";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🔁 cbuf - Overwrite-on-Full Ring Buffer");
    println!("=======================================\n");

    let failed = run_self_checks();

    if let Err(e) = demo_float_payload().and_then(|_| demo_string_payload()) {
        eprintln!("❌ Demo error: {}", e);
        process::exit(1);
    }

    if let Err(e) = benchmark_put_get() {
        eprintln!("❌ Benchmark error: {}", e);
        process::exit(1);
    }

    if failed > 0 {
        println!("\n⚠️  {} self-check(s) failed", failed);
        process::exit(1);
    }

    println!("\n✅ All checks complete!");
    println!("\nFor the threaded run: cargo run --release --bin cbuf_stress");
}

/// Skenario self-check. Returns jumlah yang gagal.
fn run_self_checks() -> usize {
    println!("🧪 Self-Check (capacity 3)");
    println!("--------------------------");

    let checks: [(&str, fn() -> Result<bool>); 9] = [
        ("Get from empty buffer", check_empty),
        ("Full after filling", check_full),
        ("Size after two puts", check_size),
        ("One overwrite", check_one_overwrite),
        ("Partial read", check_partial_read),
        ("Full read", check_full_read),
        ("Resize", check_resize),
        ("Read order", check_read_order),
        ("Resize and operate", check_resize_and_operate),
    ];

    let mut failed = 0;
    for (name, check) in checks {
        let passed = matches!(check(), Ok(true));
        if !passed {
            failed += 1;
        }
        println!("  {:<24} {}", name, if passed { OK } else { NOK });
    }

    failed
}

fn check_empty() -> Result<bool> {
    let rb: RingBuffer<u32> = RingBuffer::new(3)?;
    Ok(rb.get().is_none())
}

fn check_full() -> Result<bool> {
    let rb: RingBuffer<u32> = RingBuffer::new(3)?;
    for _ in 0..3 {
        rb.put(0);
    }
    Ok(rb.is_full())
}

fn check_size() -> Result<bool> {
    let rb: RingBuffer<u32> = RingBuffer::new(3)?;
    rb.put(0);
    rb.put(0);
    Ok(rb.len() == 2)
}

fn check_one_overwrite() -> Result<bool> {
    let rb: RingBuffer<u32> = RingBuffer::new(3)?;
    for _ in 0..3 {
        rb.put(10);
    }
    rb.put(50);

    let mut last = 0;
    while let Some(v) = rb.get() {
        last = v;
    }
    Ok(rb.overwrite_count() == 1 && last == 50)
}

fn check_partial_read() -> Result<bool> {
    let rb: RingBuffer<u32> = RingBuffer::new(3)?;
    for _ in 0..3 {
        rb.put(10);
    }
    rb.get();
    rb.get();
    Ok(rb.overwrite_count() == 0 && rb.len() == 1 && !rb.is_full())
}

fn check_full_read() -> Result<bool> {
    let rb: RingBuffer<u32> = RingBuffer::new(3)?;
    for _ in 0..3 {
        rb.put(10);
    }
    for _ in 0..3 {
        rb.get();
    }
    Ok(rb.overwrite_count() == 0 && rb.len() == 0 && !rb.is_full())
}

fn check_resize() -> Result<bool> {
    let rb: RingBuffer<u32> = RingBuffer::new(3)?;
    rb.put(10);
    rb.put(20);
    rb.resize(5)?;
    Ok(rb.capacity() == 5 && !rb.is_full() && rb.len() == 2)
}

fn check_read_order() -> Result<bool> {
    let rb: RingBuffer<u32> = RingBuffer::new(3)?;
    for v in [10, 20, 30] {
        rb.put(v);
    }
    let order = [rb.get(), rb.get(), rb.get()];
    Ok(order == [Some(10), Some(20), Some(30)]
        && rb.overwrite_count() == 0
        && rb.len() == 0
        && !rb.is_full())
}

fn check_resize_and_operate() -> Result<bool> {
    let rb: RingBuffer<u32> = RingBuffer::new(3)?;
    rb.put(10);
    rb.put(20);
    rb.resize(5)?;
    let resized = rb.capacity() == 5 && !rb.is_full() && rb.len() == 2;

    let drained = rb.get() == Some(10) && rb.get() == Some(20);
    Ok(resized && drained && rb.capacity() == 5 && !rb.is_full() && rb.len() == 0)
}

fn demo_float_payload() -> Result<()> {
    println!("\n📦 Float Payload (capacity 10)");
    println!("------------------------------");

    let rb: RingBuffer<f32> = RingBuffer::new(10)?;
    println!("  Element size: {} bytes", rb.element_size());

    let mut value = 1.50f32;
    for _ in 0..10 {
        rb.put(value);
        value += 1.551_234_6;
    }

    while let Some(v) = rb.get() {
        println!("  get -> {:.6}", v);
    }
    Ok(())
}

fn demo_string_payload() -> Result<()> {
    println!("\n📦 Fixed 100-byte String Payload (capacity 6)");
    println!("---------------------------------------------");

    let rb: RingBuffer<[u8; 100]> = RingBuffer::new(6)?;
    println!("  Element size: {} bytes", rb.element_size());

    let words = ["Opa", "Não", "Sei", "Se", "Vai", "Funcionar", "Epa! Sobrescrevi!"];
    for word in words {
        let mut slot = [0u8; 100];
        slot[..word.len()].copy_from_slice(word.as_bytes());
        rb.put(slot);
    }
    println!("  Overwrites: {}", rb.overwrite_count());

    while let Some(slot) = rb.get() {
        let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
        println!("  get -> {}", String::from_utf8_lossy(&slot[..end]));
    }
    Ok(())
}

fn benchmark_put_get() -> Result<()> {
    println!("\n📊 Put/Get Benchmark (single thread, uncontended lock)");
    println!("-----------------------------------------------------");

    const ITERATIONS: usize = 1_000_000;
    let rb: RingBuffer<u64> = RingBuffer::new(65536)?;

    // Warm up
    for i in 0..1000 {
        rb.put(i);
    }
    while rb.get().is_some() {}

    // Benchmark put (termasuk overwrite setelah buffer penuh)
    let start = Instant::now();
    for i in 0..ITERATIONS {
        rb.put(i as u64);
    }
    let put_duration = start.elapsed();

    // Benchmark get
    let start = Instant::now();
    while rb.get().is_some() {}
    let get_duration = start.elapsed();
    let gets = rb.capacity();

    let put_ns = put_duration.as_nanos() as f64 / ITERATIONS as f64;
    let get_ns = get_duration.as_nanos() as f64 / gets as f64;

    println!("  Puts: {} (overwrites: {})", ITERATIONS, rb.overwrite_count());
    println!(
        "  Put latency: {:.2} ns/op ({:.3} μs/op)",
        put_ns,
        put_ns / 1000.0
    );
    println!(
        "  Get latency: {:.2} ns/op ({:.3} μs/op)",
        get_ns,
        get_ns / 1000.0
    );
    println!(
        "  Throughput:  {:.2} M puts/sec",
        ITERATIONS as f64 / put_duration.as_secs_f64() / 1_000_000.0
    );
    Ok(())
}
