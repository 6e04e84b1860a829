/// Copy throughput for each buffer sizing strategy.
///
/// Writes a scratch file, then copies it into `io::sink()` through the same
/// session the binary uses. Run with `cargo bench -p pagecat`; set
/// `PAGECAT_BENCH_MIB` to change the file size (default 64).
use pagecat::advice::KernelAdvice;
use pagecat::advisor::BufferSizeAdvisor;
use pagecat::allocator::{AlignedAllocator, SystemAllocator};
use pagecat::{Config, Session, SizingStrategy};
use std::hint::black_box;
use std::io::{self, Write};
use std::time::Instant;

fn file_size() -> usize {
    std::env::var("PAGECAT_BENCH_MIB")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(64)
        << 20
}

fn bench_strategy(path: &std::path::Path, config: Config, iterations: usize) -> (usize, f64) {
    let sizer = BufferSizeAdvisor::detect(config);
    let allocator = AlignedAllocator::with_raw(SystemAllocator, sizer.page_size());
    let session = Session::with_parts(sizer.clone(), allocator, &KernelAdvice);
    let chunk = sizer.recommend(&std::fs::File::open(path).unwrap());

    // Warmup
    session.run(path, &mut io::sink()).unwrap();

    let start = Instant::now();
    let mut bytes = 0u64;
    for _ in 0..iterations {
        let stats = session.run(black_box(path), &mut io::sink()).unwrap();
        bytes += stats.bytes;
    }
    let secs = start.elapsed().as_secs_f64();
    (chunk, bytes as f64 / secs / (1 << 20) as f64)
}

fn main() {
    let size = file_size();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let block: Vec<u8> = (0..1 << 20).map(|i: u32| i.wrapping_mul(2654435761) as u8).collect();
    for _ in 0..size >> 20 {
        file.write_all(&block).unwrap();
    }
    file.flush().unwrap();

    println!("{:>12} {:>10} {:>12}", "strategy", "chunk", "MiB/s");
    for strategy in [
        SizingStrategy::PageSize,
        SizingStrategy::Lcm,
        SizingStrategy::ScaledLcm,
    ] {
        let config = Config::default().with_strategy(strategy);
        let (chunk, rate) = bench_strategy(file.path(), config, 5);
        println!("{:>12} {:>10} {:>12.1}", format!("{strategy:?}"), chunk, rate);
    }
}
