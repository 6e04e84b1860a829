#![no_main]

use libfuzzer_sys::fuzz_target;
use pagecat::allocator::{AlignedAllocator, SystemAllocator};
use std::io::{self, Cursor, Write};

// Input layout: [chunk_pages, write_limit, payload...].
// Copies the payload through an aligned buffer of 1..=16 small pages into a
// sink that accepts at most `write_limit + 1` bytes per call, then checks the
// output is the payload, byte for byte.

struct Limited {
    out: Vec<u8>,
    limit: usize,
}

impl Write for Limited {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.limit);
        self.out.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let pages = (data[0] as usize % 16) + 1;
    let limit = data[1] as usize + 1;
    let payload = &data[2..];

    let alloc = AlignedAllocator::with_raw(SystemAllocator, 64);
    let mut buf = alloc.acquire(pages * 64).unwrap();
    assert_eq!(buf.as_ptr() as usize % 64, 0);

    let mut sink = Limited {
        out: Vec::with_capacity(payload.len()),
        limit,
    };
    let stats = pagecat::copy(&mut Cursor::new(payload), &mut sink, &mut buf).unwrap();

    assert_eq!(sink.out, payload);
    assert_eq!(stats.bytes, payload.len() as u64);
    assert_eq!(stats.reads, payload.len().div_ceil(pages * 64) as u64);
});
