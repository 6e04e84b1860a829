//! The read/write loop.

use crate::error::{Error, Result};
use std::io::{self, ErrorKind, Read, Write};
use tracing::trace;

/// What one copy did. `reads` counts only reads that returned data; the
/// final zero-length read that signals end of input is not included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyStats {
    pub bytes: u64,
    pub reads: u64,
    pub writes: u64,
}

/// Copy `input` to `output` through `buf` until `input` reports end of file.
///
/// Each read fills at most `buf.len()` bytes and is written out completely
/// before the next read, resuming after short writes. The first read or
/// write error ends the copy; nothing is retried except calls interrupted
/// by a signal. An empty `buf` is rejected with an `InvalidInput` read
/// error before anything is read.
pub fn copy<R, W>(input: &mut R, output: &mut W, buf: &mut [u8]) -> Result<CopyStats>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    if buf.is_empty() {
        return Err(Error::Read(io::Error::new(
            ErrorKind::InvalidInput,
            "copy buffer is empty",
        )));
    }
    let mut stats = CopyStats::default();

    loop {
        let filled = match input.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Read(e)),
        };
        stats.reads += 1;
        trace!("read {filled} bytes at offset {}", stats.bytes);

        let mut written = 0;
        while written < filled {
            match output.write(&buf[written..filled]) {
                Ok(0) => {
                    return Err(Error::Write(io::Error::new(
                        ErrorKind::WriteZero,
                        "output accepted no bytes",
                    )));
                }
                Ok(n) => {
                    written += n;
                    stats.writes += 1;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::Write(e)),
            }
        }
        stats.bytes += filled as u64;
    }

    output.flush().map_err(Error::Write)?;
    Ok(stats)
}
