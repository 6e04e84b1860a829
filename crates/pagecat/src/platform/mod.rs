//! Thin wrappers over the OS facilities the copier needs: page geometry,
//! per-file block size and page-cache advice.

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(target_os = "linux")]
pub use linux as sys;

#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(target_os = "macos")]
pub use macos as sys;

#[cfg(unix)]
pub mod unix;
#[cfg(all(unix, not(any(target_os = "linux", target_os = "macos"))))]
pub use unix as sys;

#[cfg(not(unix))]
pub mod fallback;
#[cfg(not(unix))]
pub use fallback as sys;

use std::fs::File;
use std::io::{self, Write};

/// Memory page size reported by the OS, or `None` if it cannot be queried.
#[inline]
pub fn page_size() -> Option<usize> {
    sys::page_size()
}

/// Preferred I/O transfer size of the filesystem holding `file`.
///
/// The raw value is returned unvalidated; callers decide whether it is sane.
#[inline]
pub fn block_size(file: &File) -> io::Result<u64> {
    sys::block_size(file)
}

/// Tell the kernel `file` will be read front to back.
#[inline]
pub fn advise_sequential(file: &File) -> io::Result<()> {
    sys::advise_sequential(file)
}

/// Ask the kernel to start reading `file` ahead of us.
#[inline]
pub fn advise_will_need(file: &File) -> io::Result<()> {
    sys::advise_will_need(file)
}

/// Tell the kernel the cached pages of `file` can be dropped.
#[inline]
pub fn advise_dont_need(file: &File) -> io::Result<()> {
    sys::advise_dont_need(file)
}

/// Unbuffered standard output: every `write` is a single write(2), so short
/// writes surface to the caller instead of being hidden by a buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawStdout;

impl Write for RawStdout {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        sys::write_stdout(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
