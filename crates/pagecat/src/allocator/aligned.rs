//! Page-aligned buffers carved out of an unaligned allocator.
//!
//! Layout of one block obtained from the raw allocator:
//!
//! ```text
//! origin                  aligned - 8   aligned                 aligned + len
//! |<-- slack (0..page) -->|<- origin ->|<------ buffer ------->|<- tail ->|
//! ```
//!
//! The block is `len + page_size + ORIGIN_FOOTPRINT` bytes, which always
//! leaves room for the origin slot and `len` bytes after the first page
//! boundary past it. The buffer keeps its origin alongside the aligned view,
//! so release never has to trust the bytes in front of the buffer; the slot
//! copy is only checked to catch writes before the buffer start.

use crate::allocator::system::{RawAllocator, SystemAllocator};
use crate::error::{Error, Result};
use crate::util::{self, align_up, is_aligned};
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};
use core::{fmt, mem, slice};
use tracing::trace;

/// Bytes reserved in front of the aligned region for the origin address.
pub const ORIGIN_FOOTPRINT: usize = mem::size_of::<usize>();

/// Hands out page-aligned buffers backed by `A`.
#[derive(Debug, Clone)]
pub struct AlignedAllocator<A = SystemAllocator> {
    raw: A,
    page_size: usize,
}

impl AlignedAllocator<SystemAllocator> {
    /// `malloc`-backed allocator aligned to the cached system page size.
    pub fn new() -> Self {
        Self::with_raw(SystemAllocator, util::page_size())
    }
}

impl Default for AlignedAllocator<SystemAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: RawAllocator + Clone> AlignedAllocator<A> {
    /// `page_size` must be a power of two no smaller than a machine word.
    pub fn with_raw(raw: A, page_size: usize) -> Self {
        assert!(
            page_size.is_power_of_two() && page_size >= ORIGIN_FOOTPRINT,
            "alignment {page_size} is not a usable page size"
        );
        Self { raw, page_size }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Allocate a zero-filled buffer of exactly `size` bytes whose start is a
    /// multiple of the page size.
    pub fn acquire(&self, size: usize) -> Result<AlignedBuffer<A>> {
        let total = size
            .checked_add(self.page_size)
            .and_then(|n| n.checked_add(ORIGIN_FOOTPRINT))
            .ok_or(Error::Allocation { requested: size })?;

        let origin =
            NonNull::new(self.raw.allocate(total)).ok_or(Error::Allocation { requested: total })?;

        let raw_addr = origin.as_ptr() as usize;
        let aligned_addr = align_up(raw_addr + ORIGIN_FOOTPRINT, self.page_size);
        let offset = aligned_addr - raw_addr;
        debug_assert!(offset >= ORIGIN_FOOTPRINT && offset + size <= total);

        // SAFETY: offset + size <= total, so both the slot and the buffer lie
        // inside the block we just got. The slot is word aligned because the
        // aligned address is page aligned.
        let aligned = unsafe {
            let aligned = origin.as_ptr().add(offset);
            aligned.sub(ORIGIN_FOOTPRINT).cast::<usize>().write(raw_addr);
            ptr::write_bytes(aligned, 0, size);
            NonNull::new_unchecked(aligned)
        };
        trace!("acquired {size} bytes at {aligned:p} (origin {origin:p}, {total} bytes)");

        Ok(AlignedBuffer {
            aligned,
            len: size,
            origin,
            raw: self.raw.clone(),
        })
    }

    /// Give a buffer back. `None` is a no-op.
    ///
    /// Dropping the buffer does the same; this exists for call sites that
    /// want the release to be explicit.
    pub fn release(&self, buffer: Option<AlignedBuffer<A>>) {
        drop(buffer);
    }
}

/// A page-aligned byte buffer paired with the raw block backing it.
///
/// Freed exactly once, when dropped.
pub struct AlignedBuffer<A: RawAllocator = SystemAllocator> {
    aligned: NonNull<u8>,
    len: usize,
    origin: NonNull<u8>,
    raw: A,
}

impl<A: RawAllocator> AlignedBuffer<A> {
    pub fn as_ptr(&self) -> *const u8 {
        self.aligned.as_ptr()
    }

    /// Address of the underlying unaligned block.
    pub fn origin(&self) -> *const u8 {
        self.origin.as_ptr()
    }

    pub fn is_aligned_to(&self, align: usize) -> bool {
        is_aligned(self.aligned.as_ptr() as usize, align)
    }

    fn stored_origin(&self) -> usize {
        // SAFETY: acquire() wrote this slot and it lies inside our block.
        unsafe {
            self.aligned
                .as_ptr()
                .sub(ORIGIN_FOOTPRINT)
                .cast::<usize>()
                .read()
        }
    }
}

impl<A: RawAllocator> Deref for AlignedBuffer<A> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: `len` initialised bytes start at `aligned` and we own them.
        unsafe { slice::from_raw_parts(self.aligned.as_ptr(), self.len) }
    }
}

impl<A: RawAllocator> DerefMut for AlignedBuffer<A> {
    fn deref_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` gives exclusive access.
        unsafe { slice::from_raw_parts_mut(self.aligned.as_ptr(), self.len) }
    }
}

impl<A: RawAllocator> Drop for AlignedBuffer<A> {
    fn drop(&mut self) {
        if self.stored_origin() != self.origin.as_ptr() as usize {
            abort_with_message("pagecat: aligned buffer header overwritten");
        }
        trace!("releasing {} bytes at {:p}", self.len, self.aligned);
        // SAFETY: `origin` came from `raw.allocate` in acquire() and this is
        // the only place it is freed.
        unsafe { self.raw.deallocate(self.origin.as_ptr()) };
    }
}

impl<A: RawAllocator> fmt::Debug for AlignedBuffer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("aligned", &self.aligned)
            .field("len", &self.len)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Memory in front of the buffer was clobbered; freeing would hand a bogus
/// pointer to the allocator.
#[cold]
#[inline(never)]
fn abort_with_message(msg: &str) -> ! {
    eprintln!("{msg}");
    std::process::abort();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::system::CountingAllocator;

    #[test]
    fn aligned_to_requested_page() {
        for page in [64usize, 512, 4096, 16384] {
            let alloc = AlignedAllocator::with_raw(SystemAllocator, page);
            for size in [1usize, 7, page - 1, page, page + 1, 3 * page + 5] {
                let buf = alloc.acquire(size).unwrap();
                assert!(buf.is_aligned_to(page), "size {size} page {page}");
                assert_eq!(buf.len(), size);
                assert!(buf.iter().all(|&b| b == 0));
            }
        }
    }

    #[test]
    fn origin_precedes_buffer() {
        let alloc = AlignedAllocator::with_raw(SystemAllocator, 4096);
        let buf = alloc.acquire(100).unwrap();
        let origin = buf.origin() as usize;
        let start = buf.as_ptr() as usize;
        assert!(start >= origin + ORIGIN_FOOTPRINT);
        assert!(start - origin < 4096 + ORIGIN_FOOTPRINT);
        assert_eq!(buf.stored_origin(), origin);
    }

    #[test]
    fn buffer_is_writable_end_to_end() {
        let alloc = AlignedAllocator::with_raw(SystemAllocator, 4096);
        let mut buf = alloc.acquire(10_000).unwrap();
        buf.fill(0xAB);
        buf[0] = 1;
        buf[9_999] = 2;
        assert_eq!(buf[0], 1);
        assert_eq!(buf[9_999], 2);
        assert_eq!(buf[5_000], 0xAB);
    }

    #[test]
    fn requests_size_plus_page_plus_footprint() {
        let counting = CountingAllocator::new(SystemAllocator);
        let alloc = AlignedAllocator::with_raw(&counting, 4096);
        let buf = alloc.acquire(1000).unwrap();
        assert_eq!(counting.bytes_requested(), 1000 + 4096 + ORIGIN_FOOTPRINT);
        alloc.release(Some(buf));
        assert_eq!(counting.live(), 0);
    }

    #[test]
    fn release_none_is_noop() {
        let counting = CountingAllocator::new(SystemAllocator);
        let alloc = AlignedAllocator::with_raw(&counting, 4096);
        alloc.release(None);
        assert_eq!(counting.deallocations(), 0);
    }

    #[test]
    fn oversized_request_fails_without_allocating() {
        let counting = CountingAllocator::new(SystemAllocator);
        let alloc = AlignedAllocator::with_raw(&counting, 4096);
        let err = alloc.acquire(usize::MAX - 10).unwrap_err();
        assert!(matches!(err, Error::Allocation { .. }));
        assert_eq!(counting.allocations(), 0);
    }
}
