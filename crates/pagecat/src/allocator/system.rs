//! The unaligned allocators the page-aligned allocator is layered on.

use core::ffi::c_void;
use core::sync::atomic::{AtomicUsize, Ordering};

/// A general-purpose byte allocator with `malloc`/`free` semantics.
///
/// # Safety
/// `allocate` must return null or a pointer to at least `size` writable
/// bytes that stay valid until the pointer is passed to `deallocate`.
pub unsafe trait RawAllocator {
    /// Allocate `size` bytes. Returns null on failure.
    fn allocate(&self, size: usize) -> *mut u8;

    /// Free a block.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate` on this allocator and not
    /// freed since.
    unsafe fn deallocate(&self, ptr: *mut u8);
}

unsafe impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    #[inline]
    fn allocate(&self, size: usize) -> *mut u8 {
        (**self).allocate(size)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: *mut u8) {
        (**self).deallocate(ptr);
    }
}

/// Delegates to the C library's `malloc` and `free`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

unsafe impl RawAllocator for SystemAllocator {
    #[inline]
    fn allocate(&self, size: usize) -> *mut u8 {
        unsafe { libc::malloc(size) as *mut u8 }
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: *mut u8) {
        libc::free(ptr as *mut c_void);
    }
}

/// Wraps another allocator and counts what goes through it, so leaks and
/// double frees show up as a non-zero `live()` count.
#[derive(Debug, Default)]
pub struct CountingAllocator<A = SystemAllocator> {
    inner: A,
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    bytes_requested: AtomicUsize,
}

impl<A: RawAllocator> CountingAllocator<A> {
    pub const fn new(inner: A) -> Self {
        Self {
            inner,
            allocations: AtomicUsize::new(0),
            deallocations: AtomicUsize::new(0),
            bytes_requested: AtomicUsize::new(0),
        }
    }

    /// Successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    pub fn deallocations(&self) -> usize {
        self.deallocations.load(Ordering::Relaxed)
    }

    /// Blocks allocated and not yet freed.
    pub fn live(&self) -> usize {
        self.allocations() - self.deallocations()
    }

    /// Total bytes asked of the inner allocator, including failed requests.
    pub fn bytes_requested(&self) -> usize {
        self.bytes_requested.load(Ordering::Relaxed)
    }
}

unsafe impl<A: RawAllocator> RawAllocator for CountingAllocator<A> {
    fn allocate(&self, size: usize) -> *mut u8 {
        self.bytes_requested.fetch_add(size, Ordering::Relaxed);
        let ptr = self.inner.allocate(size);
        if !ptr.is_null() {
            self.allocations.fetch_add(1, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn deallocate(&self, ptr: *mut u8) {
        self.deallocations.fetch_add(1, Ordering::Relaxed);
        self.inner.deallocate(ptr);
    }
}
