pub mod aligned;
pub mod system;

pub use aligned::{AlignedAllocator, AlignedBuffer, ORIGIN_FOOTPRINT};
pub use system::{CountingAllocator, RawAllocator, SystemAllocator};
