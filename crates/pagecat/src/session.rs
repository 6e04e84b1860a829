//! One copy run: open, hint, size, allocate, copy, hint, release, close.

use crate::advice::{self, AccessAdvisor};
use crate::advisor::BufferSizeAdvisor;
use crate::allocator::{AlignedAllocator, RawAllocator, SystemAllocator};
use crate::config::Config;
use crate::copy::{copy, CopyStats};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Everything a copy run needs besides the input and output.
pub struct Session<'h, A: RawAllocator + Clone = SystemAllocator> {
    sizer: BufferSizeAdvisor,
    allocator: AlignedAllocator<A>,
    hints: &'h dyn AccessAdvisor,
}

impl Session<'static> {
    /// Session for the running system: page size from the OS, `malloc`
    /// backing, and kernel hints when the `os-hints` feature is on.
    pub fn new(config: Config) -> Self {
        let sizer = BufferSizeAdvisor::detect(config);
        let allocator = AlignedAllocator::with_raw(SystemAllocator, sizer.page_size());
        Self::with_parts(sizer, allocator, advice::default_advisor())
    }
}

impl<'h, A: RawAllocator + Clone> Session<'h, A> {
    pub fn with_parts(
        sizer: BufferSizeAdvisor,
        allocator: AlignedAllocator<A>,
        hints: &'h dyn AccessAdvisor,
    ) -> Self {
        Self {
            sizer,
            allocator,
            hints,
        }
    }

    /// Copy the file at `path` to `output`.
    ///
    /// The file is closed before this returns, whatever the outcome.
    pub fn run<W: Write + ?Sized>(&self, path: &Path, output: &mut W) -> Result<CopyStats> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        debug!("opened {}", path.display());
        self.copy_file(&file, output)
    }

    /// Copy an already open file to `output`.
    ///
    /// The copy buffer is released before this returns, whatever the outcome.
    pub fn copy_file<W: Write + ?Sized>(&self, file: &File, output: &mut W) -> Result<CopyStats> {
        if let Err(e) = self.hints.before_copy(file) {
            debug!("read-ahead hint ignored: {e}");
        }

        let chunk = self.sizer.recommend(file);
        let mut buf = self.allocator.acquire(chunk)?;

        let mut input = file;
        let stats = copy(&mut input, output, &mut buf)?;

        if let Err(e) = self.hints.after_copy(file) {
            debug!("drop-behind hint ignored: {e}");
        }
        info!(
            "copied {} bytes in {} reads and {} writes ({chunk}-byte buffer)",
            stats.bytes, stats.reads, stats.writes
        );
        Ok(stats)
    }
}
