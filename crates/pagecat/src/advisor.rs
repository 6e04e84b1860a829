//! Copy buffer sizing.
//!
//! The buffer is a whole number of pages and of filesystem blocks, so every
//! read lines up with both the page cache and the device. Optionally it is
//! scaled up to cut the number of syscalls, and it is always capped.

use crate::config::{Config, SizingStrategy};
use crate::error::QueryWarning;
use crate::platform;
use crate::util::{self, is_power_of_two, lcm};
use tracing::{debug, warn};
use std::fs::File;
use std::io;

/// Accept `raw` as a block size only if it is a power of two within the
/// configured bounds.
pub fn validate_block_size(raw: u64, config: &Config) -> Result<u64, QueryWarning> {
    if is_power_of_two(raw) && (config.min_block_size..=config.max_block_size).contains(&raw) {
        Ok(raw)
    } else {
        Err(QueryWarning::BlockSizeOutOfRange {
            value: raw,
            min: config.min_block_size,
            max: config.max_block_size,
        })
    }
}

/// Combine page and (validated) block size into a chunk size.
///
/// The result is a positive multiple of `page_size` that does not exceed
/// `config.ceiling` (or one page, if the ceiling is below a page). When the
/// ceiling allows it, the result is also a multiple of
/// `lcm(page_size, block_size)`.
pub fn chunk_size(page_size: usize, block_size: u64, config: &Config) -> usize {
    let page = page_size as u64;
    let base = match config.strategy {
        SizingStrategy::PageSize => page,
        SizingStrategy::Lcm | SizingStrategy::ScaledLcm => lcm(page, block_size),
    };
    let scaled = match config.strategy {
        SizingStrategy::ScaledLcm => base.saturating_mul(config.scale_factor.max(1) as u64),
        _ => base,
    };

    let ceiling = config.ceiling as u64;
    let chunk = if scaled <= ceiling {
        scaled
    } else if base <= ceiling {
        // Largest multiple of the base unit that fits under the ceiling.
        ceiling / base * base
    } else {
        // One unit is already too big: fall back to whole pages.
        (ceiling / page * page).max(page)
    };
    usize::try_from(chunk).unwrap_or(page_size)
}

/// Picks the copy buffer size for an open input file.
#[derive(Debug, Clone)]
pub struct BufferSizeAdvisor {
    config: Config,
    page_size: usize,
}

impl BufferSizeAdvisor {
    /// Query the page size from the OS (warning and falling back to 4096 on
    /// failure) and build an advisor around it.
    pub fn detect(config: Config) -> Self {
        if let Err(warning) = util::init_page_size() {
            warn!("{warning}");
        }
        Self::with_page_size(config, util::page_size())
    }

    /// Build an advisor for a known page size.
    pub fn with_page_size(config: Config, page_size: usize) -> Self {
        debug_assert!(page_size.is_power_of_two());
        Self { config, page_size }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Filesystem block size of `file`, or the page size if the lookup fails
    /// or the reported value is implausible.
    pub fn block_size(&self, file: &File) -> u64 {
        self.block_size_from(platform::block_size(file))
    }

    /// Validate the outcome of a block size lookup, falling back to the page
    /// size (with a warning) if it failed or is implausible.
    pub fn block_size_from(&self, raw: io::Result<u64>) -> u64 {
        let fallback = self.page_size as u64;
        match raw {
            Ok(raw) => validate_block_size(raw, &self.config).unwrap_or_else(|warning| {
                warn!("{warning}");
                fallback
            }),
            Err(source) => {
                warn!("{}", QueryWarning::BlockSize { source });
                fallback
            }
        }
    }

    /// Recommended chunk size for copying `file`. Never zero.
    pub fn recommend(&self, file: &File) -> usize {
        let block_size = match self.config.strategy {
            SizingStrategy::PageSize => self.page_size as u64,
            SizingStrategy::Lcm | SizingStrategy::ScaledLcm => self.block_size(file),
        };
        let chunk = chunk_size(self.page_size, block_size, &self.config);
        debug!(
            "page size {}, block size {block_size}, {:?} -> chunk {chunk}",
            self.page_size, self.config.strategy
        );
        chunk
    }
}
