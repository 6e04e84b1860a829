/// Upper bound on the copy buffer.
pub const DEFAULT_CEILING: usize = 1 << 20; // 1 MiB

/// Multiplier applied to the page/block LCM under `SizingStrategy::ScaledLcm`.
pub const DEFAULT_SCALE_FACTOR: usize = 128;

/// Smallest filesystem block size taken at face value.
pub const MIN_BLOCK_SIZE: u64 = 512;

/// Largest filesystem block size taken at face value.
pub const MAX_BLOCK_SIZE: u64 = 1 << 20; // 1 MiB

/// How the copy buffer size is derived from the input's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingStrategy {
    /// One page per read.
    PageSize,
    /// `lcm(page size, block size)`.
    Lcm,
    /// `lcm(page size, block size) * scale_factor`. Fewer syscalls, more memory.
    #[default]
    ScaledLcm,
}

/// Buffer sizing knobs. `Config::default()` is what the binary runs with;
/// tests build smaller ones for deterministic geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub strategy: SizingStrategy,
    pub scale_factor: usize,
    pub ceiling: usize,
    pub min_block_size: u64,
    pub max_block_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: SizingStrategy::default(),
            scale_factor: DEFAULT_SCALE_FACTOR,
            ceiling: DEFAULT_CEILING,
            min_block_size: MIN_BLOCK_SIZE,
            max_block_size: MAX_BLOCK_SIZE,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_strategy(mut self, strategy: SizingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_scale_factor(mut self, scale_factor: usize) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    #[must_use]
    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling;
        self
    }
}
