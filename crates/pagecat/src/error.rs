use std::io;
use std::path::PathBuf;

/// Fatal failures of a copy run. Each one ends the run with exit status 1.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("memory allocation failed ({requested} bytes)")]
    Allocation { requested: usize },
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

/// Geometry lookups that failed and were replaced by a fallback.
///
/// These never abort a run; they are logged and the copy goes on with a
/// less tuned buffer.
#[derive(Debug, thiserror::Error)]
pub enum QueryWarning {
    #[error("cannot determine page size, falling back to {fallback} bytes")]
    PageSize { fallback: usize },
    #[error("cannot stat input for block size ({source}), using page size")]
    BlockSize {
        #[source]
        source: io::Error,
    },
    #[error("ignoring block size {value} (not a power of two in [{min}, {max}])")]
    BlockSizeOutOfRange { value: u64, min: u64, max: u64 },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
