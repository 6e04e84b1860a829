//! Copy a single file to standard output through a page-aligned buffer
//! sized from the page size and the filesystem block size.

extern crate libc;

pub mod advice;
pub mod advisor;
pub mod allocator;
pub mod config;
pub mod copy;
pub mod error;
pub mod logger;
pub mod platform;
pub mod session;
pub mod util;

pub use config::{Config, SizingStrategy};
pub use copy::{copy, CopyStats};
pub use error::{Error, QueryWarning, Result};
pub use session::Session;
