//! Page-cache hints around a copy.
//!
//! Hints are advisory: an error from any of them never affects the copy and
//! callers are expected to log and move on.

use crate::platform;
use std::fs::File;
use std::io;

/// Hooks run on the input file before and after the copy loop.
pub trait AccessAdvisor {
    /// Called once the file is open, before the first read.
    fn before_copy(&self, _file: &File) -> io::Result<()> {
        Ok(())
    }

    /// Called after the last byte has been written, on success only.
    fn after_copy(&self, _file: &File) -> io::Result<()> {
        Ok(())
    }
}

/// Gives no hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdvice;

impl AccessAdvisor for NoAdvice {}

/// Sequential read-ahead before the copy, drop-behind after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelAdvice;

impl AccessAdvisor for KernelAdvice {
    fn before_copy(&self, file: &File) -> io::Result<()> {
        // Try both even if the first one is refused.
        let sequential = platform::advise_sequential(file);
        let will_need = platform::advise_will_need(file);
        sequential.and(will_need)
    }

    fn after_copy(&self, file: &File) -> io::Result<()> {
        platform::advise_dont_need(file)
    }
}

/// The advisor the binary uses: `KernelAdvice` with the `os-hints` feature,
/// `NoAdvice` without it.
pub fn default_advisor() -> &'static dyn AccessAdvisor {
    if cfg!(feature = "os-hints") {
        &KernelAdvice
    } else {
        &NoAdvice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_advice_always_succeeds() {
        let file = tempfile::tempfile().unwrap();
        assert!(NoAdvice.before_copy(&file).is_ok());
        assert!(NoAdvice.after_copy(&file).is_ok());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn kernel_advice_accepted_on_regular_file() {
        let file = tempfile::tempfile().unwrap();
        KernelAdvice.before_copy(&file).unwrap();
        KernelAdvice.after_copy(&file).unwrap();
    }
}
