use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;

pub use super::unix::{block_size, page_size, write_stdout};

/// Apply `advice` to the whole file (offset 0, length 0 means "to EOF").
/// posix_fadvise returns the error number instead of setting errno.
fn fadvise(file: &File, advice: libc::c_int) -> io::Result<()> {
    let ret = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, 0, advice) };
    if ret == 0 {
        Ok(())
    } else {
        Err(io::Error::from_raw_os_error(ret))
    }
}

pub fn advise_sequential(file: &File) -> io::Result<()> {
    fadvise(file, libc::POSIX_FADV_SEQUENTIAL)
}

pub fn advise_will_need(file: &File) -> io::Result<()> {
    fadvise(file, libc::POSIX_FADV_WILLNEED)
}

pub fn advise_dont_need(file: &File) -> io::Result<()> {
    fadvise(file, libc::POSIX_FADV_DONTNEED)
}
