use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;

pub use super::unix::{block_size, page_size, write_stdout};

// No posix_fadvise here. F_RDAHEAD turns on aggressive read-ahead, which
// covers both the sequential and the will-need hints.
fn read_ahead(file: &File) -> io::Result<()> {
    let ret = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_RDAHEAD, 1) };
    if ret == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

pub fn advise_sequential(file: &File) -> io::Result<()> {
    read_ahead(file)
}

pub fn advise_will_need(file: &File) -> io::Result<()> {
    read_ahead(file)
}

pub fn advise_dont_need(_file: &File) -> io::Result<()> {
    Err(io::ErrorKind::Unsupported.into())
}
