//! POSIX geometry queries and raw stdout, shared by every unix backend.
//! Unix targets without their own module get no page-cache hints.

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;

pub fn page_size() -> Option<usize> {
    let ps = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if ps > 0 {
        Some(ps as usize)
    } else {
        None
    }
}

pub fn block_size(file: &File) -> io::Result<u64> {
    let mut st: libc::stat = unsafe { core::mem::zeroed() };
    let ret = unsafe { libc::fstat(file.as_raw_fd(), &mut st) };
    if ret == -1 {
        return Err(io::Error::last_os_error());
    }
    // A negative blksize_t is nonsense; zero fails validation downstream.
    Ok(u64::try_from(st.st_blksize).unwrap_or(0))
}

pub fn advise_sequential(_file: &File) -> io::Result<()> {
    Err(io::ErrorKind::Unsupported.into())
}

pub fn advise_will_need(_file: &File) -> io::Result<()> {
    Err(io::ErrorKind::Unsupported.into())
}

pub fn advise_dont_need(_file: &File) -> io::Result<()> {
    Err(io::ErrorKind::Unsupported.into())
}

pub fn write_stdout(buf: &[u8]) -> io::Result<usize> {
    let ret = unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            buf.as_ptr() as *const libc::c_void,
            buf.len(),
        )
    };
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_of_a_temp_file() {
        let ps = page_size().unwrap();
        assert!(ps.is_power_of_two());
        let file = tempfile::tempfile().unwrap();
        assert!(block_size(&file).unwrap() > 0);
    }

    #[test]
    fn empty_write_to_stdout_is_zero() {
        assert_eq!(write_stdout(&[]).unwrap(), 0);
    }
}
