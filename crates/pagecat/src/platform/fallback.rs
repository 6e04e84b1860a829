use std::fs::File;
use std::io;

// Non-unix platforms: no geometry queries, no hints.
// Callers fall back to the default page size and skip the advice.

pub fn page_size() -> Option<usize> {
    None
}

pub fn block_size(_file: &File) -> io::Result<u64> {
    Err(io::ErrorKind::Unsupported.into())
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
    use std::io::Write;

    let mut out = io::stdout().lock();
    let n = out.write(buf)?;
    out.flush()?;
    Ok(n)
}
