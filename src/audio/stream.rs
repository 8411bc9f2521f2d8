use std::io::{self, Read, Seek, SeekFrom};

/// Forward-only `Read + Seek` view of an HTTP response body.
///
/// The decoder wants `Seek`; a live stream can only report where it is.
/// Seeking to the current position is accepted, anything else is `Unsupported`.
pub struct NetworkStream {
    inner: Box<dyn Read + Send + Sync>,
    position: u64,
}

impl NetworkStream {
    pub fn new(inner: Box<dyn Read + Send + Sync>) -> Self {
        Self { inner, position: 0 }
    }

    pub fn position(&self) -> u64 {
        self.position
    }
}

impl Read for NetworkStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl Seek for NetworkStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::Current(0) => Ok(self.position),
            SeekFrom::Start(p) if p == self.position => Ok(p),
            _ => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "network streams cannot seek",
            )),
        }
    }
}
