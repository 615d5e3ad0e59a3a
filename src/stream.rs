use std::io::{self, Read, Write};

use crate::error::{Error, Result};


/// Where encoded bytes go.
pub trait ByteSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    fn write_u8(&mut self, byte: u8) -> Result<()> {
        self.write_bytes(&[byte])
    }
}

impl<W: Write + ?Sized> ByteSink for W {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_all(bytes)?;
        Ok(())
    }
}


/// Where encoded bytes come from.
///
/// A source that runs dry reports `Error::Truncated`, which is kept apart
/// from the I/O failures of the underlying transport.
pub trait ByteSource {
    /// Fills `buf` completely or fails.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Reads exactly `len` bytes into a fresh buffer.
    ///
    /// `len` comes off the wire, so implementations must not reserve it
    /// before the bytes are known to exist.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Discards exactly `len` bytes.
    fn skip(&mut self, len: usize) -> Result<()> {
        self.read_vec(len).map(drop)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> where Self: Sized {
        let mut bytes = [0; N];
        self.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        (**self).read_vec(len)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        (**self).skip(len)
    }
}


/// Adapts any `std::io::Read` into a `ByteSource`.
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> IoSource<R> {
        IoSource { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(filled)
    }
}

const READ_CHUNK: usize = 8 * 1024;

impl<R: Read> ByteSource for IoSource<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let filled = self.fill(buf)?;
        if filled < buf.len() {
            return Err(Error::Truncated { needed: buf.len(), available: filled });
        }
        Ok(())
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut result = Vec::with_capacity(len.min(READ_CHUNK));
        let mut chunk = [0u8; READ_CHUNK];
        while result.len() < len {
            let want = (len - result.len()).min(READ_CHUNK);
            let filled = self.fill(&mut chunk[..want])?;
            result.extend_from_slice(&chunk[..filled]);
            if filled < want {
                return Err(Error::Truncated { needed: len, available: result.len() });
            }
        }
        Ok(result)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        let mut skipped = 0;
        while skipped < len {
            let want = (len - skipped).min(READ_CHUNK);
            let filled = self.fill(&mut chunk[..want])?;
            skipped += filled;
            if filled < want {
                return Err(Error::Truncated { needed: len, available: skipped });
            }
        }
        Ok(())
    }
}
