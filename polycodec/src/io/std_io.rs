//! [`std::io`] adapters so a [`BinaryBuffer`] can sit behind `Read`/`Write` plumbing.
use {
    super::BinaryBuffer,
    std::io::{self, Read, Write},
};

impl Write for BinaryBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write_bytes(buf);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads consume from the read cursor; an exhausted buffer reads as EOF.
impl Read for BinaryBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        // `n` never exceeds `remaining`, so this cannot fail.
        let src = self
            .read_bytes(n)
            .map_err(|e| io::Error::new(io::ErrorKind::UnexpectedEof, e))?;
        buf[..n].copy_from_slice(src);
        Ok(n)
    }
}
