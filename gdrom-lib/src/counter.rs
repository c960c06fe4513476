//! Byte-counting stream decorator.

use std::io::{self, Read, Write};

/// Wraps a reader or writer and adds every transferred byte to a counter.
///
/// The counter is borrowed from whoever owns the tally (a source or sink),
/// so the total outlives the individual streams without being shared.
pub struct Counter<'a, T> {
    inner: T,
    count: &'a mut u64,
}

impl<'a, T> Counter<'a, T> {
    pub fn new(inner: T, count: &'a mut u64) -> Self {
        Self { inner, count }
    }

    /// Running total, including bytes counted before this stream was opened.
    pub fn count(&self) -> u64 {
        *self.count
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Read for Counter<'_, T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        *self.count += n as u64;
        Ok(n)
    }
}

impl<T: Write> Write for Counter<'_, T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        *self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
